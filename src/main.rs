use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use order_desk::config::Config;
use order_desk::engine::{Transition, TransitionKind};
use order_desk::error::AppError;
use order_desk::export::{export_rows, filter_orders, spreadsheet, write_workbook};
use order_desk::models::OrderStatus;
use order_desk::state::AppState;
use order_desk::views::{ConfirmationPrompt, OrderListView, render_detail};

#[derive(Debug, Parser)]
#[command(name = "order-desk", about = "Order lifecycle desk for the store backend", long_about = None)]
struct Cli {
    /// Apply transitions without asking for confirmation
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    /// Print collected metrics to stderr before exiting
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one of the four order collections
    List {
        status: OrderStatus,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show the full detail of one order
    Show { order_id: String },
    /// Confirm a pending order
    Confirm { order_id: String },
    /// Cancel a pending order
    Cancel { order_id: String },
    /// Mark a confirmed order as delivered
    Deliver { order_id: String },
    /// Move a delivered order back to confirmed
    Revoke { order_id: String },
    /// Set the delivery type of an order
    AssignDeliveryType {
        order_id: String,
        delivery_type_name: String,
    },
    /// List the delivery types the backend offers
    DeliveryTypes,
    /// Write a collection to an .xlsx workbook
    Export {
        status: OrderStatus,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if config.token.is_none() {
        tracing::warn!("no bearer token configured; requests are sent unauthenticated");
    }

    let state = AppState::new(&config)?;
    tracing::debug!(backend_url = %config.backend_url, "services ready");

    let result = run(&state, cli.command, cli.yes).await;

    if cli.print_metrics {
        let body = state.metrics.encode().map_err(AppError::Internal)?;
        eprint!("{body}");
    }

    result
}

async fn run(state: &AppState, command: Command, yes: bool) -> Result<(), AppError> {
    match command {
        Command::List { status, search } => {
            let view = OrderListView::new(status, state.store.clone());
            print!("{}", view.open(&search).await.render());
        }
        Command::Show { order_id } => {
            let order = state
                .store
                .order_details(&order_id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;
            print!("{}", render_detail(&order));
        }
        Command::Confirm { order_id } => {
            transition(state, &order_id, Transition::Confirm, yes).await?;
        }
        Command::Cancel { order_id } => {
            transition(state, &order_id, Transition::Cancel, yes).await?;
        }
        Command::Deliver { order_id } => {
            transition(state, &order_id, Transition::Deliver, yes).await?;
        }
        Command::Revoke { order_id } => {
            transition(state, &order_id, Transition::RevokeDelivered, yes).await?;
        }
        Command::AssignDeliveryType {
            order_id,
            delivery_type_name,
        } => {
            state.delivery_types.fetch().await;
            let delivery_type_name = state
                .delivery_types
                .resolve(&delivery_type_name)
                .await
                .ok_or_else(|| AppError::NotFound(format!("delivery type {delivery_type_name}")))?;

            transition(
                state,
                &order_id,
                Transition::AssignDeliveryType { delivery_type_name },
                yes,
            )
            .await?;
        }
        Command::DeliveryTypes => {
            for delivery_type in state.delivery_types.fetch().await {
                println!("{}", delivery_type.name);
            }
        }
        Command::Export {
            status,
            search,
            out,
        } => {
            state.store.fetch(status).await;
            let orders = filter_orders(&state.store.orders(status), &search);
            let path = out.unwrap_or_else(|| PathBuf::from(spreadsheet::default_file_name(status)));

            write_workbook(
                &export_rows(&orders),
                &spreadsheet::sheet_name(status),
                &path,
            )?;

            tracing::info!(status = %status, orders = orders.len(), path = %path.display(), "exported orders");
            println!("Exported {} orders to {}", orders.len(), path.display());
        }
    }

    Ok(())
}

async fn transition(
    state: &AppState,
    order_id: &str,
    transition: Transition,
    yes: bool,
) -> Result<(), AppError> {
    let kind = transition.kind();

    let order = match kind {
        TransitionKind::AssignDeliveryType => state.store.order_details(order_id).await,
        _ => {
            state.store.fetch(kind.source()).await;
            state.store.find(kind.source(), order_id)
        }
    };

    if order.is_none() && kind != TransitionKind::AssignDeliveryType {
        tracing::warn!(order_id = %order_id, status = %kind.source(), "order not in its source collection");
    }

    if !yes {
        let prompt = ConfirmationPrompt::new(transition.clone(), order_id, order.as_ref());
        if !ask(&prompt.to_string()).await? {
            return Err(AppError::Aborted(format!("{kind} for order {order_id}")));
        }
    }

    state.coordinator.apply(order_id, transition).await?;

    println!("{} applied to order {order_id}", kind.label());
    for status in kind.refreshes() {
        println!("  {} orders: {}", status.title(), state.store.orders(*status).len());
    }

    Ok(())
}

async fn ask(prompt: &str) -> Result<bool, AppError> {
    print!("{prompt}");
    std::io::stdout()
        .flush()
        .map_err(|err| AppError::Internal(format!("failed to write prompt: {err}")))?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .map_err(|err| AppError::Internal(format!("failed to read answer: {err}")))?;

    Ok(ConfirmationPrompt::accepts(&answer))
}
