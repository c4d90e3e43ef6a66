use thiserror::Error;

use crate::engine::coordinator::TransitionError;
use crate::export::spreadsheet::ExportError;
use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("internal error: {0}")]
    Internal(String),
}
