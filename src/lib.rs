pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod observability;
pub mod state;
pub mod store;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;
