//! Error types for the dashboard binary.

use crate::config::ConfigError;
use daeshboard_core::{NotifyError, PollerError};

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Poller(#[from] PollerError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Poller task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
