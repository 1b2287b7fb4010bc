//! Error types for the synchronization core.

use crate::tab::TabId;
use thiserror::Error;

/// Failure of a source adapter to produce an item list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Failure of the desktop notifier.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification helper {program} is unavailable: {reason}")]
    Unavailable { program: String, reason: String },

    #[error("Notification for {tab} failed: {reason}")]
    Failed { tab: String, reason: String },
}

/// Failure to open an item in a browser or application.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Could not open {target}: {reason}")]
    Launch { target: String, reason: String },
}

/// Invalid tab display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TabOrderError {
    #[error("At least one tab must be enabled")]
    Empty,

    #[error("Tab {0} is listed more than once")]
    Duplicate(TabId),
}

/// Fatal poller outcome.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("Fetching {tab} failed {failures} times in a row: {source}")]
    SourceFailed {
        tab: TabId,
        failures: u32,
        #[source]
        source: SourceError,
    },
}
