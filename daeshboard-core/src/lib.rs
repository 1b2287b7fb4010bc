//! Daeshboard Core - Synchronization Core
//!
//! Snapshot store, poller, notification policy and navigation state for the
//! status dashboard. No terminal or HTTP code lives here; sources, notifier
//! and opener are capability traits implemented by the application crate.

use chrono::{DateTime, Utc};

pub mod error;
pub mod item;
pub mod nav;
pub mod notify;
pub mod poller;
pub mod snapshot;
pub mod state;
pub mod tab;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use error::{NotifyError, OpenError, PollerError, SourceError, TabOrderError};
pub use item::Item;
pub use nav::{NavInput, NavState, OpenTarget, Opener, TabDisplayState};
pub use notify::{NotificationPolicy, Notifier, NotifyFailure};
pub use poller::{
    CycleReport, FetchOutcome, Poller, PollerConfig, PollerStats, RefreshHandle, RetryPolicy,
    SourceAdapter,
};
pub use snapshot::{SnapshotStore, TabSnapshot};
pub use state::{DashboardState, StepOutcome};
pub use tab::{TabId, TabMap, TabOrder};
