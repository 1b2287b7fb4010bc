//! Notification dedup policy.
//!
//! Each tab carries a watermark: the `modified_at` stamp as of the last
//! decision. The first stamp a tab ever gets only primes the watermark, so
//! the initial population at startup stays silent. Every later strict
//! increase produces exactly one notification, no matter how many frames pass
//! between evaluations.

use crate::error::NotifyError;
use crate::snapshot::SnapshotStore;
use crate::tab::{TabId, TabMap, TabOrder};
use crate::Timestamp;

/// Performs the OS-level notification for a tab.
pub trait Notifier {
    fn notify(&self, tab_title: &str) -> Result<(), NotifyError>;
}

/// What to do when the notifier fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyFailure {
    /// Log the failure and keep going.
    #[default]
    LogAndContinue,
    /// Return the failure to the caller.
    Escalate,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationPolicy {
    watermarks: TabMap<Option<Timestamp>>,
    on_failure: NotifyFailure,
}

impl NotificationPolicy {
    pub fn new(on_failure: NotifyFailure) -> Self {
        Self {
            watermarks: TabMap::default(),
            on_failure,
        }
    }

    pub fn watermark(&self, tab: TabId) -> Option<Timestamp> {
        self.watermarks[tab]
    }

    /// Advance the watermarks and return the tabs that need a notification,
    /// in display order.
    pub fn evaluate(&mut self, tabs: &TabOrder, store: &SnapshotStore) -> Vec<TabId> {
        let mut due = Vec::new();
        for tab in tabs.iter() {
            let Some(modified_at) = store.get(tab).modified_at else {
                continue;
            };
            match self.watermarks[tab] {
                None => self.watermarks[tab] = Some(modified_at),
                Some(sent_at) if sent_at < modified_at => {
                    self.watermarks[tab] = Some(modified_at);
                    due.push(tab);
                }
                Some(_) => {}
            }
        }
        due
    }

    /// Evaluate and notify. Returns how many notifications were delivered.
    pub fn dispatch(
        &mut self,
        tabs: &TabOrder,
        store: &SnapshotStore,
        notifier: &dyn Notifier,
    ) -> Result<usize, NotifyError> {
        let mut delivered = 0;
        for tab in self.evaluate(tabs, store) {
            match notifier.notify(tab.title()) {
                Ok(()) => {
                    tracing::info!(tab = %tab, "Sent notification");
                    delivered += 1;
                }
                Err(err) => match self.on_failure {
                    NotifyFailure::LogAndContinue => {
                        tracing::warn!(tab = %tab, error = %err, "Failed to create notification");
                    }
                    NotifyFailure::Escalate => return Err(err),
                },
            }
        }
        Ok(delivered)
    }
}
