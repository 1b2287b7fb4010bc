//! Dashboard state owned by the render loop.

use crate::error::NotifyError;
use crate::nav::{NavInput, NavState, OpenTarget, Opener};
use crate::notify::{NotificationPolicy, NotifyFailure, Notifier};
use crate::snapshot::{SnapshotStore, TabSnapshot};
use crate::tab::{TabId, TabOrder};
use crate::Timestamp;
use std::sync::Arc;

/// Result of one render-loop step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub opened: Option<OpenTarget>,
    pub notified: usize,
}

/// Everything one frame needs. Only the snapshot store is shared with the
/// poller; navigation and watermarks live here.
#[derive(Debug)]
pub struct DashboardState {
    store: Arc<SnapshotStore>,
    nav: NavState,
    notifications: NotificationPolicy,
}

impl DashboardState {
    pub fn new(tabs: TabOrder, store: Arc<SnapshotStore>, on_notify_failure: NotifyFailure) -> Self {
        Self {
            store,
            nav: NavState::new(tabs),
            notifications: NotificationPolicy::new(on_notify_failure),
        }
    }

    pub fn tabs(&self) -> &TabOrder {
        self.nav.tabs()
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    pub fn notifications(&self) -> &NotificationPolicy {
        &self.notifications
    }

    pub fn snapshot(&self, tab: TabId) -> Arc<TabSnapshot> {
        self.store.get(tab)
    }

    pub fn should_close(&self) -> bool {
        self.nav.close_requested()
    }

    /// Advance one frame. Cursors are re-clamped to the latest snapshots
    /// both before the newest input is applied and after it, then the
    /// notification policy runs.
    pub fn step(
        &mut self,
        input: Option<NavInput>,
        now: Timestamp,
        notifier: &dyn Notifier,
        opener: &dyn Opener,
    ) -> Result<StepOutcome, NotifyError> {
        let mut outcome = StepOutcome::default();

        // A commit since the last frame may have shrunk the selected tab.
        self.nav.reclamp(&self.store);
        if let Some(input) = input {
            if let Some(target) = self.nav.apply(input, &self.store, now) {
                if let Err(err) = opener.open(&target) {
                    tracing::warn!(error = %err, "Failed to open item");
                }
                outcome.opened = Some(target);
            }
        }

        self.nav.reclamp(&self.store);
        outcome.notified = self
            .notifications
            .dispatch(self.nav.tabs(), &self.store, notifier)?;
        Ok(outcome)
    }
}
