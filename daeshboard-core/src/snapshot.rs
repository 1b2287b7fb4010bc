//! Snapshot store: the latest item list of every tab.
//!
//! The poller is the only writer. The render loop reads every frame. Each
//! snapshot is an immutable value behind an `Arc`; a write swaps the whole
//! `Arc` under a short write lock, so a reader either sees the previous
//! snapshot or the new one, never items from one write and a timestamp from
//! another.

use crate::item::Item;
use crate::tab::{TabId, TabMap};
use crate::Timestamp;
use chrono::Duration;
use std::sync::{Arc, PoisonError, RwLock};

/// The committed item list of a tab plus the time it last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSnapshot {
    pub items: Vec<Item>,
    /// `None` until the first successful fetch.
    pub modified_at: Option<Timestamp>,
}

impl TabSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: RwLock<TabMap<Arc<TabSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot of `tab`; the empty snapshot if it was never written.
    pub fn get(&self, tab: TabId) -> Arc<TabSnapshot> {
        let snapshots = self
            .snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&snapshots[tab])
    }

    /// Replace the snapshot of `tab` and return the committed timestamp.
    ///
    /// Stamps are strictly increasing per tab: when `now` does not move past
    /// the previous stamp the new one lands a nanosecond after it.
    pub fn put(&self, tab: TabId, items: Vec<Item>, now: Timestamp) -> Timestamp {
        let mut snapshots = self
            .snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let modified_at = match snapshots[tab].modified_at {
            Some(previous) if now <= previous => previous + Duration::nanoseconds(1),
            _ => now,
        };
        snapshots[tab] = Arc::new(TabSnapshot {
            items,
            modified_at: Some(modified_at),
        });
        modified_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn unwritten_tab_is_empty_and_zero() {
        let store = SnapshotStore::new();
        let snapshot = store.get(TabId::Alerts);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.modified_at, None);
    }

    #[test]
    fn put_replaces_items_and_stamp_together() {
        let store = SnapshotStore::new();
        store.put(TabId::Prs, vec![Item::new("a")], at(10));
        let before = store.get(TabId::Prs);

        store.put(TabId::Prs, vec![Item::new("b"), Item::new("c")], at(20));
        let after = store.get(TabId::Prs);

        assert_eq!(before.items, vec![Item::new("a")]);
        assert_eq!(before.modified_at, Some(at(10)));
        assert_eq!(after.len(), 2);
        assert_eq!(after.modified_at, Some(at(20)));
    }

    #[test]
    fn put_only_touches_its_own_tab() {
        let store = SnapshotStore::new();
        store.put(TabId::Issues, vec![Item::new("x")], at(5));
        assert_eq!(store.get(TabId::Prs).modified_at, None);
        assert_eq!(store.get(TabId::Issues).len(), 1);
    }

    #[test]
    fn stamps_strictly_increase_when_clock_stalls() {
        let store = SnapshotStore::new();
        let first = store.put(TabId::Alerts, vec![Item::new("a")], at(30));
        let second = store.put(TabId::Alerts, vec![Item::new("b")], at(30));
        let third = store.put(TabId::Alerts, vec![Item::new("c")], at(29));
        assert!(first < second);
        assert!(second < third);
    }
}
