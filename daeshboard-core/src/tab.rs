//! Tab identifiers and per-tab storage.

use crate::error::TabOrderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One category of monitored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabId {
    Prs,
    Issues,
    Alerts,
    Workflows,
}

impl TabId {
    pub const COUNT: usize = 4;

    pub fn title(&self) -> &'static str {
        match self {
            TabId::Prs => "PRs",
            TabId::Issues => "Issues",
            TabId::Alerts => "Alerts",
            TabId::Workflows => "Workflows",
        }
    }

    pub fn all() -> &'static [TabId; TabId::COUNT] {
        &[TabId::Prs, TabId::Issues, TabId::Alerts, TabId::Workflows]
    }

    /// Slot of this tab in a [`TabMap`]. Independent of display order.
    fn slot(&self) -> usize {
        match self {
            TabId::Prs => 0,
            TabId::Issues => 1,
            TabId::Alerts => 2,
            TabId::Workflows => 3,
        }
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Fixed-size table holding one `T` for every [`TabId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMap<T> {
    slots: [T; TabId::COUNT],
}

impl<T> TabMap<T> {
    pub fn from_fn(mut f: impl FnMut(TabId) -> T) -> Self {
        let [a, b, c, d] = *TabId::all();
        Self {
            slots: [f(a), f(b), f(c), f(d)],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TabId, &T)> {
        TabId::all().iter().copied().zip(self.slots.iter())
    }
}

impl<T: Default> Default for TabMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<TabId> for TabMap<T> {
    type Output = T;

    fn index(&self, tab: TabId) -> &T {
        &self.slots[tab.slot()]
    }
}

impl<T> IndexMut<TabId> for TabMap<T> {
    fn index_mut(&mut self, tab: TabId) -> &mut T {
        &mut self.slots[tab.slot()]
    }
}

/// Display order of the enabled tabs. Non-empty and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabOrder {
    tabs: Vec<TabId>,
}

impl TabOrder {
    pub fn new(tabs: Vec<TabId>) -> Result<Self, TabOrderError> {
        if tabs.is_empty() {
            return Err(TabOrderError::Empty);
        }
        for (i, tab) in tabs.iter().enumerate() {
            if tabs[..i].contains(tab) {
                return Err(TabOrderError::Duplicate(*tab));
            }
        }
        Ok(Self { tabs })
    }

    pub fn first(&self) -> TabId {
        self.tabs[0]
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).copied()
    }

    pub fn position(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| *t == tab)
    }

    pub fn contains(&self, tab: TabId) -> bool {
        self.tabs.contains(&tab)
    }

    pub fn iter(&self) -> impl Iterator<Item = TabId> + '_ {
        self.tabs.iter().copied()
    }

    /// Tab to the left of `tab`, clamped at the first entry.
    pub fn previous(&self, tab: TabId) -> TabId {
        let idx = self.position(tab).unwrap_or(0);
        self.tabs[idx.saturating_sub(1)]
    }

    /// Tab to the right of `tab`, clamped at the last entry.
    pub fn next(&self, tab: TabId) -> TabId {
        let idx = self.position(tab).unwrap_or(0);
        self.tabs[(idx + 1).min(self.tabs.len() - 1)]
    }
}

impl Default for TabOrder {
    fn default() -> Self {
        Self {
            tabs: TabId::all().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_rejects_empty() {
        assert_eq!(TabOrder::new(Vec::new()), Err(TabOrderError::Empty));
    }

    #[test]
    fn tab_order_rejects_duplicates() {
        let result = TabOrder::new(vec![TabId::Alerts, TabId::Prs, TabId::Alerts]);
        assert_eq!(result, Err(TabOrderError::Duplicate(TabId::Alerts)));
    }

    #[test]
    fn tab_order_keeps_insertion_order() {
        let order = TabOrder::new(vec![TabId::Alerts, TabId::Prs]).unwrap();
        assert_eq!(order.first(), TabId::Alerts);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![TabId::Alerts, TabId::Prs]);
        assert_eq!(order.get(2), None);
    }

    #[test]
    fn previous_and_next_clamp_at_ends() {
        let order = TabOrder::default();
        assert_eq!(order.previous(TabId::Prs), TabId::Prs);
        assert_eq!(order.next(TabId::Prs), TabId::Issues);
        assert_eq!(order.next(TabId::Workflows), TabId::Workflows);
        assert_eq!(order.previous(TabId::Workflows), TabId::Alerts);
    }

    #[test]
    fn tab_map_indexes_every_tab() {
        let mut map: TabMap<u32> = TabMap::default();
        map[TabId::Alerts] = 7;
        assert_eq!(map[TabId::Alerts], 7);
        assert_eq!(map[TabId::Prs], 0);
        assert_eq!(map.iter().count(), TabId::COUNT);
    }

    #[test]
    fn tab_ids_deserialize_from_snake_case() {
        let tab: TabId = serde_json::from_str("\"workflows\"").unwrap();
        assert_eq!(tab, TabId::Workflows);
    }
}
