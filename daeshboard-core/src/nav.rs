//! Navigation state machine: selected tab, per-tab cursor and view stamps.

use crate::error::OpenError;
use crate::item::Item;
use crate::snapshot::SnapshotStore;
use crate::tab::{TabId, TabMap, TabOrder};
use crate::Timestamp;

/// One discrete input, already decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    MoveTabLeft,
    MoveTabRight,
    MoveItemUp,
    MoveItemDown,
    /// Zero-based position in the tab order.
    JumpToTab(usize),
    Activate,
    Quit,
}

/// Side effect requested by activating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    Application(String),
    Url(String),
}

impl OpenTarget {
    /// The application wins over the URL; an item with neither opens nothing.
    pub fn for_item(item: &Item) -> Option<Self> {
        if let Some(app) = item.application.as_deref().filter(|a| !a.is_empty()) {
            return Some(OpenTarget::Application(app.to_string()));
        }
        item.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| OpenTarget::Url(u.to_string()))
    }
}

/// Launches an [`OpenTarget`].
pub trait Opener {
    fn open(&self, target: &OpenTarget) -> Result<(), OpenError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabDisplayState {
    pub selected_item: usize,
    /// `None` until the tab is first viewed.
    pub last_viewed_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct NavState {
    tabs: TabOrder,
    selected_tab: TabId,
    displays: TabMap<TabDisplayState>,
    close_requested: bool,
}

impl NavState {
    pub fn new(tabs: TabOrder) -> Self {
        Self {
            selected_tab: tabs.first(),
            tabs,
            displays: TabMap::default(),
            close_requested: false,
        }
    }

    pub fn tabs(&self) -> &TabOrder {
        &self.tabs
    }

    pub fn selected_tab(&self) -> TabId {
        self.selected_tab
    }

    pub fn display(&self, tab: TabId) -> TabDisplayState {
        self.displays[tab]
    }

    pub fn selected_item(&self, tab: TabId) -> usize {
        self.displays[tab].selected_item
    }

    pub fn last_viewed_at(&self, tab: TabId) -> Option<Timestamp> {
        self.displays[tab].last_viewed_at
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Apply one input. Every recognized input marks the tab selected after
    /// the move as viewed at `now`. `Activate` only does so when the selected
    /// item has something to open.
    pub fn apply(
        &mut self,
        input: NavInput,
        store: &SnapshotStore,
        now: Timestamp,
    ) -> Option<OpenTarget> {
        match input {
            NavInput::MoveTabLeft => self.selected_tab = self.tabs.previous(self.selected_tab),
            NavInput::MoveTabRight => self.selected_tab = self.tabs.next(self.selected_tab),
            NavInput::MoveItemUp => {
                let count = store.get(self.selected_tab).len();
                let display = &mut self.displays[self.selected_tab];
                display.selected_item = display
                    .selected_item
                    .saturating_sub(1)
                    .min(count.saturating_sub(1));
            }
            NavInput::MoveItemDown => {
                let count = store.get(self.selected_tab).len();
                let display = &mut self.displays[self.selected_tab];
                display.selected_item = (display.selected_item + 1).min(count.saturating_sub(1));
            }
            NavInput::JumpToTab(index) => match self.tabs.get(index) {
                Some(tab) => self.selected_tab = tab,
                None => return None,
            },
            NavInput::Activate => {
                let target = self.activation_target(store)?;
                self.displays[self.selected_tab].last_viewed_at = Some(now);
                return Some(target);
            }
            NavInput::Quit => self.close_requested = true,
        }
        self.displays[self.selected_tab].last_viewed_at = Some(now);
        None
    }

    fn activation_target(&self, store: &SnapshotStore) -> Option<OpenTarget> {
        let snapshot = store.get(self.selected_tab);
        let item = snapshot.item(self.displays[self.selected_tab].selected_item)?;
        OpenTarget::for_item(item)
    }

    /// Pull every cursor back inside its tab's current item list.
    pub fn reclamp(&mut self, store: &SnapshotStore) {
        for tab in self.tabs.iter() {
            let count = store.get(tab).len();
            let display = &mut self.displays[tab];
            if display.selected_item >= count {
                display.selected_item = count.saturating_sub(1);
            }
        }
    }

    /// A tab is unread when its snapshot changed after it was last viewed.
    pub fn is_unread(&self, tab: TabId, store: &SnapshotStore) -> bool {
        self.displays[tab].last_viewed_at < store.get(tab).modified_at
    }

    pub fn any_unread(&self, store: &SnapshotStore) -> bool {
        self.tabs.iter().any(|tab| self.is_unread(tab, store))
    }
}
