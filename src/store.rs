//! Per-chart observable state shared by the interaction and rendering components.

use crate::data_types::{
    AxisDirection, AxisId, HighlightChange, HighlightItem, InteractionState,
    ScatterItemIdentifier, ZoomState, ZoomWindow,
};
use glam::DVec2;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartState {
    pub highlight: Option<HighlightItem>,
    pub interaction: InteractionState,
    pub voronoi_enabled: bool,
    pub zoom: ZoomState,
}

type Listener = Arc<dyn Fn(&HighlightChange) + Send + Sync>;

/// State container of one chart. Share it by `Arc`; there is no global instance.
///
/// Listeners are called after the state lock is released, so they may read the store.
pub struct ChartStore {
    state: RwLock<ChartState>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: Mutex<u64>,
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::with_state(ChartState::default())
    }
}

impl ChartStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(state: ChartState) -> Self {
        Self {
            state: RwLock::new(state),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: Mutex::new(0),
        }
    }

    /// Reads a value out of the state.
    pub fn select<T>(&self, selector: impl FnOnce(&ChartState) -> T) -> T {
        selector(&self.state.read())
    }

    pub fn snapshot(&self) -> ChartState {
        self.state.read().clone()
    }

    pub fn highlighted_item(&self) -> Option<HighlightItem> {
        self.select(|s| s.highlight.clone())
    }

    pub fn is_highlighted(&self, item: &HighlightItem) -> bool {
        self.select(|s| s.highlight.as_ref() == Some(item))
    }

    pub fn is_voronoi_enabled(&self) -> bool {
        self.select(|s| s.voronoi_enabled)
    }

    pub fn interaction(&self) -> InteractionState {
        self.select(|s| s.interaction.clone())
    }

    pub fn zoom(&self) -> ZoomState {
        self.select(|s| s.zoom.clone())
    }

    pub fn zoom_is_interacting(&self) -> bool {
        self.select(|s| s.zoom.is_interacting)
    }

    pub fn axis_zoom(&self, direction: AxisDirection, id: AxisId) -> Option<ZoomWindow> {
        self.select(|s| s.zoom.window(direction, id))
    }

    /// Replaces the highlighted item. Returns false, without notifying, when unchanged.
    pub fn set_highlight(&self, item: HighlightItem) -> bool {
        self.replace_highlight(Some(item))
    }

    pub fn clear_highlight(&self) -> bool {
        self.replace_highlight(None)
    }

    fn replace_highlight(&self, next: Option<HighlightItem>) -> bool {
        let change = {
            let mut state = self.state.write();
            if state.highlight == next {
                return false;
            }
            let previous = std::mem::replace(&mut state.highlight, next.clone());
            HighlightChange {
                previous,
                current: next,
            }
        };
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&change);
        }
        true
    }

    pub fn set_item_interaction(&self, item: ScatterItemIdentifier) {
        self.state.write().interaction.item = Some(item);
    }

    pub fn set_pointer(&self, pointer: DVec2) {
        self.state.write().interaction.pointer = Some(pointer);
    }

    /// Clears the hovered item only.
    pub fn remove_item_interaction(&self) {
        self.state.write().interaction.item = None;
    }

    /// Clears the hovered item and the pointer position.
    pub fn clean_interaction(&self) {
        self.state.write().interaction = InteractionState::default();
    }

    pub fn set_voronoi_enabled(&self, enabled: bool) {
        self.state.write().voronoi_enabled = enabled;
    }

    pub fn set_axis_zoom(&self, direction: AxisDirection, id: AxisId, window: ZoomWindow) {
        self.state.write().zoom.set_window(direction, id, window);
    }

    pub fn set_zoom_interacting(&self, interacting: bool) {
        self.state.write().zoom.is_interacting = interacting;
    }

    pub fn update_zoom(&self, f: impl FnOnce(&mut ZoomState)) {
        f(&mut self.state.write().zoom);
    }

    /// Registers a highlight-change listener, removed when the returned handle drops.
    pub fn subscribe_highlight(
        self: &Arc<Self>,
        listener: impl Fn(&HighlightChange) + Send + Sync + 'static,
    ) -> Subscription {
        let id = {
            let mut next = self.next_listener_id.lock();
            *next += 1;
            *next
        };
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            store: Arc::downgrade(self),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

/// Keeps a store listener registered for as long as it lives.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<ChartStore>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}
