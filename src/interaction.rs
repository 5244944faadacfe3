//! Gesture-driven hover / highlight / click handling for scatter charts.

use crate::data_types::{HighlightItem, ScatterItemIdentifier, VoronoiConfig};
use crate::gestures::{GestureEvent, GestureKind, GestureSource, ListenerHandle, PointerEvent};
use crate::store::ChartStore;
use crate::voronoi::{
    closest_point, HitOutcome, RebuildStatus, SpatialIndex, VoronoiIndex, VoronoiInputs,
};
use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionPhase {
    #[default]
    Idle,
    Hovering(HighlightItem),
    /// A pan or press gesture is running; index rebuilds wait for it to end.
    Dragging { hovered: Option<HighlightItem> },
}

impl InteractionPhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn hovered(&self) -> Option<&HighlightItem> {
        match self {
            Self::Idle => None,
            Self::Hovering(item) => Some(item),
            Self::Dragging { hovered } => hovered.as_ref(),
        }
    }
}

pub type ItemClickHandler = Rc<dyn Fn(&PointerEvent, &ScatterItemIdentifier)>;

/// Store writes decided while the coordinator is borrowed, applied once it is released.
enum Effect {
    None,
    Highlight { item: HighlightItem, pointer: DVec2 },
    NoItem { pointer: DVec2 },
    Clean,
    Click(ItemClickHandler, ScatterItemIdentifier),
}

struct Coordinator {
    store: Arc<ChartStore>,
    config: VoronoiConfig,
    index: VoronoiIndex,
    inputs: VoronoiInputs,
    phase: InteractionPhase,
    param_enabled: Option<bool>,
    on_item_click: Option<ItemClickHandler>,
}

impl Coordinator {
    fn sync(&mut self) -> RebuildStatus {
        let zoom = self.store.zoom();
        let enabled = self.store.is_voronoi_enabled();
        self.index
            .sync(&self.inputs, &zoom, enabled, self.phase.is_dragging())
    }

    /// Runs a pending rebuild, or a pixel-space rebuild after a zoom change, before hit-testing.
    fn sync_view(&mut self) -> RebuildStatus {
        let zoom = self.store.zoom();
        let enabled = self.store.is_voronoi_enabled();
        self.index
            .sync_view(&self.inputs, &zoom, enabled, self.phase.is_dragging())
    }

    fn closest_point(&self, pointer: DVec2) -> HitOutcome {
        let area = self.inputs.area;
        closest_point(
            self.index.current().map(|i| i.as_ref()),
            pointer,
            &area,
            &self.store.zoom(),
            self.config.max_radius,
            |x, y| area.contains(x, y),
        )
    }

    fn on_event(&mut self, event: &GestureEvent) -> Effect {
        if !self.store.is_voronoi_enabled() {
            return Effect::None;
        }
        if !self.phase.is_dragging() {
            self.sync_view();
        }
        let active = event.active;
        match event.kind {
            GestureKind::Move | GestureKind::Pan | GestureKind::QuickPress => {
                self.on_pointer_gesture(event)
            }
            GestureKind::MoveEnd => {
                if active.panning {
                    Effect::None
                } else {
                    self.end_interaction()
                }
            }
            GestureKind::PanEnd => {
                if active.moving {
                    self.leave_drag();
                    Effect::None
                } else {
                    self.end_interaction()
                }
            }
            GestureKind::QuickPressEnd => {
                if active.moving || active.panning {
                    if !active.panning {
                        self.leave_drag();
                    }
                    Effect::None
                } else {
                    self.end_interaction()
                }
            }
            GestureKind::Tap => match self.closest_point(event.src.position) {
                HitOutcome::Item(item) => match &self.on_item_click {
                    Some(handler) => Effect::Click(handler.clone(), item.into()),
                    None => Effect::None,
                },
                _ => Effect::None,
            },
        }
    }

    fn on_pointer_gesture(&mut self, event: &GestureEvent) -> Effect {
        let pointer = event.src.position;
        let dragging = self.phase.is_dragging()
            || matches!(event.kind, GestureKind::Pan | GestureKind::QuickPress);

        let (hovered, effect) = match self.closest_point(pointer) {
            HitOutcome::Item(item) => (
                Some(item.clone()),
                Effect::Highlight { item, pointer },
            ),
            HitOutcome::NoPointFound => (None, Effect::NoItem { pointer }),
            HitOutcome::OutsideChart => (None, Effect::Clean),
        };

        self.phase = match (dragging, hovered) {
            (true, hovered) => InteractionPhase::Dragging { hovered },
            (false, Some(item)) => InteractionPhase::Hovering(item),
            (false, None) => InteractionPhase::Idle,
        };
        effect
    }

    fn leave_drag(&mut self) {
        if let InteractionPhase::Dragging { hovered } = &mut self.phase {
            self.phase = match hovered.take() {
                Some(item) => InteractionPhase::Hovering(item),
                None => InteractionPhase::Idle,
            };
        }
    }

    fn end_interaction(&mut self) -> Effect {
        self.phase = InteractionPhase::Idle;
        Effect::Clean
    }

    /// Drops the plugin's own interaction, returning the store to clean when there was one.
    fn deactivate(&mut self) -> Option<Arc<ChartStore>> {
        if self.phase == InteractionPhase::Idle {
            return None;
        }
        self.phase = InteractionPhase::Idle;
        Some(self.store.clone())
    }

    fn after_event(&mut self) {
        if !self.phase.is_dragging() && self.index.is_pending() {
            debug!("gesture ended, running deferred voronoi rebuild");
            self.sync();
        }
    }
}

/// Voronoi hit-testing plugin of one chart.
///
/// Listeners registered by [`ChartVoronoi::attach`] are removed on [`ChartVoronoi::detach`]
/// and when the plugin is dropped.
pub struct ChartVoronoi {
    inner: Rc<RefCell<Coordinator>>,
    listeners: Vec<ListenerHandle>,
}

impl ChartVoronoi {
    pub fn new(store: Arc<ChartStore>, config: VoronoiConfig) -> Self {
        let index = VoronoiIndex::new(config.index_space);
        Self {
            inner: Rc::new(RefCell::new(Coordinator {
                store,
                config,
                index,
                inputs: VoronoiInputs::default(),
                phase: InteractionPhase::Idle,
                param_enabled: None,
                on_item_click: None,
            })),
            listeners: Vec::new(),
        }
    }

    pub fn store(&self) -> Arc<ChartStore> {
        self.inner.borrow().store.clone()
    }

    pub fn set_on_item_click(
        &self,
        handler: impl Fn(&PointerEvent, &ScatterItemIdentifier) + 'static,
    ) {
        self.inner.borrow_mut().on_item_click = Some(Rc::new(handler));
    }

    /// Records new chart inputs and rebuilds the index if they changed.
    ///
    /// Also applies the configured enablement whenever it changes, which is derived
    /// from the presence of scatter series unless the configuration forces it.
    pub fn update(&self, inputs: VoronoiInputs) -> RebuildStatus {
        let (status, to_clean) = {
            let mut c = self.inner.borrow_mut();
            let enabled = c.config.is_enabled(!inputs.series.is_empty());
            let mut to_clean = None;
            if c.param_enabled != Some(enabled) {
                c.param_enabled = Some(enabled);
                c.store.set_voronoi_enabled(enabled);
                if !enabled {
                    to_clean = c.deactivate();
                }
            }
            c.inputs = inputs;
            (c.sync(), to_clean)
        };
        if let Some(store) = to_clean {
            clean(&store);
        }
        status
    }

    /// Re-evaluates the last inputs, e.g. after the zoom state changed.
    pub fn refresh(&self) -> RebuildStatus {
        self.inner.borrow_mut().sync()
    }

    pub fn enable_voronoi(&self) -> RebuildStatus {
        let mut c = self.inner.borrow_mut();
        c.store.set_voronoi_enabled(true);
        c.sync()
    }

    pub fn disable_voronoi(&self) {
        let to_clean = {
            let mut c = self.inner.borrow_mut();
            c.store.set_voronoi_enabled(false);
            c.deactivate()
        };
        if let Some(store) = to_clean {
            clean(&store);
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.inner.borrow().phase.clone()
    }

    pub fn current_index(&self) -> Option<Arc<SpatialIndex>> {
        self.inner.borrow().index.current().cloned()
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.inner.borrow().index.is_pending()
    }

    /// Hit-tests `pointer` against the current index without touching any state.
    pub fn closest_point(&self, pointer: DVec2) -> HitOutcome {
        self.inner.borrow().closest_point(pointer)
    }

    /// Handles one gesture event.
    pub fn handle(&self, event: &GestureEvent) {
        dispatch(&self.inner, event);
    }

    /// Registers this plugin's listeners on `source`, replacing any previous registration.
    pub fn attach(&mut self, source: &GestureSource) {
        self.detach();
        const KINDS: [GestureKind; 7] = [
            GestureKind::Move,
            GestureKind::MoveEnd,
            GestureKind::Pan,
            GestureKind::PanEnd,
            GestureKind::QuickPress,
            GestureKind::QuickPressEnd,
            GestureKind::Tap,
        ];
        for kind in KINDS {
            let weak = Rc::downgrade(&self.inner);
            self.listeners.push(source.add_listener(kind, move |event| {
                if let Some(inner) = weak.upgrade() {
                    dispatch(&inner, event);
                }
            }));
        }
    }

    pub fn detach(&mut self) {
        self.listeners.clear();
    }
}

fn dispatch(inner: &Rc<RefCell<Coordinator>>, event: &GestureEvent) {
    let (store, effect) = {
        let mut c = inner.borrow_mut();
        let effect = c.on_event(event);
        (c.store.clone(), effect)
    };

    match effect {
        Effect::None => {}
        Effect::Highlight { item, pointer } => {
            store.set_pointer(pointer);
            store.set_item_interaction(item.clone().into());
            store.set_highlight(item);
        }
        Effect::NoItem { pointer } => {
            store.set_pointer(pointer);
            store.remove_item_interaction();
            store.clear_highlight();
        }
        Effect::Clean => clean(&store),
        Effect::Click(handler, item) => handler(&event.src, &item),
    }

    inner.borrow_mut().after_event();
}

fn clean(store: &ChartStore) {
    store.clean_interaction();
    store.clear_highlight();
}
