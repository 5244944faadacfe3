//! Named gesture events and the listener registry they are dispatched through.
//!
//! [`GestureRecognizer`] turns raw pointer input into the named events; hosts that
//! already recognize gestures can build [`GestureEvent`]s directly and dispatch them.

use glam::DVec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Move,
    MoveEnd,
    Pan,
    PanEnd,
    QuickPress,
    QuickPressEnd,
    Tap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Raw pointer event, positioned in chart coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: DVec2,
    pub pointer_id: u32,
    pub pointer_type: PointerType,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
        }
    }
}

/// Gestures still running once the event has been handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveGestures {
    pub moving: bool,
    pub panning: bool,
    pub pressing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub src: PointerEvent,
    pub active: ActiveGestures,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, src: PointerEvent, active: ActiveGestures) -> Self {
        Self { kind, src, active }
    }
}

type Handler = Rc<dyn Fn(&GestureEvent)>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, GestureKind, Handler)>,
}

/// Registry of gesture listeners for one chart element.
#[derive(Clone, Default)]
pub struct GestureSource {
    table: Rc<RefCell<ListenerTable>>,
}

impl GestureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind` until the returned handle is dropped.
    pub fn add_listener(
        &self,
        kind: GestureKind,
        handler: impl Fn(&GestureEvent) + 'static,
    ) -> ListenerHandle {
        let mut table = self.table.borrow_mut();
        table.next_id += 1;
        let id = table.next_id;
        table.entries.push((id, kind, Rc::new(handler)));
        ListenerHandle {
            table: Rc::downgrade(&self.table),
            id,
        }
    }

    /// Calls every listener of `event.kind`, in registration order.
    /// Listeners may add or remove listeners; changes apply to the next dispatch.
    pub fn dispatch(&self, event: &GestureEvent) {
        let handlers: Vec<Handler> = self
            .table
            .borrow()
            .entries
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.table.borrow().entries.len()
    }
}

/// Unregisters its listener when dropped.
#[must_use = "dropping a ListenerHandle removes the listener immediately"]
pub struct ListenerHandle {
    table: Weak<RefCell<ListenerTable>>,
    id: u64,
}

impl ListenerHandle {
    pub fn cleanup(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().entries.retain(|(id, _, _)| *id != self.id);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The pointer left the chart element.
    Leave,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub event: PointerEvent,
    pub at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Distance a pressed pointer travels before the press becomes a pan.
    pub pan_threshold: f64,
    /// Longest press still reported as a tap.
    pub tap_max_duration: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_threshold: 3.0,
            tap_max_duration: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: DVec2,
    started_at: Instant,
    panning: bool,
}

/// Recognizes move / pan / quick-press / tap gestures from raw pointer input.
#[derive(Clone, Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    moving: bool,
    press: Option<Press>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn active(&self) -> ActiveGestures {
        ActiveGestures {
            moving: self.moving,
            panning: self.press.is_some_and(|p| p.panning),
            pressing: self.press.is_some(),
        }
    }

    /// Feeds one raw input and returns the gesture events it produces, in order.
    pub fn handle(&mut self, input: PointerInput) -> Vec<GestureEvent> {
        let src = input.event;
        let mut out = Vec::new();
        match input.phase {
            PointerPhase::Down => {
                self.press = Some(Press {
                    origin: src.position,
                    started_at: input.at,
                    panning: false,
                });
                out.push(self.event(GestureKind::QuickPress, src));
            }
            PointerPhase::Move => {
                if let Some(press) = self.press.as_mut() {
                    if !press.panning
                        && press.origin.distance(src.position) > self.config.pan_threshold
                    {
                        press.panning = true;
                    }
                }
                // Touch pointers only exist while pressed; they pan but never hover.
                if src.pointer_type != PointerType::Touch {
                    self.moving = true;
                    out.push(self.event(GestureKind::Move, src));
                }
                if self.press.is_some_and(|p| p.panning) {
                    out.push(self.event(GestureKind::Pan, src));
                }
            }
            PointerPhase::Up => {
                if let Some(press) = self.press.take() {
                    out.push(self.event(GestureKind::QuickPressEnd, src));
                    if press.panning {
                        out.push(self.event(GestureKind::PanEnd, src));
                    } else if input.at.duration_since(press.started_at)
                        <= self.config.tap_max_duration
                    {
                        out.push(self.event(GestureKind::Tap, src));
                    }
                }
            }
            PointerPhase::Leave => {
                if self.moving {
                    self.moving = false;
                    out.push(self.event(GestureKind::MoveEnd, src));
                }
            }
            PointerPhase::Cancel => {
                let press = self.press.take();
                let was_moving = std::mem::take(&mut self.moving);
                if let Some(press) = press {
                    out.push(self.event(GestureKind::QuickPressEnd, src));
                    if press.panning {
                        out.push(self.event(GestureKind::PanEnd, src));
                    }
                }
                if was_moving {
                    out.push(self.event(GestureKind::MoveEnd, src));
                }
            }
        }
        out
    }

    /// Feeds one raw input and dispatches the resulting events to `source`.
    pub fn feed(&mut self, input: PointerInput, source: &GestureSource) {
        for event in self.handle(input) {
            source.dispatch(&event);
        }
    }

    fn event(&self, kind: GestureKind, src: PointerEvent) -> GestureEvent {
        GestureEvent::new(kind, src, self.active())
    }
}
