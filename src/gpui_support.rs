//! Conversions from GPUI geometry and mouse events.

use crate::gestures::{PointerEvent, PointerInput, PointerPhase, PointerType};
use crate::transform::DrawingArea;
use glam::DVec2;
use gpui::{Bounds, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point};
use std::time::Instant;

pub trait PixelsExt {
    fn as_f64(&self) -> f64;
}

impl PixelsExt for Pixels {
    fn as_f64(&self) -> f64 {
        f32::from(*self) as f64
    }
}

impl From<Bounds<Pixels>> for DrawingArea {
    fn from(bounds: Bounds<Pixels>) -> Self {
        DrawingArea::new(
            bounds.origin.x.as_f64(),
            bounds.origin.y.as_f64(),
            bounds.size.width.as_f64(),
            bounds.size.height.as_f64(),
        )
    }
}

/// Window position relative to the chart element's origin.
pub fn chart_position(position: Point<Pixels>, origin: Point<Pixels>) -> DVec2 {
    DVec2::new(
        (position.x - origin.x).as_f64(),
        (position.y - origin.y).as_f64(),
    )
}

fn mouse_input(
    phase: PointerPhase,
    position: Point<Pixels>,
    origin: Point<Pixels>,
) -> PointerInput {
    PointerInput {
        phase,
        event: PointerEvent {
            position: chart_position(position, origin),
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
        },
        at: Instant::now(),
    }
}

pub fn pointer_down(event: &MouseDownEvent, origin: Point<Pixels>) -> PointerInput {
    mouse_input(PointerPhase::Down, event.position, origin)
}

pub fn pointer_up(event: &MouseUpEvent, origin: Point<Pixels>) -> PointerInput {
    mouse_input(PointerPhase::Up, event.position, origin)
}

/// Moves outside `element` become a leave.
pub fn pointer_move(event: &MouseMoveEvent, element: Bounds<Pixels>) -> PointerInput {
    let phase = if element.contains(&event.position) {
        PointerPhase::Move
    } else {
        PointerPhase::Leave
    };
    mouse_input(phase, event.position, element.origin)
}
