use crate::data_types::{AxisDirection, CartesianAxes, ZoomState, ZoomWindow};
use crate::transform::DrawingArea;
use glam::DVec2;

/// Smallest zoom window span, in percent.
const MIN_SPAN: f64 = 0.01;

/// ViewController handles the zoom-window arithmetic of interactions (zoom, pan)
/// independently of any host framework to facilitate testing.
pub struct ViewController;

impl ViewController {
    /// Pans a zoom window by a pixel delta along an axis of `total_pixels` pixels.
    pub fn pan_window(window: &mut ZoomWindow, delta_pixels: f64, total_pixels: f64, is_y: bool) {
        if total_pixels <= 0.0 {
            return;
        }
        let ratio = window.span() / total_pixels;

        // Dragging right pulls earlier values into view, so the window moves left.
        // Screen y grows downwards while the window grows upwards.
        let delta = if is_y {
            delta_pixels * ratio
        } else {
            -delta_pixels * ratio
        };

        window.pan(delta);
        window.clamp();
    }

    /// Zooms a window around a pivot expressed as a fraction of the visible span.
    pub fn zoom_window_at(window: &mut ZoomWindow, pivot_pct: f64, factor: f64) {
        let span = window.span();
        if span <= 0.0 || factor <= 0.0 {
            return;
        }
        let mut new_factor = factor;
        if span * factor < MIN_SPAN {
            new_factor = MIN_SPAN / span;
        }
        if span * new_factor > 100.0 {
            new_factor = 100.0 / span;
        }

        let pivot = window.start + span * pivot_pct;
        window.zoom_at(pivot, pivot_pct, new_factor);
        window.clamp();
    }

    /// Pans every axis of the chart by a pointer delta in pixels.
    pub fn pan_all(zoom: &mut ZoomState, axes: &CartesianAxes, area: &DrawingArea, delta: DVec2) {
        for axis in &axes.x {
            let mut w = zoom.window_or_full(AxisDirection::X, axis.id);
            Self::pan_window(&mut w, delta.x, area.width, false);
            zoom.set_window(AxisDirection::X, axis.id, w);
        }
        for axis in &axes.y {
            let mut w = zoom.window_or_full(AxisDirection::Y, axis.id);
            Self::pan_window(&mut w, delta.y, area.height, true);
            zoom.set_window(AxisDirection::Y, axis.id, w);
        }
    }

    /// Zooms every axis around the pointer position.
    pub fn zoom_all_at(
        zoom: &mut ZoomState,
        axes: &CartesianAxes,
        area: &DrawingArea,
        pointer: DVec2,
        factor: f64,
    ) {
        let (px, py) = Self::pivot_from_pointer(area, pointer);
        for axis in &axes.x {
            let mut w = zoom.window_or_full(AxisDirection::X, axis.id);
            Self::zoom_window_at(&mut w, px, factor);
            zoom.set_window(AxisDirection::X, axis.id, w);
        }
        for axis in &axes.y {
            let mut w = zoom.window_or_full(AxisDirection::Y, axis.id);
            Self::zoom_window_at(&mut w, py, factor);
            zoom.set_window(AxisDirection::Y, axis.id, w);
        }
    }

    /// Pointer position as (x, y) fractions of the drawing area, y measured from the bottom.
    pub fn pivot_from_pointer(area: &DrawingArea, pointer: DVec2) -> (f64, f64) {
        if area.width <= 0.0 || area.height <= 0.0 {
            return (0.5, 0.5);
        }
        let x = ((pointer.x - area.left) / area.width).clamp(0.0, 1.0);
        let y = (1.0 - (pointer.y - area.top) / area.height).clamp(0.0, 1.0);
        (x, y)
    }

    /// Calculates a zoom factor based on a pixel delta.
    pub fn compute_zoom_factor(delta: f64, sensitivity: f64) -> f64 {
        let factor = 1.0 + delta.abs() / sensitivity;
        if delta > 0.0 {
            1.0 / factor
        } else {
            factor
        }
    }
}
