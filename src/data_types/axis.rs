use crate::scales::ChartScale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis management types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AxisId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    X,
    Y,
}

/// Visible sub-range of an axis, in percent [0, 100] of its full extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: f64,
    pub end: f64,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::FULL
    }
}

impl ZoomWindow {
    pub const FULL: ZoomWindow = ZoomWindow {
        start: 0.0,
        end: 100.0,
    };

    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// (start, end) as fractions of the full extent.
    pub fn fractions(&self) -> (f64, f64) {
        (self.start / 100.0, self.end / 100.0)
    }

    pub fn contains_fraction(&self, t: f64) -> bool {
        let (s, e) = self.fractions();
        t >= s && t <= e
    }

    /// Pure zoom around a pivot, without clamping.
    pub fn zoom_at(&mut self, pivot: f64, pivot_pct: f64, factor: f64) {
        let new_span = self.span() * factor;
        self.start = pivot - new_span * pivot_pct;
        self.end = self.start + new_span;
    }

    pub fn pan(&mut self, delta: f64) {
        self.start += delta;
        self.end += delta;
    }

    /// Keeps the window inside [0, 100] while preserving its span when possible.
    pub fn clamp(&mut self) {
        let span = self.span().clamp(0.0, 100.0);
        if self.start < 0.0 {
            self.start = 0.0;
            self.end = span;
        } else if self.end > 100.0 {
            self.end = 100.0;
            self.start = 100.0 - span;
        }
    }
}

/// Per-axis zoom windows plus the flag raised while a pan/zoom gesture is in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoomState {
    x: HashMap<AxisId, ZoomWindow>,
    y: HashMap<AxisId, ZoomWindow>,
    pub is_interacting: bool,
}

impl ZoomState {
    pub fn window(&self, direction: AxisDirection, id: AxisId) -> Option<ZoomWindow> {
        match direction {
            AxisDirection::X => self.x.get(&id).copied(),
            AxisDirection::Y => self.y.get(&id).copied(),
        }
    }

    /// Zoom window of an axis, the full extent when none is set.
    pub fn window_or_full(&self, direction: AxisDirection, id: AxisId) -> ZoomWindow {
        self.window(direction, id).unwrap_or(ZoomWindow::FULL)
    }

    pub fn set_window(&mut self, direction: AxisDirection, id: AxisId, window: ZoomWindow) {
        match direction {
            AxisDirection::X => self.x.insert(id, window),
            AxisDirection::Y => self.y.insert(id, window),
        };
    }

    pub fn reset(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisConfig {
    pub id: AxisId,
    pub scale: ChartScale,
}

/// Cartesian axes of a chart. The first axis of each direction is the default one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartesianAxes {
    pub x: Vec<AxisConfig>,
    pub y: Vec<AxisConfig>,
}

impl CartesianAxes {
    pub fn new(x_scale: ChartScale, y_scale: ChartScale) -> Self {
        Self {
            x: vec![AxisConfig {
                id: AxisId(0),
                scale: x_scale,
            }],
            y: vec![AxisConfig {
                id: AxisId(0),
                scale: y_scale,
            }],
        }
    }

    pub fn axis(&self, direction: AxisDirection, id: Option<AxisId>) -> Option<&AxisConfig> {
        let axes = match direction {
            AxisDirection::X => &self.x,
            AxisDirection::Y => &self.y,
        };
        match id {
            Some(id) => axes.iter().find(|a| a.id == id),
            None => axes.first(),
        }
    }
}
