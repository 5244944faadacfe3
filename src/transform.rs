//! Transform helper for coordinate projection

use crate::data_types::ZoomWindow;
use crate::scales::{ChartScale, ScaleMapper};
use glam::DVec2;

/// Pixel rectangle where data is plotted, axes and margins excluded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawingArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawingArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Edges are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Projects data through two scales and their zoom windows into a drawing area.
///
/// Normalized coordinates are fractions of each axis' full extent, with y growing upwards.
#[derive(Clone, Debug)]
pub struct PlotTransform {
    pub x_scale: ChartScale,
    pub y_scale: ChartScale,
    pub area: DrawingArea,
    pub x_zoom: ZoomWindow,
    pub y_zoom: ZoomWindow,
}

impl PlotTransform {
    pub fn new(x_scale: ChartScale, y_scale: ChartScale, area: DrawingArea) -> Self {
        Self {
            x_scale,
            y_scale,
            area,
            x_zoom: ZoomWindow::FULL,
            y_zoom: ZoomWindow::FULL,
        }
    }

    pub fn with_zoom(mut self, x_zoom: ZoomWindow, y_zoom: ZoomWindow) -> Self {
        self.x_zoom = x_zoom;
        self.y_zoom = y_zoom;
        self
    }

    pub fn data_to_normalized(&self, x: f64, y: f64) -> Option<DVec2> {
        Some(DVec2::new(
            self.x_scale.normalize(x)?,
            self.y_scale.normalize(y)?,
        ))
    }

    pub fn normalized_to_screen(&self, n: DVec2) -> DVec2 {
        normalized_to_screen(n, &self.area, self.x_zoom, self.y_zoom)
    }

    pub fn screen_to_normalized(&self, p: DVec2) -> DVec2 {
        screen_to_normalized(p, &self.area, self.x_zoom, self.y_zoom)
    }

    pub fn data_to_screen(&self, x: f64, y: f64) -> Option<DVec2> {
        self.data_to_normalized(x, y)
            .map(|n| self.normalized_to_screen(n))
    }

    /// Screen pixels per normalized unit on each axis.
    pub fn pixels_per_unit(&self) -> DVec2 {
        pixels_per_unit(&self.area, self.x_zoom, self.y_zoom)
    }
}

pub(crate) fn normalized_to_screen(
    n: DVec2,
    area: &DrawingArea,
    x_zoom: ZoomWindow,
    y_zoom: ZoomWindow,
) -> DVec2 {
    let (xs, xe) = x_zoom.fractions();
    let (ys, ye) = y_zoom.fractions();
    DVec2::new(
        area.left + (n.x - xs) / (xe - xs) * area.width,
        area.top + (1.0 - (n.y - ys) / (ye - ys)) * area.height,
    )
}

pub(crate) fn screen_to_normalized(
    p: DVec2,
    area: &DrawingArea,
    x_zoom: ZoomWindow,
    y_zoom: ZoomWindow,
) -> DVec2 {
    let (xs, xe) = x_zoom.fractions();
    let (ys, ye) = y_zoom.fractions();
    DVec2::new(
        xs + (p.x - area.left) / area.width * (xe - xs),
        ys + (1.0 - (p.y - area.top) / area.height) * (ye - ys),
    )
}

pub(crate) fn pixels_per_unit(area: &DrawingArea, x_zoom: ZoomWindow, y_zoom: ZoomWindow) -> DVec2 {
    let (xs, xe) = x_zoom.fractions();
    let (ys, ye) = y_zoom.fractions();
    DVec2::new(area.width / (xe - xs), area.height / (ye - ys))
}
