//! Batched marker rendering for large scatter series.
//!
//! Markers are drawn as SVG path data, grouped by highlight classification and split
//! into fragments of bounded size so no single path grows unboundedly complex.

use crate::data_types::{FastScatterStyle, HighlightItem, ScatterSeries, SeriesId};
use crate::transform::PlotTransform;
use glam::DVec2;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointClass {
    Regular,
    Highlighted,
    Faded,
}

/// Marker of one data point, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPoint {
    pub data_index: usize,
    pub position: DVec2,
}

/// Path data drawing `points` markers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathFragment {
    pub d: String,
    pub points: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBatches {
    pub regular: Vec<PathFragment>,
    pub highlighted: Vec<PathFragment>,
    pub faded: Vec<PathFragment>,
}

impl PointBatches {
    pub fn total_points(&self) -> usize {
        self.iter().map(|(_, f)| f.points).sum()
    }

    /// Fragments in drawing order: regular, then highlighted, then faded.
    pub fn iter(&self) -> impl Iterator<Item = (PointClass, &PathFragment)> + '_ {
        self.regular
            .iter()
            .map(|f| (PointClass::Regular, f))
            .chain(self.highlighted.iter().map(|f| (PointClass::Highlighted, f)))
            .chain(self.faded.iter().map(|f| (PointClass::Faded, f)))
    }
}

/// Paint-ready path of a scatter series.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPath {
    pub class: PointClass,
    pub d: String,
    pub opacity: f32,
}

pub fn classify(
    series_id: &SeriesId,
    data_index: usize,
    highlight: Option<&HighlightItem>,
) -> PointClass {
    match highlight {
        None => PointClass::Regular,
        Some(h) if h.matches(series_id, data_index) => PointClass::Highlighted,
        Some(_) => PointClass::Faded,
    }
}

/// Appends a circle of radius `r` as a single arc command.
fn push_marker(d: &mut String, p: DVec2, r: f64) {
    let _ = write!(
        d,
        "M{} {} A{} {} 0 1 1 {} {}",
        p.x + r,
        p.y + r,
        r,
        r,
        p.x + r,
        p.y + r - 0.01
    );
}

struct BatchBuilder {
    sealed: Vec<PathFragment>,
    current: PathFragment,
    max_points: usize,
}

impl BatchBuilder {
    fn new(max_points: usize) -> Self {
        Self {
            sealed: Vec::new(),
            current: PathFragment::default(),
            max_points: max_points.max(1),
        }
    }

    fn push(&mut self, p: DVec2, r: f64) {
        push_marker(&mut self.current.d, p, r);
        self.current.points += 1;
        if self.current.points >= self.max_points {
            self.sealed.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<PathFragment> {
        if self.current.points > 0 {
            self.sealed.push(self.current);
        }
        self.sealed
    }
}

/// Buckets markers by classification in one pass.
///
/// `points` are expected to be inside the drawing area already. Highlighted markers
/// are drawn `style.highlighted_scale` times larger.
pub fn partition(
    series_id: &SeriesId,
    points: impl IntoIterator<Item = MarkerPoint>,
    highlight: Option<&HighlightItem>,
    radius: f64,
    style: &FastScatterStyle,
) -> PointBatches {
    let mut regular = BatchBuilder::new(style.max_points_per_path);
    let mut highlighted = BatchBuilder::new(style.max_points_per_path);
    let mut faded = BatchBuilder::new(style.max_points_per_path);
    let highlighted_radius = radius * style.highlighted_scale;

    for point in points {
        match classify(series_id, point.data_index, highlight) {
            PointClass::Regular => regular.push(point.position, radius),
            PointClass::Highlighted => highlighted.push(point.position, highlighted_radius),
            PointClass::Faded => faded.push(point.position, radius),
        }
    }

    PointBatches {
        regular: regular.finish(),
        highlighted: highlighted.finish(),
        faded: faded.finish(),
    }
}

/// Projects a series, drops markers outside the drawing area and emits its paths
/// in drawing order. Faded paths carry `style.faded_opacity`.
pub fn render_series(
    series: &ScatterSeries,
    transform: &PlotTransform,
    highlight: Option<&HighlightItem>,
    style: &FastScatterStyle,
) -> Vec<ScatterPath> {
    let area = transform.area;
    let points = series.data.iter().enumerate().filter_map(|(data_index, value)| {
        let (x, y) = value.coords()?;
        let position = transform.data_to_screen(x, y)?;
        area.contains(position.x, position.y)
            .then_some(MarkerPoint { data_index, position })
    });

    partition(&series.id, points, highlight, series.marker_size, style)
        .iter()
        .map(|(class, fragment)| ScatterPath {
            class,
            d: fragment.d.clone(),
            opacity: if class == PointClass::Faded {
                style.faded_opacity
            } else {
                1.0
            },
        })
        .collect()
}
