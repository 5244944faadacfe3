use super::axis::AxisId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a series. Cheap to clone, since every indexed point carries one.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(Arc<str>);

impl SeriesId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for SeriesId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// One raw sample of a scatter series. Missing coordinates are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScatterValue {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ScatterValue {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// Both coordinates, when present and finite.
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }

    /// Bitwise equality, under which a NaN coordinate equals itself.
    pub fn same_bits(&self, other: &Self) -> bool {
        self.x.map(f64::to_bits) == other.x.map(f64::to_bits)
            && self.y.map(f64::to_bits) == other.y.map(f64::to_bits)
    }
}

impl From<(f64, f64)> for ScatterValue {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSeries {
    pub id: SeriesId,
    pub data: Vec<ScatterValue>,
    pub x_axis_id: Option<AxisId>,
    pub y_axis_id: Option<AxisId>,
    pub marker_size: f64,
    /// Drawn, but never hit-tested.
    pub disable_hover: bool,
}

impl ScatterSeries {
    pub fn new(id: impl Into<SeriesId>, data: Vec<ScatterValue>) -> Self {
        Self {
            id: id.into(),
            data,
            x_axis_id: None,
            y_axis_id: None,
            marker_size: 4.0,
            disable_hover: false,
        }
    }

    pub fn from_points(id: impl Into<SeriesId>, points: &[(f64, f64)]) -> Self {
        Self::new(id, points.iter().copied().map(ScatterValue::from).collect())
    }

    pub fn with_axes(mut self, x_axis_id: AxisId, y_axis_id: AxisId) -> Self {
        self.x_axis_id = Some(x_axis_id);
        self.y_axis_id = Some(y_axis_id);
        self
    }

    pub fn with_hover_disabled(mut self) -> Self {
        self.disable_hover = true;
        self
    }

    pub fn with_marker_size(mut self, marker_size: f64) -> Self {
        self.marker_size = marker_size;
        self
    }
}

/// Scatter series of one chart, with the order they are drawn and indexed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScatterSeriesSet {
    order: Vec<SeriesId>,
    series: HashMap<SeriesId, ScatterSeries>,
}

impl ScatterSeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a series at the end of the order, or replaces an existing one in place.
    pub fn push(&mut self, series: ScatterSeries) {
        if !self.series.contains_key(&series.id) {
            self.order.push(series.id.clone());
        }
        self.series.insert(series.id.clone(), series);
    }

    pub fn remove(&mut self, id: &SeriesId) -> Option<ScatterSeries> {
        self.order.retain(|s| s != id);
        self.series.remove(id)
    }

    pub fn get(&self, id: &SeriesId) -> Option<&ScatterSeries> {
        self.series.get(id)
    }

    pub fn order(&self) -> &[SeriesId] {
        &self.order
    }

    /// Series in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &ScatterSeries> + '_ {
        self.order.iter().filter_map(|id| self.series.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.iter().map(|s| s.data.len()).sum()
    }
}

impl FromIterator<ScatterSeries> for ScatterSeriesSet {
    fn from_iter<T: IntoIterator<Item = ScatterSeries>>(iter: T) -> Self {
        let mut set = Self::new();
        for series in iter {
            set.push(series);
        }
        set
    }
}
