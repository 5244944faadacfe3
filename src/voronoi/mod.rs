//! Nearest-point hit-testing for scatter series.
//!
//! [`SpatialIndex`] is an immutable generation built from the chart inputs;
//! [`VoronoiIndex`] decides when a new generation is needed.

pub mod builder;
pub mod kdtree;

pub use builder::{PointRecord, SeriesIndexRange, SpatialIndex};
pub use hit_test::{closest_point, HitOutcome};
pub use kdtree::KdTree;

use crate::data_types::{
    AxisDirection, AxisId, CartesianAxes, IndexSpace, ScatterSeriesSet, ZoomState, ZoomWindow,
};
use crate::transform::DrawingArea;
use std::sync::Arc;
use tracing::debug;

/// Everything an index generation is built from, besides the zoom state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoronoiInputs {
    pub series: ScatterSeriesSet,
    pub axes: CartesianAxes,
    pub area: DrawingArea,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildStatus {
    Rebuilt,
    /// Inputs match the current generation.
    Unchanged,
    /// Inputs changed during a gesture; the stale generation stays in use.
    Deferred,
    Disabled,
}

/// Zoom window of one axis, as it was when the current generation was built.
type AxisWindow = (AxisDirection, AxisId, ZoomWindow);

/// Owner of the current index generation, rebuilding only when its inputs change.
#[derive(Debug, Default)]
pub struct VoronoiIndex {
    space: IndexSpace,
    current: Option<Arc<SpatialIndex>>,
    last_inputs: Option<VoronoiInputs>,
    /// Always empty in normalized space, where zooming never moves indexed points.
    last_windows: Vec<AxisWindow>,
    pending: bool,
    generation: u64,
}

impl VoronoiIndex {
    pub fn new(space: IndexSpace) -> Self {
        Self {
            space,
            ..Default::default()
        }
    }

    pub fn space(&self) -> IndexSpace {
        self.space
    }

    pub fn current(&self) -> Option<&Arc<SpatialIndex>> {
        self.current.as_ref()
    }

    /// A rebuild was skipped during a gesture and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuilds the index when `inputs` (or, in pixel space, the zoom windows) differ from
    /// the last build. Nothing is built while disabled, nor while a gesture is active.
    pub fn sync(
        &mut self,
        inputs: &VoronoiInputs,
        zoom: &ZoomState,
        enabled: bool,
        gesture_active: bool,
    ) -> RebuildStatus {
        if !enabled {
            return RebuildStatus::Disabled;
        }

        let windows = axis_windows(inputs, zoom, self.space);
        let unchanged = self.current.is_some()
            && self.last_windows == windows
            && self
                .last_inputs
                .as_ref()
                .is_some_and(|last| same_inputs(last, inputs));
        if unchanged {
            self.pending = false;
            return RebuildStatus::Unchanged;
        }

        if gesture_active || zoom.is_interacting {
            if !self.pending {
                debug!(generation = self.generation, "voronoi rebuild deferred until gesture end");
            }
            self.pending = true;
            return RebuildStatus::Deferred;
        }

        let area = inputs.area;
        let mut index = SpatialIndex::build(
            &inputs.series,
            &inputs.axes,
            area,
            zoom,
            self.space,
            |x, y| area.contains(x, y),
        );
        self.generation += 1;
        index.generation = self.generation;
        self.current = Some(Arc::new(index));
        self.last_inputs = Some(inputs.clone());
        self.last_windows = windows;
        self.pending = false;
        RebuildStatus::Rebuilt
    }

    /// Catches up with the view before a hit test, assuming `inputs` are the ones last
    /// passed to [`Self::sync`]: runs a pending rebuild, and in pixel space rebuilds when
    /// the zoom windows moved. Series data is not compared.
    pub fn sync_view(
        &mut self,
        inputs: &VoronoiInputs,
        zoom: &ZoomState,
        enabled: bool,
        gesture_active: bool,
    ) -> RebuildStatus {
        if !enabled {
            return RebuildStatus::Disabled;
        }
        let stale = self.pending
            || self.current.is_none()
            || (self.space == IndexSpace::Pixel
                && axis_windows(inputs, zoom, self.space) != self.last_windows);
        if stale {
            self.sync(inputs, zoom, enabled, gesture_active)
        } else {
            RebuildStatus::Unchanged
        }
    }

    /// Forgets the last inputs so the next [`Self::sync`] rebuilds.
    pub fn invalidate(&mut self) {
        self.last_inputs = None;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.last_inputs = None;
        self.last_windows.clear();
        self.pending = false;
    }
}

fn axis_windows(inputs: &VoronoiInputs, zoom: &ZoomState, space: IndexSpace) -> Vec<AxisWindow> {
    if space == IndexSpace::Normalized {
        return Vec::new();
    }
    let x = inputs.axes.x.iter().map(|a| (AxisDirection::X, a.id));
    let y = inputs.axes.y.iter().map(|a| (AxisDirection::Y, a.id));
    x.chain(y)
        .map(|(direction, id)| (direction, id, zoom.window_or_full(direction, id)))
        .collect()
}

/// Equality of everything a build reads. Coordinates compare by bits, so NaN samples
/// do not count as a change.
fn same_inputs(a: &VoronoiInputs, b: &VoronoiInputs) -> bool {
    if a.area != b.area || a.axes != b.axes || a.series.order() != b.series.order() {
        return false;
    }
    a.series.iter().zip(b.series.iter()).all(|(sa, sb)| {
        sa.x_axis_id == sb.x_axis_id
            && sa.y_axis_id == sb.y_axis_id
            && sa.disable_hover == sb.disable_hover
            && sa.data.len() == sb.data.len()
            && sa.data.iter().zip(&sb.data).all(|(va, vb)| va.same_bits(vb))
    })
}
