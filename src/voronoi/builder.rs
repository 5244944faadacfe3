use super::kdtree::KdTree;
use crate::data_types::{
    AxisDirection, AxisId, CartesianAxes, HighlightItem, IndexSpace, ScatterSeriesSet,
    ScatterValue, SeriesId, ZoomState,
};
use crate::scales::ScaleMapper;
use crate::transform::{normalized_to_screen, DrawingArea};
use glam::DVec2;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Series at least this long are projected in parallel.
const PARALLEL_THRESHOLD: usize = 8192;

/// One indexed data sample.
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    pub series_id: SeriesId,
    /// Index in the series' data, which can differ from the flat offset when
    /// malformed samples were skipped.
    pub data_index: usize,
    pub position: DVec2,
}

/// Half-open slice `[start_index, end_index)` of the flat point array owned by a series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesIndexRange {
    pub series_id: SeriesId,
    pub start_index: usize,
    pub end_index: usize,
}

impl SeriesIndexRange {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn contains(&self, flat_index: usize) -> bool {
        flat_index >= self.start_index && flat_index < self.end_index
    }
}

/// Position of a sample as fractions of both scales' ranges.
fn normalize_value(
    value: &ScatterValue,
    x_scale: &dyn ScaleMapper,
    y_scale: &dyn ScaleMapper,
) -> Option<DVec2> {
    let (x, y) = value.coords()?;
    Some(DVec2::new(x_scale.normalize(x)?, y_scale.normalize(y)?))
}

/// Tree id of the point stored at `flat_index`, while ids fit in the tree.
fn flat_id(flat_index: usize) -> Option<u32> {
    u32::try_from(flat_index).ok()
}

/// Points sharing one (x axis, y axis) pair, queried through that pair's zoom windows.
#[derive(Clone, Debug)]
pub(crate) struct AxisGroup {
    pub(crate) x_axis: AxisId,
    pub(crate) y_axis: AxisId,
    pub(crate) tree: KdTree,
}

/// Immutable nearest-neighbour index over every scatter point of a chart.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    pub(crate) space: IndexSpace,
    pub(crate) generation: u64,
    pub(crate) records: Vec<PointRecord>,
    pub(crate) ranges: Vec<SeriesIndexRange>,
    pub(crate) groups: Vec<AxisGroup>,
}

impl SpatialIndex {
    /// Indexes `series` in their order.
    ///
    /// Samples with a missing or non-finite coordinate, or that a scale cannot map, are
    /// skipped. In [`IndexSpace::Pixel`], samples failing `is_point_inside` are kept but
    /// moved far enough from the drawing area that hit-testing never returns them.
    /// Series with `disable_hover` set keep an empty range.
    pub fn build<F>(
        series: &ScatterSeriesSet,
        axes: &CartesianAxes,
        area: DrawingArea,
        zoom: &ZoomState,
        space: IndexSpace,
        is_point_inside: F,
    ) -> Self
    where
        F: Fn(f64, f64) -> bool + Sync,
    {
        let started = Instant::now();
        let diag = area.diagonal();
        let trash = DVec2::new(area.left - 2.0 * diag - 1.0, area.top - 2.0 * diag - 1.0);

        let mut records: Vec<PointRecord> = Vec::with_capacity(series.total_points());
        let mut ranges = Vec::with_capacity(series.len());
        let mut grouped: Vec<(AxisId, AxisId, Vec<(u32, DVec2)>)> = Vec::new();

        for s in series.iter() {
            let start_index = records.len();
            let empty = SeriesIndexRange {
                series_id: s.id.clone(),
                start_index,
                end_index: start_index,
            };
            if s.disable_hover {
                ranges.push(empty);
                continue;
            }
            let (Some(x_axis), Some(y_axis)) = (
                axes.axis(AxisDirection::X, s.x_axis_id),
                axes.axis(AxisDirection::Y, s.y_axis_id),
            ) else {
                warn!(
                    series = %s.id,
                    "scatter series references an unknown axis; not hit-testable"
                );
                ranges.push(empty);
                continue;
            };

            let x_zoom = zoom.window_or_full(AxisDirection::X, x_axis.id);
            let y_zoom = zoom.window_or_full(AxisDirection::Y, y_axis.id);
            let (x_scale, y_scale): (&dyn ScaleMapper, &dyn ScaleMapper) =
                (&x_axis.scale, &y_axis.scale);
            let project = |(i, value): (usize, &ScatterValue)| -> Option<(usize, DVec2)> {
                let n = normalize_value(value, x_scale, y_scale)?;
                let position = match space {
                    IndexSpace::Normalized => n,
                    IndexSpace::Pixel => {
                        let p = normalized_to_screen(n, &area, x_zoom, y_zoom);
                        if is_point_inside(p.x, p.y) {
                            p
                        } else {
                            trash
                        }
                    }
                };
                Some((i, position))
            };

            let projected: Vec<(usize, DVec2)> = if s.data.len() >= PARALLEL_THRESHOLD {
                s.data.par_iter().enumerate().filter_map(&project).collect()
            } else {
                s.data.iter().enumerate().filter_map(&project).collect()
            };

            let group = match grouped
                .iter()
                .position(|(gx, gy, _)| *gx == x_axis.id && *gy == y_axis.id)
            {
                Some(idx) => idx,
                None => {
                    grouped.push((x_axis.id, y_axis.id, Vec::new()));
                    grouped.len() - 1
                }
            };

            for (data_index, position) in projected {
                let Some(id) = flat_id(records.len()) else {
                    warn!(
                        series = %s.id,
                        data_index,
                        "voronoi index is full; remaining points are not hit-testable"
                    );
                    break;
                };
                grouped[group].2.push((id, position));
                records.push(PointRecord {
                    series_id: s.id.clone(),
                    data_index,
                    position,
                });
            }

            ranges.push(SeriesIndexRange {
                series_id: s.id.clone(),
                start_index,
                end_index: records.len(),
            });
        }

        let groups: Vec<AxisGroup> = grouped
            .into_iter()
            .map(|(x_axis, y_axis, points)| AxisGroup {
                x_axis,
                y_axis,
                tree: KdTree::new(points),
            })
            .collect();

        debug!(
            points = records.len(),
            series = ranges.len(),
            groups = groups.len(),
            ?space,
            elapsed_us = started.elapsed().as_micros() as u64,
            "built voronoi index"
        );

        Self {
            space,
            generation: 0,
            records,
            ranges,
            groups,
        }
    }

    pub fn space(&self) -> IndexSpace {
        self.space
    }

    /// Build counter of the [`super::VoronoiIndex`] that produced this index,
    /// 0 when built directly.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Ranges in series order; they partition `[0, len())`.
    pub fn ranges(&self) -> &[SeriesIndexRange] {
        &self.ranges
    }

    pub fn series_range(&self, id: &SeriesId) -> Option<&SeriesIndexRange> {
        self.ranges.iter().find(|r| &r.series_id == id)
    }

    /// Maps a flat index back to the series and data index it was built from.
    pub fn resolve(&self, flat_index: usize) -> Option<HighlightItem> {
        let pos = self.ranges.partition_point(|r| r.end_index <= flat_index);
        let range = self.ranges.get(pos)?;
        if !range.contains(flat_index) {
            return None;
        }
        let record = self.records.get(flat_index)?;
        Some(HighlightItem {
            series_id: range.series_id.clone(),
            data_index: record.data_index,
        })
    }
}
