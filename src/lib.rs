//! chart_voronoi crate for scatter chart hit-testing and batched marker rendering

pub mod data_types;
pub mod fast_scatter;
pub mod gestures;
#[cfg(feature = "gpui")]
pub mod gpui_support;
pub mod interaction;
pub mod scales;
pub mod store;
pub mod transform;
pub mod view_controller;
pub mod voronoi;

pub use data_types::{
    AxisId, CartesianAxes, HighlightItem, ScatterItemIdentifier, ScatterSeries, ScatterSeriesSet,
    SeriesId, VoronoiConfig, ZoomWindow,
};
pub use fast_scatter::{partition, render_series, PointBatches, PointClass};
pub use interaction::{ChartVoronoi, InteractionPhase};
pub use scales::{ChartScale, ScaleMapper};
pub use store::ChartStore;
pub use transform::{DrawingArea, PlotTransform};
pub use voronoi::{closest_point, HitOutcome, SpatialIndex, VoronoiIndex, VoronoiInputs};
