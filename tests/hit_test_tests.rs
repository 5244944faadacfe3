use chart_voronoi::data_types::{
    AxisDirection, AxisId, CartesianAxes, IndexSpace, ScatterSeries, ScatterSeriesSet,
    ScatterValue, ZoomState, ZoomWindow,
};
use chart_voronoi::scales::{ChartScale, ScaleMapper};
use chart_voronoi::transform::{DrawingArea, PlotTransform};
use chart_voronoi::voronoi::{closest_point, HitOutcome, SpatialIndex};
use chart_voronoi::HighlightItem;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn axes() -> CartesianAxes {
    CartesianAxes::new(
        ChartScale::new_linear((0.0, 4.0), (0.0, 1.0)),
        ChartScale::new_linear((0.0, 8.0), (0.0, 1.0)),
    )
}

fn area() -> DrawingArea {
    DrawingArea::new(0.0, 0.0, 400.0, 400.0)
}

fn scenario_series() -> ScatterSeriesSet {
    [ScatterSeries::from_points("a", &[(1.0, 4.0), (2.0, 6.0), (3.0, 4.0)])]
        .into_iter()
        .collect()
}

fn build(series: &ScatterSeriesSet, zoom: &ZoomState, space: IndexSpace) -> SpatialIndex {
    let area = area();
    SpatialIndex::build(series, &axes(), area, zoom, space, |x, y| area.contains(x, y))
}

fn hit(
    index: &SpatialIndex,
    zoom: &ZoomState,
    pointer: DVec2,
    max_radius: Option<f64>,
) -> HitOutcome {
    let area = area();
    closest_point(Some(index), pointer, &area, zoom, max_radius, |x, y| area.contains(x, y))
}

#[test]
fn test_pointer_on_point_returns_that_point() {
    let zoom = ZoomState::default();
    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&scenario_series(), &zoom, space);
        // (2, 6) is drawn at x = 0.5 * 400, y = (1 - 0.75) * 400
        let outcome = hit(&index, &zoom, DVec2::new(200.0, 100.0), None);
        assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("a", 1)), "{space:?}");
    }
}

#[test]
fn test_pointer_outside_drawing_area_is_outside_chart() {
    let zoom = ZoomState::default();
    let index = build(&scenario_series(), &zoom, IndexSpace::Normalized);
    for pointer in [
        DVec2::new(-1.0, 100.0),
        DVec2::new(401.0, 100.0),
        DVec2::new(200.0, -0.5),
        DVec2::new(200.0, 1000.0),
    ] {
        assert_eq!(hit(&index, &zoom, pointer, None), HitOutcome::OutsideChart);
    }

    // Outside wins even before the first build.
    let area = area();
    let outcome = closest_point(None, DVec2::new(-10.0, -10.0), &area, &zoom, None, |x, y| {
        area.contains(x, y)
    });
    assert_eq!(outcome, HitOutcome::OutsideChart);
}

#[test]
fn test_no_index_yet_is_no_point_found() {
    let area = area();
    let outcome = closest_point(
        None,
        DVec2::new(100.0, 100.0),
        &area,
        &ZoomState::default(),
        None,
        |x, y| area.contains(x, y),
    );
    assert_eq!(outcome, HitOutcome::NoPointFound);
}

#[test]
fn test_empty_series_is_no_point_found() {
    let zoom = ZoomState::default();
    let series: ScatterSeriesSet = [ScatterSeries::new("empty", vec![])].into_iter().collect();
    let index = build(&series, &zoom, IndexSpace::Normalized);
    assert!(index.is_empty());
    assert_eq!(index.ranges().len(), 1);
    assert_eq!(hit(&index, &zoom, DVec2::new(10.0, 10.0), None), HitOutcome::NoPointFound);
}

#[test]
fn test_max_radius_is_measured_in_pixels() {
    let zoom = ZoomState::default();
    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&scenario_series(), &zoom, space);
        let pointer = DVec2::new(210.0, 100.0);
        assert_eq!(hit(&index, &zoom, pointer, Some(5.0)), HitOutcome::NoPointFound);
        assert_eq!(
            hit(&index, &zoom, pointer, Some(10.5)),
            HitOutcome::Item(HighlightItem::new("a", 1))
        );
    }
}

#[test]
fn test_points_outside_zoom_window_are_skipped() {
    let mut zoom = ZoomState::default();
    zoom.set_window(AxisDirection::X, AxisId(0), ZoomWindow::new(0.0, 40.0));

    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&scenario_series(), &zoom, space);
        // Right edge of the view, next to where (2, 6) would be drawn if it were visible.
        let outcome = hit(&index, &zoom, DVec2::new(399.0, 100.0), None);
        assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("a", 0)), "{space:?}");
    }
}

#[test]
fn test_normalized_index_follows_zoom_without_rebuild() {
    let index = build(&scenario_series(), &ZoomState::default(), IndexSpace::Normalized);

    let mut zoom = ZoomState::default();
    zoom.set_window(AxisDirection::X, AxisId(0), ZoomWindow::new(25.0, 75.0));
    // x = 2 now sits in the middle of [25%, 75%], x = 1 on the left edge.
    assert_eq!(
        hit(&index, &zoom, DVec2::new(200.0, 100.0), None),
        HitOutcome::Item(HighlightItem::new("a", 1))
    );
    assert_eq!(
        hit(&index, &zoom, DVec2::new(1.0, 200.0), None),
        HitOutcome::Item(HighlightItem::new("a", 0))
    );
}

#[test]
fn test_equal_distances_prefer_first_inserted() {
    let zoom = ZoomState::default();
    let series: ScatterSeriesSet = [
        ScatterSeries::from_points("first", &[(2.0, 2.0)]),
        ScatterSeries::from_points("second", &[(2.0, 2.0)]),
        ScatterSeries::from_points("third", &[(1.0, 1.0), (2.0, 2.0)]),
    ]
    .into_iter()
    .collect();

    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&series, &zoom, space);
        let outcome = hit(&index, &zoom, DVec2::new(200.0, 300.0), None);
        assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("first", 0)));
    }
}

#[test]
fn test_malformed_points_are_not_indexed() {
    let zoom = ZoomState::default();
    let series: ScatterSeriesSet = [ScatterSeries::new(
        "gappy",
        vec![
            ScatterValue { x: None, y: Some(1.0) },
            ScatterValue::new(f64::NAN, 2.0),
            ScatterValue::new(3.0, 4.0),
            ScatterValue { x: Some(1.0), y: None },
        ],
    )]
    .into_iter()
    .collect();

    let index = build(&series, &zoom, IndexSpace::Normalized);
    assert_eq!(index.len(), 1);
    let range = &index.ranges()[0];
    assert_eq!((range.start_index, range.end_index), (0, 1));

    // The surviving point keeps its position in the series data.
    let outcome = hit(&index, &zoom, DVec2::new(0.0, 0.0), None);
    assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("gappy", 2)));
}

#[test]
fn test_log_scale_skips_non_positive_values() {
    let area = area();
    let axes = CartesianAxes::new(
        ChartScale::new_log((1.0, 1000.0), (0.0, 1.0)),
        ChartScale::new_linear((0.0, 1.0), (0.0, 1.0)),
    );
    let series: ScatterSeriesSet =
        [ScatterSeries::from_points("log", &[(-1.0, 0.5), (0.0, 0.5), (10.0, 0.5), (100.0, 0.5)])]
            .into_iter()
            .collect();
    let zoom = ZoomState::default();
    let index = SpatialIndex::build(&series, &axes, area, &zoom, IndexSpace::Normalized, |x, y| {
        area.contains(x, y)
    });
    assert_eq!(index.len(), 2);

    // 100 sits two thirds of the way across a 1..1000 log axis.
    let outcome = closest_point(Some(&index), DVec2::new(266.0, 200.0), &area, &zoom, None, |x, y| {
        area.contains(x, y)
    });
    assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("log", 3)));
}

#[test]
fn test_series_with_unknown_axis_gets_empty_range() {
    let zoom = ZoomState::default();
    let series: ScatterSeriesSet = [
        ScatterSeries::from_points("lost", &[(1.0, 1.0)]).with_axes(AxisId(7), AxisId(0)),
        ScatterSeries::from_points("kept", &[(1.0, 1.0)]),
    ]
    .into_iter()
    .collect();

    let index = build(&series, &zoom, IndexSpace::Normalized);
    let lost = index.series_range(&"lost".into()).unwrap();
    let kept = index.series_range(&"kept".into()).unwrap();
    assert!(lost.is_empty());
    assert_eq!((kept.start_index, kept.end_index), (0, 1));
    assert_eq!(
        hit(&index, &zoom, DVec2::new(100.0, 350.0), None),
        HitOutcome::Item(HighlightItem::new("kept", 0))
    );
}

#[test]
fn test_series_on_secondary_axes_use_their_own_zoom() {
    let area = area();
    let mut axes = axes();
    axes.x.push(chart_voronoi::data_types::AxisConfig {
        id: AxisId(1),
        scale: ChartScale::new_linear((0.0, 100.0), (0.0, 1.0)),
    });
    let series: ScatterSeriesSet = [
        ScatterSeries::from_points("primary", &[(3.0, 4.0)]),
        ScatterSeries::from_points("secondary", &[(50.0, 4.0)]).with_axes(AxisId(1), AxisId(0)),
    ]
    .into_iter()
    .collect();

    let mut zoom = ZoomState::default();
    zoom.set_window(AxisDirection::X, AxisId(1), ZoomWindow::new(50.0, 100.0));
    let index = SpatialIndex::build(&series, &axes, area, &zoom, IndexSpace::Normalized, |x, y| {
        area.contains(x, y)
    });

    // "secondary" is drawn at the left edge of its zoomed axis; "primary" at 300px.
    let outcome = closest_point(Some(&index), DVec2::new(10.0, 200.0), &area, &zoom, None, |x, y| {
        area.contains(x, y)
    });
    assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("secondary", 0)));
}

#[test]
fn test_pixel_index_displaces_clipped_points() {
    let mut zoom = ZoomState::default();
    zoom.set_window(AxisDirection::X, AxisId(0), ZoomWindow::new(0.0, 50.0));
    let index = build(&scenario_series(), &zoom, IndexSpace::Pixel);

    // (3, 4) is beyond the visible window and parked far from the drawing area.
    let clipped = &index.records()[2];
    let diag = area().diagonal();
    let corners = [
        DVec2::ZERO,
        DVec2::new(400.0, 0.0),
        DVec2::new(0.0, 400.0),
        DVec2::new(400.0, 400.0),
    ];
    for corner in corners {
        assert!(clipped.position.distance(corner) > diag);
    }
    assert_eq!(index.len(), 3);
    assert_eq!(
        hit(&index, &zoom, DVec2::new(400.0, 200.0), None),
        HitOutcome::Item(HighlightItem::new("a", 1))
    );
}

#[test]
fn test_rebuilding_twice_gives_same_answers() {
    let zoom = ZoomState::default();
    let series = random_series(&mut StdRng::seed_from_u64(7), 4, 300);
    let a = build(&series, &zoom, IndexSpace::Normalized);
    let b = build(&series, &zoom, IndexSpace::Normalized);
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..200 {
        let q = DVec2::new(rng.random_range(0.0..400.0), rng.random_range(0.0..400.0));
        assert_eq!(hit(&a, &zoom, q, None), hit(&b, &zoom, q, None));
    }
}

fn random_series(rng: &mut StdRng, series: usize, points: usize) -> ScatterSeriesSet {
    (0..series)
        .map(|s| {
            let data: Vec<(f64, f64)> = (0..points)
                .map(|_| (rng.random_range(0.0..4.0), rng.random_range(0.0..8.0)))
                .collect();
            ScatterSeries::from_points(format!("s{s}"), &data)
        })
        .collect()
}

#[test]
fn test_random_queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    let series = random_series(&mut rng, 3, 2000);

    let mut zoom = ZoomState::default();
    zoom.set_window(AxisDirection::X, AxisId(0), ZoomWindow::new(10.0, 70.0));
    zoom.set_window(AxisDirection::Y, AxisId(0), ZoomWindow::new(20.0, 90.0));

    let axes = axes();
    let transform = PlotTransform::new(axes.x[0].scale.clone(), axes.y[0].scale.clone(), area())
        .with_zoom(ZoomWindow::new(10.0, 70.0), ZoomWindow::new(20.0, 90.0));
    let visible: Vec<(HighlightItem, DVec2)> = series
        .iter()
        .flat_map(|s| {
            s.data.iter().enumerate().map(|(i, v)| {
                let (x, y) = v.coords().unwrap();
                let item = HighlightItem {
                    series_id: s.id.clone(),
                    data_index: i,
                };
                (item, transform.data_to_screen(x, y).unwrap())
            })
        })
        .filter(|(_, p)| area().contains(p.x, p.y))
        .collect();

    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&series, &zoom, space);
        for _ in 0..500 {
            let q = DVec2::new(rng.random_range(0.0..400.0), rng.random_range(0.0..400.0));
            let best = visible
                .iter()
                .map(|(_, p)| p.distance(q))
                .fold(f64::INFINITY, f64::min);

            let HitOutcome::Item(item) = hit(&index, &zoom, q, None) else {
                panic!("expected a point for {q:?}");
            };
            let found = visible.iter().find(|(i, _)| *i == item).expect("hit must be visible");
            assert!((found.1.distance(q) - best).abs() < 1e-6, "{space:?}: {q:?}");
        }
    }
}

#[test]
fn test_ranges_partition_flat_array() {
    let mut rng = StdRng::seed_from_u64(3);
    let series: ScatterSeriesSet = (0..6)
        .map(|s| {
            let n = rng.random_range(0..50);
            let data = (0..n)
                .map(|_| {
                    if rng.random_bool(0.1) {
                        ScatterValue { x: None, y: Some(1.0) }
                    } else {
                        ScatterValue::new(rng.random_range(0.0..4.0), rng.random_range(0.0..8.0))
                    }
                })
                .collect();
            ScatterSeries::new(format!("s{s}"), data)
        })
        .collect();

    let index = build(&series, &ZoomState::default(), IndexSpace::Normalized);
    let mut expected_start = 0;
    for (range, s) in index.ranges().iter().zip(series.iter()) {
        assert_eq!(range.series_id, s.id);
        assert_eq!(range.start_index, expected_start);
        assert_eq!(range.len(), s.data.iter().filter(|v| v.coords().is_some()).count());
        expected_start = range.end_index;
    }
    assert_eq!(expected_start, index.len());
    let total: usize = index.ranges().iter().map(|r| r.len()).sum();
    assert_eq!(total, index.len());

    for flat in 0..index.len() {
        let item = index.resolve(flat).unwrap();
        assert_eq!(item.series_id, index.records()[flat].series_id);
    }
    assert!(index.resolve(index.len()).is_none());
}

#[test]
fn test_hover_disabled_series_is_never_hit() {
    let zoom = ZoomState::default();
    let series: ScatterSeriesSet = [
        ScatterSeries::from_points("muted", &[(2.0, 6.0)]).with_hover_disabled(),
        ScatterSeries::from_points("live", &[(1.0, 1.0)]),
    ]
    .into_iter()
    .collect();

    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = build(&series, &zoom, space);
        assert_eq!(index.len(), 1);
        assert!(index.series_range(&"muted".into()).unwrap().is_empty());
        // Right on top of the muted point.
        let outcome = hit(&index, &zoom, DVec2::new(200.0, 100.0), None);
        assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("live", 0)), "{space:?}");
    }
}

/// Square-root axis over `[0, max]` drawn onto `[0, 1]`.
struct SqrtScale {
    max: f64,
}

impl ScaleMapper for SqrtScale {
    fn map(&self, value: f64) -> Option<f64> {
        (value.is_finite() && value >= 0.0).then(|| (value / self.max).sqrt())
    }

    fn range(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

#[test]
fn test_custom_scale_drives_projection() {
    let area = area();
    let axes = CartesianAxes::new(
        ChartScale::custom(SqrtScale { max: 16.0 }),
        ChartScale::new_linear((0.0, 8.0), (0.0, 1.0)),
    );
    let series: ScatterSeriesSet =
        [ScatterSeries::from_points("sqrt", &[(-4.0, 4.0), (1.0, 4.0), (4.0, 4.0), (9.0, 4.0)])]
            .into_iter()
            .collect();
    let zoom = ZoomState::default();

    for space in [IndexSpace::Normalized, IndexSpace::Pixel] {
        let index = SpatialIndex::build(&series, &axes, area, &zoom, space, |x, y| {
            area.contains(x, y)
        });
        assert_eq!(index.len(), 3, "{space:?}");

        // 4 sits halfway along a sqrt axis over [0, 16].
        let pointer = DVec2::new(195.0, 200.0);
        let outcome = closest_point(Some(&index), pointer, &area, &zoom, None, |x, y| {
            area.contains(x, y)
        });
        assert_eq!(outcome, HitOutcome::Item(HighlightItem::new("sqrt", 2)), "{space:?}");
    }
}

#[test]
fn test_custom_scale_equality_is_identity() {
    let scale = ChartScale::custom(SqrtScale { max: 16.0 });
    assert_eq!(scale, scale.clone());
    assert_ne!(scale, ChartScale::custom(SqrtScale { max: 16.0 }));
    assert_eq!(scale.domain(), None);
    assert_eq!(scale.invert(0.5), None);
    assert_eq!(scale.map(4.0), Some(0.5));
}
