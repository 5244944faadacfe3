use chart_voronoi::data_types::{
    AxisDirection, AxisId, HighlightItem, ScatterItemIdentifier, ZoomWindow,
};
use chart_voronoi::store::{ChartState, ChartStore};
use glam::DVec2;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_highlight_notifies_only_on_change() {
    let store = ChartStore::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let _sub = store.subscribe_highlight(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(store.set_highlight(HighlightItem::new("a", 1)));
    assert!(!store.set_highlight(HighlightItem::new("a", 1)));
    assert!(store.set_highlight(HighlightItem::new("a", 2)));
    assert!(store.clear_highlight());
    assert!(!store.clear_highlight());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_subscription_drop_unsubscribes() {
    let store = ChartStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let sub = store.subscribe_highlight(move |change| sink.lock().push(change.current.clone()));
    assert_eq!(store.listener_count(), 1);

    store.set_highlight(HighlightItem::new("a", 0));
    drop(sub);
    assert_eq!(store.listener_count(), 0);
    store.set_highlight(HighlightItem::new("a", 1));

    assert_eq!(*seen.lock(), vec![Some(HighlightItem::new("a", 0))]);
}

#[test]
fn test_subscription_outliving_store() {
    let store = ChartStore::new();
    let sub = store.subscribe_highlight(|_| {});
    drop(store);
    sub.unsubscribe();
}

#[test]
fn test_listener_may_write_back() {
    let store = ChartStore::new();
    let weak = Arc::downgrade(&store);
    let _sub = store.subscribe_highlight(move |change| {
        if change.current.is_none() {
            return;
        }
        if let Some(store) = weak.upgrade() {
            store.set_pointer(DVec2::new(1.0, 2.0));
        }
    });
    store.set_highlight(HighlightItem::new("a", 0));
    assert_eq!(store.interaction().pointer, Some(DVec2::new(1.0, 2.0)));
}

#[test]
fn test_interaction_updates() {
    let store = ChartStore::new();
    let item: ScatterItemIdentifier = HighlightItem::new("a", 3).into();
    store.set_pointer(DVec2::new(5.0, 6.0));
    store.set_item_interaction(item.clone());
    assert_eq!(store.interaction().item, Some(item));

    store.remove_item_interaction();
    let interaction = store.interaction();
    assert!(interaction.item.is_none());
    assert_eq!(interaction.pointer, Some(DVec2::new(5.0, 6.0)));

    store.clean_interaction();
    assert_eq!(store.interaction(), Default::default());
}

#[test]
fn test_zoom_updates() {
    let store = ChartStore::new();
    assert_eq!(store.axis_zoom(AxisDirection::X, AxisId(0)), None);

    store.set_axis_zoom(AxisDirection::X, AxisId(0), ZoomWindow::new(10.0, 20.0));
    store.update_zoom(|z| z.set_window(AxisDirection::Y, AxisId(0), ZoomWindow::new(0.0, 50.0)));
    store.set_zoom_interacting(true);

    assert_eq!(store.axis_zoom(AxisDirection::X, AxisId(0)), Some(ZoomWindow::new(10.0, 20.0)));
    assert_eq!(
        store.zoom().window_or_full(AxisDirection::Y, AxisId(0)),
        ZoomWindow::new(0.0, 50.0)
    );
    assert!(store.zoom_is_interacting());

    store.update_zoom(|z| z.reset());
    assert_eq!(store.axis_zoom(AxisDirection::X, AxisId(0)), None);
}

#[test]
fn test_select_and_snapshot() {
    let store = ChartStore::with_state(ChartState {
        voronoi_enabled: true,
        ..Default::default()
    });
    assert!(store.is_voronoi_enabled());
    assert!(store.select(|s| s.highlight.is_none()));

    store.set_highlight(HighlightItem::new("b", 4));
    let snapshot = store.snapshot();
    store.clear_highlight();
    assert_eq!(snapshot.highlight, Some(HighlightItem::new("b", 4)));
}

#[test]
fn test_store_shared_across_threads() {
    let store = ChartStore::new();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    store.set_highlight(HighlightItem::new("s", t * 100 + i));
                    let _ = store.highlighted_item();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(store.highlighted_item().is_some());
}
