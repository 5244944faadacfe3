use super::data::SeriesId;
use glam::DVec2;

/// The single highlighted point of a chart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HighlightItem {
    pub series_id: SeriesId,
    pub data_index: usize,
}

impl HighlightItem {
    pub fn new(series_id: impl Into<SeriesId>, data_index: usize) -> Self {
        Self {
            series_id: series_id.into(),
            data_index,
        }
    }

    pub fn matches(&self, series_id: &SeriesId, data_index: usize) -> bool {
        self.data_index == data_index && &self.series_id == series_id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Scatter,
}

/// Identifier handed to item-click callbacks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScatterItemIdentifier {
    pub kind: ItemKind,
    pub series_id: SeriesId,
    pub data_index: usize,
}

impl From<HighlightItem> for ScatterItemIdentifier {
    fn from(item: HighlightItem) -> Self {
        Self {
            kind: ItemKind::Scatter,
            series_id: item.series_id,
            data_index: item.data_index,
        }
    }
}

impl From<&ScatterItemIdentifier> for HighlightItem {
    fn from(item: &ScatterItemIdentifier) -> Self {
        Self {
            series_id: item.series_id.clone(),
            data_index: item.data_index,
        }
    }
}

/// Pointer-driven interaction of a chart: the item under the pointer and the pointer itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub item: Option<ScatterItemIdentifier>,
    /// Last pointer position, in chart coordinates.
    pub pointer: Option<DVec2>,
}

/// Payload of a highlight-change notification.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightChange {
    pub previous: Option<HighlightItem>,
    pub current: Option<HighlightItem>,
}
