//! Tests for the WidgetSlotStore module.
//!
//! Tests are organized into categories:
//! - `assign`: placing widgets and id generation
//! - `remove`: clearing slots and sync eviction
//! - `swap`: exchange rules
//! - `restore`: snapshot and restore

mod assign;
mod swap;

use super::WidgetSlotStore;
use crate::widgets::WidgetKind;

/// 2x2 store with a chart in slot 0 and a table in slot 1.
pub(super) fn chart_and_table() -> WidgetSlotStore {
    let mut store = WidgetSlotStore::new(4);
    store
        .assign(0, WidgetKind::Chart)
        .expect("slot 0 should be empty");
    store
        .assign(1, WidgetKind::Table)
        .expect("slot 1 should be empty");
    store
}
