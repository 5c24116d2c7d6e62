//! Assignment tests for WidgetSlotStore.

use super::super::{SlotError, WidgetSlotStore};
use super::chart_and_table;
use crate::widgets::{WidgetKind, WidgetRef};

#[test]
fn test_new_store_is_all_empty() {
    let store = WidgetSlotStore::new(6);
    assert_eq!(store.len(), 6);
    assert!(!store.is_empty());
    assert_eq!(store.occupied(), 0);
    assert!(store.iter().all(Option::is_none));
}

#[test]
fn test_zero_slot_store() {
    let store = WidgetSlotStore::new(0);
    assert!(store.is_empty());
    assert!(store.get(0).is_none());
}

#[test]
fn test_assign_generates_id_from_kind_and_index() {
    let mut store = WidgetSlotStore::new(4);
    assert_eq!(store.assign(0, WidgetKind::Chart), Ok("chart-0".to_string()));
    assert_eq!(store.assign(3, WidgetKind::Depth), Ok("depth-3".to_string()));
    assert_eq!(store.get(0), Some(&WidgetRef::new(WidgetKind::Chart, 0)));
    assert_eq!(store.occupied(), 2);
}

#[test]
fn test_assign_out_of_range() {
    let mut store = WidgetSlotStore::new(2);
    assert_eq!(
        store.assign(2, WidgetKind::Chart),
        Err(SlotError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(store.occupied(), 0);
}

#[test]
fn test_assign_on_occupied_slot_is_noop() {
    let mut store = chart_and_table();
    let before = store.snapshot();
    assert_eq!(
        store.assign(0, WidgetKind::Details),
        Err(SlotError::SlotOccupied {
            index: 0,
            occupant: "chart-0".to_string()
        })
    );
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_assign_after_swap_keeps_ids_unique() {
    let mut store = chart_and_table();
    assert!(store.swap(0, 2));
    // chart-0 now lives in slot 2, so a new chart in slot 0 gets a suffix.
    assert_eq!(store.assign(0, WidgetKind::Chart), Ok("chart-0-1".to_string()));
    assert_eq!(store.position_of("chart-0"), Some(2));
    assert_eq!(store.position_of("chart-0-1"), Some(0));
    // Other kinds in the freed slot take the plain id.
    let mut other = chart_and_table();
    assert!(other.swap(0, 2));
    assert_eq!(other.assign(0, WidgetKind::Depth), Ok("depth-0".to_string()));
}

#[test]
fn test_position_of() {
    let store = chart_and_table();
    assert_eq!(store.position_of("table-1"), Some(1));
    assert_eq!(store.position_of("depth-3"), None);
    assert!(store.is_occupied(1));
    assert!(!store.is_occupied(2));
    assert!(!store.is_occupied(99));
}
