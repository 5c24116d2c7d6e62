//! Swap tests for WidgetSlotStore.

use super::super::WidgetSlotStore;
use super::chart_and_table;
use crate::widgets::WidgetKind;

#[test]
fn test_swap_exchanges_references() {
    let mut store = chart_and_table();
    assert!(store.swap(0, 1));
    assert_eq!(store.get(0).map(|w| w.id.as_str()), Some("table-1"));
    assert_eq!(store.get(1).map(|w| w.id.as_str()), Some("chart-0"));
}

#[test]
fn test_swap_into_empty_slot_moves_widget() {
    let mut store = chart_and_table();
    assert!(store.swap(0, 3));
    assert!(store.get(0).is_none());
    assert_eq!(store.get(3).map(|w| w.kind), Some(WidgetKind::Chart));
    // Identity is kept; the id still names the original index.
    assert_eq!(store.position_of("chart-0"), Some(3));
}

#[test]
fn test_swap_twice_between_occupied_slots_restores_contents() {
    let original = chart_and_table();
    for (a, b) in [(0, 1), (1, 0)] {
        let mut store = original.clone();
        assert!(store.swap(a, b));
        assert!(store.swap(a, b));
        assert_eq!(store, original, "swap({a},{b}) twice");
    }
}

#[test]
fn test_second_swap_into_empty_destination_is_noop() {
    // After the first swap the origin is empty, so repeating it does nothing.
    let original = chart_and_table();
    let mut store = original.clone();
    assert!(store.swap(0, 3));
    let moved = store.clone();
    assert!(!store.swap(0, 3));
    assert_eq!(store, moved);
    assert_ne!(store, original);

    // Moving back needs the reversed order.
    assert!(store.swap(3, 0));
    assert_eq!(store, original);
}

#[test]
fn test_swap_same_index_is_noop() {
    let mut store = chart_and_table();
    let before = store.clone();
    for i in 0..4 {
        assert!(!store.swap(i, i));
    }
    assert_eq!(store, before);
}

#[test]
fn test_swap_from_empty_origin_is_noop() {
    let mut store = chart_and_table();
    let before = store.clone();
    assert!(!store.swap(2, 0));
    assert!(!store.swap(3, 2));
    assert_eq!(store, before);
}

#[test]
fn test_swap_out_of_range_is_noop() {
    let mut store = chart_and_table();
    let before = store.clone();
    assert!(!store.swap(0, 4));
    assert!(!store.swap(7, 0));
    assert_eq!(store, before);
}

#[test]
fn test_swap_on_empty_store() {
    let mut store = WidgetSlotStore::new(0);
    assert!(!store.swap(0, 1));
}
