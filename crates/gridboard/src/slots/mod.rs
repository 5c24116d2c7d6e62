//! Slot store for one workspace layout.
//!
//! The [`WidgetSlotStore`] owns a fixed-length array of slots, one per slot
//! geometry produced by the layout engine. The length never changes for the
//! life of the store; a new layout means a new store.
//!
//! Rejected operations (out-of-range index, occupied target, empty origin)
//! come back as [`SlotError`] values or `false` and leave the store as it
//! was. Callers treat them as gestures that did nothing.

use crate::sync::SynchronizationStore;
use crate::widgets::{WidgetKind, WidgetRef};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Content of one slot.
pub type SlotContent = Option<WidgetRef>;

/// A slot operation that was not applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// Index outside `[0, len)`.
    #[error("slot {index} is out of range (layout has {len} slots)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Slot count.
        len: usize,
    },

    /// Assignment target already holds a widget.
    #[error("slot {index} already holds '{occupant}'")]
    SlotOccupied {
        /// Requested index.
        index: usize,
        /// Id of the widget in the slot.
        occupant: String,
    },

    /// Removal target is empty.
    #[error("slot {index} is empty")]
    SlotEmpty {
        /// Requested index.
        index: usize,
    },

    /// Restored array length differs from the slot count.
    #[error("expected {expected} slots, found {found}")]
    ShapeMismatch {
        /// Slot count of the store.
        expected: usize,
        /// Length of the incoming array.
        found: usize,
    },
}

/// Ordered, fixed-length array of widget slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSlotStore {
    slots: Vec<SlotContent>,
}

impl WidgetSlotStore {
    /// Store with `len` empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for a zero-slot store.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Widget in slot `index`, if any.
    pub fn get(&self, index: usize) -> Option<&WidgetRef> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// True if slot `index` exists and holds a widget.
    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Slot contents in index order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotContent> {
        self.slots.iter()
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Index of the slot holding `widget_id`.
    pub fn position_of(&self, widget_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|w| w.id == widget_id))
    }

    /// First `"{base}-{n}"` (n = 1, 2, ...) not held by an occupied slot.
    fn disambiguate(&self, base: &str) -> String {
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.position_of(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Places a new `kind` widget in empty slot `index`.
    ///
    /// The id is `"{kind}-{index}"`. If a widget moved by a swap still holds
    /// that id, a `-1`, `-2`, ... suffix keeps ids unique among occupied
    /// slots. Returns the new id.
    ///
    /// # Errors
    ///
    /// [`SlotError::IndexOutOfRange`] or [`SlotError::SlotOccupied`]; an
    /// occupied slot is never overwritten.
    pub fn assign(&mut self, index: usize, kind: WidgetKind) -> Result<String, SlotError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(SlotError::IndexOutOfRange { index, len })?;
        if let Some(occupant) = slot {
            return Err(SlotError::SlotOccupied {
                index,
                occupant: occupant.id.clone(),
            });
        }
        let mut widget = WidgetRef::new(kind, index);
        if self.position_of(&widget.id).is_some() {
            widget.id = self.disambiguate(&widget.id);
        }
        let id = widget.id.clone();
        self.slots[index] = Some(widget);
        tracing::debug!(index, widget_id = %id, "widget assigned");
        Ok(id)
    }

    /// Empties slot `index` and evicts the widget's sync entries.
    ///
    /// Returns the removed widget. Other widgets' sync entries are untouched.
    ///
    /// # Errors
    ///
    /// [`SlotError::IndexOutOfRange`] or [`SlotError::SlotEmpty`].
    pub fn remove(
        &mut self,
        index: usize,
        sync: &mut SynchronizationStore,
    ) -> Result<WidgetRef, SlotError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SlotError::IndexOutOfRange { index, len })?;
        let widget = slot.take().ok_or(SlotError::SlotEmpty { index })?;
        sync.evict(&widget.id);
        tracing::debug!(index, widget_id = %widget.id, "widget removed");
        Ok(widget)
    }

    /// Exchanges the contents of slots `a` and `b`.
    ///
    /// Does nothing when `a == b`, when either index is out of range, or
    /// when slot `a` is empty. `b` may be empty. Returns `true` if the slots
    /// were exchanged.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.slots.len() || b >= self.slots.len() || self.slots[a].is_none() {
            return false;
        }
        self.slots.swap(a, b);
        tracing::debug!(from = a, to = b, "slots swapped");
        true
    }

    /// Copy of the slot contents in index order.
    pub fn snapshot(&self) -> Vec<SlotContent> {
        self.slots.clone()
    }

    /// Replaces every slot with `contents`, ids taken as-is.
    ///
    /// # Errors
    ///
    /// [`SlotError::ShapeMismatch`] if the length differs; the store is
    /// left unchanged.
    pub fn restore(&mut self, contents: Vec<SlotContent>) -> Result<(), SlotError> {
        if contents.len() != self.slots.len() {
            return Err(SlotError::ShapeMismatch {
                expected: self.slots.len(),
                found: contents.len(),
            });
        }
        self.slots = contents;
        Ok(())
    }
}
