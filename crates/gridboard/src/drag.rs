//! Drag-to-reorder state machine.
//!
//! Gesture sources identify slots as `"cell-{index}"`. The controller turns
//! their start/move/end/cancel events into at most one
//! [`WidgetSlotStore::swap`] per gesture. One gesture at a time: a start
//! while dragging is rejected.

use crate::slots::WidgetSlotStore;

const SLOT_ID_PREFIX: &str = "cell-";

/// Gesture id for slot `index`.
pub fn slot_id(index: usize) -> String {
    format!("{SLOT_ID_PREFIX}{index}")
}

/// Slot index from a gesture id; `None` if it does not parse.
pub fn parse_slot_id(id: &str) -> Option<usize> {
    id.strip_prefix(SLOT_ID_PREFIX).unwrap_or(id).parse().ok()
}

/// Controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture started on `origin`.
    Dragging {
        /// Slot the gesture started on.
        origin: usize,
        /// Slot currently under the pointer.
        over: Option<usize>,
    },
}

/// Event from the gesture source, keyed by gesture slot id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// Pointer pressed and moved past the activation threshold.
    Start {
        /// Gesture id of the origin slot.
        slot: String,
    },
    /// Pointer moved; `over` is the slot under it, if any.
    Move {
        /// Gesture id of the hovered slot.
        over: Option<String>,
    },
    /// Pointer released over `over`, or over nothing.
    End {
        /// Gesture id of the drop target.
        over: Option<String>,
    },
    /// Gesture aborted by the source.
    Cancel,
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Gesture began on an occupied slot.
    Started {
        /// Origin slot.
        origin: usize,
    },
    /// Start refused: origin empty, unknown, or a gesture already active.
    Rejected,
    /// Hover target updated.
    Hovering {
        /// Hovered slot, if any.
        over: Option<usize>,
    },
    /// Dropped on another slot; `swapped` reports whether the store changed.
    Dropped {
        /// Origin slot.
        from: usize,
        /// Target slot.
        to: usize,
        /// True if the store exchanged the slots.
        swapped: bool,
    },
    /// Gesture ended without mutation.
    Cancelled,
    /// Event not meaningful in the current state.
    Ignored,
}

/// Serial drag state machine over a slot store.
#[derive(Debug, Default)]
pub struct DragReorderController {
    state: DragState,
}

impl DragReorderController {
    /// Idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// True while a gesture is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts a gesture on slot `origin` if it is occupied and none is active.
    pub fn start_drag(&mut self, origin: usize, store: &WidgetSlotStore) -> DragOutcome {
        if self.is_dragging() {
            tracing::debug!(origin, "drag start ignored, gesture already active");
            return DragOutcome::Rejected;
        }
        if !store.is_occupied(origin) {
            tracing::debug!(origin, "drag start ignored, slot is empty");
            return DragOutcome::Rejected;
        }
        self.state = DragState::Dragging { origin, over: None };
        DragOutcome::Started { origin }
    }

    /// Records the hovered slot.
    pub fn hover(&mut self, target: Option<usize>) -> DragOutcome {
        match &mut self.state {
            DragState::Dragging { over, .. } => {
                *over = target;
                DragOutcome::Hovering { over: target }
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Ends the gesture on `target`.
    ///
    /// Dropping on the origin is a cancel. Any other target calls
    /// [`WidgetSlotStore::swap`], whose own no-op rules apply. The
    /// controller is idle afterwards either way.
    pub fn drop_on(&mut self, target: usize, store: &mut WidgetSlotStore) -> DragOutcome {
        let DragState::Dragging { origin, .. } = std::mem::take(&mut self.state) else {
            return DragOutcome::Ignored;
        };
        if origin == target {
            return DragOutcome::Cancelled;
        }
        let swapped = store.swap(origin, target);
        DragOutcome::Dropped {
            from: origin,
            to: target,
            swapped,
        }
    }

    /// Aborts the gesture without touching the store.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { .. } => DragOutcome::Cancelled,
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Applies one gesture-source event.
    ///
    /// Ids that do not parse are treated as "no target": an unparseable
    /// start is rejected, an unparseable drop cancels.
    pub fn handle(&mut self, event: DragEvent, store: &mut WidgetSlotStore) -> DragOutcome {
        match event {
            DragEvent::Start { slot } => match parse_slot_id(&slot) {
                Some(origin) => self.start_drag(origin, store),
                None => DragOutcome::Rejected,
            },
            DragEvent::Move { over } => self.hover(over.as_deref().and_then(parse_slot_id)),
            DragEvent::End { over } => match over.as_deref().and_then(parse_slot_id) {
                Some(target) => self.drop_on(target, store),
                None => self.cancel(),
            },
            DragEvent::Cancel => self.cancel(),
        }
    }
}
