//! Color-group synchronization.
//!
//! Widgets tagged with the same [`ColorId`] form a group that shares one
//! selected symbol. The [`SynchronizationStore`] owns both mappings
//! (widget to color, widget to symbol) for one workspace session and is
//! passed by reference to whatever needs them; it has no process-wide state.
//!
//! Group membership is keyed by widget id only, so swapping slots never
//! changes a widget's group.

mod palette;

pub use palette::{ColorError, ColorId, Swatch, PALETTE};

use std::collections::BTreeMap;
use tokio::sync::broadcast;

/// Capacity of the selection update channel.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Widget id to color group.
pub type ColorMap = BTreeMap<String, ColorId>;

/// Widget id to selected symbol.
pub type SelectionMap = BTreeMap<String, String>;

/// Notification sent after a symbol fans out to a color group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUpdate {
    /// Group that received the symbol.
    pub color: ColorId,
    /// The selected symbol.
    pub symbol: String,
    /// Every widget id whose selection was written, sorted.
    pub members: Vec<String>,
}

/// Owns color-group membership and symbol selection for one session.
pub struct SynchronizationStore {
    colors: ColorMap,
    selections: SelectionMap,
    update_tx: broadcast::Sender<SelectionUpdate>,
}

impl std::fmt::Debug for SynchronizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynchronizationStore")
            .field("colors", &self.colors)
            .field("selections", &self.selections)
            .field("subscriber_count", &self.update_tx.receiver_count())
            .finish()
    }
}

impl SynchronizationStore {
    /// Empty store with no groups and no selections.
    pub fn new() -> Self {
        let (update_tx, _rx) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            colors: ColorMap::new(),
            selections: SelectionMap::new(),
            update_tx,
        }
    }

    /// Puts `widget_id` in group `color`, replacing any previous group.
    ///
    /// Returns the previous group, if any.
    pub fn assign(&mut self, widget_id: &str, color: ColorId) -> Option<ColorId> {
        let previous = self.colors.insert(widget_id.to_string(), color);
        tracing::debug!(widget_id, %color, ?previous, "color group assigned");
        previous
    }

    /// Removes `widget_id` from its group. Its last selection is kept.
    pub fn unassign(&mut self, widget_id: &str) -> Option<ColorId> {
        let previous = self.colors.remove(widget_id);
        if previous.is_some() {
            tracing::debug!(widget_id, "color group cleared");
        }
        previous
    }

    /// Drops every entry for a removed widget.
    ///
    /// Returns `true` if the widget had a group or a selection.
    pub fn evict(&mut self, widget_id: &str) -> bool {
        let had_color = self.colors.remove(widget_id).is_some();
        let had_selection = self.selections.remove(widget_id).is_some();
        if had_color || had_selection {
            tracing::debug!(widget_id, "sync entries evicted");
        }
        had_color || had_selection
    }

    /// Writes `symbol` to every member of `widget_id`'s group.
    ///
    /// The originator is included. A widget with no group changes nothing,
    /// not even its own selection. All members are written before the update
    /// is sent to subscribers. Returns the number of widgets written.
    pub fn broadcast(&mut self, widget_id: &str, symbol: &str) -> usize {
        let Some(color) = self.colors.get(widget_id).copied() else {
            tracing::debug!(widget_id, symbol, "broadcast from ungrouped widget ignored");
            return 0;
        };
        let members: Vec<String> = self
            .members_of(color)
            .into_iter()
            .map(str::to_string)
            .collect();
        for member in &members {
            self.selections.insert(member.clone(), symbol.to_string());
        }
        let written = members.len();
        let update = SelectionUpdate {
            color,
            symbol: symbol.to_string(),
            members,
        };
        match self.update_tx.send(update) {
            Ok(count) => {
                tracing::trace!("Selection update sent to {} subscribers", count);
            }
            Err(_) => {
                tracing::trace!("No subscribers for selection update");
            }
        }
        written
    }

    /// Group of `widget_id`.
    pub fn color_of(&self, widget_id: &str) -> Option<ColorId> {
        self.colors.get(widget_id).copied()
    }

    /// Selected symbol of `widget_id`.
    pub fn selection_of(&self, widget_id: &str) -> Option<&str> {
        self.selections.get(widget_id).map(String::as_str)
    }

    /// Widget ids in group `color`, sorted.
    pub fn members_of(&self, color: ColorId) -> Vec<&str> {
        self.colors
            .iter()
            .filter(|(_, c)| **c == color)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// All group memberships.
    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    /// All selections.
    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    /// Replaces the membership map wholesale, e.g. after an external change.
    pub fn replace_colors(&mut self, colors: ColorMap) {
        self.colors = colors;
    }

    /// Replaces the selection map wholesale, e.g. after an external change.
    pub fn replace_selections(&mut self, selections: SelectionMap) {
        self.selections = selections;
    }

    /// Drops the group and selection of every widget `keep` rejects.
    ///
    /// Returns the number of entries dropped.
    pub fn retain_widgets(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.colors.len() + self.selections.len();
        self.colors.retain(|id, _| keep(id));
        self.selections.retain(|id, _| keep(id));
        let dropped = before - self.colors.len() - self.selections.len();
        if dropped > 0 {
            tracing::debug!(dropped, "sync entries of absent widgets dropped");
        }
        dropped
    }

    /// Subscribes to [`SelectionUpdate`] notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionUpdate> {
        self.update_tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.update_tx.receiver_count()
    }
}

impl Default for SynchronizationStore {
    fn default() -> Self {
        Self::new()
    }
}
