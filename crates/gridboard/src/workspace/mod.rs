//! One workspace session.
//!
//! A [`WorkspaceSession`] is created when a layout is picked and dropped when
//! the user goes back to the picker. It owns everything whose lifetime is the
//! session: the slot store sized by the layout, the synchronization store,
//! the drag controller, and (optionally) the persistence gateway.
//!
//! Every user action is handled synchronously. Actions that the UI would
//! simply not offer (adding to an occupied slot, dragging an empty one) are
//! returned as errors or no-op outcomes and leave the session unchanged.

use crate::drag::{DragEvent, DragOutcome, DragReorderController, DragState};
use crate::layout::{
    ConfigurationError, GeometrySignature, LayoutGridEngine, LayoutTemplate, SlotGeometry,
};
use crate::persistence::{ExternalChange, LoadError, PersistenceGateway, SaveError, SaveReceipt};
use crate::slots::{SlotError, WidgetSlotStore};
use crate::sync::{ColorId, SynchronizationStore};
use crate::widgets::{
    DetachError, DetachRequest, Launcher, RenderContext, WidgetKind, WidgetRef, WidgetRegistry,
    WindowSize,
};
use ratatui::text::Line;


/// Live state of one workspace.
#[derive(Debug)]
pub struct WorkspaceSession {
    template: LayoutTemplate,
    geometry: Vec<SlotGeometry>,
    slots: WidgetSlotStore,
    sync: SynchronizationStore,
    drag: DragReorderController,
    registry: WidgetRegistry,
    persistence: Option<PersistenceGateway>,
}

impl WorkspaceSession {
    /// Session for `template` with every slot empty.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`] if the template cannot be laid out; no session
    /// is created.
    pub fn open(template: LayoutTemplate) -> Result<Self, ConfigurationError> {
        let geometry = LayoutGridEngine::compute(&template)?;
        let slots = WidgetSlotStore::new(geometry.len());
        tracing::info!(
            layout = template.id.as_deref().unwrap_or("<anonymous>"),
            slots = slots.len(),
            "workspace opened"
        );
        Ok(Self {
            template,
            geometry,
            slots,
            sync: SynchronizationStore::new(),
            drag: DragReorderController::new(),
            registry: WidgetRegistry::new(),
            persistence: None,
        })
    }

    /// Attaches a gateway and loads the persisted workspace state.
    ///
    /// The saved snapshot is consulted once here through the same
    /// signature-checked path as [`WorkspaceSession::restore`]; a missing or
    /// differently shaped snapshot keeps the empty layout. The color and
    /// selection maps are then loaded and cut down to the widgets actually
    /// placed, so a new widget never inherits a group it was not given.
    /// Unreadable state is logged and left empty.
    pub fn with_persistence(mut self, gateway: PersistenceGateway) -> Self {
        match gateway.load_colors() {
            Ok(colors) => self.sync.replace_colors(colors),
            Err(e) => tracing::warn!(error = %e, "ignoring stored color groups"),
        }
        match gateway.load_selections() {
            Ok(selections) => self.sync.replace_selections(selections),
            Err(e) => tracing::warn!(error = %e, "ignoring stored selections"),
        }
        self.persistence = Some(gateway);
        match self.restore() {
            Ok(_) => {}
            Err(LoadError::NotFound | LoadError::ShapeMismatch { .. }) => self.prune_sync_state(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring saved layout");
                self.prune_sync_state();
            }
        }
        self
    }

    /// Replaces the renderer registry.
    pub fn with_registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Active template.
    pub fn template(&self) -> &LayoutTemplate {
        &self.template
    }

    /// Slot geometry in slot order.
    pub fn geometry(&self) -> &[SlotGeometry] {
        &self.geometry
    }

    /// Signature of the live layout.
    pub fn signature(&self) -> GeometrySignature {
        GeometrySignature {
            rows: self.template.rows,
            cols: self.template.cols,
            slot_count: self.slots.len(),
        }
    }

    /// Slot store.
    pub fn slots(&self) -> &WidgetSlotStore {
        &self.slots
    }

    /// Synchronization store.
    pub fn sync(&self) -> &SynchronizationStore {
        &self.sync
    }

    /// Drag controller state.
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Attached gateway, if any.
    pub fn persistence(&self) -> Option<&PersistenceGateway> {
        self.persistence.as_ref()
    }

    /// Kinds offered by the add menu for slot `index`.
    ///
    /// `None` unless the slot exists and is empty.
    pub fn add_menu(&self, index: usize) -> Option<Vec<WidgetKind>> {
        (index < self.slots.len() && !self.slots.is_occupied(index))
            .then(|| self.registry.kinds())
    }

    /// Places a `kind` widget in empty slot `index`.
    ///
    /// # Errors
    ///
    /// [`SlotError`] if the slot is out of range or occupied.
    pub fn add_widget(&mut self, index: usize, kind: WidgetKind) -> Result<String, SlotError> {
        self.slots.assign(index, kind)
    }

    /// Removes the widget in slot `index` along with its group and selection.
    ///
    /// # Errors
    ///
    /// [`SlotError`] if the slot is out of range or empty.
    pub fn remove_widget(&mut self, index: usize) -> Result<WidgetRef, SlotError> {
        let removed = self.slots.remove(index, &mut self.sync)?;
        self.persist_sync_state();
        Ok(removed)
    }

    /// Feeds one gesture event to the drag controller.
    pub fn drag(&mut self, event: DragEvent) -> DragOutcome {
        self.drag.handle(event, &mut self.slots)
    }

    /// Puts the widget in slot `index` into group `color`.
    ///
    /// Returns the widget's previous group.
    ///
    /// # Errors
    ///
    /// [`SlotError`] if the slot is out of range or empty.
    pub fn assign_color(
        &mut self,
        index: usize,
        color: ColorId,
    ) -> Result<Option<ColorId>, SlotError> {
        let id = self.occupant_id(index)?;
        let previous = self.sync.assign(&id, color);
        self.persist_sync_state();
        Ok(previous)
    }

    /// Takes the widget in slot `index` out of its group.
    ///
    /// # Errors
    ///
    /// [`SlotError`] if the slot is out of range or empty.
    pub fn clear_color(&mut self, index: usize) -> Result<Option<ColorId>, SlotError> {
        let id = self.occupant_id(index)?;
        let previous = self.sync.unassign(&id);
        self.persist_sync_state();
        Ok(previous)
    }

    /// Selects `symbol` from the widget in slot `index`, fanning it out to
    /// its group.
    ///
    /// Returns the number of widgets updated; 0 when the widget is ungrouped.
    ///
    /// # Errors
    ///
    /// [`SlotError`] if the slot is out of range or empty.
    pub fn select_symbol(&mut self, index: usize, symbol: &str) -> Result<usize, SlotError> {
        let id = self.occupant_id(index)?;
        let written = self.sync.broadcast(&id, symbol);
        if written > 0 {
            self.persist_sync_state();
        }
        Ok(written)
    }

    /// Renders slot `index`; `None` for an empty or missing slot.
    pub fn render_slot(&self, index: usize, width: u16) -> Option<Line<'static>> {
        let widget = self.slots.get(index)?;
        let renderer = self.registry.create(widget.kind)?;
        let context = RenderContext::for_widget(&self.sync, &widget.id);
        Some(renderer.render(&widget.id, width, &context))
    }

    /// Saves the current layout and slots.
    ///
    /// # Errors
    ///
    /// [`SaveError::NoStore`] without a gateway, otherwise as
    /// [`PersistenceGateway::save`].
    pub fn save(&self) -> Result<SaveReceipt, SaveError> {
        let gateway = self.persistence.as_ref().ok_or(SaveError::NoStore)?;
        gateway.save(&self.template, &self.slots.snapshot())
    }

    /// Restores the saved snapshot if its signature matches the live layout.
    ///
    /// Returns the number of occupied slots after restoring. Groups and
    /// selections of widgets no longer placed are dropped. On any error the
    /// slots are left as they were.
    ///
    /// # Errors
    ///
    /// [`LoadError`]; [`LoadError::NotFound`] also when no gateway is attached.
    pub fn restore(&mut self) -> Result<usize, LoadError> {
        let gateway = self.persistence.as_ref().ok_or(LoadError::NotFound)?;
        let widgets = gateway.load(self.signature())?;
        let expected = self.slots.len();
        let found = widgets.len();
        self.slots
            .restore(widgets)
            .map_err(|_| LoadError::ShapeMismatch {
                expected: self.signature(),
                found: GeometrySignature {
                    slot_count: found,
                    ..self.signature()
                },
            })?;
        self.prune_sync_state();
        tracing::info!(occupied = self.slots.occupied(), slots = expected, "saved layout restored");
        Ok(self.slots.occupied())
    }

    /// Reacts to one external change.
    ///
    /// A snapshot change re-runs [`WorkspaceSession::restore`]; a color or
    /// selection change reloads that map wholesale. Returns `true` if the
    /// session changed.
    pub fn on_external_change(&mut self, change: &ExternalChange) -> bool {
        let Some(gateway) = self.persistence.as_ref() else {
            return false;
        };
        match change {
            ExternalChange::Snapshot => match self.restore() {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "external layout change not applied");
                    false
                }
            },
            ExternalChange::Colors => match gateway.load_colors() {
                Ok(colors) => {
                    self.sync.replace_colors(colors);
                    self.prune_sync_state();
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "external color change not applied");
                    false
                }
            },
            ExternalChange::Selections => match gateway.load_selections() {
                Ok(selections) => {
                    self.sync.replace_selections(selections);
                    self.prune_sync_state();
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "external selection change not applied");
                    false
                }
            },
            ExternalChange::Other(_) => false,
        }
    }

    /// Polls the gateway and applies every external change.
    ///
    /// Returns the changes that altered the session.
    pub fn poll_external_changes(&mut self) -> Vec<ExternalChange> {
        let changes = match self.persistence.as_ref().map(PersistenceGateway::poll_changes) {
            Some(Ok(changes)) => changes,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "could not poll for external changes");
                return Vec::new();
            }
            None => return Vec::new(),
        };
        changes
            .into_iter()
            .filter(|change| self.on_external_change(change))
            .collect()
    }

    /// Opens the widget in slot `index` as a standalone view.
    ///
    /// Returns the URL that was opened.
    ///
    /// # Errors
    ///
    /// [`DetachError::EmptySlot`] for an empty slot, or
    /// [`DetachError::Blocked`] if the launcher failed.
    pub fn detach(
        &self,
        index: usize,
        launcher: &dyn Launcher,
        base_url: &str,
        size: WindowSize,
    ) -> Result<String, DetachError> {
        let widget = self.slots.get(index).ok_or(DetachError::EmptySlot(index))?;
        let url = DetachRequest::new(widget.kind, &widget.id).url(base_url);
        if let Err(e) = launcher.open(&url, size) {
            tracing::warn!(%url, error = %e, "detach failed");
            return Err(e);
        }
        Ok(url)
    }

    /// Ends the session, handing back the gateway for the next one.
    pub fn reset(self) -> Option<PersistenceGateway> {
        tracing::info!(
            layout = self.template.id.as_deref().unwrap_or("<anonymous>"),
            "workspace closed"
        );
        self.persistence
    }

    fn occupant_id(&self, index: usize) -> Result<String, SlotError> {
        if index >= self.slots.len() {
            return Err(SlotError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        self.slots
            .get(index)
            .map(|w| w.id.clone())
            .ok_or(SlotError::SlotEmpty { index })
    }

    /// Keeps sync entries only for widgets placed in a slot.
    fn prune_sync_state(&mut self) {
        let slots = &self.slots;
        self.sync
            .retain_widgets(|id| slots.position_of(id).is_some());
    }

    fn persist_sync_state(&self) {
        let Some(gateway) = self.persistence.as_ref() else {
            return;
        };
        if let Err(e) = gateway.save_colors(self.sync.colors()) {
            tracing::warn!(error = %e, "color groups not persisted");
        }
        if let Err(e) = gateway.save_selections(self.sync.selections()) {
            tracing::warn!(error = %e, "selections not persisted");
        }
    }
}
