//! gridboard library
//!
//! Core of a grid-based widget workspace: a catalog of grid layouts, a
//! fixed-size store of widget slots sized by the active layout, drag-based
//! reordering, color groups that share a selected symbol, and persistence
//! of the whole arrangement to a local key-value store with an optional
//! remote mirror.
//!
//! The usual entry point is [`WorkspaceSession`]:
//!
//! ```
//! use gridboard::{LayoutCatalog, WidgetKind, WorkspaceSession};
//!
//! let template = LayoutCatalog::builtin().get("1x2").cloned().unwrap();
//! let mut session = WorkspaceSession::open(template).unwrap();
//! assert_eq!(session.add_widget(0, WidgetKind::Chart), Ok("chart-0".to_string()));
//! assert_eq!(session.slots().occupied(), 1);
//! ```

/// Configuration file schema, loading and XDG path resolution.
pub mod config;

/// Pointer-gesture driven slot reordering.
pub mod drag;

/// Grid layout templates, the builtin catalog and geometry computation.
pub mod layout;

/// Tracing subscriber setup for the `gbd` binary.
pub mod logging;

/// Local snapshot persistence and remote mirroring.
pub mod persistence;

/// Fixed-size widget slot storage.
pub mod slots;

/// Color groups and shared symbol selection.
pub mod sync;

/// Widget kinds, renderers and standalone views.
pub mod widgets;

/// One live workspace session tying the other modules together.
pub mod workspace;

pub use drag::{DragEvent, DragOutcome, DragReorderController, DragState};
pub use layout::{
    ConfigurationError, GeometrySignature, LayoutCatalog, LayoutGridEngine, LayoutPicker,
    LayoutTemplate, SlotGeometry,
};
pub use persistence::{
    ExternalChange, LoadError, MirrorOutcome, PersistenceGateway, SaveError, SaveReceipt,
};
pub use slots::{SlotContent, SlotError, WidgetSlotStore};
pub use sync::{ColorId, SynchronizationStore};
pub use widgets::{WidgetKind, WidgetRef};
pub use workspace::WorkspaceSession;
