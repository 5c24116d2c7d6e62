//! Widget kinds and the renderer registry.
//!
//! A slot holds a [`WidgetRef`]: an id plus one of four [`WidgetKind`]s.
//! Rendering is resolved through the [`WidgetRegistry`], which maps each kind
//! to a factory for a [`WidgetRenderer`]. Adding a kind means adding one
//! variant and one registry entry.
//!
//! # Example
//!
//! ```
//! use gridboard::widgets::{RenderContext, WidgetKind, WidgetRegistry};
//!
//! let registry = WidgetRegistry::new();
//! let renderer = registry.create(WidgetKind::Chart).expect("chart registered");
//! let line = renderer.render("chart-0", 40, &RenderContext::new().with_symbol("MSFT"));
//! assert_eq!(line.to_string(), "[Chart] chart-0 · MSFT");
//! ```

pub mod context;
pub mod detach;

pub use context::RenderContext;
pub use detach::{
    CommandLauncher, DetachError, DetachRequest, Launcher, WindowSize, POPUP_BLOCKED_WARNING,
};

use ratatui::{
    style::{Color, Style},
    text::Line,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The widget kinds a slot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Price chart.
    Chart,
    /// Stock table.
    Table,
    /// Stock details.
    Details,
    /// Market depth.
    Depth,
}

impl WidgetKind {
    /// Every kind, in add-menu order.
    pub const ALL: [WidgetKind; 4] = [Self::Chart, Self::Table, Self::Details, Self::Depth];

    /// Wire name used in snapshots and detach URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Table => "table",
            Self::Details => "details",
            Self::Depth => "depth",
        }
    }

    /// Name shown in menus and widget headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Chart => "Chart",
            Self::Table => "Stock Table",
            Self::Details => "Stock Details",
            Self::Depth => "Market Depth",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown widget kind '{s}'"))
    }
}

/// A placed widget: its id and kind.
///
/// Serialized as `{"id": "...", "type": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetRef {
    /// Widget id, unique among occupied slots.
    pub id: String,
    /// Widget kind.
    #[serde(rename = "type")]
    pub kind: WidgetKind,
}

impl WidgetRef {
    /// Ref with the deterministic id `"{kind}-{index}"`.
    pub fn new(kind: WidgetKind, index: usize) -> Self {
        Self {
            id: format!("{kind}-{index}"),
            kind,
        }
    }
}

/// Renders one widget instance as a single line.
pub trait WidgetRenderer: Send + Sync {
    /// Render `widget_id` within `width` columns.
    fn render(&self, widget_id: &str, width: u16, context: &RenderContext) -> Line<'static>;

    /// Kind this renderer draws.
    fn kind(&self) -> WidgetKind;
}

/// Factory function type for creating renderers.
pub type RendererFactory = fn() -> Box<dyn WidgetRenderer>;

/// Static mapping from kind to renderer factory.
pub struct WidgetRegistry {
    factories: BTreeMap<WidgetKind, RendererFactory>,
}

impl WidgetRegistry {
    /// Registry with a placeholder renderer for every kind.
    pub fn new() -> Self {
        let mut reg = Self {
            factories: BTreeMap::new(),
        };
        for kind in WidgetKind::ALL {
            reg.factories.insert(kind, placeholder_factory(kind));
        }
        reg
    }

    /// Register a factory for `kind`, replacing any existing one.
    pub fn register(&mut self, kind: WidgetKind, factory: RendererFactory) {
        self.factories.insert(kind, factory);
    }

    /// Create a renderer for `kind`.
    pub fn create(&self, kind: WidgetKind) -> Option<Box<dyn WidgetRenderer>> {
        self.factories.get(&kind).map(|f| f())
    }

    /// Registered kinds, in add-menu order.
    pub fn kinds(&self) -> Vec<WidgetKind> {
        self.factories.keys().copied().collect()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Renders `[Display Name] id · symbol`, tinted with the group color.
struct PlaceholderRenderer {
    kind: WidgetKind,
}

impl WidgetRenderer for PlaceholderRenderer {
    fn render(&self, widget_id: &str, width: u16, context: &RenderContext) -> Line<'static> {
        let mut text = format!("[{}] {}", self.kind.display_name(), widget_id);
        if let Some(symbol) = context.symbol {
            text.push_str(" · ");
            text.push_str(symbol);
        }
        let text = truncate(text, width as usize);

        let style = context
            .color
            .and_then(|c| Color::from_str(c.swatch().color_value).ok())
            .map(|c| Style::default().fg(c))
            .unwrap_or_default();
        Line::styled(text, style)
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }
}

/// Cuts `text` to `width` characters, ending in `…` when shortened.
fn truncate(text: String, width: usize) -> String {
    if text.chars().count() <= width {
        return text;
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

fn placeholder_factory(kind: WidgetKind) -> RendererFactory {
    match kind {
        WidgetKind::Chart => || {
            Box::new(PlaceholderRenderer {
                kind: WidgetKind::Chart,
            })
        },
        WidgetKind::Table => || {
            Box::new(PlaceholderRenderer {
                kind: WidgetKind::Table,
            })
        },
        WidgetKind::Details => || {
            Box::new(PlaceholderRenderer {
                kind: WidgetKind::Details,
            })
        },
        WidgetKind::Depth => || {
            Box::new(PlaceholderRenderer {
                kind: WidgetKind::Depth,
            })
        },
    }
}
