//! Per-widget render context.
//!
//! The [`RenderContext`] carries the synchronization state one widget needs
//! when it renders: the symbol its color group selected and the group itself.
//! Both are borrowed from the session's `SynchronizationStore` for the
//! duration of one render call.

use crate::sync::{ColorId, SynchronizationStore};

/// State passed to a renderer for one widget.
///
/// # Example
///
/// ```
/// use gridboard::widgets::RenderContext;
///
/// let ctx = RenderContext::new().with_symbol("MSFT");
/// assert_eq!(ctx.symbol, Some("MSFT"));
/// assert!(ctx.color.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Symbol selected for this widget, if any.
    pub symbol: Option<&'a str>,

    /// Color group of this widget, if any.
    pub color: Option<ColorId>,
}

impl<'a> RenderContext<'a> {
    /// Context with no symbol and no group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for `widget_id` as currently recorded in `sync`.
    pub fn for_widget(sync: &'a SynchronizationStore, widget_id: &str) -> Self {
        Self {
            symbol: sync.selection_of(widget_id),
            color: sync.color_of(widget_id),
        }
    }

    /// Sets the selected symbol.
    pub fn with_symbol(mut self, symbol: &'a str) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Sets the color group.
    pub fn with_color(mut self, color: ColorId) -> Self {
        self.color = Some(color);
        self
    }
}
