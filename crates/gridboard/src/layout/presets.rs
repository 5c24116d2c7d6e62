//! Built-in layout catalog and the layout picker.
//!
//! The catalog holds twelve templates: six uniform grids followed by six
//! span layouts. Users pick one by 1-based position or by id.

use super::engine::ConfigurationError;
use super::template::{LayoutTemplate, SlotGeometry};

const fn g(row: u32, col: u32, row_span: u32, col_span: u32) -> SlotGeometry {
    SlotGeometry::new(row, col, row_span, col_span)
}

/// Static set of available layout templates.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    templates: Vec<LayoutTemplate>,
}

impl LayoutCatalog {
    /// Catalog with the built-in templates.
    pub fn builtin() -> Self {
        let templates = vec![
            LayoutTemplate::uniform("1x1", 1, 1),
            LayoutTemplate::uniform("1x2", 1, 2),
            LayoutTemplate::uniform("2x1", 2, 1),
            LayoutTemplate::uniform("2x2", 2, 2),
            LayoutTemplate::uniform("2x3", 2, 3),
            LayoutTemplate::uniform("3x2", 3, 2),
            LayoutTemplate::spanned(
                "2col-span-right",
                2,
                2,
                &[g(0, 0, 1, 1), g(1, 0, 1, 1), g(0, 1, 2, 1)],
            ),
            LayoutTemplate::spanned(
                "2col-span-left",
                2,
                2,
                &[g(0, 1, 1, 1), g(1, 1, 1, 1), g(0, 0, 2, 1)],
            ),
            LayoutTemplate::spanned(
                "2col-span-top",
                2,
                2,
                &[g(0, 0, 1, 2), g(1, 1, 1, 1), g(1, 0, 1, 1)],
            ),
            LayoutTemplate::spanned(
                "3 col-span-top",
                2,
                3,
                &[g(0, 0, 1, 1), g(0, 1, 1, 1), g(0, 2, 1, 1), g(1, 0, 1, 3)],
            ),
            LayoutTemplate::spanned(
                "2X3-complex",
                2,
                3,
                &[g(0, 0, 2, 1), g(0, 1, 1, 1), g(0, 2, 1, 1), g(1, 1, 1, 2)],
            ),
            LayoutTemplate::spanned(
                "3x3-complex",
                3,
                3,
                &[
                    g(0, 0, 1, 2),
                    g(0, 2, 2, 1),
                    g(1, 0, 1, 1),
                    g(1, 1, 2, 1),
                    g(2, 0, 1, 1),
                    g(2, 2, 1, 1),
                ],
            ),
        ];
        Self { templates }
    }

    /// All templates in picker order.
    pub fn templates(&self) -> &[LayoutTemplate] {
        &self.templates
    }

    /// Template with the given id.
    pub fn get(&self, id: &str) -> Option<&LayoutTemplate> {
        self.templates
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
    }

    /// Template with the given id, or [`ConfigurationError::UnknownLayout`].
    pub fn require(&self, id: &str) -> Result<&LayoutTemplate, ConfigurationError> {
        self.get(id)
            .ok_or_else(|| ConfigurationError::UnknownLayout(id.to_string()))
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Ids in picker order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().filter_map(|t| t.id.as_deref())
    }
}

impl Default for LayoutCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Tracks which catalog template is active.
///
/// Nothing is active until a template is picked; [`LayoutPicker::clear`]
/// returns to that state when a session is reset.
#[derive(Debug, Clone, Default)]
pub struct LayoutPicker {
    catalog: LayoutCatalog,
    active: Option<usize>,
}

impl LayoutPicker {
    /// Picker over `catalog` with nothing selected.
    pub fn new(catalog: LayoutCatalog) -> Self {
        Self {
            catalog,
            active: None,
        }
    }

    /// Selects the template at the given 1-based index.
    ///
    /// Returns `true` if the selection succeeded, `false` if the index is invalid.
    pub fn select_by_index(&mut self, index: u8) -> bool {
        match (index as usize).checked_sub(1) {
            Some(i) if i < self.catalog.len() => {
                self.active = Some(i);
                true
            }
            _ => false,
        }
    }

    /// Selects the template with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownLayout`] if no template has that id;
    /// the previous selection is kept.
    pub fn select_by_id(&mut self, id: &str) -> Result<&LayoutTemplate, ConfigurationError> {
        let position = self
            .catalog
            .templates()
            .iter()
            .position(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| ConfigurationError::UnknownLayout(id.to_string()))?;
        self.active = Some(position);
        Ok(&self.catalog.templates()[position])
    }

    /// Currently selected template.
    pub fn active(&self) -> Option<&LayoutTemplate> {
        self.active.and_then(|i| self.catalog.templates().get(i))
    }

    /// 1-based index of the active template.
    pub fn active_index(&self) -> Option<u8> {
        self.active.map(|i| (i + 1) as u8)
    }

    /// Drops the selection.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }
}
