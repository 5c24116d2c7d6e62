//! Layout template data types.
//!
//! A [`LayoutTemplate`] is geometry-only data: a uniform `rows x cols` grid,
//! or an explicit ordered list of [`SlotGeometry`] spans. The order of the
//! span list is the slot order; slot indices are positions in that list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement of one slot in the grid.
///
/// Purely presentational: the slot store never looks at geometry, only at
/// how many slots a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGeometry {
    /// Zero-based top row.
    pub row: u32,
    /// Zero-based left column.
    pub col: u32,
    /// Number of rows covered.
    pub row_span: u32,
    /// Number of columns covered.
    pub col_span: u32,
}

impl SlotGeometry {
    /// Geometry covering `row_span x col_span` cells from `(row, col)`.
    pub const fn new(row: u32, col: u32, row_span: u32, col_span: u32) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// Single cell at `(row, col)`.
    pub const fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, 1, 1)
    }
}

/// Declarative grid description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    /// Catalog identifier, absent for ad-hoc templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Explicit slot list; when present it alone decides slot count and order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<SlotGeometry>>,
}

impl LayoutTemplate {
    /// Uniform `rows x cols` template.
    pub fn uniform(id: &str, rows: u32, cols: u32) -> Self {
        Self {
            id: Some(id.to_string()),
            rows,
            cols,
            spans: None,
        }
    }

    /// Template with an explicit, ordered span list.
    pub fn spanned(id: &str, rows: u32, cols: u32, spans: &[SlotGeometry]) -> Self {
        Self {
            id: Some(id.to_string()),
            rows,
            cols,
            spans: Some(spans.to_vec()),
        }
    }

    /// Number of slots this template produces.
    pub fn slot_count(&self) -> usize {
        match &self.spans {
            Some(spans) => spans.len(),
            None => self.rows as usize * self.cols as usize,
        }
    }

    /// Geometry signature used to match persisted snapshots.
    pub fn signature(&self) -> GeometrySignature {
        GeometrySignature {
            rows: self.rows,
            cols: self.cols,
            slot_count: self.slot_count(),
        }
    }

    /// Title shown in the layout picker and workspace header.
    ///
    /// Span layouts show their id with dashes as spaces, everything else is
    /// shown as `"{rows}x{cols} Grid"`.
    pub fn display_name(&self) -> String {
        match &self.id {
            Some(id) if id.contains("span") => id.replace('-', " "),
            _ => format!("{}x{} Grid", self.rows, self.cols),
        }
    }
}

/// `(rows, cols, slot_count)` tuple compared before restoring a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometrySignature {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Number of slots.
    pub slot_count: usize,
}

impl fmt::Display for GeometrySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({} slots)", self.rows, self.cols, self.slot_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_slot_count() {
        assert_eq!(LayoutTemplate::uniform("2x3", 2, 3).slot_count(), 6);
    }

    #[test]
    fn test_spanned_slot_count_ignores_grid_size() {
        let t = LayoutTemplate::spanned(
            "2col-span-right",
            2,
            2,
            &[
                SlotGeometry::cell(0, 0),
                SlotGeometry::cell(1, 0),
                SlotGeometry::new(0, 1, 2, 1),
            ],
        );
        assert_eq!(t.slot_count(), 3);
        assert_eq!(
            t.signature(),
            GeometrySignature {
                rows: 2,
                cols: 2,
                slot_count: 3
            }
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(LayoutTemplate::uniform("2x2", 2, 2).display_name(), "2x2 Grid");
        let spanned = LayoutTemplate::spanned("2col-span-top", 2, 2, &[SlotGeometry::cell(0, 0)]);
        assert_eq!(spanned.display_name(), "2col span top");
        let complex = LayoutTemplate::spanned("2X3-complex", 2, 3, &[SlotGeometry::cell(0, 0)]);
        assert_eq!(complex.display_name(), "2x3 Grid");
    }

    #[test]
    fn test_geometry_serializes_camel_case() {
        let json = serde_json::to_value(SlotGeometry::new(0, 1, 2, 1)).expect("serialize failed");
        assert_eq!(
            json,
            serde_json::json!({"row": 0, "col": 1, "rowSpan": 2, "colSpan": 1})
        );
    }

    #[test]
    fn test_uniform_template_omits_spans_in_json() {
        let json = serde_json::to_value(LayoutTemplate::uniform("1x2", 1, 2))
            .expect("serialize failed");
        assert_eq!(json, serde_json::json!({"id": "1x2", "rows": 1, "cols": 2}));
    }

    #[test]
    fn test_template_without_id_parses() {
        let t: LayoutTemplate =
            serde_json::from_str(r#"{"rows":3,"cols":2}"#).expect("parse failed");
        assert_eq!(t.id, None);
        assert_eq!(t.slot_count(), 6);
    }

    #[test]
    fn test_signature_display() {
        let sig = LayoutTemplate::uniform("2x2", 2, 2).signature();
        assert_eq!(sig.to_string(), "2x2 (4 slots)");
    }
}
