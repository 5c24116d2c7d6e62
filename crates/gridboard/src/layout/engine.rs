//! Template to slot geometry translation.

use super::template::{GeometrySignature, LayoutTemplate, SlotGeometry};
use thiserror::Error;

/// A template that cannot be instantiated as a workspace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Grid has zero rows or zero columns.
    #[error("layout '{id}' has invalid dimensions {rows}x{cols}")]
    InvalidDimensions {
        /// Template id, or `<anonymous>`.
        id: String,
        /// Declared rows.
        rows: u32,
        /// Declared columns.
        cols: u32,
    },

    /// Explicit span list is present but empty.
    #[error("layout '{id}' declares an empty span list")]
    EmptySpans {
        /// Template id, or `<anonymous>`.
        id: String,
    },

    /// `rows * cols` exceeds [`MAX_SLOTS`].
    #[error("layout '{id}' has too many slots ({rows}x{cols}, at most {max})", max = MAX_SLOTS)]
    TooManySlots {
        /// Template id, or `<anonymous>`.
        id: String,
        /// Declared rows.
        rows: u32,
        /// Declared columns.
        cols: u32,
    },

    /// Id not present in the catalog.
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),
}

/// Largest slot count a uniform grid may have.
pub const MAX_SLOTS: u32 = 1024;

/// Pure template to geometry computation.
///
/// Overlap and coverage of explicit spans are not checked: malformed spans
/// give malformed geometry, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutGridEngine;

impl LayoutGridEngine {
    /// Ordered slot geometry for `template`.
    ///
    /// Without spans the grid is filled row-major with 1x1 cells. With spans
    /// the list is returned unchanged; its order is the slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if rows or cols is zero, if spans is
    /// present but empty, or if a uniform grid has more than [`MAX_SLOTS`]
    /// cells.
    pub fn compute(template: &LayoutTemplate) -> Result<Vec<SlotGeometry>, ConfigurationError> {
        let id = || {
            template
                .id
                .clone()
                .unwrap_or_else(|| "<anonymous>".to_string())
        };
        if template.rows == 0 || template.cols == 0 {
            return Err(ConfigurationError::InvalidDimensions {
                id: id(),
                rows: template.rows,
                cols: template.cols,
            });
        }
        match &template.spans {
            Some(spans) if spans.is_empty() => Err(ConfigurationError::EmptySpans { id: id() }),
            Some(spans) => Ok(spans.clone()),
            None => {
                let cols = template.cols;
                let count = template
                    .rows
                    .checked_mul(cols)
                    .filter(|count| *count <= MAX_SLOTS)
                    .ok_or_else(|| ConfigurationError::TooManySlots {
                        id: id(),
                        rows: template.rows,
                        cols,
                    })?;
                Ok((0..count)
                    .map(|i| SlotGeometry::cell(i / cols, i % cols))
                    .collect())
            }
        }
    }

    /// Validated signature of `template`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LayoutGridEngine::compute`].
    pub fn signature(template: &LayoutTemplate) -> Result<GeometrySignature, ConfigurationError> {
        let geometry = Self::compute(template)?;
        Ok(GeometrySignature {
            rows: template.rows,
            cols: template.cols,
            slot_count: geometry.len(),
        })
    }

    /// Text diagram of the grid, one string per row.
    ///
    /// Each covered cell shows its slot index (`0`-`9`, then `a`-`z`, then
    /// `#`); uncovered cells show `.`. Later slots overwrite earlier ones where
    /// spans overlap, and cells outside the grid are clipped.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LayoutGridEngine::compute`].
    pub fn preview(template: &LayoutTemplate) -> Result<Vec<String>, ConfigurationError> {
        let geometry = Self::compute(template)?;
        let rows = template.rows as usize;
        let cols = template.cols as usize;
        let mut grid = vec![vec!['.'; cols]; rows];
        for (index, slot) in geometry.iter().enumerate() {
            let label = slot_label(index);
            let row_end = (slot.row + slot.row_span).min(template.rows) as usize;
            let col_end = (slot.col + slot.col_span).min(template.cols) as usize;
            for line in grid.iter_mut().take(row_end).skip(slot.row as usize) {
                for cell in line.iter_mut().take(col_end).skip(slot.col as usize) {
                    *cell = label;
                }
            }
        }
        Ok(grid.into_iter().map(|line| line.into_iter().collect()).collect())
    }
}

fn slot_label(index: usize) -> char {
    match index {
        0..=9 => char::from(b'0' + index as u8),
        10..=35 => char::from(b'a' + (index - 10) as u8),
        _ => '#',
    }
}
