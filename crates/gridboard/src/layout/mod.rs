//! Layout templates and grid geometry.
//!
//! A template comes from the [`LayoutCatalog`] (picked through a
//! [`LayoutPicker`]), and [`LayoutGridEngine`] turns it into the ordered slot
//! geometry that fixes the workspace's slot count.

mod engine;
mod presets;
mod template;

pub use engine::{ConfigurationError, LayoutGridEngine, MAX_SLOTS};
pub use presets::{LayoutCatalog, LayoutPicker};
pub use template::{GeometrySignature, LayoutTemplate, SlotGeometry};
