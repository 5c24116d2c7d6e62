//! Layout catalog listing.

use gridboard::{LayoutCatalog, LayoutGridEngine};
use std::process::ExitCode;

/// Prints every catalog entry with its 1-based number, optionally with a preview.
pub(crate) fn run_layouts_command(preview: bool) -> ExitCode {
    let catalog = LayoutCatalog::builtin();
    for (n, template) in catalog.templates().iter().enumerate() {
        let id = template.id.as_deref().unwrap_or("-");
        match LayoutGridEngine::signature(template) {
            Ok(signature) => println!(
                "{:>2}  {:<16} {:<16} {}",
                n + 1,
                id,
                template.display_name(),
                signature
            ),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
        if preview {
            if let Ok(rows) = LayoutGridEngine::preview(template) {
                for row in rows {
                    println!("      {row}");
                }
            }
        }
    }
    ExitCode::SUCCESS
}
