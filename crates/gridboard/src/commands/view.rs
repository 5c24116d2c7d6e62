//! Standalone view of one detached widget.

use gridboard::config::schema::Config;
use gridboard::persistence::DisabledMirror;
use gridboard::widgets::{DetachRequest, RenderContext, WidgetRegistry};
use gridboard::{PersistenceGateway, SynchronizationStore};
use std::process::ExitCode;

/// Renders the widget named by a detach URL.
///
/// The widget's stored symbol and color group are shown when the local
/// store has them. A URL without a known `type` prints "Invalid widget type".
pub(crate) fn run_view_command(config: &Config, url: &str, width: u16) -> ExitCode {
    let request = match DetachRequest::parse(url) {
        Ok(request) => request,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sync = SynchronizationStore::new();
    match super::open_store(config) {
        Ok(store) => {
            let gateway = PersistenceGateway::new(store, Box::new(DisabledMirror::new()));
            if let Ok(colors) = gateway.load_colors() {
                sync.replace_colors(colors);
            }
            if let Ok(selections) = gateway.load_selections() {
                sync.replace_selections(selections);
            }
        }
        Err(e) => tracing::debug!(error = %e, "rendering without stored state"),
    }

    let Some(renderer) = WidgetRegistry::new().create(request.kind) else {
        println!("Invalid widget type");
        return ExitCode::FAILURE;
    };
    let id = request.id.as_deref().unwrap_or(request.kind.as_str());
    let context = RenderContext::for_widget(&sync, id);
    println!("{}", renderer.render(id, width, &context));
    ExitCode::SUCCESS
}
