//! Opening a widget in its own standalone view.
//!
//! A [`DetachRequest`] becomes a URL of the form
//! `{base}/widget?type={kind}&id={id}`. A [`Launcher`] opens that URL; the
//! standalone side reads it back with [`DetachRequest::parse`].

use super::WidgetKind;
use reqwest::Url;
use std::process::Command;
use thiserror::Error;

/// Warning shown when a detached view could not be opened.
pub const POPUP_BLOCKED_WARNING: &str = "Popup blocked! Please allow popups for this website.";

/// Route of the standalone widget view.
const WIDGET_ROUTE: &str = "/widget";

/// Root that relative detach URLs are resolved against.
const RELATIVE_ROOT: &str = "http://localhost/";

/// Errors from detaching or from reading a detach URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetachError {
    /// The launcher could not open the view. Always shown to the user.
    #[error("{POPUP_BLOCKED_WARNING} ({url}: {reason})")]
    Blocked {
        /// URL that failed to open.
        url: String,
        /// Launcher-specific cause.
        reason: String,
    },

    /// URL has no `type` parameter, or an unknown one.
    #[error("Invalid widget type")]
    InvalidWidgetType(Option<String>),

    /// Only placed widgets can be detached.
    #[error("slot {0} holds no widget")]
    EmptySlot(usize),
}

/// Size of the detached view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// What the standalone view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachRequest {
    /// Widget kind.
    pub kind: WidgetKind,
    /// Widget id; the standalone view accepts a missing id.
    pub id: Option<String>,
}

impl DetachRequest {
    /// Request for a placed widget.
    pub fn new(kind: WidgetKind, id: &str) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }

    /// URL under `base` for this request.
    ///
    /// An empty or path-only `base` gives a relative URL.
    pub fn url(&self, base: &str) -> String {
        let route = format!("{}{WIDGET_ROUTE}", base.trim_end_matches('/'));
        let (mut url, relative) = match Url::parse(&route) {
            Ok(url) => (url, false),
            Err(_) => match Url::parse(RELATIVE_ROOT).and_then(|root| root.join(&route)) {
                Ok(url) => (url, true),
                Err(e) => {
                    tracing::warn!(base, error = %e, "unusable detach base url");
                    return route;
                }
            },
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("type", self.kind.as_str());
            if let Some(id) = &self.id {
                query.append_pair("id", id);
            }
        }
        if relative {
            format!("{}?{}", url.path(), url.query().unwrap_or_default())
        } else {
            url.into()
        }
    }

    /// Reads a request back from a detach URL, a relative one, or just its
    /// query string.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::InvalidWidgetType`] when `type` is missing or
    /// not a known kind.
    pub fn parse(url: &str) -> Result<Self, DetachError> {
        let url = resolve(url).ok_or(DetachError::InvalidWidgetType(None))?;

        let mut kind = None;
        let mut id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "type" => kind = Some(value.into_owned()),
                "id" => id = Some(value.into_owned()),
                _ => {}
            }
        }

        let kind = kind.ok_or(DetachError::InvalidWidgetType(None))?;
        let kind = kind
            .parse::<WidgetKind>()
            .map_err(|_| DetachError::InvalidWidgetType(Some(kind.clone())))?;
        Ok(Self {
            kind,
            id: id.filter(|s| !s.is_empty()),
        })
    }
}

/// Absolute form of `url`; a bare query string gets a leading `?`.
fn resolve(url: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(url) {
        return Some(url);
    }
    let root = Url::parse(RELATIVE_ROOT).ok()?;
    if url.contains('?') {
        root.join(url).ok()
    } else {
        root.join(&format!("?{url}")).ok()
    }
}

/// Opens a detach URL as a new view.
pub trait Launcher {
    /// Open `url` with the requested `size`.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::Blocked`] if the view could not be opened.
    fn open(&self, url: &str, size: WindowSize) -> Result<(), DetachError>;
}

/// Launcher that hands the URL to an external opener program.
///
/// The window size is passed to the opener as `GBD_WINDOW_WIDTH` and
/// `GBD_WINDOW_HEIGHT`.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
}

impl CommandLauncher {
    /// Launcher running `program <url>`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The opener program.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Launcher for CommandLauncher {
    fn open(&self, url: &str, size: WindowSize) -> Result<(), DetachError> {
        let blocked = |reason: String| DetachError::Blocked {
            url: url.to_string(),
            reason,
        };
        let status = Command::new(&self.program)
            .arg(url)
            .env("GBD_WINDOW_WIDTH", size.width.to_string())
            .env("GBD_WINDOW_HEIGHT", size.height.to_string())
            .status()
            .map_err(|e| blocked(format!("{}: {e}", self.program)))?;

        if status.success() {
            tracing::debug!(url, program = %self.program, "detached view opened");
            Ok(())
        } else {
            Err(blocked(format!("{} exited with {status}", self.program)))
        }
    }
}
