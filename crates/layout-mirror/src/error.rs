//! Error types for the layout-mirror crate.

use thiserror::Error;

/// Errors from a mirror push.
///
/// None of these are fatal to the caller: the local copy of a snapshot is
/// the source of truth and the mirror is advisory.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, DNS or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("Mirror request timed out")]
    Timeout,

    /// The endpoint refused the snapshot (4xx other than 429).
    #[error("Mirror rejected the snapshot with status {0}")]
    Rejected(u16),

    /// The endpoint asked us to slow down.
    #[error("Mirror rate limited{}", retry_after.as_ref().map(|r| format!(", retry after {r}")).unwrap_or_default())]
    RateLimited {
        /// Value of the `Retry-After` header, if present.
        retry_after: Option<String>,
    },

    /// The endpoint failed (5xx).
    #[error("Mirror server error: {0}")]
    Server(u16),

    /// Any other non-success status.
    #[error("Unexpected mirror status: {0}")]
    Unexpected(u16),
}

impl MirrorError {
    /// Whether a later push of a newer snapshot could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MirrorError::Network(_)
                | MirrorError::Timeout
                | MirrorError::RateLimited { .. }
                | MirrorError::Server(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_display_with_retry_after() {
        let err = MirrorError::RateLimited {
            retry_after: Some("30".to_string()),
        };
        assert_eq!(err.to_string(), "Mirror rate limited, retry after 30");
    }

    #[test]
    fn test_rate_limited_display_without_retry_after() {
        let err = MirrorError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Mirror rate limited");
    }

    #[test]
    fn test_transient_classification() {
        assert!(MirrorError::Timeout.is_transient());
        assert!(MirrorError::Server(503).is_transient());
        assert!(!MirrorError::Rejected(400).is_transient());
        assert!(!MirrorError::Client("tls".to_string()).is_transient());
    }
}
