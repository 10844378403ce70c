//! Error types for switchboard.

use thiserror::Error;

use crate::connection::CapabilityKind;

/// Primary error type for all switchboard operations.
#[derive(Error, Debug)]
pub enum SwitchboardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The name is absent from an active allow-list.
    #[error("'{name}' is not exposed by server")]
    NotExposed { name: String },

    /// The name is present in a deny-list and no allow-list is active.
    #[error("'{name}' is hidden")]
    Hidden { name: String },

    /// No routing entry for the requested name and kind.
    #[error("no {kind} named '{name}' is registered")]
    NotFound { kind: CapabilityKind, name: String },

    /// Wrapped failure from a backend connection during discovery or call.
    #[error("backend error from '{server}': {message}")]
    Backend {
        server: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SwitchboardError {
    /// Create a backend error without an underlying source.
    pub fn backend(server: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            server: server.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error was raised by the exposure policy before any
    /// call was forwarded.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::NotExposed { .. } | Self::Hidden { .. } | Self::NotFound { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SwitchboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_covers_policy_variants() {
        assert!(SwitchboardError::NotExposed { name: "t".into() }.is_access_denied());
        assert!(SwitchboardError::Hidden { name: "t".into() }.is_access_denied());
        assert!(SwitchboardError::NotFound {
            kind: CapabilityKind::Tool,
            name: "t".into()
        }
        .is_access_denied());
        assert!(!SwitchboardError::backend("srv", "boom").is_access_denied());
    }

    #[test]
    fn backend_error_displays_server_context() {
        let err = SwitchboardError::backend("github", "connection reset");
        assert_eq!(
            err.to_string(),
            "backend error from 'github': connection reset"
        );
    }
}
