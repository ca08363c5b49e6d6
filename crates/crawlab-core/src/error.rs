// ── Core error types ──
//
// Transport failures pass through untouched: the state layer adds no retry
// and no classification on top of what `crawlab-api` reports. The other
// variants cover failures that originate in this crate.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport (passed through) ───────────────────────────────────
    #[error(transparent)]
    Transport(#[from] crawlab_api::Error),

    // ── Data errors ──────────────────────────────────────────────────
    /// The server answered, but the payload doesn't fit the entity type.
    #[error("Failed to decode {entity} payload: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },

    /// A request payload could not be encoded.
    #[error("Failed to encode request: {message}")]
    Encode { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected: {message}")]
    Rejected { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn decode(entity: &'static str, err: &serde_json::Error) -> Self {
        Self::Decode {
            entity,
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(err: &serde_json::Error) -> Self {
        Self::Encode {
            message: err.to_string(),
        }
    }

    /// The underlying transport error, if this failure came from the transport.
    pub fn as_transport(&self) -> Option<&crawlab_api::Error> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_display_unchanged() {
        let api = crawlab_api::Error::Api {
            status: 500,
            message: "boom".into(),
        };
        let expected = api.to_string();
        let core = CoreError::from(api);
        assert_eq!(core.to_string(), expected);
        assert_eq!(core.as_transport().and_then(crawlab_api::Error::status), Some(500));
    }
}
