use thiserror::Error;

/// Errors that abort a single polling cycle.
///
/// Every variant is handled the same way by the coordinator: the cycle is
/// skipped, tracker state is left untouched and the last good snapshot keeps
/// being served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("Transport error ({status}): {message}")]
    Transport { status: u16, message: String },

    /// The envelope carried a non-zero application code.
    #[error("Upstream error (code {code}): {message}")]
    Upstream { code: i64, message: String },

    /// No response was received (connection refused, timeout, etc.).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The body was not the expected JSON envelope.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The HTTP client could not be constructed.
    #[error("Client error: {message}")]
    Client { message: String },
}

impl FetchError {
    /// Returns true if the failure was reported by the upstream service itself
    /// rather than by the transport.
    pub fn is_upstream(&self) -> bool {
        matches!(self, FetchError::Upstream { .. })
    }

    /// HTTP status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Upstream {
            code: -400,
            message: "请求错误".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream error (code -400): 请求错误");

        let err = FetchError::Transport {
            status: 500,
            message: "internal".to_string(),
        };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_fetch_error_classification() {
        assert!(FetchError::Upstream {
            code: -1,
            message: "err".to_string()
        }
        .is_upstream());
        assert!(!FetchError::Parse {
            message: "eof".to_string()
        }
        .is_upstream());
        assert_eq!(
            FetchError::Transport {
                status: 412,
                message: String::new()
            }
            .status(),
            Some(412)
        );
        assert_eq!(
            FetchError::Network {
                message: "timeout".to_string()
            }
            .status(),
            None
        );
    }
}
