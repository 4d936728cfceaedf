use thiserror::Error;

/// Failures of the outbound chat-completion call.
///
/// Every variant is terminal for its rollout; the dispatcher records the
/// message on the job record and nothing retries.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The API returned a non-success status (401 bad key, 429, 5xx, ...).
    #[error("completion API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Underlying transport failure (DNS, refused connection, timeout).
    #[error("completion request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = LlmError::Api {
            status: 401,
            message: "invalid api key".into(),
        };
        assert_eq!(
            err.to_string(),
            "completion API error (status 401): invalid api key"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlmError>();
    }
}
