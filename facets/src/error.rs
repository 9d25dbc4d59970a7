use bazaar_shared::EnvelopeError;
use thiserror::Error;

/// Why a list or mutation request produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The backend answered with a failure message meant for the user.
    #[error("{0}")]
    Application(String),

    #[error("not authenticated")]
    Unauthorized,

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Text to show in the page's error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Failed to load. Please check your connection and try again.".into(),
            Self::Timeout(_) => "The server took too long to respond. Please try again.".into(),
            Self::Application(message) => message.clone(),
            Self::Unauthorized => "Your session has expired. Please log in again.".into(),
            Self::Decode(_) => "Received an unexpected response from the server.".into(),
        }
    }

    /// Whether re-issuing the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Decode(_))
    }
}

impl From<EnvelopeError> for FetchError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected(message) => Self::Application(message),
            EnvelopeError::Malformed(reason) => Self::Decode(reason),
            EnvelopeError::Decode(e) => Self::Decode(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_messages_are_shown_verbatim() {
        let err = FetchError::Application("Listing not found".into());
        assert_eq!(err.user_message(), "Listing not found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_failures_get_generic_text() {
        let err = FetchError::Network("TypeError: Failed to fetch".into());
        assert!(!err.user_message().contains("TypeError"));
        assert!(err.is_retryable());
        assert!(FetchError::Timeout(15_000).is_retryable());
    }

    #[test]
    fn envelope_rejections_become_application_errors() {
        let err: FetchError = EnvelopeError::Rejected("Forbidden".into()).into();
        assert_eq!(err, FetchError::Application("Forbidden".into()));

        let err: FetchError = EnvelopeError::Malformed("missing `data`".into()).into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
