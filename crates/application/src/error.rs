//! Caller-facing provider errors
//!
//! Business outcomes (AMBIGUOUS, NO_TRIPS, INVALID_STATION, ...) are statuses,
//! not errors. What remains is a small set of failure kinds shared by every
//! adapter.

use domain::DomainError;
use thiserror::Error;

/// Errors a transit provider can surface to callers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure, timeout or backend outage
    #[error("Transport failure: {message}")]
    Transport {
        /// What went wrong
        message: String,
        /// Whether the request timed out
        timed_out: bool,
    },

    /// The backend answered with something that could not be interpreted
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The call was rejected locally without contacting the backend
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// An entity could not be constructed from caller input
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ProviderError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Check if this error is retryable
    ///
    /// Only transport failures are; precondition violations are programming
    /// errors and unexpected responses will not change on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether the call was rejected locally
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_) | Self::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(ProviderError::transport("connection reset").is_retryable());
        assert!(ProviderError::timeout("30s").is_retryable());
        assert!(!ProviderError::UnexpectedResponse("html".into()).is_retryable());
        assert!(!ProviderError::precondition("no later trips").is_retryable());
        assert!(!ProviderError::from(DomainError::EmptyTrip).is_retryable());
    }

    #[test]
    fn domain_errors_count_as_precondition_violations() {
        let err = ProviderError::from(DomainError::InvalidCoordinate("lat 91".into()));
        assert!(err.is_precondition());
        assert!(err.to_string().contains("lat 91"));
    }

    #[test]
    fn timeout_is_flagged() {
        let ProviderError::Transport { timed_out, .. } = ProviderError::timeout("slow") else {
            panic!("expected transport error");
        };
        assert!(timed_out);
    }
}
