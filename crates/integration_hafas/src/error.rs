//! HAFAS adapter error types

use application::{ProviderError, ResponseClass, TripsStatus};
use thiserror::Error;

/// Errors that can occur while talking to a HAFAS backend
#[derive(Debug, Error)]
pub enum HafasError {
    /// Connection to the backend failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// HTTP request failed without a structured error body
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the backend)
        retry_after_secs: Option<u64>,
    },

    /// Structured error reported by the backend
    #[error("Backend error {code} ({}): {message}", .hafas_code.as_deref().unwrap_or("-"))]
    Backend {
        /// hafas-client error code (e.g. NOT_FOUND, INVALID_REQUEST)
        code: String,
        /// Raw HAFAS code (e.g. H890, LOCATION)
        hafas_code: Option<String>,
        /// Backend message
        message: String,
    },

    /// The body was a redirect, expired-session or internal-error page
    #[error("Non-structured response: {0}")]
    Triage(ResponseClass),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl HafasError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout { .. }
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded { .. }
                | Self::Triage(ResponseClass::SessionExpired | ResponseClass::InternalError)
        )
    }

    /// The backend said the requested entity does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Backend {
                code, hafas_code, ..
            } => code == "NOT_FOUND" || hafas_code.as_deref() == Some("LOCATION"),
            _ => false,
        }
    }

    /// Business status for a trip query, when the error has one
    ///
    /// Errors without one surface as SERVICE_DOWN.
    #[must_use]
    pub fn trips_status(&self) -> Option<TripsStatus> {
        let Self::Backend { hafas_code, .. } = self else {
            return None;
        };
        match hafas_code.as_deref()? {
            "H890" | "H891" | "H892" | "H9240" | "H9220" => Some(TripsStatus::NoTrips),
            "H9380" | "H895" => Some(TripsStatus::TooClose),
            "H9360" => Some(TripsStatus::InvalidDate),
            "LOCATION" => Some(TripsStatus::UnknownLocation),
            _ => None,
        }
    }
}

impl From<HafasError> for ProviderError {
    fn from(err: HafasError) -> Self {
        match err {
            HafasError::Timeout { .. } => Self::timeout(err.to_string()),
            HafasError::ConnectionFailed(_)
            | HafasError::RequestFailed(_)
            | HafasError::RateLimitExceeded { .. }
            | HafasError::Triage(_) => Self::transport(err.to_string()),
            HafasError::ParseError(_) | HafasError::Backend { .. } => {
                Self::UnexpectedResponse(err.to_string())
            },
            HafasError::ConfigurationError(message) => Self::Precondition(message),
        }
    }
}
