//! Continuation state carried in a trips context

use application::{ContextToken, ProviderError, TripsContext};
use serde::{Deserialize, Serialize};

use crate::client::PROVIDER_NAME;

/// Everything needed to page a journey search
///
/// `params` is the resolved request without its reference time; the
/// backend pages relative to the scroll references instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JourneyToken {
    pub params: Vec<(String, String)>,
    pub earlier_ref: Option<String>,
    pub later_ref: Option<String>,
}

impl JourneyToken {
    /// Reference for the requested direction
    pub fn reference(&self, later: bool) -> Option<&str> {
        if later {
            self.later_ref.as_deref()
        } else {
            self.earlier_ref.as_deref()
        }
    }

    /// Token after a page in one direction; the other edge stays put
    #[must_use]
    pub fn advance(self, later: bool, page_earlier: Option<String>, page_later: Option<String>) -> Self {
        if later {
            Self {
                later_ref: page_later,
                ..self
            }
        } else {
            Self {
                earlier_ref: page_earlier,
                ..self
            }
        }
    }

    pub fn to_context(&self) -> Result<TripsContext, ProviderError> {
        Ok(TripsContext::new(
            PROVIDER_NAME,
            self.earlier_ref.is_some(),
            self.later_ref.is_some(),
            ContextToken::encode(self)?,
        ))
    }

    pub fn from_context(context: &TripsContext) -> Result<Self, ProviderError> {
        context.token().decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> JourneyToken {
        JourneyToken {
            params: vec![("from".to_string(), "8000191".to_string())],
            earlier_ref: Some("E1".to_string()),
            later_ref: Some("L1".to_string()),
        }
    }

    #[test]
    fn context_reflects_references() {
        let context = token().to_context().unwrap();
        assert_eq!(context.provider(), PROVIDER_NAME);
        assert!(context.can_query_earlier());
        assert!(context.can_query_later());

        let closed = JourneyToken {
            later_ref: None,
            ..token()
        };
        assert!(!closed.to_context().unwrap().can_query_later());
    }

    #[test]
    fn context_round_trips_token() {
        let context = token().to_context().unwrap();
        assert_eq!(JourneyToken::from_context(&context).unwrap(), token());
    }

    #[test]
    fn advance_moves_one_edge() {
        let later = token().advance(true, Some("E2".to_string()), Some("L2".to_string()));
        assert_eq!(later.earlier_ref.as_deref(), Some("E1"));
        assert_eq!(later.later_ref.as_deref(), Some("L2"));

        let earlier = token().advance(false, None, Some("L2".to_string()));
        assert_eq!(earlier.earlier_ref, None);
        assert_eq!(earlier.later_ref.as_deref(), Some("L1"));
    }

    #[test]
    fn reference_by_direction() {
        assert_eq!(token().reference(true), Some("L1"));
        assert_eq!(token().reference(false), Some("E1"));
    }

    #[test]
    fn foreign_bytes_are_a_precondition_error() {
        let context = TripsContext::new(PROVIDER_NAME, true, true, ContextToken::from_bytes(b"nope".to_vec()));
        assert!(JourneyToken::from_context(&context).unwrap_err().is_precondition());
    }
}
