//! HAFAS adapter configuration

use domain::ProductSet;
use serde::{Deserialize, Serialize};

/// Configuration for a HAFAS backend reached through hafas-rest-api
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HafasConfig {
    /// Base URL of the hafas-rest-api deployment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language for names and remarks
    #[serde(default = "default_language")]
    pub language: String,

    /// Results per request when the query does not say
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Products used when a trip query has no filter
    #[serde(default = "default_products")]
    pub default_products: ProductSet,

    /// Request leg geometry
    #[serde(default = "default_true")]
    pub include_polylines: bool,

    /// Request intermediate stops
    #[serde(default = "default_true")]
    pub include_stopovers: bool,
}

fn default_base_url() -> String {
    "https://v6.db.transport.rest".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("transit-normalize/{}", env!("CARGO_PKG_VERSION"))
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_max_results() -> usize {
    5
}

const fn default_products() -> ProductSet {
    ProductSet::ALL
}

const fn default_true() -> bool {
    true
}

impl Default for HafasConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            language: default_language(),
            max_results: default_max_results(),
            default_products: default_products(),
            include_polylines: true,
            include_stopovers: true,
        }
    }
}

impl HafasConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            max_results: 3,
            ..Default::default()
        }
    }

    /// Configuration pointing at another deployment
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::for_testing()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }

        if self.max_results > 50 {
            return Err("max_results must be 50 or less".to_string());
        }

        if self.default_products.is_empty() {
            return Err("default_products must not be empty".to_string());
        }

        Ok(())
    }
}
