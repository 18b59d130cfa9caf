//! Metadata attached to every result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which backend answered, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHeader {
    /// Network or provider identifier
    pub network: String,
    /// Backend product (e.g. "hafas")
    pub server_product: String,
    /// Backend version, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    /// Backend clock, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,
}

impl ResultHeader {
    /// Create a header
    #[must_use]
    pub fn new(network: impl Into<String>, server_product: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            server_product: server_product.into(),
            server_version: None,
            server_time: None,
        }
    }

    /// Set the backend version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    /// Set the backend clock
    #[must_use]
    pub const fn with_server_time(mut self, time: DateTime<Utc>) -> Self {
        self.server_time = Some(time);
        self
    }
}
