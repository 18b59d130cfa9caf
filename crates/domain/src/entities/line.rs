//! Transit line entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Product, Style};

/// A transit line or route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Line {
    /// Backend line identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operating network or agency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Product category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Short label shown on vehicles (e.g. "S5", "U2", "ICE 1601")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Long name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display colors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// Service message attached to the line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Line {
    /// Create a line with a product and label
    #[must_use]
    pub fn new(product: Option<Product>, label: impl Into<String>) -> Self {
        Self {
            product,
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Set the backend id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the operating network
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Set the long name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the display style
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("?");
        match self.product {
            Some(product) => write!(f, "{label} ({product})"),
            None => write!(f, "{label}"),
        }
    }
}
