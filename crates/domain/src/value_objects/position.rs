//! Platform / track position

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform or track label with an optional section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Platform or track name (e.g. "3", "Gleis 11")
    pub name: String,
    /// Platform section (e.g. "A-C")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl Position {
    /// Create a position without a section
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: None,
        }
    }

    /// Set the platform section
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{} {section}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
