//! HAFAS backend adapter for transit-normalize
//!
//! Implements the [`TransitProvider`](application::TransitProvider) port
//! against a [hafas-rest-api](https://github.com/public-transport/hafas-rest-api)
//! deployment (by default [v6.db.transport.rest](https://v6.db.transport.rest),
//! covering Deutsche Bahn and most German regional networks).
//!
//! # Architecture
//!
//! [`HafasProvider`] owns one HTTP client. Every response body runs through
//! [`ResponseTriage`](application::ResponseTriage) before JSON parsing, raw
//! records are mapped into the domain model in `models`, and trip pagination
//! state travels inside the opaque context token.
//!
//! # Example
//!
//! ```rust,ignore
//! use application::{TransitProvider, TripsQuery};
//! use domain::Location;
//! use integration_hafas::{HafasConfig, HafasProvider};
//!
//! let provider = HafasProvider::new(&HafasConfig::default())?;
//!
//! let result = provider
//!     .query_trips(&TripsQuery::departing(
//!         Location::station("8000191"), // Karlsruhe Hbf
//!         Location::any("Heidelberg Hbf"),
//!         chrono::Utc::now(),
//!     ))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;
mod token;

pub use client::{HafasProvider, PROVIDER_NAME};
pub use config::HafasConfig;
pub use error::HafasError;
