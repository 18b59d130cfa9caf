//! Application layer - the transit normalization core
//!
//! Contains the status taxonomies, result types, the pagination context
//! protocol, response triage and the provider port every backend adapter
//! implements.

pub mod error;
pub mod pagination;
pub mod ports;
pub mod results;
pub mod services;

pub use error::ProviderError;
pub use pagination::{ContextToken, DepartureWindow, TripsContext};
pub use ports::*;
pub use results::*;
pub use services::*;
