//! Application services - backend-agnostic helpers shared by adapters and callers

mod response_triage;
mod trip_pager;

pub use response_triage::{
    DEFAULT_INTERNAL_ERROR_MARKERS, DEFAULT_SESSION_EXPIRED_MARKERS, ResponseClass,
    ResponseTriage,
};
pub use trip_pager::TripPager;
