//! HTTP client for the mapping provider.
//!
//! Wraps `reqwest` with typed request/response handling for the three
//! endpoints the pipeline consumes: forward geocoding, nearby place search,
//! and place-detail lookup. Every response envelope carries a `status` field;
//! non-OK statuses surface as [`MapsError::ApiError`] except `ZERO_RESULTS`,
//! which is a domain outcome (no coordinate / no places), not a fault.

mod client;
mod error;
mod types;

pub use client::MapsClient;
pub use error::MapsError;
pub use types::PlaceDetails;
