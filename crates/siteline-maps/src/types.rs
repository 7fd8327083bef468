//! Mapping-provider response types.
//!
//! These model the JSON envelopes of the geocoding, nearby-search, and
//! place-details endpoints. Fields the provider omits for sparse places are
//! `#[serde(default)]`; untyped payloads never leave this crate: nearby
//! results are converted to [`siteline_core::Place`] at the boundary.

use serde::Deserialize;

use siteline_core::{Coordinate, Place};

// ---------------------------------------------------------------------------
// geocode/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// ---------------------------------------------------------------------------
// place/nearbysearch/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}

/// One entry from a nearby search. `vicinity` is the provider's short
/// address form for nearby results (full `formatted_address` only appears on
/// detail lookups).
#[derive(Debug, Deserialize)]
pub(crate) struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl NearbyPlace {
    pub(crate) fn into_place(self) -> Place {
        Place {
            id: self.place_id,
            name: self.name,
            address: self.vicinity,
            coordinate: Coordinate {
                lat: self.geometry.location.lat,
                lng: self.geometry.location.lng,
            },
            rating: self.rating,
            review_count: self.user_ratings_total,
            price_level: self.price_level,
            types: self.types,
        }
    }
}

// ---------------------------------------------------------------------------
// place/details/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// Enriched record from a place-detail lookup. Every field is optional; the
/// provider returns only what was asked for in the `fields` parameter and
/// what it actually knows.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub price_level: Option<u8>,
}
