use std::time::Duration;

use reqwest::{Client, Url};

use siteline_core::{Coordinate, Place};

use crate::error::MapsError;
use crate::types::{GeocodeResponse, NearbySearchResponse, PlaceDetails, PlaceDetailsResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Fields requested on place-detail lookups. Keeping the list explicit keeps
/// the per-call billing tier predictable.
const DETAIL_FIELDS: &str =
    "name,formatted_address,website,formatted_phone_number,rating,user_ratings_total,price_level";

/// Client for the mapping provider's REST API.
///
/// Manages the HTTP client, API key, and base URL. Use [`MapsClient::new`]
/// for production or [`MapsClient::with_base_url`] to point at a mock server
/// in tests.
pub struct MapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl MapsClient {
    /// Creates a new client pointed at the production mapping API.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, MapsError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`MapsError::ApiError`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("siteline/0.1 (location-intelligence)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends endpoint paths instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| MapsError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a free-text address to a coordinate via `geocode/json`.
    ///
    /// Only the first geocoding result is used. No retries: geocoding is the
    /// one load-bearing upstream, and a failure here fails the caller.
    ///
    /// # Errors
    ///
    /// - [`MapsError::NoResults`] if the provider finds nothing for the address.
    /// - [`MapsError::ApiError`] on a non-OK envelope status.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, MapsError> {
        let url = self.endpoint_url("geocode/json", &[("address", address)])?;
        let body = self.request_json(&url).await?;

        let envelope: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: format!("geocode({address})"),
                source: e,
            })?;

        check_status(&envelope.status, envelope.error_message.as_deref())?;

        let first = envelope.results.into_iter().next().ok_or(MapsError::NoResults)?;
        Ok(Coordinate {
            lat: first.geometry.location.lat,
            lng: first.geometry.location.lng,
        })
    }

    /// Searches for places of `place_type` within `radius_m` meters of
    /// `center` via `place/nearbysearch/json`.
    ///
    /// Zero results is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// - [`MapsError::ApiError`] on a non-OK envelope status.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn nearby_search(
        &self,
        center: Coordinate,
        radius_m: u32,
        place_type: &str,
    ) -> Result<Vec<Place>, MapsError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();
        let url = self.endpoint_url(
            "place/nearbysearch/json",
            &[
                ("location", &location),
                ("radius", &radius),
                ("type", place_type),
            ],
        )?;
        let body = self.request_json(&url).await?;

        let envelope: NearbySearchResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: format!("nearby_search({location}, r={radius_m}, type={place_type})"),
                source: e,
            })?;

        if envelope.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }
        check_status(&envelope.status, envelope.error_message.as_deref())?;

        Ok(envelope
            .results
            .into_iter()
            .map(crate::types::NearbyPlace::into_place)
            .collect())
    }

    /// Fetches the detail record for one place via `place/details/json`,
    /// restricted to [`DETAIL_FIELDS`].
    ///
    /// # Errors
    ///
    /// - [`MapsError::NoResults`] if the provider has no record for the id.
    /// - [`MapsError::ApiError`] on a non-OK envelope status.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, MapsError> {
        let url = self.endpoint_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body = self.request_json(&url).await?;

        let envelope: PlaceDetailsResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: format!("place_details({place_id})"),
                source: e,
            })?;

        if envelope.status == "ZERO_RESULTS" || envelope.status == "NOT_FOUND" {
            return Err(MapsError::NoResults);
        }
        check_status(&envelope.status, envelope.error_message.as_deref())?;

        envelope.result.ok_or(MapsError::NoResults)
    }

    /// Builds the full request URL for an endpoint path, appending the query
    /// parameters and the API key via [`Url::query_pairs_mut`] so all values
    /// are percent-encoded.
    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, MapsError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| MapsError::ApiError(format!("invalid endpoint path '{path}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] on network failure or a non-2xx status.
    /// Returns [`MapsError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, MapsError> {
        // Log the path only; the full URL carries the API key.
        tracing::debug!(endpoint = url.path(), "maps request");
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Maps a non-OK envelope status to [`MapsError::ApiError`], keeping the
/// provider's error message when present.
fn check_status(status: &str, error_message: Option<&str>) -> Result<(), MapsError> {
    if status == "OK" {
        return Ok(());
    }
    let detail = error_message.map_or_else(String::new, |m| format!(": {m}"));
    Err(MapsError::ApiError(format!("{status}{detail}")))
}
