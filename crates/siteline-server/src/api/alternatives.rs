//! Handler for standalone alternative-site discovery.

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;

use siteline_analysis::find_alternatives;
use siteline_core::{Category, Coordinate};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    category: Option<String>,
    limit: Option<usize>,
}

/// `GET /api/v1/alternatives?lat&lng&category&limit`: score candidate
/// sites around a coordinate without running a full analysis.
pub async fn list_alternatives(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(query): axum::extract::Query<AlternativesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lat = query.lat.filter(|v| v.is_finite() && (-90.0..=90.0).contains(v));
    let lng = query
        .lng
        .filter(|v| v.is_finite() && (-180.0..=180.0).contains(v));
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "lat and lng are required and must be valid coordinates",
        ));
    };

    let category: Category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "validation_error", "category is required")
        })?
        .parse()
        .map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                "category must be one of: cafe, restaurant, hotel, hostel",
            )
        })?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let candidates = find_alternatives(&state.maps, Coordinate { lat, lng }, category, limit).await;

    Ok(Json(ApiResponse {
        data: candidates,
        meta: ResponseMeta::new(req_id.0),
    }))
}
