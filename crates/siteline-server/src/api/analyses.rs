//! Handlers for creating and fetching analysis reports.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use siteline_analysis::{run_site_analysis, AnalysisError};
use siteline_core::Category;
use siteline_maps::MapsError;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// `POST /api/v1/analyses`: run a fresh analysis.
///
/// Every call mints a new report id; re-running the same address never
/// mutates an existing report. The finished report goes into the in-memory
/// cache and is best-effort persisted: a storage failure is logged, never
/// surfaced, because the caller already holds the result.
pub async fn create_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = payload
        .location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "validation_error", "location is required")
        })?;

    let category: Category = payload
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

    let report = run_site_analysis(
        &state.maps,
        state.genai.as_deref(),
        location,
        category,
        state.options,
    )
    .await
    .map_err(|e| match e {
        AnalysisError::Geocode(MapsError::NoResults) => ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "location could not be geocoded",
        ),
        AnalysisError::Geocode(err) => {
            tracing::error!(error = %err, "geocoding upstream failed");
            ApiError::new(
                req_id.0.clone(),
                "upstream_error",
                "geocoding service unavailable",
            )
        }
    })?;

    let shared = state.cache.insert(report);

    if let Err(e) = siteline_db::insert_analysis(&state.pool, &shared).await {
        tracing::warn!(
            report_id = %shared.id,
            error = %e,
            "failed to persist analysis; serving from memory"
        );
    }

    Ok(Json(ApiResponse {
        data: (*shared).clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/analyses/{id}`: cache first, then the durable store.
///
/// A store read failure is logged and treated as a miss: an unreachable
/// database must produce `not_found`, not an unrelated 500.
pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(report) = state.cache.get(&id) {
        return Ok(Json(ApiResponse {
            data: (*report).clone(),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    match siteline_db::fetch_analysis(&state.pool, &id).await {
        Ok(Some(report)) => Ok(Json(ApiResponse {
            data: report,
            meta: ResponseMeta::new(req_id.0),
        })),
        Ok(None) => Err(ApiError::new(
            req_id.0,
            "not_found",
            "no analysis with that id",
        )),
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "store lookup failed; treating as a miss");
            Err(ApiError::new(
                req_id.0,
                "not_found",
                "no analysis with that id",
            ))
        }
    }
}
