//! Read/write operations for the `analyses` table.
//!
//! Nested report structures travel as JSONB in the exact wire shape, so a
//! stored report deserializes back into [`AnalysisReport`] without a
//! separate row model for each nested type.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use siteline_core::{AnalysisReport, Coordinate, Recommendation};

use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    id: String,
    location: String,
    category: String,
    latitude: f64,
    longitude: f64,
    summary: String,
    strengths: serde_json::Value,
    weaknesses: serde_json::Value,
    opportunities: serde_json::Value,
    threats: serde_json::Value,
    metrics: serde_json::Value,
    recommendation: String,
    key_insights: serde_json::Value,
    action_items: serde_json::Value,
    alternatives: serde_json::Value,
    competitors: serde_json::Value,
    created_at: DateTime<Utc>,
}

fn decode<T: DeserializeOwned>(
    column: &'static str,
    value: serde_json::Value,
) -> Result<T, DbError> {
    serde_json::from_value(value).map_err(|e| DbError::Decode {
        column,
        reason: e.to_string(),
    })
}

impl AnalysisRow {
    fn into_report(self) -> Result<AnalysisReport, DbError> {
        let category = self.category.parse().map_err(|e| DbError::Decode {
            column: "category",
            reason: format!("{e}"),
        })?;
        let recommendation = Recommendation::from_label(&self.recommendation).ok_or_else(|| {
            DbError::Decode {
                column: "recommendation",
                reason: format!("unknown label: {}", self.recommendation),
            }
        })?;

        Ok(AnalysisReport {
            id: self.id,
            location: self.location,
            category,
            coordinates: Coordinate {
                lat: self.latitude,
                lng: self.longitude,
            },
            summary: self.summary,
            strengths: decode("strengths", self.strengths)?,
            weaknesses: decode("weaknesses", self.weaknesses)?,
            opportunities: decode("opportunities", self.opportunities)?,
            threats: decode("threats", self.threats)?,
            metrics: decode("metrics", self.metrics)?,
            recommendation,
            key_insights: decode("key_insights", self.key_insights)?,
            action_items: decode("action_items", self.action_items)?,
            alternatives: decode("alternatives", self.alternatives)?,
            competitors: decode("competitors", self.competitors)?,
            created_at: self.created_at,
        })
    }
}

/// Upsert a finished report by id. Re-running an id overwrites the stored
/// copy (last writer wins).
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if a nested structure cannot be encoded,
/// or [`DbError::Sqlx`] if the statement fails.
pub async fn insert_analysis(pool: &PgPool, report: &AnalysisReport) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO analyses \
             (id, location, category, latitude, longitude, summary, \
              strengths, weaknesses, opportunities, threats, metrics, \
              recommendation, key_insights, action_items, alternatives, \
              competitors, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
         ON CONFLICT (id) DO UPDATE SET \
             location       = EXCLUDED.location, \
             category       = EXCLUDED.category, \
             latitude       = EXCLUDED.latitude, \
             longitude      = EXCLUDED.longitude, \
             summary        = EXCLUDED.summary, \
             strengths      = EXCLUDED.strengths, \
             weaknesses     = EXCLUDED.weaknesses, \
             opportunities  = EXCLUDED.opportunities, \
             threats        = EXCLUDED.threats, \
             metrics        = EXCLUDED.metrics, \
             recommendation = EXCLUDED.recommendation, \
             key_insights   = EXCLUDED.key_insights, \
             action_items   = EXCLUDED.action_items, \
             alternatives   = EXCLUDED.alternatives, \
             competitors    = EXCLUDED.competitors, \
             created_at     = EXCLUDED.created_at",
    )
    .bind(&report.id)
    .bind(&report.location)
    .bind(report.category.as_str())
    .bind(report.coordinates.lat)
    .bind(report.coordinates.lng)
    .bind(&report.summary)
    .bind(serde_json::to_value(&report.strengths)?)
    .bind(serde_json::to_value(&report.weaknesses)?)
    .bind(serde_json::to_value(&report.opportunities)?)
    .bind(serde_json::to_value(&report.threats)?)
    .bind(serde_json::to_value(report.metrics)?)
    .bind(report.recommendation.as_str())
    .bind(serde_json::to_value(&report.key_insights)?)
    .bind(serde_json::to_value(&report.action_items)?)
    .bind(serde_json::to_value(&report.alternatives)?)
    .bind(serde_json::to_value(&report.competitors)?)
    .bind(report.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a stored report by id. `Ok(None)` is an ordinary miss.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] if a
/// stored column no longer matches the report shape.
pub async fn fetch_analysis(pool: &PgPool, id: &str) -> Result<Option<AnalysisReport>, DbError> {
    let row: Option<AnalysisRow> = sqlx::query_as(
        "SELECT id, location, category, latitude, longitude, summary, \
                strengths, weaknesses, opportunities, threats, metrics, \
                recommendation, key_insights, action_items, alternatives, \
                competitors, created_at \
         FROM analyses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(AnalysisRow::into_report).transpose()
}
