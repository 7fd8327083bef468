//! Report data model.
//!
//! These types travel three boundaries unchanged: the analysis pipeline
//! assembles them, the HTTP API serializes them, and the database stores the
//! nested structures as JSONB. Optional fields model data the mapping
//! provider genuinely omits; every numeric *metric* on a finished report is
//! concrete: builders substitute defaults rather than leave holes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, CoreError};

/// A geographic point produced by geocoding. Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// A point of interest from the mapping provider. Never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub coordinate: Coordinate,
    /// Provider rating in [0, 5].
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    /// Provider price tier in [0, 4].
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// A scored candidate site from the alternative-location probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeCandidate {
    pub place: Place,
    /// Heuristic suitability score in [0, 100].
    pub score: u8,
    /// Human-readable signals behind the score. Advisory only.
    pub reasons: Vec<String>,
}

/// A nearby competitor enriched with contact details and derived figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub place: Place,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Foot-traffic proxy: the place's own review count (0 when unknown).
    pub footfall: i64,
    /// Estimated cost for two in rupees, from the price-tier table.
    /// `None` when the tier is absent or zero.
    #[serde(default)]
    pub average_price_for_2: Option<i64>,
    /// Only set when supplied by an external source; never computed here.
    #[serde(default)]
    pub revenue: Option<i64>,
}

/// Qualitative Low/Medium/High scale used for competition and saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("Low"),
            Self::Medium => f.write_str("Medium"),
            Self::High => f.write_str("High"),
        }
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::UnknownLevel(other.to_string())),
        }
    }
}

/// The closed set of report verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Proceed with Caution")]
    ProceedWithCaution,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Derive the verdict from a viability score.
    #[must_use]
    pub const fn from_viability(score: u8) -> Self {
        if score >= 75 {
            Self::HighlyRecommended
        } else if score >= 60 {
            Self::Recommended
        } else if score >= 40 {
            Self::ProceedWithCaution
        } else {
            Self::NotRecommended
        }
    }

    /// Match a free-text label against the closed set, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "highly recommended" => Some(Self::HighlyRecommended),
            "recommended" => Some(Self::Recommended),
            "proceed with caution" => Some(Self::ProceedWithCaution),
            "not recommended" => Some(Self::NotRecommended),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighlyRecommended => "Highly Recommended",
            Self::Recommended => "Recommended",
            Self::ProceedWithCaution => "Proceed with Caution",
            Self::NotRecommended => "Not Recommended",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantitative section of a report. All fields are always concrete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    /// Heuristic/LLM viability rating in [0, 100].
    pub viability_score: u8,
    pub competition_level: Level,
    pub market_saturation: Level,
    /// Expected monthly revenue, whole rupees.
    pub expected_revenue: i64,
    /// Category-average monthly revenue, whole rupees.
    pub average_revenue: i64,
    /// Total addressable market, whole rupees.
    pub total_addressable_market: i64,
    /// Sum of review counts across nearby places.
    pub footfall: i64,
    pub competitor_count: i64,
}

/// The aggregate analysis report. Created once per request; a re-run
/// produces a new report under a new id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub location: String,
    pub category: Category,
    pub coordinates: Coordinate,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub metrics: ReportMetrics,
    pub recommendation: Recommendation,
    pub key_insights: Vec<String>,
    pub action_items: Vec<String>,
    /// Ranked best-first, at most the caller's requested count.
    pub alternatives: Vec<AlternativeCandidate>,
    pub competitors: Vec<CompetitorProfile>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;
