//! Analysis pipeline orchestration.
//!
//! One run per request: geocode the address, gather nearby places and
//! alternative candidates concurrently, profile competitors, generate the
//! narrative, and assemble the report. Only geocoding can fail the run;
//! every later stage degrades per its own policy.

use chrono::Utc;
use uuid::Uuid;

use siteline_core::{AnalysisReport, Category, ReportMetrics};
use siteline_maps::MapsClient;

use crate::alternatives::{find_alternatives, DEFAULT_ALTERNATIVE_LIMIT};
use crate::competitors::build_competitor_profiles;
use crate::error::AnalysisError;
use crate::genai::GenAiClient;
use crate::narrative::generate_narrative;
use crate::types::NarrativeContext;

/// Tuning knobs for one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Radius for the primary nearby-place search, meters.
    pub nearby_radius_m: u32,
    /// Maximum alternative candidates returned on the report.
    pub alternative_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            nearby_radius_m: 1000,
            alternative_limit: DEFAULT_ALTERNATIVE_LIMIT,
        }
    }
}

/// Runs the full analysis for `location` and `category`.
///
/// # Errors
///
/// Returns [`AnalysisError::Geocode`] when the address cannot be resolved -
/// the one stage with no degraded mode. Everything downstream recovers in
/// place: a failed nearby search analyses an empty market, failed enrichment
/// keeps summary fields, and a failed generation call computes the local
/// narrative.
pub async fn run_site_analysis(
    maps: &MapsClient,
    genai: Option<&GenAiClient>,
    location: &str,
    category: Category,
    options: PipelineOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let coordinates = maps
        .geocode(location)
        .await
        .map_err(AnalysisError::Geocode)?;
    tracing::info!(
        location,
        category = %category,
        lat = coordinates.lat,
        lng = coordinates.lng,
        "geocoded analysis origin"
    );

    let nearby_search = async {
        match maps
            .nearby_search(coordinates, options.nearby_radius_m, category.place_type())
            .await
        {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(error = %e, "nearby search failed; analysing an empty market");
                Vec::new()
            }
        }
    };
    let alternative_search =
        find_alternatives(maps, coordinates, category, options.alternative_limit);

    // The alternative probes are independent of the primary results.
    let (nearby, alternatives) = tokio::join!(nearby_search, alternative_search);

    let competitors = build_competitor_profiles(maps, &nearby).await;
    let footfall: i64 = nearby
        .iter()
        .map(|p| p.review_count.unwrap_or(0).max(0))
        .sum();

    tracing::debug!(
        nearby = nearby.len(),
        competitors = competitors.len(),
        alternatives = alternatives.len(),
        footfall,
        "aggregated analysis signals"
    );

    let narrative = generate_narrative(
        genai,
        &NarrativeContext {
            location,
            category,
            coordinates,
            nearby_count: nearby.len(),
            competitors: &competitors,
            footfall,
            alternative_count: alternatives.len(),
        },
    )
    .await;

    let metrics = ReportMetrics {
        viability_score: narrative.viability_score,
        competition_level: narrative.competition_level,
        market_saturation: narrative.market_saturation,
        expected_revenue: narrative.expected_revenue,
        average_revenue: narrative.average_revenue,
        total_addressable_market: narrative.total_addressable_market,
        footfall,
        competitor_count: i64::try_from(competitors.len()).unwrap_or(i64::MAX),
    };

    Ok(AnalysisReport {
        id: Uuid::new_v4().to_string(),
        location: location.to_string(),
        category,
        coordinates,
        summary: narrative.summary,
        strengths: narrative.strengths,
        weaknesses: narrative.weaknesses,
        opportunities: narrative.opportunities,
        threats: narrative.threats,
        metrics,
        recommendation: narrative.recommendation,
        key_insights: narrative.key_insights,
        action_items: narrative.action_items,
        alternatives,
        competitors,
        created_at: Utc::now(),
    })
}
