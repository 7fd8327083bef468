//! Narrative generation tier chain.
//!
//! Tier 1 asks the text-generation service for strict analysis JSON. Tier 2
//! mines non-JSON completions with text heuristics. Tier 3 computes the
//! analysis locally when the service call itself fails (or no client is
//! configured). All tiers produce the same [`Narrative`] shape, so callers
//! never learn which one ran.

use serde::Deserialize;

use siteline_core::{CompetitorProfile, Level, Recommendation};

use crate::extract;
use crate::fallback;
use crate::genai::GenAiClient;
use crate::types::{Narrative, NarrativeContext};

const DEFAULT_VIABILITY: u8 = 75;

/// The JSON schema the model is instructed to produce. Everything is
/// optional on ingress; missing fields get field-specific defaults so the
/// outgoing narrative honors the all-numerics-concrete invariant.
#[derive(Debug, Deserialize)]
struct LlmAnalysis {
    summary: Option<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    opportunities: Vec<String>,
    #[serde(default)]
    threats: Vec<String>,
    metrics: Option<LlmMetrics>,
    recommendation: Option<String>,
    #[serde(default)]
    key_insights: Vec<String>,
    #[serde(default)]
    action_items: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmMetrics {
    viability_score: Option<f64>,
    competition_level: Option<String>,
    market_saturation: Option<String>,
    expected_revenue: Option<f64>,
    average_revenue: Option<f64>,
    total_addressable_market: Option<f64>,
}

/// Runs the tier chain for one analysis.
pub(crate) async fn generate_narrative(
    genai: Option<&GenAiClient>,
    ctx: &NarrativeContext<'_>,
) -> Narrative {
    let Some(client) = genai else {
        tracing::debug!("no generation client configured; computing local analysis");
        return fallback::local_narrative(ctx);
    };

    let prompt = build_prompt(ctx);
    match client.generate(&prompt).await {
        Ok(text) => parse_strict(&text).unwrap_or_else(|| {
            tracing::warn!("completion is not valid analysis JSON; mining text heuristically");
            extract::mine_narrative(&text, ctx)
        }),
        Err(e) => {
            tracing::warn!(error = %e, "generation call failed; computing local analysis");
            fallback::local_narrative(ctx)
        }
    }
}

/// Builds the analysis prompt from the aggregated signals.
fn build_prompt(ctx: &NarrativeContext<'_>) -> String {
    format!(
        "You are a location-intelligence analyst for hospitality businesses in India.\n\
         Assess the viability of opening a {category} at \"{location}\" \
         (lat {lat:.4}, lng {lng:.4}).\n\
         \n\
         Observed signals:\n\
         - Comparable places nearby: {nearby}\n\
         - Direct competitors (most reviewed first): {digest}\n\
         - Footfall proxy (aggregate nearby review count): {footfall}\n\
         - Alternative sites already scored: {alternatives}\n\
         \n\
         Respond with a single JSON object and nothing else, using exactly these fields:\n\
         {{\"summary\": string, \"strengths\": [string], \"weaknesses\": [string], \
         \"opportunities\": [string], \"threats\": [string], \
         \"metrics\": {{\"viability_score\": number (0-100), \
         \"competition_level\": \"Low\"|\"Medium\"|\"High\", \
         \"market_saturation\": \"Low\"|\"Medium\"|\"High\", \
         \"expected_revenue\": number, \"average_revenue\": number, \
         \"total_addressable_market\": number}}, \
         \"recommendation\": \"Highly Recommended\"|\"Recommended\"|\
         \"Proceed with Caution\"|\"Not Recommended\", \
         \"key_insights\": [string], \"action_items\": [string]}}\n\
         Every financial figure must be a concrete number in Indian rupees. \
         Never omit or null a numeric field.",
        category = ctx.category,
        location = ctx.location,
        lat = ctx.coordinates.lat,
        lng = ctx.coordinates.lng,
        nearby = ctx.nearby_count,
        digest = competitor_digest(ctx.competitors),
        footfall = ctx.footfall,
        alternatives = ctx.alternative_count,
    )
}

/// Short inline digest of the top competitors for the prompt.
fn competitor_digest(competitors: &[CompetitorProfile]) -> String {
    if competitors.is_empty() {
        return "none found".to_string();
    }
    competitors
        .iter()
        .take(5)
        .map(|c| {
            let price = c
                .average_price_for_2
                .map_or_else(String::new, |p| format!(", ~₹{p} for two"));
            format!("{} ({} reviews{price})", c.place.name, c.footfall)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tier 1: parse the completion as analysis JSON.
///
/// Tolerates markdown fences and stray prose by slicing from the first `{`
/// to the last `}`. Returns `None` when no such object parses, or when the
/// parsed object lacks a usable summary: both push the chain to tier 2.
fn parse_strict(text: &str) -> Option<Narrative> {
    let json = json_object_slice(text)?;
    let parsed: LlmAnalysis = serde_json::from_str(json).ok()?;

    let summary = parsed.summary.map(|s| s.trim().to_string())?;
    if summary.is_empty() {
        return None;
    }

    let metrics = parsed.metrics.unwrap_or_default();
    let viability = metrics
        .viability_score
        .map_or(DEFAULT_VIABILITY, clamp_score);
    let competition = parse_level(metrics.competition_level.as_deref());
    let saturation = parse_level(metrics.market_saturation.as_deref());

    let recommendation = parsed
        .recommendation
        .as_deref()
        .and_then(Recommendation::from_label)
        .unwrap_or_else(|| Recommendation::from_viability(viability));

    Some(Narrative {
        summary,
        strengths: parsed.strengths,
        weaknesses: parsed.weaknesses,
        opportunities: parsed.opportunities,
        threats: parsed.threats,
        viability_score: viability,
        competition_level: competition,
        market_saturation: saturation,
        expected_revenue: to_rupees(metrics.expected_revenue),
        average_revenue: to_rupees(metrics.average_revenue),
        total_addressable_market: to_rupees(metrics.total_addressable_market),
        recommendation,
        key_insights: parsed.key_insights,
        action_items: parsed.action_items,
    })
}

/// Slice from the first `{` to the last `}`: the JSON object the model was
/// asked for, with fences/prose shaved off.
fn json_object_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

#[allow(clippy::cast_possible_truncation)]
fn to_rupees(raw: Option<f64>) -> i64 {
    raw.map_or(0, |v| v.max(0.0).round() as i64)
}

fn parse_level(raw: Option<&str>) -> Level {
    raw.and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::Medium)
}
