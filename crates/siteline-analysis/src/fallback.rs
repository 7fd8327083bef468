//! Deterministic local analysis, used when the text-generation service is
//! unreachable or errors out. Computed purely from the structured signals
//! already in hand, so it always succeeds.

use siteline_core::{Category, Level, Recommendation};

use crate::types::{Narrative, NarrativeContext};

/// Category-average monthly revenue, whole rupees.
const fn base_revenue(category: Category) -> i64 {
    match category {
        Category::Cafe => 300_000,
        Category::Restaurant => 500_000,
        Category::Hotel => 1_200_000,
        Category::Hostel => 400_000,
    }
}

/// Category total-addressable-market estimate, whole rupees.
const fn base_tam(category: Category) -> i64 {
    match category {
        Category::Cafe => 50_000_000,
        Category::Restaurant => 80_000_000,
        Category::Hotel => 200_000_000,
        Category::Hostel => 60_000_000,
    }
}

/// Footfall above this contributes no further revenue uplift.
const FOOTFALL_CEILING: i64 = 5_000;

/// Competition level from the competitor count: >5 High, >2 Medium, else Low.
pub(crate) fn competition_level(competitor_count: usize) -> Level {
    if competitor_count > 5 {
        Level::High
    } else if competitor_count > 2 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Market saturation from nearby-place density.
fn market_saturation(nearby_count: usize) -> Level {
    if nearby_count > 15 {
        Level::High
    } else if nearby_count > 8 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Viability score: `85 − competitors×5 + min(nearby×2, 20)`, floored at 30
/// and capped at 100.
pub(crate) fn viability_score(competitor_count: usize, nearby_count: usize) -> u8 {
    let competitors = i64::try_from(competitor_count).unwrap_or(i64::MAX / 8);
    let nearby = i64::try_from(nearby_count).unwrap_or(i64::MAX / 8);
    let raw = 85 - competitors * 5 + (nearby * 2).min(20);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamped = raw.clamp(30, 100) as u8;
    clamped
}

/// Revenue multiplier in [1.0, 2.0] from the footfall proxy.
fn footfall_multiplier(footfall: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let capped = footfall.clamp(0, FOOTFALL_CEILING) as f64;
    #[allow(clippy::cast_precision_loss)]
    let ceiling = FOOTFALL_CEILING as f64;
    1.0 + capped / ceiling
}

#[allow(clippy::cast_possible_truncation)]
fn scale(amount: i64, multiplier: f64) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let scaled = (amount as f64) * multiplier;
    scaled.round() as i64
}

/// Computes the full local narrative for the given context.
pub(crate) fn local_narrative(ctx: &NarrativeContext<'_>) -> Narrative {
    let competitor_count = ctx.competitors.len();
    let competition = competition_level(competitor_count);
    let saturation = market_saturation(ctx.nearby_count);
    let viability = viability_score(competitor_count, ctx.nearby_count);
    let multiplier = footfall_multiplier(ctx.footfall);

    let category = ctx.category;
    let expected_revenue = scale(base_revenue(category), multiplier);
    let average_revenue = base_revenue(category);
    let total_addressable_market = scale(base_tam(category), multiplier);

    let summary = format!(
        "A {category} near {location} faces {competition} competition with {nearby} comparable \
         places in the immediate area and an estimated footfall proxy of {footfall}. \
         Overall viability rates {viability} out of 100.",
        category = category,
        location = ctx.location,
        competition = competition.to_string().to_lowercase(),
        nearby = ctx.nearby_count,
        footfall = ctx.footfall,
        viability = viability,
    );

    let mut strengths = Vec::new();
    if ctx.footfall > 0 {
        strengths.push("Established foot traffic in the surrounding area".to_string());
    }
    if competitor_count <= 2 {
        strengths.push("Few direct competitors within the search radius".to_string());
    }
    if ctx.alternative_count > 0 {
        strengths.push(format!(
            "{} viable alternative sites identified nearby",
            ctx.alternative_count
        ));
    }
    if strengths.is_empty() {
        strengths.push("Unsaturated catchment with room to define the category".to_string());
    }

    let mut weaknesses = Vec::new();
    if competitor_count > 5 {
        weaknesses.push("Crowded market with many established operators".to_string());
    }
    if ctx.footfall == 0 {
        weaknesses.push("No measurable foot-traffic signal for this area".to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push("Limited third-party data to validate demand".to_string());
    }

    let opportunities = vec![
        format!("Growing urban demand for {category} offerings"),
        "Capture spillover demand from adjacent commercial blocks".to_string(),
    ];

    let mut threats = vec!["Rising commercial rents in prime corridors".to_string()];
    if competitor_count > 2 {
        threats.push("Established players with loyal review bases".to_string());
    }

    let key_insights = vec![
        format!(
            "Footfall proxy of {} derived from nearby review volume",
            ctx.footfall
        ),
        format!(
            "{competitor_count} direct competitors rank in the local top results"
        ),
    ];

    let action_items = vec![
        "Validate rental costs against the projected revenue band".to_string(),
        "Survey the area at peak hours to confirm the footfall proxy".to_string(),
    ];

    Narrative {
        summary,
        strengths,
        weaknesses,
        opportunities,
        threats,
        viability_score: viability,
        competition_level: competition,
        market_saturation: saturation,
        expected_revenue,
        average_revenue,
        total_addressable_market,
        recommendation: Recommendation::from_viability(viability),
        key_insights,
        action_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteline_core::Coordinate;

    fn ctx<'a>(nearby: usize, footfall: i64) -> NarrativeContext<'a> {
        NarrativeContext {
            location: "MG Road, Bangalore",
            category: Category::Cafe,
            coordinates: Coordinate {
                lat: 12.97,
                lng: 77.59,
            },
            nearby_count: nearby,
            competitors: &[],
            footfall,
            alternative_count: 0,
        }
    }

    #[test]
    fn competition_thresholds() {
        assert_eq!(competition_level(0), Level::Low);
        assert_eq!(competition_level(2), Level::Low);
        assert_eq!(competition_level(3), Level::Medium);
        assert_eq!(competition_level(5), Level::Medium);
        assert_eq!(competition_level(6), Level::High);
    }

    #[test]
    fn viability_is_85_with_no_signals() {
        assert_eq!(viability_score(0, 0), 85);
    }

    #[test]
    fn viability_floors_at_30_under_heavy_competition() {
        assert_eq!(viability_score(20, 0), 30);
        assert_eq!(viability_score(50, 3), 30);
    }

    #[test]
    fn viability_caps_nearby_bonus_at_20() {
        assert_eq!(viability_score(0, 10), 100);
        assert_eq!(viability_score(0, 100), 100);
        assert_eq!(viability_score(1, 100), 100);
        assert_eq!(viability_score(2, 100), 95);
    }

    #[test]
    fn viability_matches_reference_scenario() {
        // 3 competitors, 3 nearby: 85 - 15 + 6 = 76.
        assert_eq!(viability_score(3, 3), 76);
    }

    #[test]
    fn footfall_multiplier_bounds() {
        assert!((footfall_multiplier(0) - 1.0).abs() < f64::EPSILON);
        assert!((footfall_multiplier(5_000) - 2.0).abs() < f64::EPSILON);
        assert!((footfall_multiplier(50_000) - 2.0).abs() < f64::EPSILON);
        assert!((footfall_multiplier(2_500) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn narrative_fields_are_always_populated() {
        let narrative = local_narrative(&ctx(0, 0));
        assert!(!narrative.summary.is_empty());
        assert!(!narrative.strengths.is_empty());
        assert!(!narrative.weaknesses.is_empty());
        assert!(!narrative.opportunities.is_empty());
        assert!(!narrative.threats.is_empty());
        assert!(narrative.expected_revenue > 0);
        assert!(narrative.total_addressable_market > 0);
        assert_eq!(narrative.average_revenue, 300_000);
    }

    #[test]
    fn footfall_scales_expected_revenue() {
        let quiet = local_narrative(&ctx(0, 0));
        let busy = local_narrative(&ctx(0, 5_000));
        assert_eq!(quiet.expected_revenue, 300_000);
        assert_eq!(busy.expected_revenue, 600_000);
        assert_eq!(quiet.average_revenue, busy.average_revenue);
    }

    #[test]
    fn high_viability_maps_to_highly_recommended() {
        let narrative = local_narrative(&ctx(3, 200));
        assert_eq!(
            narrative.recommendation,
            Recommendation::from_viability(narrative.viability_score)
        );
    }
}
