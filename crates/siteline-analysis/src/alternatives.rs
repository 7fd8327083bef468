//! Alternative-site discovery and scoring.
//!
//! Probes six fixed compass offsets around the origin, collects a breadth-
//! favoring sample of places from each, and ranks them with an additive
//! heuristic score. The offsets are degree-space approximations of ~1 km
//! steps and are deliberately not corrected for latitude; they match the
//! behavior callers already depend on.

use std::collections::HashSet;

use siteline_core::{AlternativeCandidate, Category, Coordinate, Place};
use siteline_maps::MapsClient;

/// Directional probes: N/S lat steps, E/W lng steps, and two diagonals.
const PROBE_OFFSETS: [(f64, f64); 6] = [
    (0.01, 0.0),
    (-0.01, 0.0),
    (0.0, 0.01),
    (0.0, -0.01),
    (0.005, 0.005),
    (-0.005, -0.005),
];

/// Probes search wider than the primary nearby pass.
const PROBE_RADIUS_M: u32 = 2000;

/// At most this many places are taken from each probe: breadth over depth.
const PER_PROBE_LIMIT: usize = 2;

/// Default number of ranked candidates returned to callers.
pub const DEFAULT_ALTERNATIVE_LIMIT: usize = 5;

/// Type tags that mark a place as relevant to hospitality siting.
const RELEVANT_TYPES: [&str; 4] = ["restaurant", "cafe", "lodging", "tourist_attraction"];

/// Human labels for provider price tiers 0..=4.
const PRICE_LABELS: [&str; 5] = ["Free", "Inexpensive", "Moderate", "Expensive", "Very Expensive"];

/// Discovers and ranks alternative sites around `origin`.
///
/// Probes are issued sequentially and stop early once `limit` distinct
/// candidates have been gathered. A probe that fails is logged and skipped;
/// finding nothing anywhere yields an empty list, never an error. Results
/// are sorted descending by score and truncated to `limit`.
pub async fn find_alternatives(
    maps: &MapsClient,
    origin: Coordinate,
    category: Category,
    limit: usize,
) -> Vec<AlternativeCandidate> {
    if limit == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<Place> = Vec::new();

    for (dlat, dlng) in PROBE_OFFSETS {
        if candidates.len() >= limit {
            break;
        }
        let probe = Coordinate {
            lat: origin.lat + dlat,
            lng: origin.lng + dlng,
        };
        match maps
            .nearby_search(probe, PROBE_RADIUS_M, category.place_type())
            .await
        {
            Ok(places) => {
                for place in places.into_iter().take(PER_PROBE_LIMIT) {
                    // Overlapping probe radii return the same place from
                    // adjacent offsets; keep the first sighting only.
                    if seen.insert(place.id.clone()) {
                        candidates.push(place);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    lat = probe.lat,
                    lng = probe.lng,
                    error = %e,
                    "alternative probe failed; skipping offset"
                );
            }
        }
    }

    let mut scored: Vec<AlternativeCandidate> = candidates
        .into_iter()
        .map(|place| {
            let score = score_place(&place);
            let reasons = score_reasons(&place, score);
            AlternativeCandidate {
                place,
                score,
                reasons,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Scores a candidate place in [0, 100].
///
/// Base 50, then additive adjustments: rating `(r − 2.5) × 10` when present,
/// popularity `min(reviews/100, 1) × 15`, price `(3 − tier) × 5` when
/// present, +10 for a relevant type tag. Components are not clamped
/// individually; only the final sum is.
#[must_use]
pub fn score_place(place: &Place) -> u8 {
    let mut score = 50.0_f64;

    if let Some(rating) = place.rating {
        score += (rating - 2.5) * 10.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let reviews = place.review_count.unwrap_or(0).max(0) as f64;
    score += (reviews / 100.0).min(1.0) * 15.0;

    if let Some(tier) = place.price_level {
        score += f64::from(3 - i32::from(tier)) * 5.0;
    }

    if place
        .types
        .iter()
        .any(|t| RELEVANT_TYPES.contains(&t.as_str()))
    {
        score += 10.0;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamped = score.clamp(0.0, 100.0).round() as u8;
    clamped
}

/// Derives the advisory reason strings for a candidate. Reasons read the
/// same signals as the score but never feed back into it.
#[must_use]
pub fn score_reasons(place: &Place, score: u8) -> Vec<String> {
    let mut reasons = Vec::new();

    if place.rating.is_some_and(|r| r >= 4.0) {
        reasons.push("High rating".to_string());
    }
    if place.review_count.is_some_and(|n| n > 100) {
        reasons.push("Popular".to_string());
    }
    if let Some(tier) = place.price_level {
        if let Some(label) = PRICE_LABELS.get(usize::from(tier)) {
            reasons.push((*label).to_string());
        }
    }
    if score >= 75 {
        reasons.push("Excellent location score".to_string());
    } else if score >= 60 {
        reasons.push("Good location potential".to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {id}"),
            address: None,
            coordinate: Coordinate {
                lat: 12.97,
                lng: 77.59,
            },
            rating: None,
            review_count: None,
            price_level: None,
            types: Vec::new(),
        }
    }

    #[test]
    fn bare_place_scores_the_base() {
        assert_eq!(score_place(&bare_place("p")), 50);
    }

    #[test]
    fn rating_component_is_linear_around_two_and_a_half() {
        // With no other signals, score = 50 + (r - 2.5) * 10.
        for (rating, expected) in [(0.0, 25), (2.5, 50), (4.0, 65), (5.0, 75)] {
            let mut place = bare_place("r");
            place.rating = Some(rating);
            assert_eq!(score_place(&place), expected, "rating {rating}");
        }
    }

    #[test]
    fn popularity_component_caps_at_fifteen() {
        let mut place = bare_place("pop");
        place.review_count = Some(100);
        assert_eq!(score_place(&place), 65);

        place.review_count = Some(10_000);
        assert_eq!(score_place(&place), 65, "cap must hold past 100 reviews");

        place.review_count = Some(0);
        assert_eq!(score_place(&place), 50, "zero reviews adds nothing");

        place.review_count = Some(50);
        assert_eq!(score_place(&place), 58, "50 reviews adds 7.5, rounded");
    }

    #[test]
    fn price_component_rewards_cheaper_tiers() {
        for (tier, expected) in [(0_u8, 65), (1, 60), (2, 55), (3, 50), (4, 45)] {
            let mut place = bare_place("price");
            place.price_level = Some(tier);
            assert_eq!(score_place(&place), expected, "tier {tier}");
        }
    }

    #[test]
    fn relevant_type_adds_ten() {
        let mut place = bare_place("t");
        place.types = vec!["tourist_attraction".to_string()];
        assert_eq!(score_place(&place), 60);

        place.types = vec!["gas_station".to_string()];
        assert_eq!(score_place(&place), 50);
    }

    #[test]
    fn score_clamps_to_one_hundred() {
        let mut place = bare_place("max");
        place.rating = Some(5.0);
        place.review_count = Some(1000);
        place.price_level = Some(0);
        place.types = vec!["cafe".to_string()];
        // 50 + 25 + 15 + 15 + 10 = 115 before the clamp.
        assert_eq!(score_place(&place), 100);
    }

    #[test]
    fn reasons_reflect_signals_without_affecting_score() {
        let mut place = bare_place("reasons");
        place.rating = Some(4.2);
        place.review_count = Some(250);
        place.price_level = Some(2);

        let score = score_place(&place);
        let reasons = score_reasons(&place, score);

        assert!(reasons.contains(&"High rating".to_string()));
        assert!(reasons.contains(&"Popular".to_string()));
        assert!(reasons.contains(&"Moderate".to_string()));
    }

    #[test]
    fn reasons_include_score_tier_labels() {
        let place = bare_place("tiers");
        assert!(score_reasons(&place, 80).contains(&"Excellent location score".to_string()));
        assert!(score_reasons(&place, 60).contains(&"Good location potential".to_string()));
        assert!(score_reasons(&place, 59).is_empty());
    }

    #[test]
    fn rating_below_four_is_not_a_high_rating_reason() {
        let mut place = bare_place("r39");
        place.rating = Some(3.9);
        assert!(!score_reasons(&place, 50).contains(&"High rating".to_string()));
    }
}
