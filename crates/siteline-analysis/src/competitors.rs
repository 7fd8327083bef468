//! Competitor profiling over the primary nearby-place results.
//!
//! Takes the ten most-reviewed nearby places and enriches each with a
//! place-detail lookup. Enrichment is best-effort per item: a failed lookup
//! falls back to the summary fields and never sinks the batch.

use futures::stream::{self, StreamExt};

use siteline_core::{CompetitorProfile, Place};
use siteline_maps::MapsClient;

/// How many top-reviewed places get profiled.
const TOP_COMPETITORS: usize = 10;

/// Estimated dining cost for two, in rupees, indexed by price tier.
/// Tier 0 carries no signal and maps to no estimate.
const PRICE_FOR_TWO: [i64; 5] = [0, 400, 800, 1500, 2500];

/// Maps a provider price tier to an estimated cost-for-two in rupees.
///
/// Absent and zero tiers both yield `None`: the provider uses 0 for "no
/// price data", not "free dining".
#[must_use]
pub fn average_price_for_2(price_level: Option<u8>) -> Option<i64> {
    match price_level {
        None | Some(0) => None,
        Some(tier) => PRICE_FOR_TWO.get(usize::from(tier)).copied(),
    }
}

/// Selects the top places by review count, descending.
fn rank_by_reviews(nearby: &[Place], count: usize) -> Vec<Place> {
    let mut ranked: Vec<Place> = nearby.to_vec();
    ranked.sort_by(|a, b| {
        b.review_count
            .unwrap_or(0)
            .cmp(&a.review_count.unwrap_or(0))
    });
    ranked.truncate(count);
    ranked
}

/// Builds competitor profiles for the most-reviewed nearby places.
///
/// Detail lookups run concurrently (bounded by the batch size) and preserve
/// review-count order in the output.
pub async fn build_competitor_profiles(
    maps: &MapsClient,
    nearby: &[Place],
) -> Vec<CompetitorProfile> {
    let ranked = rank_by_reviews(nearby, TOP_COMPETITORS);

    stream::iter(ranked.into_iter().map(|place| profile_place(maps, place)))
        .buffered(TOP_COMPETITORS)
        .collect()
        .await
}

async fn profile_place(maps: &MapsClient, mut place: Place) -> CompetitorProfile {
    let (website, phone) = match maps.place_details(&place.id).await {
        Ok(details) => {
            // Detail fields are canonical when present; summary fields stay
            // as the fallback for anything the lookup omitted.
            if let Some(name) = details.name {
                place.name = name;
            }
            if let Some(address) = details.formatted_address {
                place.address = Some(address);
            }
            if details.rating.is_some() {
                place.rating = details.rating;
            }
            if details.user_ratings_total.is_some() {
                place.review_count = details.user_ratings_total;
            }
            if details.price_level.is_some() {
                place.price_level = details.price_level;
            }
            (details.website, details.formatted_phone_number)
        }
        Err(e) => {
            tracing::warn!(
                place_id = %place.id,
                error = %e,
                "place-detail enrichment failed; using summary fields"
            );
            (None, None)
        }
    };

    let footfall = place.review_count.unwrap_or(0).max(0);
    let average_price = average_price_for_2(place.price_level);

    CompetitorProfile {
        place,
        website,
        phone,
        footfall,
        average_price_for_2: average_price,
        revenue: None,
    }
}
