use siteline_core::{Category, CompetitorProfile, Coordinate, Level, Recommendation};

/// Aggregated structured inputs handed to the narrative stage.
///
/// Everything here is already validated and locally derived; the narrative
/// tiers only turn it into prose and market estimates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NarrativeContext<'a> {
    pub location: &'a str,
    pub category: Category,
    pub coordinates: Coordinate,
    pub nearby_count: usize,
    pub competitors: &'a [CompetitorProfile],
    pub footfall: i64,
    pub alternative_count: usize,
}

/// Output of a narrative tier: report prose plus the market metrics the
/// narrative is responsible for. Locally derived metrics (footfall,
/// competitor count) are merged in by the pipeline, not here.
///
/// Invariant: every numeric field is concrete. Tiers substitute defaults for
/// anything the model omitted rather than leaving holes.
#[derive(Debug, Clone)]
pub(crate) struct Narrative {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub viability_score: u8,
    pub competition_level: Level,
    pub market_saturation: Level,
    pub expected_revenue: i64,
    pub average_revenue: i64,
    pub total_addressable_market: i64,
    pub recommendation: Recommendation,
    pub key_insights: Vec<String>,
    pub action_items: Vec<String>,
}
