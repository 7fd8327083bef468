//! Location-viability analysis pipeline for Siteline.
//!
//! Orchestrates geocoding, nearby-place discovery, alternative-site scoring,
//! competitor profiling, and narrative generation into one
//! [`siteline_core::AnalysisReport`]. The narrative stage degrades through
//! three tiers (strict JSON parse, text mining, local heuristics) so the
//! pipeline always yields a structurally complete report; only geocoding can
//! fail the run outright.

pub mod alternatives;
pub mod cache;
pub mod competitors;
pub mod error;
pub mod pipeline;

mod extract;
mod fallback;
mod genai;
mod narrative;
mod types;

pub use alternatives::find_alternatives;
pub use cache::ReportCache;
pub use competitors::{average_price_for_2, build_competitor_profiles};
pub use error::{AnalysisError, GenAiError};
pub use genai::GenAiClient;
pub use pipeline::{run_site_analysis, PipelineOptions};
