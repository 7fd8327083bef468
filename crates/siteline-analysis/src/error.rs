use thiserror::Error;

use siteline_maps::MapsError;

/// Errors that fail an analysis run.
///
/// Geocoding is the only load-bearing upstream: without a coordinate there
/// is nothing to analyse. Every other stage degrades in place (empty place
/// lists, summary-only competitor profiles, locally computed narrative).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("geocoding failed: {0}")]
    Geocode(#[source] MapsError),
}

/// Errors returned by the text-generation client.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation API rejected the request or returned an error body.
    #[error("generation API error: {0}")]
    Api(String),

    /// The API answered but produced no usable completion text.
    #[error("generation API returned an empty completion")]
    EmptyCompletion,
}
