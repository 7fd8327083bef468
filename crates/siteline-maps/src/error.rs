use thiserror::Error;

/// Errors returned by the mapping-provider client.
#[derive(Debug, Error)]
pub enum MapsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-OK status in the response envelope.
    #[error("maps API error: {0}")]
    ApiError(String),

    /// The provider returned zero results for the query.
    #[error("no results for the requested location")]
    NoResults,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
