//! Core domain types and configuration for Siteline.
//!
//! Defines the report data model shared by every crate (categories,
//! coordinates, places, competitor profiles, the assembled analysis report)
//! and the env-driven application configuration.

mod app_config;
mod category;
mod config;
mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use category::Category;
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    AlternativeCandidate, AnalysisReport, CompetitorProfile, Coordinate, Level, Place,
    Recommendation, ReportMetrics,
};

/// Errors from parsing domain values out of external input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The category string is not one of the supported business categories.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The level string is not one of Low/Medium/High.
    #[error("unknown level: {0}")]
    UnknownLevel(String),
}

/// Errors from loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
