use std::sync::Arc;

use clap::{Parser, Subcommand};

use siteline_analysis::{find_alternatives, run_site_analysis, GenAiClient, PipelineOptions};
use siteline_core::{Category, Coordinate};
use siteline_maps::MapsClient;

#[derive(Debug, Parser)]
#[command(name = "siteline-cli")]
#[command(about = "Siteline location-intelligence command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full viability analysis for an address and print the report.
    Analyze {
        /// Free-text address to analyse.
        #[arg(long)]
        location: String,
        /// Business category: cafe, restaurant, hotel, hostel.
        #[arg(long)]
        category: String,
        /// Maximum alternative sites on the report.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Score alternative sites around a coordinate.
    Alternatives {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Business category: cafe, restaurant, hotel, hostel.
        #[arg(long)]
        category: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Fetch a stored report by id.
    Report {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            location,
            category,
            limit,
        } => analyze(&location, &category, limit).await,
        Commands::Alternatives {
            lat,
            lng,
            category,
            limit,
        } => alternatives(lat, lng, &category, limit).await,
        Commands::Report { id } => report(&id).await,
    }
}

async fn analyze(location: &str, category: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let category: Category = category.parse()?;
    let config = siteline_core::load_app_config()?;

    let maps = MapsClient::with_base_url(
        &config.maps_api_key,
        config.http_timeout_secs,
        &config.maps_base_url,
    )?;
    let genai = config
        .genai_api_key
        .as_deref()
        .map(|key| {
            GenAiClient::with_base_url(
                key,
                &config.genai_model,
                config.http_timeout_secs,
                &config.genai_base_url,
            )
        })
        .transpose()?
        .map(Arc::new);

    let mut options = PipelineOptions {
        nearby_radius_m: config.nearby_radius_m,
        ..PipelineOptions::default()
    };
    if let Some(limit) = limit {
        options.alternative_limit = limit;
    }

    let report =
        run_site_analysis(&maps, genai.as_deref(), location, category, options).await?;

    // Persistence is best-effort here exactly as in the server: the report
    // is already printed for the caller either way.
    match siteline_db::connect_pool(
        &config.database_url,
        siteline_db::PoolConfig::from_app_config(&config),
    )
    .await
    {
        Ok(pool) => {
            if let Err(e) = siteline_db::run_migrations(&pool).await {
                tracing::warn!(error = %e, "migrations failed; skipping persistence");
            } else if let Err(e) = siteline_db::insert_analysis(&pool, &report).await {
                tracing::warn!(report_id = %report.id, error = %e, "failed to persist analysis");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable; report not persisted");
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn alternatives(lat: f64, lng: f64, category: &str, limit: usize) -> anyhow::Result<()> {
    let category: Category = category.parse()?;
    let config = siteline_core::load_app_config()?;

    let maps = MapsClient::with_base_url(
        &config.maps_api_key,
        config.http_timeout_secs,
        &config.maps_base_url,
    )?;

    let candidates = find_alternatives(&maps, Coordinate { lat, lng }, category, limit).await;
    println!("{}", serde_json::to_string_pretty(&candidates)?);
    Ok(())
}

async fn report(id: &str) -> anyhow::Result<()> {
    let config = siteline_core::load_app_config()?;
    let pool = siteline_db::connect_pool(
        &config.database_url,
        siteline_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match siteline_db::fetch_analysis(&pool, id).await? {
        Some(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        None => anyhow::bail!("no analysis with id {id}"),
    }
}
