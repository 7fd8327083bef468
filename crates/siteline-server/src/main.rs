mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use siteline_analysis::{GenAiClient, PipelineOptions, ReportCache};
use siteline_maps::MapsClient;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = siteline_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = siteline_db::PoolConfig::from_app_config(&config);
    let pool = siteline_db::connect_pool(&config.database_url, pool_config).await?;
    siteline_db::run_migrations(&pool).await?;

    let maps = Arc::new(MapsClient::with_base_url(
        &config.maps_api_key,
        config.http_timeout_secs,
        &config.maps_base_url,
    )?);

    let genai = match &config.genai_api_key {
        Some(key) => Some(Arc::new(GenAiClient::with_base_url(
            key,
            &config.genai_model,
            config.http_timeout_secs,
            &config.genai_base_url,
        )?)),
        None => {
            tracing::warn!(
                "SITELINE_GENAI_API_KEY not set; narratives will use the local analysis tier"
            );
            None
        }
    };

    let state = AppState {
        pool,
        maps,
        genai,
        cache: Arc::new(ReportCache::new(config.cache_capacity)),
        options: PipelineOptions {
            nearby_radius_m: config.nearby_radius_m,
            ..PipelineOptions::default()
        },
    };

    let app = build_app(state, default_rate_limit_state());

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting siteline-server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
