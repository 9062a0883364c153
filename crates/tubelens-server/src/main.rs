mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tubelens_analysis::AnalysisPipeline;
use tubelens_insights::InsightsClient;
use tubelens_youtube::YoutubeClient;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(tubelens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = tubelens_db::PoolConfig::from_app_config(&config);
    let pool = tubelens_db::connect_pool(&config.database_url, pool_config).await?;
    tubelens_db::run_migrations(&pool).await?;

    let api_key = config
        .youtube_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("YOUTUBE_API_KEY is required to start the server"))?;
    let youtube = YoutubeClient::new(api_key, config.http_request_timeout_secs)?;
    let insights = InsightsClient::new(
        &config.insights_webhook_url,
        config.http_request_timeout_secs,
    )?;
    let pipeline = AnalysisPipeline::new(
        youtube,
        insights,
        pool.clone(),
        config.recent_video_count,
        config.top_video_count,
    );

    let app = build_app(
        AppState {
            pool,
            pipeline: Arc::new(pipeline),
        },
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, "starting tubelens server");
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
