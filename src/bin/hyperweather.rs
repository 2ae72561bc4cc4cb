//! HyperWeather server
//!
//! Samples current conditions for one city every few minutes, keeps a 24-hour
//! history and serves the latest reading with forecast flags at `GET /`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hyperweather::{
    ForecastEngine, IngestionScheduler, MeasurementWindow, Snapshot, SnapshotReader,
    SnapshotStore,
    config::Config,
    metrics, server,
    snapshot::PROGRAM_BANNER,
    source::OpenWeatherClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("{PROGRAM_BANNER} is starting...");
    metrics::init();

    if config.api_key.is_empty() {
        warn!("APIkey is not set; weather requests will fail and repeat the baseline");
    }
    if config.city.is_empty() {
        warn!("CityCode is not set");
    }

    let engine = ForecastEngine::new();
    let initial = Snapshot::initial(MeasurementWindow::default(), &engine);
    metrics::record_snapshot(&initial);
    let store = Arc::new(SnapshotStore::new(initial));

    let source = OpenWeatherClient::new(config.source()).context("building weather client")?;
    let scheduler = IngestionScheduler::new(source, store.clone(), config.interval());

    let shutdown = CancellationToken::new();
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown.clone()));

    if config.port.is_none() {
        info!(port = config.port(), "Defaulting to port");
    }
    let (host, port) = config.bind_target();
    let listener = server::bind(host, port).await?;
    let addr = listener.local_addr().context("reading bound address")?;

    info!(%addr, "Listening.");
    info!("Open http://localhost:{} in the browser", config.port());

    let app = server::router(SnapshotReader::new(store));
    let server_shutdown = shutdown.clone();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for CTRL+C");
                std::future::pending::<()>().await;
            }
            info!("Shutting down...");
            server_shutdown.cancel();
        })
        .await
        .context("server error")?;

    shutdown.cancel();
    scheduler_handle.await.context("scheduler task panicked")?;
    info!("Goodbye.");

    Ok(())
}
