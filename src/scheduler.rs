//! Background ingestion loop: fetch, push, classify, publish, sleep.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::forecast::ForecastEngine;
use crate::measurement::Measurement;
use crate::metrics;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::source::WeatherSource;
use crate::window::MeasurementWindow;

/// Three minutes between samples.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(180);

pub struct IngestionScheduler<S> {
    source: S,
    engine: ForecastEngine,
    /// Working copy; only this task mutates it.
    window: MeasurementWindow,
    store: Arc<SnapshotStore>,
    interval: Duration,
    generation: u64,
}

impl<S: WeatherSource> IngestionScheduler<S> {
    /// Continues from whatever snapshot `store` currently holds.
    pub fn new(source: S, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        let current = store.load();
        Self {
            source,
            engine: ForecastEngine::new(),
            window: current.window.clone(),
            store,
            interval,
            generation: current.generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One full cycle. Returns the generation that was published.
    pub async fn step(&mut self) -> u64 {
        metrics::FETCH_TOTAL.inc();
        let (measurement, source_ok) = match self.source.fetch().await {
            Ok(m) => (m, true),
            Err(e) => {
                metrics::FETCH_FAILURES.inc();
                warn!(error = %e, "Weather fetch failed, repeating last reading");
                (Measurement::default(), false)
            }
        };

        self.ingest(measurement, source_ok)
    }

    /// Pushes one reading, reclassifies and publishes the result.
    pub fn ingest(&mut self, measurement: Measurement, source_ok: bool) -> u64 {
        self.window.push(measurement, source_ok);
        let flags = self.engine.classify(&self.window);
        self.generation += 1;

        let snapshot = Snapshot {
            generation: self.generation,
            window: self.window.clone(),
            flags,
            source_ok,
            observed_at: Utc::now(),
        };
        metrics::CYCLES_TOTAL.inc();
        metrics::record_snapshot(&snapshot);

        let latest = snapshot.latest();
        debug!(
            generation = self.generation,
            observed_at = %snapshot.observed_at.to_rfc3339(),
            pressure = latest.pressure_hpa,
            temperature = latest.temperature_c,
            humidity = latest.humidity_pct,
            condition = %latest.condition,
            a = flags.a,
            b = flags.b,
            c = flags.c,
            d = flags.d,
            "Snapshot published"
        );

        self.store.publish(snapshot);

        self.generation
    }

    /// Runs until `shutdown` is cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Ingestion scheduler active.");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = self.step() => {}
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(generation = self.generation, "Ingestion scheduler stopped.");
    }
}
