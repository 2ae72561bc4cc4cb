//! Process-wide prometheus metrics, registered with the default registry on first use.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Gauge, IntCounter, IntGaugeVec, Opts, TextEncoder};

use crate::forecast::Flag;
use crate::snapshot::Snapshot;

pub static FETCH_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new(
        "hyperweather_fetch_total",
        "Weather source requests attempted",
    ))
});

pub static FETCH_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new(
        "hyperweather_fetch_failures_total",
        "Weather source requests that fell back to the previous reading",
    ))
});

pub static CYCLES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new(
        "hyperweather_cycles_total",
        "Completed ingestion cycles",
    ))
});

pub static REPORTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new(
        "hyperweather_reports_total",
        "Snapshot reports served",
    ))
});

pub static SNAPSHOT_GENERATION: Lazy<Gauge> = Lazy::new(|| {
    register(Gauge::new(
        "hyperweather_snapshot_generation",
        "Generation of the currently published snapshot",
    ))
});

pub static LAST_UPDATE: Lazy<Gauge> = Lazy::new(|| {
    register(Gauge::new(
        "hyperweather_last_update_timestamp_seconds",
        "Unix time at which the current snapshot was observed",
    ))
});

pub static FORECAST_FLAGS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register(IntGaugeVec::new(
        Opts::new(
            "hyperweather_forecast_flag",
            "Forecast flags of the current snapshot (1 = raised)",
        ),
        &["flag"],
    ))
});

fn register<M>(metric: prometheus::Result<M>) -> M
where
    M: prometheus::core::Collector + Clone + 'static,
{
    // Metric names are static; a failure here is a programming error.
    let metric = metric.expect("valid metric definition");
    prometheus::register(Box::new(metric.clone())).expect("metric registered once");
    metric
}

/// Forces registration so every series shows up on the first scrape.
pub fn init() {
    Lazy::force(&FETCH_TOTAL);
    Lazy::force(&FETCH_FAILURES);
    Lazy::force(&CYCLES_TOTAL);
    Lazy::force(&REPORTS_TOTAL);
    Lazy::force(&SNAPSHOT_GENERATION);
    Lazy::force(&LAST_UPDATE);
    Lazy::force(&FORECAST_FLAGS);
}

pub fn record_snapshot(snapshot: &Snapshot) {
    SNAPSHOT_GENERATION.set(snapshot.generation as f64);
    LAST_UPDATE.set(snapshot.observed_at.timestamp_millis() as f64 / 1000.0);
    for flag in Flag::ALL {
        FORECAST_FLAGS
            .with_label_values(&[flag.label()])
            .set(i64::from(snapshot.flags.get(flag)));
    }
}

/// Text exposition of the default registry.
pub fn encode() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
