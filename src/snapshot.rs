//! Published state shared between the ingestion task and query handlers.
//!
//! The scheduler builds a complete [`Snapshot`] after every cycle and swaps it in
//! atomically. Readers hold an `Arc` to whichever snapshot was current when they
//! loaded it, so a window is always paired with the flags computed from it.

use std::fmt::Write as _;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::forecast::{ForecastEngine, ForecastFlags};
use crate::measurement::Measurement;
use crate::window::MeasurementWindow;

pub const PROGRAM_BANNER: &str = "HyperWeather";

#[derive(Debug, Clone)]
pub struct Snapshot {
    /// 0 for the seeded state, then one per completed cycle
    pub generation: u64,
    pub window: MeasurementWindow,
    pub flags: ForecastFlags,
    /// Whether slot 0 came from a successful fetch
    pub source_ok: bool,
    pub observed_at: DateTime<Utc>,
}

impl Snapshot {
    /// Generation 0: the window as seeded, classified once.
    pub fn initial(window: MeasurementWindow, engine: &ForecastEngine) -> Self {
        let flags = engine.classify(&window);
        Self {
            generation: 0,
            window,
            flags,
            source_ok: false,
            observed_at: Utc::now(),
        }
    }

    pub fn latest(&self) -> &Measurement {
        self.window.latest()
    }
}

pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }
}

/// Read side used by the query interface.
#[derive(Clone)]
pub struct SnapshotReader {
    store: Arc<SnapshotStore>,
}

impl SnapshotReader {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.store.load()
    }

    pub fn report(&self) -> String {
        render_report(&self.current())
    }
}

/// Human-readable report: banner, latest reading, then one line per raised flag.
pub fn render_report(snapshot: &Snapshot) -> String {
    let latest = snapshot.latest();
    let mut out = String::with_capacity(256);

    let _ = write!(
        out,
        "{PROGRAM_BANNER}\n\n\
         Latest reading:\n  \
         - Pressure: {:.0} millibar\n  \
         - Temperature: {:.2} °C\n  \
         - Humidity: {} %\n  \
         - Conditions: {}.",
        latest.pressure_hpa, latest.temperature_c, latest.humidity_pct, latest.condition,
    );

    if snapshot.flags.any() {
        out.push_str("\n\nForecast:\n");
        for flag in snapshot.flags.raised() {
            let _ = writeln!(out, " - {}", flag.message());
        }
    }

    out
}
