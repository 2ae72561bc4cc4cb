//! HyperWeather: a 24-hour rolling history of weather readings with
//! threshold-based forecast flags, served over HTTP.

pub mod algo;
pub mod config;
pub mod forecast;
pub mod measurement;
pub mod metrics;
pub mod scheduler;
pub mod server;
pub mod snapshot;
pub mod source;
pub mod window;

pub use forecast::{Flag, ForecastEngine, ForecastFlags};
pub use measurement::Measurement;
pub use scheduler::IngestionScheduler;
pub use snapshot::{Snapshot, SnapshotReader, SnapshotStore};
pub use window::{MeasurementWindow, WINDOW_SLOTS};
