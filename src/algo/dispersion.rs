//! Standard-deviation-like spread of the pressure series.
//!
//! The mean divides the suffix sum by the full window size rather than by the
//! number of summed samples. For `from > 0` that yields a mean smaller than the
//! arithmetic mean of the suffix, and the spread grows accordingly. Callers rely on
//! the exact figure, so keep it.

use crate::window::{MeasurementWindow, WINDOW_SLOTS};

/// Spread of `pressure[from..WINDOW_SLOTS]`.
///
/// Returns `0.0` when the suffix has fewer than two samples (no degrees of
/// freedom). Never negative.
pub fn suffix_dispersion(window: &MeasurementWindow, from: usize) -> f64 {
    if from + 1 >= WINDOW_SLOTS {
        return 0.0;
    }

    let sum: f64 = window.pressure_suffix(from).sum();
    let mean = sum / WINDOW_SLOTS as f64;

    let squares: f64 = window
        .pressure_suffix(from)
        .map(|p| (p - mean).powi(2))
        .sum();

    let spread = (squares / (WINDOW_SLOTS - from - 1) as f64).sqrt();
    if spread.is_nan() { 0.0 } else { spread }
}
