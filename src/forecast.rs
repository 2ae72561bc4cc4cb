//! Threshold forecast rules evaluated over the measurement window.
//!
//! Four independent classifiers run in a fixed order every cycle. D reads the
//! A/B/C results of the same pass, so order matters only for D.

use crate::algo::suffix_dispersion;
use crate::window::{MeasurementWindow, WINDOW_SLOTS};

/// About 9 minutes back.
pub const LAG_SHORT: usize = 3;
/// About 4h45m back.
pub const LAG_MEDIUM: usize = 95;
/// Oldest slot, about 24 hours back.
pub const LAG_DAY: usize = WINDOW_SLOTS - 1;

/// Minimum pressure fall (hPa) between the lagged slot and now.
pub const PRESSURE_DROP_HPA: f64 = 3.5;

const B_MAX_DISPERSION: f64 = -4.0;
const B_MIN_HUMIDITY_RISE: i32 = 20;
const B_MIN_TEMPERATURE_FALL: f64 = 2.0;
const C_MAX_DISPERSION: f64 = 2.5;
const D_MAX_DISPERSION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    A,
    B,
    C,
    D,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::A, Flag::B, Flag::C, Flag::D];

    pub fn label(self) -> &'static str {
        match self {
            Flag::A => "A",
            Flag::B => "B",
            Flag::C => "C",
            Flag::D => "D",
        }
    }

    /// Line shown in the report when the flag is raised.
    pub fn message(self) -> &'static str {
        match self {
            Flag::A => "Thunderstorm or heavy rain within the hour.",
            Flag::B => "Rain expected tomorrow.",
            Flag::C => "Bad weather in about five days, lasting several days.",
            Flag::D => "Weather improving or stable.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForecastFlags {
    /// Storm or heavy rain within the hour
    pub a: bool,
    /// Rain the following day
    pub b: bool,
    /// Long-range bad weather
    pub c: bool,
    /// Improving or steady conditions
    pub d: bool,
}

impl ForecastFlags {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::A => self.a,
            Flag::B => self.b,
            Flag::C => self.c,
            Flag::D => self.d,
        }
    }

    pub fn any(&self) -> bool {
        self.a || self.b || self.c || self.d
    }

    /// Raised flags in A, B, C, D order.
    pub fn raised(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(move |f| self.get(*f))
    }
}

/// Stateless classifier set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs A, B, C then D against the current window.
    pub fn classify(&self, window: &MeasurementWindow) -> ForecastFlags {
        let a = self.storm_within_hour(window);
        let b = self.rain_tomorrow(window);
        let c = self.long_range_bad_weather(window);
        let d = self.improving(window, a, b, c);
        ForecastFlags { a, b, c, d }
    }

    fn pressure_drop(window: &MeasurementWindow, lag: usize) -> f64 {
        window.pressure(lag) - window.pressure(0)
    }

    pub fn storm_within_hour(&self, window: &MeasurementWindow) -> bool {
        Self::pressure_drop(window, LAG_SHORT) > PRESSURE_DROP_HPA
    }

    /// The dispersion clause (`<= -4.0`) can never hold for a non-negative
    /// spread, so this rule never fires. Kept as published.
    pub fn rain_tomorrow(&self, window: &MeasurementWindow) -> bool {
        let now = window.latest();
        let then = window.get(LAG_MEDIUM);

        Self::pressure_drop(window, LAG_MEDIUM) > PRESSURE_DROP_HPA
            && suffix_dispersion(window, LAG_MEDIUM) <= B_MAX_DISPERSION
            && i32::from(now.humidity_pct) - i32::from(then.humidity_pct) >= B_MIN_HUMIDITY_RISE
            && then.temperature_c - now.temperature_c >= B_MIN_TEMPERATURE_FALL
            && now.condition != then.condition
    }

    pub fn long_range_bad_weather(&self, window: &MeasurementWindow) -> bool {
        Self::pressure_drop(window, LAG_DAY) > PRESSURE_DROP_HPA
            && suffix_dispersion(window, LAG_DAY) <= C_MAX_DISPERSION
    }

    pub fn improving(&self, window: &MeasurementWindow, a: bool, b: bool, c: bool) -> bool {
        !a && !b && !c && suffix_dispersion(window, LAG_DAY) <= D_MAX_DISPERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;

    fn push_pressure(window: &mut MeasurementWindow, pressure: f64) {
        window.push(Measurement::new(pressure, 18.0, 65, "clear sky"), true);
    }

    /// Window where slot 0 is `now` and slot `lag` is `then`.
    fn window_with_lag(lag: usize, then: Measurement, now: Measurement) -> MeasurementWindow {
        let mut window = MeasurementWindow::default();
        window.push(then, true);
        for _ in 1..lag {
            window.push(Measurement::baseline(), true);
        }
        window.push(now, true);
        window
    }

    #[test]
    fn test_baseline_only_improving() {
        let flags = ForecastEngine::new().classify(&MeasurementWindow::default());
        assert_eq!(
            flags,
            ForecastFlags {
                a: false,
                b: false,
                c: false,
                d: true
            }
        );
        assert_eq!(flags.raised().collect::<Vec<_>>(), vec![Flag::D]);
    }

    #[test]
    fn test_flag_a_threshold() {
        let mut window = MeasurementWindow::default();
        push_pressure(&mut window, 1004.0);
        push_pressure(&mut window, 1003.0);
        push_pressure(&mut window, 1001.0);
        push_pressure(&mut window, 1000.0);
        assert_eq!(window.pressure(3), 1004.0);
        assert_eq!(window.pressure(0), 1000.0);

        let flags = ForecastEngine::new().classify(&window);
        assert!(flags.a);
        assert!(!flags.d, "D requires A to be false");

        let mut window = MeasurementWindow::default();
        push_pressure(&mut window, 1002.0);
        push_pressure(&mut window, 1001.0);
        push_pressure(&mut window, 1001.0);
        push_pressure(&mut window, 1000.0);
        assert!(!ForecastEngine::new().classify(&window).a);
    }

    #[test]
    fn test_flag_a_exact_threshold_is_not_enough() {
        let mut window = MeasurementWindow::default();
        push_pressure(&mut window, 1003.5);
        push_pressure(&mut window, 1001.0);
        push_pressure(&mut window, 1001.0);
        push_pressure(&mut window, 1000.0);
        assert!(!ForecastEngine::new().storm_within_hour(&window));
    }

    #[test]
    fn test_flag_b_never_fires() {
        // Every clause except dispersion holds.
        let then = Measurement::new(1020.0, 22.0, 40, "clear sky");
        let now = Measurement::new(1010.0, 15.0, 90, "moderate rain");
        let window = window_with_lag(LAG_MEDIUM, then, now);

        let engine = ForecastEngine::new();
        assert!(window.pressure(LAG_MEDIUM) - window.pressure(0) > PRESSURE_DROP_HPA);
        assert!(suffix_dispersion(&window, LAG_MEDIUM) > B_MAX_DISPERSION);
        assert!(!engine.rain_tomorrow(&window));
        assert!(!engine.classify(&window).b);
    }

    #[test]
    fn test_flag_c_pressure_drop_over_day() {
        let then = Measurement::new(1020.0, 18.0, 65, "clear sky");
        let now = Measurement::new(1012.0, 18.0, 65, "clear sky");
        let window = window_with_lag(LAG_DAY, then, now);

        let flags = ForecastEngine::new().classify(&window);
        assert!(flags.c);
        assert!(!flags.a);
        assert!(!flags.d);
    }

    #[test]
    fn test_flag_c_needs_drop() {
        let then = Measurement::new(1014.0, 18.0, 65, "clear sky");
        let now = Measurement::new(1012.0, 18.0, 65, "clear sky");
        let window = window_with_lag(LAG_DAY, then, now);

        let flags = ForecastEngine::new().classify(&window);
        assert!(!flags.c);
        assert!(flags.d);
    }

    #[test]
    fn test_flag_d_blocked_by_a() {
        let engine = ForecastEngine::new();
        let window = MeasurementWindow::default();
        assert!(engine.improving(&window, false, false, false));
        assert!(!engine.improving(&window, true, false, false));
        assert!(!engine.improving(&window, false, true, false));
        assert!(!engine.improving(&window, false, false, true));
    }

    #[test]
    fn test_flags_raised_order() {
        let flags = ForecastFlags {
            a: true,
            b: false,
            c: true,
            d: true,
        };
        assert_eq!(
            flags.raised().collect::<Vec<_>>(),
            vec![Flag::A, Flag::C, Flag::D]
        );
        assert!(flags.any());
        assert!(!ForecastFlags::default().any());
    }
}
