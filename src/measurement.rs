//! A single weather reading as stored in the history window.

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Sea-level pressure in whole millibars (hPa)
    pub pressure_hpa: f64,
    /// Air temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity, 0-100
    pub humidity_pct: u8,
    /// Short condition label, e.g. "light rain"
    pub condition: String,
}

impl Measurement {
    pub fn new(
        pressure_hpa: f64,
        temperature_c: f64,
        humidity_pct: u8,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            pressure_hpa,
            temperature_c,
            humidity_pct,
            condition: condition.into(),
        }
    }

    /// Builds a measurement from the raw units reported by the weather service.
    pub fn from_kelvin(
        pressure_hpa: i64,
        temperature_k: f64,
        humidity_pct: u8,
        condition: impl Into<String>,
    ) -> Self {
        Self::new(
            pressure_hpa as f64,
            kelvin_to_celsius(temperature_k),
            humidity_pct,
            condition,
        )
    }

    /// Reading used to fill every slot at startup.
    pub fn baseline() -> Self {
        Self::new(1012.0, 18.0, 65, "clear sky")
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::baseline()
    }
}

#[inline]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_conversion() {
        let m = Measurement::from_kelvin(1009, 291.15, 70, "few clouds");
        assert_eq!(m.pressure_hpa, 1009.0);
        assert!((m.temperature_c - 18.0).abs() < 1e-9);
        assert_eq!(m.humidity_pct, 70);
        assert_eq!(m.condition, "few clouds");
    }

    #[test]
    fn test_baseline_values() {
        let m = Measurement::baseline();
        assert_eq!(m.pressure_hpa, 1012.0);
        assert_eq!(m.temperature_c, 18.0);
        assert_eq!(m.humidity_pct, 65);
        assert_eq!(m.condition, "clear sky");
    }
}
