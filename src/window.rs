//! Fixed-depth measurement history.
//!
//! The window always holds exactly [`WINDOW_SLOTS`] readings indexed by recency:
//! slot 0 is the newest, slot `WINDOW_SLOTS - 1` the oldest retained. Storage is a
//! ring buffer, so a push is O(1) while `get(lag)` keeps the slot semantics of a
//! fully shifted array.

use crate::measurement::Measurement;

/// One slot per 3-minute sample, roughly 24 hours of history.
pub const WINDOW_SLOTS: usize = 480;

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementWindow {
    slots: Vec<Measurement>,
    /// Physical index of slot 0
    head: usize,
}

impl MeasurementWindow {
    /// Creates a window with every slot holding `seed`.
    pub fn seeded(seed: Measurement) -> Self {
        Self {
            slots: vec![seed; WINDOW_SLOTS],
            head: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reading `lag` samples back from the newest one.
    ///
    /// # Panics
    /// If `lag >= WINDOW_SLOTS`.
    #[inline]
    pub fn get(&self, lag: usize) -> &Measurement {
        assert!(lag < WINDOW_SLOTS, "lag {lag} outside window");
        &self.slots[(self.head + lag) % WINDOW_SLOTS]
    }

    #[inline]
    pub fn latest(&self) -> &Measurement {
        self.get(0)
    }

    #[inline]
    pub fn pressure(&self, lag: usize) -> f64 {
        self.get(lag).pressure_hpa
    }

    /// Shifts every reading one slot older and fills slot 0.
    ///
    /// When `source_ok` is false the new slot 0 repeats the previous newest reading
    /// and `measurement` is ignored.
    pub fn push(&mut self, measurement: Measurement, source_ok: bool) {
        let previous_head = self.head;
        // The oldest slot sits just before the head; it becomes the new slot 0.
        self.head = (self.head + WINDOW_SLOTS - 1) % WINDOW_SLOTS;

        self.slots[self.head] = if source_ok {
            measurement
        } else {
            self.slots[previous_head].clone()
        };
    }

    /// Readings newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Measurement> + '_ {
        (0..WINDOW_SLOTS).map(move |lag| self.get(lag))
    }

    /// Pressure values from `from` to the oldest slot.
    pub fn pressure_suffix(&self, from: usize) -> impl Iterator<Item = f64> + '_ {
        (from..WINDOW_SLOTS).map(move |lag| self.pressure(lag))
    }
}

impl Default for MeasurementWindow {
    fn default() -> Self {
        Self::seeded(Measurement::baseline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(pressure: f64) -> Measurement {
        Measurement::new(pressure, 10.0, 50, format!("p{pressure}"))
    }

    #[test]
    fn test_seeded_window_is_full() {
        let window = MeasurementWindow::default();
        assert_eq!(window.len(), WINDOW_SLOTS);
        assert!(window.iter().all(|m| *m == Measurement::baseline()));
    }

    #[test]
    fn test_shift_order() {
        let mut window = MeasurementWindow::default();
        let k = 7;
        for i in 0..k {
            window.push(reading(900.0 + i as f64), true);
        }

        // slot[i] holds the reading pushed (k - 1 - i) steps ago
        for i in 0..k {
            let expected = 900.0 + (k - 1 - i) as f64;
            assert_eq!(window.pressure(i), expected);
        }
        for i in k..WINDOW_SLOTS {
            assert_eq!(*window.get(i), Measurement::baseline());
        }
    }

    #[test]
    fn test_full_cycle_evicts_seed() {
        let mut window = MeasurementWindow::default();
        for i in 0..WINDOW_SLOTS {
            window.push(reading(i as f64), true);
        }
        assert_eq!(window.pressure(0), (WINDOW_SLOTS - 1) as f64);
        assert_eq!(window.pressure(WINDOW_SLOTS - 1), 0.0);
        assert!(window.iter().all(|m| *m != Measurement::baseline()));

        // One more push drops the oldest
        window.push(reading(5000.0), true);
        assert_eq!(window.pressure(0), 5000.0);
        assert_eq!(window.pressure(WINDOW_SLOTS - 1), 1.0);
        assert_eq!(window.len(), WINDOW_SLOTS);
    }

    #[test]
    fn test_failed_source_repeats_latest() {
        let mut window = MeasurementWindow::default();
        window.push(reading(1001.0), true);
        window.push(reading(1002.0), true);
        let before = window.latest().clone();

        window.push(reading(1.0), false);

        assert_eq!(*window.latest(), before);
        assert_eq!(*window.get(1), before);
        assert_eq!(window.pressure(2), 1001.0);
    }

    #[test]
    fn test_pressure_suffix_range() {
        let mut window = MeasurementWindow::default();
        window.push(reading(1000.0), true);
        let suffix: Vec<f64> = window.pressure_suffix(WINDOW_SLOTS - 2).collect();
        assert_eq!(suffix, vec![1012.0, 1012.0]);
        assert_eq!(window.pressure_suffix(0).next(), Some(1000.0));
    }
}
