//! Fixed-period timer driven by elapsed time

/// Repeating task schedule advanced by the caller's clock
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period_ms: u32,
    accumulator_ms: f64,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulator_ms: 0.0,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Advance by `dt_ms` and return how many periods elapsed
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.accumulator_ms += dt_ms;
        }
        let period = self.period_ms as f64;
        let mut fires = 0;
        while self.accumulator_ms >= period {
            self.accumulator_ms -= period;
            fires += 1;
        }
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let mut timer = Interval::new(1000);
        assert_eq!(timer.advance(999.0), 0);
        assert_eq!(timer.advance(1.0), 1);
        assert_eq!(timer.advance(2500.0), 2);
        assert_eq!(timer.advance(500.0), 1);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut timer = Interval::new(16);
        assert_eq!(timer.advance(-100.0), 0);
        assert_eq!(timer.advance(f64::NAN), 0);
        assert_eq!(timer.advance(16.0), 1);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let timer = Interval::new(0);
        assert_eq!(timer.period_ms(), 1);
    }
}
