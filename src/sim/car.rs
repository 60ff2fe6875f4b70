//! Car motion integration
//!
//! Steering is purely lateral: deltas are added to x, nothing else moves.

use glam::Vec3;

/// The player's car
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarMotion {
    position: Vec3,
}

impl CarMotion {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Apply a lateral steering delta (unclamped)
    #[inline]
    pub fn apply_delta(&mut self, dx: f32) {
        self.position.x += dx;
    }

    /// Snapshot of the current position
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TiltInput;
    use proptest::prelude::*;

    #[test]
    fn test_delta_moves_x_only() {
        let mut car = CarMotion::new(Vec3::new(1.0, 0.5, -3.0));
        car.apply_delta(2.0);
        car.apply_delta(-0.5);
        assert_eq!(car.position(), Vec3::new(2.5, 0.5, -3.0));
    }

    #[test]
    fn test_tilt_sequence_accumulates() {
        // 10 - 5 + 3 degrees at 0.1 per degree
        let tilt = TiltInput::default();
        let mut car = CarMotion::default();
        for gamma in [10.0, -5.0, 3.0] {
            if let Some(dx) = tilt.steering_delta(Some(gamma)) {
                car.apply_delta(dx);
            }
        }
        assert!((car.position().x - 0.8).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_position_is_scaled_sum(
            start in -50.0f32..50.0,
            angles in prop::collection::vec(-90.0f64..90.0, 0..64),
        ) {
            let tilt = TiltInput::default();
            let mut car = CarMotion::new(Vec3::new(start, 0.0, 0.0));
            for &gamma in &angles {
                car.apply_delta(tilt.steering_delta(Some(gamma)).unwrap());
            }
            let expected = start as f64 + 0.1 * angles.iter().sum::<f64>();
            prop_assert!((car.position().x as f64 - expected).abs() < 1e-2);
        }

        #[test]
        fn prop_order_does_not_matter(
            angles in prop::collection::vec(-90.0f64..90.0, 1..32),
        ) {
            let tilt = TiltInput::default();
            let mut forward = CarMotion::default();
            let mut backward = CarMotion::default();
            for &gamma in &angles {
                forward.apply_delta(tilt.steering_delta(Some(gamma)).unwrap());
            }
            for &gamma in angles.iter().rev() {
                backward.apply_delta(tilt.steering_delta(Some(gamma)).unwrap());
            }
            prop_assert!((forward.position().x - backward.position().x).abs() < 1e-2);
        }
    }
}
