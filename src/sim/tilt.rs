//! Device tilt to steering conversion
//!
//! The lateral orientation reading (gamma, degrees, roughly -90..90) is scaled
//! into a steering delta. One reading yields at most one delta; nothing is
//! buffered between readings.

use crate::consts::TILT_SCALE;

/// Converts lateral tilt samples into steering deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltInput {
    scale: f32,
}

impl Default for TiltInput {
    fn default() -> Self {
        Self::new(TILT_SCALE)
    }
}

impl TiltInput {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Steering delta for one tilt sample.
    ///
    /// Browsers without an orientation sensor deliver events with a null
    /// gamma; those (and non-finite readings) produce no delta.
    pub fn steering_delta(&self, gamma: Option<f64>) -> Option<f32> {
        let angle = gamma.filter(|g| g.is_finite())? as f32;
        Some(angle * self.scale)
    }
}
