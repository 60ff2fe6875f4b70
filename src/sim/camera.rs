//! Trailing chase camera
//!
//! Each tick the camera covers a fixed fraction of the distance to a point
//! behind and above the car, then re-aims at the car. The lag this produces
//! is the whole effect; the camera never snaps to its target.

use glam::{Mat4, Vec3};
use crate::consts::{CAMERA_OFFSET, CAMERA_SMOOTHING, CAMERA_START};
use crate::smooth_toward;

/// Camera position and look-at target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    /// Right-handed view matrix for the renderer
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}

/// Follows the car with exponential smoothing
#[derive(Debug, Clone)]
pub struct CameraFollower {
    pose: CameraPose,
    offset: Vec3,
    smoothing: f32,
}

impl Default for CameraFollower {
    fn default() -> Self {
        Self::new(CAMERA_START, CAMERA_OFFSET, CAMERA_SMOOTHING)
    }
}

impl CameraFollower {
    pub fn new(start: Vec3, offset: Vec3, smoothing: f32) -> Self {
        Self {
            pose: CameraPose {
                position: start,
                target: Vec3::ZERO,
            },
            offset,
            smoothing,
        }
    }

    /// Where the camera wants to be for a car at `car`
    #[inline]
    pub fn desired_position(&self, car: Vec3) -> Vec3 {
        car + self.offset
    }

    /// Advance one fixed tick toward the car
    pub fn tick(&mut self, car: Vec3) {
        let desired = self.desired_position(car);
        self.pose.position = smooth_toward(self.pose.position, desired, self.smoothing);
        self.pose.target = car;
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_car_keeps_camera_in_place() {
        let mut camera = CameraFollower::default();
        camera.tick(Vec3::ZERO);
        assert_eq!(camera.pose().position, Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(camera.pose().target, Vec3::ZERO);
    }

    #[test]
    fn test_single_tick_covers_tenth_of_gap() {
        let mut camera = CameraFollower::default();
        camera.tick(Vec3::new(10.0, 0.0, 0.0));
        let pose = camera.pose();
        assert!((pose.position.x - 1.0).abs() < 1e-5);
        assert!((pose.position.y - 2.0).abs() < 1e-5);
        assert!((pose.position.z - 5.0).abs() < 1e-5);
        assert_eq!(pose.target, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let car = Vec3::new(-6.0, 0.0, 0.0);
        let mut camera = CameraFollower::default();
        let mut last_gap = f32::MAX;
        for _ in 0..200 {
            camera.tick(car);
            let gap = camera.pose().position.distance(camera.desired_position(car));
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
        assert!(camera.pose().position.x >= -6.0);
    }

    #[test]
    fn test_view_matrix_looks_at_target() {
        let mut camera = CameraFollower::default();
        camera.tick(Vec3::ZERO);
        let view = camera.pose().view_matrix();
        // The target lands on the negative z axis in view space
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!(p.z < 0.0);
    }
}
