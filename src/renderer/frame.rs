use glam::{Mat4, Quat, Vec3};

use crate::consts::CAR_MODEL_SCALE;
use crate::sim::CameraPose;

/// Everything the scene graph needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Model transform for the car (scale + translation)
    pub car_transform: Mat4,
    pub camera: CameraPose,
}

impl FrameSnapshot {
    pub fn new(car_position: Vec3, camera: CameraPose) -> Self {
        Self {
            car_transform: Mat4::from_scale_rotation_translation(
                Vec3::splat(CAR_MODEL_SCALE),
                Quat::IDENTITY,
                car_position,
            ),
            camera,
        }
    }

    pub fn car_position(&self) -> Vec3 {
        self.car_transform.w_axis.truncate()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }
}

/// Consumer of per-frame snapshots
pub trait SceneRenderer {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl SceneRenderer for NullRenderer {
    fn present(&mut self, frame: &FrameSnapshot) {
        self.frames += 1;
        log::trace!(
            "frame {}: car {:?} camera {:?}",
            self.frames,
            frame.car_position(),
            frame.camera.position
        );
    }
}
