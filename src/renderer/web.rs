//! Hands frames to the page's scene graph through `window.gooraScene`

use wasm_bindgen::prelude::*;

use super::frame::{FrameSnapshot, SceneRenderer};

// The page installs `window.gooraScene = { present(car, eye, target, view) }` once
// its models have loaded. `view` is the column-major camera view matrix.
// Until then (or if loading failed) frames are dropped.
#[wasm_bindgen(inline_js = "
    export function present_frame(car, eye, target, view) {
        const scene = window.gooraScene;
        if (scene && typeof scene.present === 'function') {
            scene.present(car, eye, target, view);
            return true;
        }
        return false;
    }
")]
extern "C" {
    fn present_frame(car: &[f32], eye: &[f32], target: &[f32], view: &[f32]) -> bool;
}

/// Forwards snapshots to the JS scene graph
#[derive(Debug, Default)]
pub struct JsSceneRenderer {
    attached: bool,
}

impl SceneRenderer for JsSceneRenderer {
    fn present(&mut self, frame: &FrameSnapshot) {
        let car = frame.car_transform.to_cols_array();
        let eye = frame.camera.position.to_array();
        let target = frame.camera.target.to_array();
        let view = frame.view_matrix().to_cols_array();

        let attached = present_frame(&car, &eye, &target, &view);
        if attached != self.attached {
            if attached {
                log::info!("Scene graph attached");
            } else {
                log::warn!("Scene graph detached - frames dropped");
            }
            self.attached = attached;
        }
    }
}
