//! Frame contract for the external scene graph
//!
//! The 3D scene (track, car model, lighting) is owned by the host page. Each
//! frame the core hands over a car transform and a camera pose; asset loading
//! and any failure there stay on the host's side.

pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use frame::{FrameSnapshot, NullRenderer, SceneRenderer};
#[cfg(target_arch = "wasm32")]
pub use web::JsSceneRenderer;
