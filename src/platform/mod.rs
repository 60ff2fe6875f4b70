//! Platform abstraction layer
//!
//! Repeating tasks and event subscriptions as scoped resources:
//! - `timer`: fixed-period accumulator for headless/native runs
//! - `web`: `setInterval` and DOM listener handles that release on drop

pub mod timer;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use timer::Interval;
#[cfg(target_arch = "wasm32")]
pub use web::{IntervalHandle, ListenerHandle};
