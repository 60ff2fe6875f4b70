//! Browser timers and listeners that clean up after themselves
//!
//! Dropping a handle cancels the interval / removes the listener, so a scene
//! that owns its handles cannot leak callbacks past teardown.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

/// A running `setInterval`, cleared on drop
pub struct IntervalHandle {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    pub fn start(period_ms: u32, callback: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut()>::new(callback);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(|e| log::warn!("setInterval failed: {:?}", e))
            .ok()?;
        Some(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

/// A DOM event listener, removed on drop
pub struct ListenerHandle {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerHandle {
    /// Listen for `event` on `target`, downcasting each event to `E`
    pub fn attach<E>(
        target: &EventTarget,
        event: &'static str,
        mut callback: impl FnMut(E) + 'static,
    ) -> Option<Self>
    where
        E: JsCast + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |ev: web_sys::Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                callback(ev);
            }
        });
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| log::warn!("Failed to listen for {}: {:?}", event, e))
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
