//! Audio cue dispatch
//!
//! Cues are fire-and-forget: a sink may drop them (no audio context, muted)
//! and the quiz never waits on or hears back from playback. On wasm the
//! cues are synthesized with the Web Audio API, so no sound files are needed.

use crate::sim::Cue;

/// Anything that can play a named cue
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Records cues instead of playing them (headless runs and tests)
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    pub played: Vec<Cue>,
}

impl CueLog {
    pub fn count(&self, cue: Cue) -> usize {
        self.played.iter().filter(|&&c| c == cue).count()
    }
}

impl CueSink for CueLog {
    fn play(&mut self, cue: Cue) {
        log::info!("cue: {}", cue.as_str());
        self.played.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::CueSink;
    use crate::sim::Cue;

    /// Volume of the looping engine drone relative to master
    const DRONE_VOLUME: f32 = 0.4;

    /// Web Audio cue player with a looping engine drone
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
        drone: Option<(OscillatorNode, GainNode)>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
                drone: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if let Some((_, gain)) = &self.drone {
                gain.gain().set_value(self.drone_volume());
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        fn drone_volume(&self) -> f32 {
            self.effective_volume() * DRONE_VOLUME * 0.25
        }

        /// Start the looping engine drone (no-op if already running)
        pub fn start_drone(&mut self) {
            if self.drone.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = create_osc(ctx, 55.0, OscillatorType::Sawtooth) else {
                return;
            };
            gain.gain().set_value(self.drone_volume());
            if osc.start().is_ok() {
                self.drone = Some((osc, gain));
            }
        }

        pub fn stop_drone(&mut self) {
            if let Some((osc, gain)) = self.drone.take() {
                osc.stop().ok();
                gain.disconnect().ok();
            }
        }

        /// Correct - rising two-note chime
        fn play_correct(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0, 990.0].iter().enumerate() {
                let delay = i as f64 * 0.09;
                if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.35, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// Wrong - falling buzz
        fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.45)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }
    }

    impl CueSink for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Correct => self.play_correct(ctx, vol),
                Cue::Wrong => self.play_wrong(ctx, vol),
            }
        }
    }

    impl Drop for AudioManager {
        fn drop(&mut self) {
            self.stop_drone();
            if let Some(ctx) = &self.ctx {
                let _ = ctx.close();
            }
        }
    }

    /// Oscillator routed through a gain node to the destination
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log_records_in_order() {
        let mut log = CueLog::default();
        log.play(Cue::Correct);
        log.play(Cue::Wrong);
        log.play(Cue::Correct);
        assert_eq!(log.played, vec![Cue::Correct, Cue::Wrong, Cue::Correct]);
        assert_eq!(log.count(Cue::Correct), 2);
        assert_eq!(log.count(Cue::Wrong), 1);
    }
}
