//! One race scene: motion loop and quiz loop side by side
//!
//! `Race` is the thin adapter between the pure core and the outside world:
//! it plays the cues a quiz transition asks for and tells the host when the
//! countdown task has to start or stop. The host owns the actual timers
//! (`setInterval` on the web, `HeadlessRace` everywhere else).
//!
//! The motion loop (tilt -> car -> camera) and the quiz loop share nothing but
//! the car position, which the camera only reads.

use thiserror::Error;

use crate::audio::CueSink;
use crate::consts::{CAMERA_TICK_MS, COUNTDOWN_TICK_MS};
use crate::platform::Interval;
use crate::renderer::{FrameSnapshot, SceneRenderer};
use crate::sim::{
    CameraFollower, CarMotion, Difficulty, QuizEffect, QuizError, QuizSession, TiltInput,
};

/// Camera ticks to run at most per `advance` (drops the backlog after a stall)
pub const MAX_CAMERA_CATCHUP: u32 = 8;

/// What the host must do with its countdown task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownCommand {
    /// Acquire a fresh countdown task
    Start,
    /// Release the countdown task
    Stop,
}

/// Reasons a headless scene refused an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RaceError {
    /// The scene was torn down; its session no longer takes input.
    #[error("scene is not mounted")]
    NotMounted,

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Core components of a mounted scene
#[derive(Debug)]
pub struct Race<A: CueSink> {
    tilt: TiltInput,
    car: CarMotion,
    camera: CameraFollower,
    quiz: QuizSession,
    cues: A,
}

impl<A: CueSink> Race<A> {
    pub fn new(quiz: QuizSession, cues: A) -> Self {
        Self {
            tilt: TiltInput::default(),
            car: CarMotion::default(),
            camera: CameraFollower::default(),
            quiz,
            cues,
        }
    }

    /// Countdown command to issue when the scene mounts
    pub fn initial_countdown(&self) -> Option<CountdownCommand> {
        self.quiz
            .is_counting_down()
            .then_some(CountdownCommand::Start)
    }

    // === Motion loop ===

    /// Device orientation sample. Returns whether the car moved.
    pub fn on_tilt(&mut self, gamma: Option<f64>) -> bool {
        match self.tilt.steering_delta(gamma) {
            Some(dx) => {
                self.car.apply_delta(dx);
                true
            }
            None => false,
        }
    }

    /// Fixed-rate camera tick
    pub fn camera_tick(&mut self) {
        self.camera.tick(self.car.position());
    }

    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot::new(self.car.position(), self.camera.pose())
    }

    // === Quiz loop ===

    /// One-second countdown tick
    pub fn countdown_tick(&mut self) -> Option<CountdownCommand> {
        let effects = self.quiz.tick();
        self.run_effects(effects)
    }

    pub fn select_difficulty(
        &mut self,
        difficulty: Difficulty,
    ) -> Result<Option<CountdownCommand>, QuizError> {
        let effects = self.quiz.select_difficulty(difficulty)?;
        log::info!("Race started on {}", difficulty.label());
        Ok(self.run_effects(effects))
    }

    pub fn submit_answer(&mut self, option: usize) -> Option<CountdownCommand> {
        let effects = self.quiz.submit_answer(option);
        self.run_effects(effects)
    }

    pub fn restart(&mut self) -> Result<Option<CountdownCommand>, QuizError> {
        let effects = self.quiz.restart()?;
        log::info!("Race restarted on {}", self.quiz.difficulty().label());
        Ok(self.run_effects(effects))
    }

    /// Play requested cues; hand countdown changes back to the host
    fn run_effects(&mut self, effects: Vec<QuizEffect>) -> Option<CountdownCommand> {
        let mut command = None;
        for effect in effects {
            match effect {
                QuizEffect::Cue(cue) => self.cues.play(cue),
                QuizEffect::StartCountdown => command = Some(CountdownCommand::Start),
                QuizEffect::StopCountdown => command = Some(CountdownCommand::Stop),
            }
        }
        command
    }

    // === Accessors ===

    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn car(&self) -> &CarMotion {
        &self.car
    }

    pub fn camera(&self) -> &CameraFollower {
        &self.camera
    }

    pub fn cues(&self) -> &A {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut A {
        &mut self.cues
    }
}

/// A race driven by elapsed time instead of browser timers
pub struct HeadlessRace<A: CueSink, R: SceneRenderer> {
    race: Race<A>,
    renderer: R,
    camera_timer: Option<Interval>,
    countdown_timer: Option<Interval>,
}

impl<A: CueSink, R: SceneRenderer> HeadlessRace<A, R> {
    /// Mount the scene: acquire the camera task and, if the quiz is
    /// already playing, the countdown task.
    pub fn mount(race: Race<A>, renderer: R) -> Self {
        let mut headless = Self {
            race,
            renderer,
            camera_timer: Some(Interval::new(CAMERA_TICK_MS)),
            countdown_timer: None,
        };
        let initial = headless.race.initial_countdown();
        headless.apply(initial);
        log::info!("Scene mounted");
        headless
    }

    /// Release every repeating task. Later calls to `advance` do nothing.
    pub fn teardown(&mut self) {
        if self.camera_timer.take().is_some() {
            log::info!("Scene torn down");
        }
        self.countdown_timer = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.camera_timer.is_some()
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown_timer.is_some()
    }

    /// Let `dt_ms` of wall time pass, then present one frame
    pub fn advance(&mut self, dt_ms: f64) {
        let Some(camera_timer) = self.camera_timer.as_mut() else {
            return;
        };
        let camera_ticks = camera_timer.advance(dt_ms).min(MAX_CAMERA_CATCHUP);

        let countdown_ticks = self
            .countdown_timer
            .as_mut()
            .map_or(0, |timer| timer.advance(dt_ms));
        for _ in 0..countdown_ticks {
            let command = self.race.countdown_tick();
            self.apply(command);
            if self.countdown_timer.is_none() {
                break;
            }
        }

        for _ in 0..camera_ticks {
            self.race.camera_tick();
        }

        let frame = self.race.frame();
        self.renderer.present(&frame);
    }

    pub fn on_tilt(&mut self, gamma: Option<f64>) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.race.on_tilt(gamma)
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), RaceError> {
        self.ensure_mounted()?;
        let command = self.race.select_difficulty(difficulty)?;
        self.apply(command);
        Ok(())
    }

    /// Answer the current question. Ignored once the scene is torn down.
    pub fn submit_answer(&mut self, option: usize) {
        if !self.is_mounted() {
            log::debug!("Ignoring answer {} on an unmounted scene", option);
            return;
        }
        let command = self.race.submit_answer(option);
        self.apply(command);
    }

    pub fn restart(&mut self) -> Result<(), RaceError> {
        self.ensure_mounted()?;
        let command = self.race.restart()?;
        self.apply(command);
        Ok(())
    }

    pub fn race(&self) -> &Race<A> {
        &self.race
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn ensure_mounted(&self) -> Result<(), RaceError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(RaceError::NotMounted)
        }
    }

    fn apply(&mut self, command: Option<CountdownCommand>) {
        match command {
            Some(CountdownCommand::Start) => {
                self.countdown_timer = Some(Interval::new(COUNTDOWN_TICK_MS));
            }
            Some(CountdownCommand::Stop) => self.countdown_timer = None,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::audio::CueLog;
    use crate::renderer::NullRenderer;
    use crate::sim::{Cue, Question, QuestionBank, QuizPhase};

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question::new("first", &["right", "wrong"], 0),
            Question::new("second", &["wrong", "right"], 1),
        ])
        .unwrap()
    }

    fn headless() -> HeadlessRace<CueLog, NullRenderer> {
        let race = Race::new(QuizSession::new(bank()), CueLog::default());
        HeadlessRace::mount(race, NullRenderer::default())
    }

    fn correct(h: &HeadlessRace<CueLog, NullRenderer>) -> usize {
        h.race().quiz().current_question().answer
    }

    #[test]
    fn test_tilt_sequence_moves_car() {
        let mut race = Race::new(QuizSession::new(bank()), CueLog::default());
        for gamma in [10.0, -5.0, 3.0] {
            assert!(race.on_tilt(Some(gamma)));
        }
        assert!((race.car().position().x - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_missing_sensor_leaves_car_alone() {
        let mut race = Race::new(QuizSession::new(bank()), CueLog::default());
        assert!(!race.on_tilt(None));
        assert_eq!(race.car().position(), Vec3::ZERO);
    }

    #[test]
    fn test_camera_trails_car() {
        let mut race = Race::new(QuizSession::new(bank()), CueLog::default());
        race.on_tilt(Some(50.0));
        race.camera_tick();
        let frame = race.frame();
        assert_eq!(frame.car_position(), Vec3::new(5.0, 0.0, 0.0));
        assert!((frame.camera.position.x - 0.5).abs() < 1e-5);
        assert_eq!(frame.camera.target, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_countdown_until_difficulty_chosen() {
        let mut h = headless();
        assert!(h.is_mounted());
        assert!(!h.is_counting_down());
        h.advance(5000.0);
        assert_eq!(h.race().quiz().phase(), QuizPhase::AwaitingDifficulty);
        assert!(h.race().cues().played.is_empty());
    }

    #[test]
    fn test_countdown_then_correct_answer() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        assert!(h.is_counting_down());
        for _ in 0..5 {
            h.advance(1000.0);
        }
        assert_eq!(h.race().quiz().remaining(), 3);

        h.submit_answer(correct(&h));
        let quiz = h.race().quiz();
        assert_eq!(quiz.index(), 1);
        assert_eq!(quiz.remaining(), 8);
        assert_eq!(quiz.phase(), QuizPhase::Playing);
        assert_eq!(h.race().cues().played, vec![Cue::Correct]);
        assert!(h.is_counting_down());
    }

    #[test]
    fn test_timeout_stops_countdown() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Hard).unwrap();
        h.advance(4000.0);
        assert_eq!(h.race().quiz().remaining(), 1);

        // One long stall covering many periods still ends the round once
        h.advance(10_000.0);
        assert_eq!(h.race().quiz().phase(), QuizPhase::GameOver);
        assert_eq!(h.race().cues().played, vec![Cue::Wrong]);
        assert!(!h.is_counting_down());
    }

    #[test]
    fn test_wrong_answer_stops_countdown() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        h.advance(1000.0);
        h.submit_answer(1);
        assert!(h.race().quiz().is_game_over());
        assert!(!h.is_counting_down());
        assert_eq!(h.race().quiz().remaining(), 7);

        h.submit_answer(0);
        h.advance(3000.0);
        assert_eq!(h.race().cues().played, vec![Cue::Wrong]);
        assert_eq!(h.race().quiz().remaining(), 7);
    }

    #[test]
    fn test_restart_restarts_countdown() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Easy).unwrap();
        h.submit_answer(1);
        assert!(h.select_difficulty(Difficulty::Hard).is_err());

        h.restart().unwrap();
        assert!(h.is_counting_down());
        let quiz = h.race().quiz();
        assert_eq!(quiz.phase(), QuizPhase::Playing);
        assert_eq!(quiz.index(), 0);
        assert_eq!(quiz.remaining(), 10);
        assert_eq!(quiz.difficulty(), Difficulty::Easy);

        h.advance(1000.0);
        assert_eq!(h.race().quiz().remaining(), 9);
    }

    #[test]
    fn test_teardown_releases_all_tasks() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        h.on_tilt(Some(20.0));
        h.advance(1000.0);
        let frames = h.renderer().frames;
        let camera = h.race().camera().pose();

        h.teardown();
        assert!(!h.is_mounted());
        assert!(!h.is_counting_down());

        h.advance(30_000.0);
        assert!(!h.on_tilt(Some(45.0)));
        assert_eq!(h.renderer().frames, frames);
        assert_eq!(h.race().quiz().remaining(), 7);
        assert_eq!(h.race().camera().pose(), camera);
        assert!(h.race().cues().played.is_empty());

        // Input after teardown leaves the session exactly as it was
        h.submit_answer(correct(&h));
        h.submit_answer(1);
        assert_eq!(h.restart(), Err(RaceError::NotMounted));
        assert_eq!(h.select_difficulty(Difficulty::Hard), Err(RaceError::NotMounted));
        let quiz = h.race().quiz();
        assert_eq!(quiz.phase(), QuizPhase::Playing);
        assert_eq!(quiz.index(), 0);
        assert_eq!(quiz.remaining(), 7);
        assert!(h.race().cues().played.is_empty());
        assert!(!h.is_counting_down());
    }

    #[test]
    fn test_teardown_after_game_over_blocks_restart() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        h.submit_answer(1);
        h.teardown();

        assert_eq!(h.restart(), Err(RaceError::NotMounted));
        h.advance(20_000.0);
        assert_eq!(h.race().quiz().phase(), QuizPhase::GameOver);
        assert!(!h.is_counting_down());
    }

    #[test]
    fn test_phase_errors_pass_through() {
        let mut h = headless();
        assert_eq!(
            h.restart(),
            Err(RaceError::Quiz(QuizError::InvalidPhase {
                op: "restart",
                phase: QuizPhase::AwaitingDifficulty
            }))
        );
    }

    #[test]
    fn test_correct_answer_keeps_countdown_phase() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        h.advance(600.0);
        assert_eq!(h.race().quiz().remaining(), 8);

        h.submit_answer(correct(&h));
        assert_eq!(h.race().quiz().remaining(), 8);

        // The running countdown is not re-acquired, so its next tick lands
        // 400ms after the answer rather than a full second later
        h.advance(400.0);
        assert_eq!(h.race().quiz().remaining(), 7);
    }

    #[test]
    fn test_persisted_difficulty_starts_countdown_on_mount() {
        let race = Race::new(
            QuizSession::with_difficulty(bank(), Difficulty::Hard),
            CueLog::default(),
        );
        let mut h = HeadlessRace::mount(race, NullRenderer::default());
        assert!(h.is_counting_down());
        h.advance(2000.0);
        assert_eq!(h.race().quiz().remaining(), 3);
    }

    #[test]
    fn test_motion_and_quiz_are_independent() {
        let mut h = headless();
        h.select_difficulty(Difficulty::Normal).unwrap();
        for step in 0..120 {
            h.on_tilt(Some(if step % 2 == 0 { 30.0 } else { -10.0 }));
            h.advance(16.0);
        }
        // 120 * 16ms = 1.92s -> one countdown tick
        assert_eq!(h.race().quiz().remaining(), 7);
        assert!((h.race().car().position().x - 120.0).abs() < 1e-3);
        assert!(h.renderer().frames >= 120);
    }
}
