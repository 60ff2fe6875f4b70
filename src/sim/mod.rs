//! Deterministic core
//!
//! Everything that decides what happens lives here. This module must stay pure:
//! - No timers, no DOM, no audio
//! - Transitions return effect commands instead of performing side effects
//! - Motion is integrated only when the host calls in

pub mod camera;
pub mod car;
pub mod difficulty;
pub mod question;
pub mod quiz;
pub mod tilt;

pub use camera::{CameraFollower, CameraPose};
pub use car::CarMotion;
pub use difficulty::Difficulty;
pub use question::{Question, QuestionBank, QuestionBankError};
pub use quiz::{Cue, QuizEffect, QuizError, QuizPhase, QuizSession};
pub use tilt::TiltInput;
