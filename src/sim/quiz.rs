//! Quiz session state machine
//!
//! `AwaitingDifficulty -> Playing -> GameOver -> (restart) -> Playing`
//!
//! Transitions mutate the session and hand back the effects the host must
//! carry out (cues to play, countdown to start or stop). The session itself
//! never touches audio or timers, so every transition is testable as-is.
//!
//! Timeout fires on the tick that finds one second left rather than the tick
//! after the display reaches zero. Players never see "0s" while still able
//! to answer; remaining drops to 0 in the same transition that ends the game.

use thiserror::Error;

use super::difficulty::Difficulty;
use super::question::{Question, QuestionBank};

/// Current phase of the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for the player to pick a difficulty
    AwaitingDifficulty,
    /// Question on screen, countdown running
    Playing,
    /// Round lost (wrong answer or timeout)
    GameOver,
}

impl QuizPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizPhase::AwaitingDifficulty => "awaiting difficulty",
            QuizPhase::Playing => "playing",
            QuizPhase::GameOver => "game over",
        }
    }
}

impl std::fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named audio feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Correct,
    Wrong,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Correct => "correct",
            Cue::Wrong => "wrong",
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEffect {
    /// Fire-and-forget audio cue
    Cue(Cue),
    /// Begin the one-second countdown task
    StartCountdown,
    /// Cancel the countdown task
    StopCountdown,
}

/// Operation attempted in a phase that does not allow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("cannot {op} while {phase}")]
    InvalidPhase { op: &'static str, phase: QuizPhase },
}

/// One player's quiz run
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: QuestionBank,
    difficulty: Difficulty,
    phase: QuizPhase,
    index: usize,
    remaining: u32,
    /// Correct answers since the round started
    streak: u32,
    /// Best streak since the session was created
    best_streak: u32,
}

impl QuizSession {
    /// Session that starts on the difficulty selection screen
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            difficulty: Difficulty::default(),
            phase: QuizPhase::AwaitingDifficulty,
            index: 0,
            remaining: 0,
            streak: 0,
            best_streak: 0,
        }
    }

    /// Session that starts playing straight away (difficulty already known).
    ///
    /// The host still has to start the countdown; see [`Self::is_counting_down`].
    pub fn with_difficulty(bank: QuestionBank, difficulty: Difficulty) -> Self {
        let mut session = Self::new(bank);
        session.begin_round(difficulty);
        session
    }

    // === Accessors ===

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Per-question budget in seconds for the current difficulty
    pub fn budget(&self) -> u32 {
        self.difficulty.budget_secs()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == QuizPhase::GameOver
    }

    /// Whether the countdown task should currently be running
    pub fn is_counting_down(&self) -> bool {
        self.phase == QuizPhase::Playing
    }

    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    pub fn current_question(&self) -> &Question {
        self.bank.question(self.index)
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    // === Transitions ===

    /// Pick a difficulty and start the first round
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<Vec<QuizEffect>, QuizError> {
        if self.phase != QuizPhase::AwaitingDifficulty {
            return Err(self.reject("select difficulty"));
        }
        self.begin_round(difficulty);
        log::debug!(
            "Difficulty {} selected ({}s per question)",
            difficulty.as_str(),
            self.remaining
        );
        Ok(vec![QuizEffect::StartCountdown])
    }

    /// One-second countdown tick. Ticks outside `Playing` are stale and ignored.
    pub fn tick(&mut self) -> Vec<QuizEffect> {
        if self.phase != QuizPhase::Playing {
            log::debug!("Ignoring countdown tick while {}", self.phase);
            return Vec::new();
        }

        if self.remaining <= 1 {
            self.remaining = 0;
            log::debug!("Question {} timed out", self.index);
            return self.lose();
        }

        self.remaining -= 1;
        Vec::new()
    }

    /// Answer the current question. Ignored unless `Playing`.
    pub fn submit_answer(&mut self, option: usize) -> Vec<QuizEffect> {
        if self.phase != QuizPhase::Playing {
            log::debug!("Ignoring answer {} while {}", option, self.phase);
            return Vec::new();
        }

        if self.current_question().is_correct(option) {
            self.index = (self.index + 1) % self.bank.len();
            self.remaining = self.budget();
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            log::debug!("Correct answer, advancing to question {}", self.index);
            vec![QuizEffect::Cue(Cue::Correct)]
        } else {
            log::debug!("Wrong answer {} on question {}", option, self.index);
            self.lose()
        }
    }

    /// Start a new round with the same difficulty
    pub fn restart(&mut self) -> Result<Vec<QuizEffect>, QuizError> {
        if self.phase != QuizPhase::GameOver {
            return Err(self.reject("restart"));
        }
        self.begin_round(self.difficulty);
        log::debug!("Round restarted");
        Ok(vec![QuizEffect::StartCountdown])
    }

    fn begin_round(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.phase = QuizPhase::Playing;
        self.index = 0;
        self.remaining = difficulty.budget_secs();
        self.streak = 0;
    }

    fn lose(&mut self) -> Vec<QuizEffect> {
        self.phase = QuizPhase::GameOver;
        vec![QuizEffect::Cue(Cue::Wrong), QuizEffect::StopCountdown]
    }

    fn reject(&self, op: &'static str) -> QuizError {
        let err = QuizError::InvalidPhase {
            op,
            phase: self.phase,
        };
        log::debug!("Rejected: {}", err);
        err
    }
}
