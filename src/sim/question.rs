//! Trivia questions
//!
//! A bank is validated once when it is built and never changes afterwards.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Deserialize;
use thiserror::Error;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// Prompt shown to the player
    pub prompt: String,
    /// Answer options, in display order
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub answer: usize,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: &[&str], answer: usize) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
        }
    }

    #[inline]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.answer
    }
}

/// Reasons a question set cannot be used
#[derive(Debug, Error)]
pub enum QuestionBankError {
    /// The set contains no questions.
    #[error("question bank is empty")]
    Empty,

    /// A question has no options to pick from.
    #[error("question {index} has no options")]
    NoOptions { index: usize },

    /// A question's answer does not name one of its options.
    #[error("question {index} answer {answer} is out of range for {options} options")]
    AnswerOutOfRange {
        index: usize,
        answer: usize,
        options: usize,
    },

    /// The JSON could not be parsed.
    #[error("invalid question JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed, validated set of questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        for (index, q) in questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(QuestionBankError::NoOptions { index });
            }
            if q.answer >= q.options.len() {
                return Err(QuestionBankError::AnswerOutOfRange {
                    index,
                    answer: q.answer,
                    options: q.options.len(),
                });
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// Built-in question set
    pub fn builtin() -> Self {
        Self {
            questions: vec![
                Question::new(
                    "What does AI stand for?",
                    &["Artificial Intelligence", "Automated Input"],
                    0,
                ),
                Question::new(
                    "What is the digital divide?",
                    &["A software bug", "Gap in tech access"],
                    1,
                ),
                Question::new(
                    "What does a CPU do?",
                    &["Stores files long-term", "Executes instructions", "Cools the computer"],
                    1,
                ),
                Question::new(
                    "Which of these is a strong password?",
                    &["password123", "Tr4ck!Sunset#Goora", "qwerty"],
                    1,
                ),
                Question::new(
                    "What does a web browser do?",
                    &["Displays web pages", "Charges your phone"],
                    0,
                ),
                Question::new(
                    "What is phishing?",
                    &[
                        "A tricky message that steals your details",
                        "A fishing video game",
                        "A way to speed up Wi-Fi",
                    ],
                    0,
                ),
            ],
        }
    }

    /// Same questions in a seeded order (deterministic for a given seed)
    pub fn shuffled(mut self, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        self.questions.shuffle(&mut rng);
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question at `index`, wrapping past the end
    pub fn question(&self, index: usize) -> &Question {
        &self.questions[index % self.questions.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let bank = QuestionBank::builtin();
        let rebuilt = QuestionBank::new(bank.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, bank);
        assert!(bank.len() >= 2);
        assert_eq!(bank.get(0).unwrap().prompt, "What does AI stand for?");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(QuestionBank::new(vec![]), Err(QuestionBankError::Empty)));
    }

    #[test]
    fn test_rejects_bad_answer_index() {
        let err = QuestionBank::new(vec![
            Question::new("ok", &["a", "b"], 1),
            Question::new("bad", &["a", "b"], 2),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            QuestionBankError::AnswerOutOfRange {
                index: 1,
                answer: 2,
                options: 2
            }
        ));
    }

    #[test]
    fn test_rejects_question_without_options() {
        let err = QuestionBank::new(vec![Question::new("none", &[], 0)]).unwrap_err();
        assert!(matches!(err, QuestionBankError::NoOptions { index: 0 }));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"prompt": "2 + 2?", "options": ["3", "4"], "answer": 1},
            {"prompt": "Sky colour?", "options": ["Blue", "Green"], "answer": 0}
        ]"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 2);
        assert!(bank.get(0).unwrap().is_correct(1));
        assert!(!bank.get(1).unwrap().is_correct(1));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let err = QuestionBank::from_json("{not json").unwrap_err();
        assert!(matches!(err, QuestionBankError::Parse(_)));
        assert!(err.to_string().starts_with("invalid question JSON"));
    }

    #[test]
    fn test_shuffle_is_deterministic_permutation() {
        let a = QuestionBank::builtin().shuffled(42);
        let b = QuestionBank::builtin().shuffled(42);
        assert_eq!(a, b);

        let mut original: Vec<String> = QuestionBank::builtin().iter().map(|q| q.prompt.clone()).collect();
        let mut shuffled: Vec<String> = a.iter().map(|q| q.prompt.clone()).collect();
        original.sort();
        shuffled.sort();
        assert_eq!(original, shuffled);
    }
}
