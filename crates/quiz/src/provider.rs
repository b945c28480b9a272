//! Question provider port and the in-memory bank behind it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::builtin::builtin_questions;
use crate::error::QuizError;
use crate::question::Question;

/// Source of quiz questions.
///
/// Implementations must be shareable across threads: the runtime fetches on a
/// blocking worker while the session keeps running.
pub trait QuestionProvider: Send + Sync {
    /// Draw a random question whose id is not in `exclude`.
    ///
    /// When every question has been used the draw falls back to the full pool.
    fn fetch_random_question(&self, exclude: &HashSet<String>) -> Result<Question, QuizError>;

    /// First `count` questions whose difficulty equals `level`, in bank order.
    fn fetch_questions_for_level(&self, level: u32, count: usize)
        -> Result<Vec<Question>, QuizError>;
}

/// Validated, non-empty set of questions with its own RNG.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
    rng: Mutex<StdRng>,
}

impl QuestionBank {
    /// Create a bank seeded from the OS.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::build(questions, StdRng::from_os_rng())
    }

    /// Create a bank with a deterministic draw order.
    pub fn with_seed(questions: Vec<Question>, seed: u64) -> Result<Self, QuizError> {
        Self::build(questions, StdRng::seed_from_u64(seed))
    }

    fn build(questions: Vec<Question>, rng: StdRng) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        for q in &questions {
            q.validate()?;
        }
        Ok(Self {
            questions,
            rng: Mutex::new(rng),
        })
    }

    /// The built-in default set.
    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Parse a JSON array of questions.
    pub fn from_json_str(json: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn pick(&self, pool: &[&Question]) -> Question {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let idx = rng.random_range(0..pool.len());
        pool[idx].clone()
    }
}

impl QuestionProvider for QuestionBank {
    fn fetch_random_question(&self, exclude: &HashSet<String>) -> Result<Question, QuizError> {
        let available: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| !exclude.contains(&q.id))
            .collect();

        if available.is_empty() {
            debug!(total = self.questions.len(), "all questions used, drawing from full pool");
            let all: Vec<&Question> = self.questions.iter().collect();
            if all.is_empty() {
                return Err(QuizError::Empty);
            }
            return Ok(self.pick(&all));
        }

        Ok(self.pick(&available))
    }

    fn fetch_questions_for_level(
        &self,
        level: u32,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.difficulty == level)
            .take(count)
            .cloned()
            .collect())
    }
}

/// Wraps a provider and answers from the built-in set when it fails.
pub struct FallbackProvider<P> {
    primary: P,
    fallback: QuestionBank,
}

impl<P: QuestionProvider> FallbackProvider<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: QuestionBank::builtin(),
        }
    }
}

impl<P: QuestionProvider> QuestionProvider for FallbackProvider<P> {
    fn fetch_random_question(&self, exclude: &HashSet<String>) -> Result<Question, QuizError> {
        match self.primary.fetch_random_question(exclude) {
            Ok(q) => Ok(q),
            Err(e) => {
                warn!(error = %e, "question fetch failed, using built-in questions");
                self.fallback.fetch_random_question(exclude)
            }
        }
    }

    fn fetch_questions_for_level(
        &self,
        level: u32,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        match self.primary.fetch_questions_for_level(level, count) {
            Ok(qs) => Ok(qs),
            Err(e) => {
                warn!(error = %e, level, "level question fetch failed, using built-in questions");
                self.fallback.fetch_questions_for_level(level, count)
            }
        }
    }
}

/// Load a bank from `path`, or the built-in set when no path is given or the
/// file cannot be used.
pub fn load_bank_or_builtin(path: Option<&Path>) -> QuestionBank {
    let Some(path) = path else {
        return QuestionBank::builtin();
    };
    match QuestionBank::from_json_file(path) {
        Ok(bank) => {
            debug!(path = %path.display(), count = bank.len(), "loaded question bank");
            bank
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "question bank failed to load, using built-in questions");
            QuestionBank::builtin()
        }
    }
}
