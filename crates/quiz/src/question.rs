use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::types::ANSWER_OPTIONS;

/// A multiple-choice prompt.
///
/// Serialized in camelCase with the prompt text under `question` and the
/// 0-based correct option under `correctAnswer`, matching the bank file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub options: [String; ANSWER_OPTIONS],
    #[serde(rename = "correctAnswer")]
    pub correct_index: usize,
    pub category: String,
    pub difficulty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Whether `selected` is the correct option. No selection is wrong.
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_index)
    }

    pub fn correct_option(&self) -> &str {
        self.options
            .get(self.correct_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.id.trim().is_empty() {
            return Err(QuizError::InvalidQuestion {
                id: self.id.clone(),
                reason: "empty id".to_string(),
            });
        }
        if self.correct_index >= ANSWER_OPTIONS {
            return Err(QuizError::InvalidQuestion {
                id: self.id.clone(),
                reason: format!(
                    "correct answer index {} out of range 0..{}",
                    self.correct_index, ANSWER_OPTIONS
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question {
            id: "q1".to_string(),
            prompt: "2 + 2?".to_string(),
            scenario: None,
            options: ["3".into(), "4".into(), "5".into(), "6".into()],
            correct_index: 1,
            category: "Mathematics".to_string(),
            difficulty: 1,
            explanation: None,
        }
    }

    #[test]
    fn test_is_correct() {
        let q = sample();
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
        assert_eq!(q.correct_option(), "4");
    }

    #[test]
    fn test_validate_rejects_out_of_range_answer() {
        let mut q = sample();
        q.correct_index = 4;
        assert!(matches!(
            q.validate(),
            Err(QuizError::InvalidQuestion { .. })
        ));
    }

    #[test]
    fn test_deserialize_bank_layout() {
        let json = r#"{
            "id": "math_9",
            "question": "What is 6 x 7?",
            "options": ["36", "42", "48", "54"],
            "correctAnswer": 1,
            "category": "Mathematics",
            "difficulty": 2
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.prompt, "What is 6 x 7?");
        assert_eq!(q.correct_index, 1);
        assert!(q.scenario.is_none());
        assert!(q.explanation.is_none());
    }

    #[test]
    fn test_deserialize_rejects_wrong_option_count() {
        let json = r#"{
            "id": "x", "question": "?", "options": ["a", "b", "c"],
            "correctAnswer": 0, "category": "c", "difficulty": 1
        }"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }
}
