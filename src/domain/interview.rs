//! Interview questions and response records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The built-in interview question set
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "Tell me about yourself.",
    "What are your strengths?",
    "What are your weaknesses?",
    "Why do you want to work here?",
    "Where do you see yourself in 5 years?",
];

/// Error when loading a custom question list
#[derive(Debug, Clone, Error)]
pub enum QuestionListError {
    #[error("Failed to read questions file: {0}")]
    ReadError(String),

    #[error("Questions file contains no questions")]
    Empty,
}

/// Parse a question list from file content: one question per line,
/// blank lines and `#` comments skipped.
pub fn parse_questions(content: &str) -> Result<Vec<String>, QuestionListError> {
    let questions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        return Err(QuestionListError::Empty);
    }
    Ok(questions)
}

/// The built-in question set as owned strings
pub fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Persisted representation of one answered question.
/// Never mutated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Auto-generated store identifier; `None` for a record that was
    /// captured but could not be persisted.
    pub id: Option<i64>,
    pub question: String,
    pub text_response: String,
    /// Reference (path) to the stored audio artifact; empty when unsaved
    pub audio_file: String,
    /// Reference (path) to the stored video artifact; empty when unsaved
    pub video_file: String,
    pub created_at: DateTime<Utc>,
}

impl ResponseRecord {
    /// An in-memory record for a capture that failed to persist.
    /// Keeps the interview flow intact; artifact refs stay empty.
    pub fn unsaved(question: impl Into<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            text_response: String::new(),
            audio_file: String::new(),
            video_file: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_question_set_has_five() {
        assert_eq!(default_questions().len(), 5);
        assert_eq!(default_questions()[0], "Tell me about yourself.");
    }

    #[test]
    fn parse_skips_blanks_and_comments() {
        let content = "# warmup\nTell me about a project.\n\n  What went wrong?  \n";
        let questions = parse_questions(content).unwrap();
        assert_eq!(questions, vec!["Tell me about a project.", "What went wrong?"]);
    }

    #[test]
    fn parse_empty_file_is_error() {
        assert!(matches!(
            parse_questions("# only comments\n\n"),
            Err(QuestionListError::Empty)
        ));
    }

    #[test]
    fn unsaved_record_has_no_id_or_refs() {
        let record = ResponseRecord::unsaved("Why us?");
        assert!(record.id.is_none());
        assert!(record.audio_file.is_empty());
        assert!(record.video_file.is_empty());
        assert_eq!(record.question, "Why us?");
    }
}
