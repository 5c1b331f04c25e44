//! Hand-authored journal content.
//!
//! The question tables are data, kept in `content/curriculum.yaml` and
//! embedded into the binary. Parsing happens once at startup; a malformed
//! table is a startup error.

use serde::Deserialize;

use crate::backend::domain::models::CurriculumError;

const EMBEDDED_CURRICULUM: &str = include_str!("../../../content/curriculum.yaml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionBlock {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthoredMonth {
    pub id: u32,
    pub name: String,
    pub theme: String,
    pub objective: String,
    pub anchor_question: String,
    pub exercise_title: String,
    #[serde(default)]
    pub exercise_steps: Vec<String>,
    pub question_blocks: Vec<QuestionBlock>,
    #[serde(default)]
    pub review_questions: Vec<String>,
}

impl AuthoredMonth {
    /// All questions of the month, blocks flattened in order
    pub fn flattened_questions(&self) -> impl Iterator<Item = &str> {
        self.question_blocks
            .iter()
            .flat_map(|b| b.questions.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrepQuestionContent {
    pub id: String,
    pub question: String,
}

/// Preparation flow content, answered before the journey unlocks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrepContent {
    pub questions: Vec<PrepQuestionContent>,
    pub intention_id: String,
    pub wish_id: String,
    pub wish_question: String,
    pub intention_options: Vec<String>,
}

impl PrepContent {
    pub fn entry_ids(&self) -> impl Iterator<Item = &str> {
        self.questions
            .iter()
            .map(|q| q.id.as_str())
            .chain([self.intention_id.as_str(), self.wish_id.as_str()])
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.entry_ids().any(|id| id == entry_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthoredContent {
    /// Prompt used for calendar days without an authored question
    pub free_reflection_prompt: String,
    pub entry_placeholder: String,
    pub review_title: String,
    pub prep: PrepContent,
    pub months: Vec<AuthoredMonth>,
}

impl AuthoredContent {
    /// The content shipped with the application
    pub fn embedded() -> Result<Self, CurriculumError> {
        Self::from_yaml(EMBEDDED_CURRICULUM)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, CurriculumError> {
        serde_yaml::from_str(yaml).map_err(|e| CurriculumError::InvalidContent(e.to_string()))
    }
}
