use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single daily prompt of the yearly curriculum.
///
/// Day entry ids look like `mes_3_dia_14`, review entry ids like `mes_3_revisao`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    /// Global sequential index across the year (1..=365/366). `None` for review entries.
    pub day_number: Option<u32>,
    /// 1-based position within the month
    pub day_of_month: u32,
    pub question: String,
    pub placeholder: Option<String>,
    pub is_monthly_review: bool,
}

/// One themed chapter of the curriculum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthConfig {
    pub id: u32,
    pub name: String,
    pub theme: String,
    pub objective: String,
    pub anchor_question: String,
    pub exercise_title: String,
    pub exercise_steps: Vec<String>,
    pub review_questions: Vec<String>,
    /// Day entries in `day_of_month` order followed by the review entry
    pub days: Vec<JournalEntry>,
}

/// A user's saved response to one entry.
///
/// Field names follow the camelCase layout used by backup files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub text: String,
    /// Save time in epoch milliseconds
    pub timestamp: i64,
    pub completed: bool,
    /// User-entered display date, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_string: Option<String>,
}

/// Sparse answer map keyed by entry id
pub type UserData = BTreeMap<String, UserAnswer>;

/// Generated monthly summaries keyed by month id
pub type MonthlySummaries = BTreeMap<u32, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Calm,
    Sad,
    Energetic,
    Neutral,
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Emotion::Happy => "happy",
            Emotion::Calm => "calm",
            Emotion::Sad => "sad",
            Emotion::Energetic => "energetic",
            Emotion::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// An entry of the photo journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    pub id: String,
    /// JPEG data URL (`data:image/jpeg;base64,...`)
    pub image_data: String,
    pub caption: String,
    pub emotion: Emotion,
    pub tags: Vec<String>,
    pub timestamp: i64,
    pub date_string: String,
}

/// Derived completion and streak metrics. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalStats {
    pub completed_count: u32,
    pub completion_rate: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: JournalStats,
    pub motivational_message: String,
    pub start_date: Option<String>,
    pub journey_unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProgress {
    pub month_id: u32,
    pub name: String,
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub months: Vec<MonthProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumResponse {
    pub target_year: i32,
    pub total_days: u32,
    pub months: Vec<MonthConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthResponse {
    pub month: MonthConfig,
    pub progress: u32,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub month_id: u32,
    pub position: usize,
    pub entry: JournalEntry,
    pub answer: Option<UserAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAnswerRequest {
    pub text: String,
    #[serde(default)]
    pub date_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAnswerResponse {
    pub entry_id: String,
    pub answer: UserAnswer,
    pub stats: JournalStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePhotoRequest {
    /// Raw image file, base64 encoded (a `data:` URL prefix is accepted)
    pub image_base64: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub emotion: Emotion,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePhotoResponse {
    pub photo: PhotoEntry,
    pub photo_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub month_id: u32,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryListResponse {
    pub summaries: MonthlySummaries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetProfileRequest {
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJsonResponse {
    pub filename: String,
    pub content: String,
    pub answer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportJsonRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportJsonResponse {
    pub imported_count: usize,
    pub stats: JournalStats,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraseDataRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraseDataResponse {
    pub success_message: String,
}

/// Which view the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    Login,
    Cover,
    PrepFlow,
    Locked,
    MonthIntro,
    Journal,
    Settings,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStateResponse {
    pub screen: Screen,
    pub current_month_id: u32,
    /// `None` while the month intro page is shown
    pub current_entry_index: Option<usize>,
    pub current_entry_id: Option<String>,
    pub prep_step: u8,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationAction {
    Login { user_name: String },
    Logout,
    OpenScreen { screen: Screen },
    OpenMonth { month_id: u32 },
    OpenEntry { index: usize },
    OpenEntryById { entry_id: String },
    NextEntry,
    PreviousEntry,
    NextPrepStep,
    PreviousPrepStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepQuestion {
    pub id: String,
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepChecklist {
    pub reflection_done: bool,
    pub intention_set: bool,
    pub origin_photo_saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepFlowResponse {
    pub questions: Vec<PrepQuestion>,
    pub intention_options: Vec<String>,
    pub checklist: PrepChecklist,
    pub journey_unlocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_answer_uses_backup_field_names() {
        let json = r#"{"text":"oi","timestamp":1704103200000,"completed":true,"dateString":"01/01/2024"}"#;
        let answer: UserAnswer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.date_string.as_deref(), Some("01/01/2024"));

        let without_date = UserAnswer { date_string: None, ..answer };
        let out = serde_json::to_string(&without_date).unwrap();
        assert!(!out.contains("dateString"));
    }

    #[test]
    fn test_navigation_action_is_tagged() {
        let action: NavigationAction =
            serde_json::from_str(r#"{"action":"open_month","month_id":4}"#).unwrap();
        assert_eq!(action, NavigationAction::OpenMonth { month_id: 4 });

        let action: NavigationAction = serde_json::from_str(r#"{"action":"next_entry"}"#).unwrap();
        assert_eq!(action, NavigationAction::NextEntry);
    }

    #[test]
    fn test_emotion_display() {
        assert_eq!(Emotion::Energetic.to_string(), "energetic");
        assert_eq!(Emotion::default(), Emotion::Neutral);
    }
}
