//! Typed domain errors.
//!
//! Services return `anyhow::Result` and wrap these; the REST layer downcasts
//! to pick a status code.

/// Authored content that cannot be turned into a curriculum. Fatal at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CurriculumError {
    #[error("Curriculum content could not be parsed: {0}")]
    InvalidContent(String),
    #[error("Curriculum must contain months 1 through 12 exactly once (found {found:?})")]
    MonthSetMismatch { found: Vec<u32> },
    #[error("Month {month_id} has no question blocks")]
    EmptyQuestionBlocks { month_id: u32 },
    #[error("Month {month_id} has no questions in any block")]
    NoQuestions { month_id: u32 },
    #[error("Target year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("Unknown entry: {0}")]
    UnknownEntry(String),
    #[error("Unknown month: {0}")]
    UnknownMonth(u32),
    #[error("Entry {0} holds the generated monthly summary and cannot be written directly")]
    ReviewNotWritable(String),
    #[error("Backup file could not be imported: {0}")]
    ImportFailed(String),
    #[error("Erasing all data requires explicit confirmation")]
    EraseNotConfirmed,
    #[error("There are not enough answers in {0} to generate a summary")]
    NoContentForSummary(String),
    #[error("Summary generation failed: {0}")]
    SummaryFailed(String),
    #[error("Summary for month {0} was discarded because the request is no longer current")]
    StaleSummary(u32),
    #[error("A {0} request is already in progress")]
    RequestInFlight(&'static str),
    #[error("Image could not be processed: {0}")]
    InvalidImage(String),
    #[error("User name cannot be empty")]
    EmptyUserName,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Unknown month: {0}")]
    UnknownMonth(u32),
    #[error("Entry index {index} is out of range for month {month_id} ({len} entries)")]
    EntryOutOfRange { month_id: u32, index: usize, len: usize },
    #[error("Unknown entry: {0}")]
    UnknownEntry(String),
}
