//! Per-month completion progress.

use shared::UserData;

use crate::backend::domain::models::DomainMonth;
use crate::backend::domain::statistics::completion_rate;

/// Percentage of the month's day entries with a completed answer.
/// The review entry is not part of the denominator.
pub fn month_progress(month: &DomainMonth, answers: &UserData) -> u32 {
    let total = month.day_count() as u32;
    let completed = month
        .day_entries()
        .filter(|entry| answers.get(&entry.id).map_or(false, |a| a.completed))
        .count() as u32;
    completion_rate(completed, total)
}
