//! Completion and streak statistics.
//!
//! Pure functions over an answer snapshot. The only inputs besides the
//! snapshot are the curriculum index (which ids count as calendar days),
//! the curriculum's day total, a clock for local-day normalization and
//! "today".
//!
//! ## Streak rules
//!
//! - Dates come from the save timestamp, never from the free-text date field
//! - Several saves on one local day count as a single date
//! - The current streak is alive only if the latest date is today or yesterday
//! - The best streak is the longest run of consecutive dates ever recorded

use chrono::NaiveDate;
use shared::{JournalStats, UserAnswer, UserData};

use crate::backend::domain::calendar::Clock;
use crate::backend::domain::models::CurriculumIndex;

/// Answers that count toward the statistics: calendar day entries only
pub fn journal_answers<'a>(
    answers: &'a UserData,
    index: &'a CurriculumIndex,
) -> impl Iterator<Item = (&'a String, &'a UserAnswer)> + 'a {
    answers.iter().filter(move |(id, _)| index.is_day_entry(id))
}

/// Unique local dates on which at least one answer was saved, ascending
pub fn unique_answer_dates<'a, I>(answers: I, clock: &dyn Clock) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a UserAnswer>,
{
    let mut dates: Vec<NaiveDate> = answers
        .into_iter()
        .filter_map(|answer| clock.local_date(answer.timestamp))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// Length of the run of consecutive dates ending at the latest date, or 0
/// when the latest date is neither today nor yesterday
pub fn current_streak(sorted_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&last) = sorted_dates.last() else {
        return 0;
    };
    if last != today && days_between(last, today) != 1 {
        return 0;
    }

    let run = sorted_dates
        .windows(2)
        .rev()
        .take_while(|pair| days_between(pair[0], pair[1]) == 1)
        .count();
    run as u32 + 1
}

/// Longest run of consecutive dates anywhere in the history
pub fn best_streak(sorted_dates: &[NaiveDate]) -> u32 {
    let mut best = 0u32;
    let mut running = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in sorted_dates {
        running = match previous {
            Some(prev) if days_between(prev, date) == 1 => running + 1,
            _ => 1,
        };
        best = best.max(running);
        previous = Some(date);
    }
    best
}

/// `round(completed / total * 100)`, 0 when there are no days
pub fn completion_rate(completed: u32, total_days: u32) -> u32 {
    if total_days == 0 {
        return 0;
    }
    ((completed as f64 / total_days as f64) * 100.0).round() as u32
}

/// Compute the full statistics for a snapshot
pub fn compute_stats(
    answers: &UserData,
    index: &CurriculumIndex,
    total_days: u32,
    clock: &dyn Clock,
) -> JournalStats {
    let counted: Vec<&UserAnswer> = journal_answers(answers, index).map(|(_, a)| a).collect();
    let completed_count = counted.len() as u32;
    let dates = unique_answer_dates(counted, clock);

    JournalStats {
        completed_count,
        completion_rate: completion_rate(completed_count, total_days),
        current_streak: current_streak(&dates, clock.today()),
        best_streak: best_streak(&dates),
        total_days,
    }
}
