//! Curriculum generation.
//!
//! Turns the authored month tables into the dated entries of one year:
//! one entry per calendar day plus a trailing review entry per month.
//! Generation is a pure fold over the months; the shared day-number counter
//! is the fold's accumulator, so running it twice yields identical output.
//!
//! ## Fitting questions to the calendar
//!
//! - Fewer questions than days: remaining days get the free-reflection prompt
//! - More questions than days: the surplus is dropped and reported
//! - No question blocks (or no questions at all): `CurriculumError`

use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::backend::domain::calendar::days_in_month;
use crate::backend::domain::content::{AuthoredContent, AuthoredMonth, PrepContent};
use crate::backend::domain::models::{
    Curriculum, CurriculumError, CurriculumIndex, DomainEntry, DomainMonth, EntryKind,
    EntryPosition, GenerationNotes, MonthAdjustment,
};

/// Generate the full curriculum for `target_year`
pub fn generate_curriculum(
    content: &AuthoredContent,
    target_year: i32,
) -> Result<(Curriculum, GenerationNotes), CurriculumError> {
    if NaiveDate::from_ymd_opt(target_year, 1, 1).is_none() {
        return Err(CurriculumError::InvalidYear(target_year));
    }

    let mut authored: Vec<&AuthoredMonth> = content.months.iter().collect();
    authored.sort_by_key(|m| m.id);

    let ids: Vec<u32> = authored.iter().map(|m| m.id).collect();
    let distinct: BTreeSet<u32> = ids.iter().copied().collect();
    if ids.len() != 12 || distinct.len() != 12 || distinct.iter().copied().ne(1..=12) {
        return Err(CurriculumError::MonthSetMismatch { found: ids });
    }

    let (months, next_day_number, notes) = authored.into_iter().try_fold(
        (Vec::with_capacity(12), 1u32, GenerationNotes::default()),
        |(mut months, day_number, mut notes), month| {
            let generated = generate_month(content, month, target_year, day_number)?;
            if generated.dropped > 0 {
                notes.truncated.push(MonthAdjustment { month_id: month.id, count: generated.dropped });
            }
            if generated.filled > 0 {
                notes.filled.push(MonthAdjustment { month_id: month.id, count: generated.filled });
            }
            months.push(generated.month);
            Ok::<_, CurriculumError>((months, generated.next_day_number, notes))
        },
    )?;

    let curriculum = Curriculum {
        target_year,
        months,
        total_days: next_day_number - 1,
    };
    Ok((curriculum, notes))
}

struct GeneratedMonth {
    month: DomainMonth,
    next_day_number: u32,
    dropped: usize,
    filled: usize,
}

fn generate_month(
    content: &AuthoredContent,
    authored: &AuthoredMonth,
    target_year: i32,
    first_day_number: u32,
) -> Result<GeneratedMonth, CurriculumError> {
    if authored.question_blocks.is_empty() {
        return Err(CurriculumError::EmptyQuestionBlocks { month_id: authored.id });
    }
    let authored_count = authored.flattened_questions().count();
    if authored_count == 0 {
        return Err(CurriculumError::NoQuestions { month_id: authored.id });
    }

    let day_count = days_in_month(authored.id, target_year);
    let questions = authored
        .flattened_questions()
        .map(str::to_string)
        .chain(std::iter::repeat(content.free_reflection_prompt.clone()))
        .take(day_count as usize);

    let mut entries: Vec<DomainEntry> = questions
        .zip(1..=day_count)
        .map(|(question, day_of_month)| DomainEntry {
            id: DomainEntry::day_id(authored.id, day_of_month),
            day_number: Some(first_day_number + day_of_month - 1),
            day_of_month,
            question,
            placeholder: Some(content.entry_placeholder.clone()),
            kind: EntryKind::Day,
        })
        .collect();

    entries.push(DomainEntry {
        id: DomainEntry::review_id(authored.id),
        day_number: None,
        day_of_month: day_count + 1,
        question: content.review_title.clone(),
        placeholder: Some(authored.review_questions.join("\n\n")),
        kind: EntryKind::MonthlyReview,
    });

    let month = DomainMonth {
        id: authored.id,
        name: authored.name.clone(),
        theme: authored.theme.clone(),
        objective: authored.objective.clone(),
        anchor_question: authored.anchor_question.clone(),
        exercise_title: authored.exercise_title.clone(),
        exercise_steps: authored.exercise_steps.clone(),
        review_questions: authored.review_questions.clone(),
        entries,
    };

    Ok(GeneratedMonth {
        month,
        next_day_number: first_day_number + day_count,
        dropped: authored_count.saturating_sub(day_count as usize),
        filled: (day_count as usize).saturating_sub(authored_count),
    })
}

/// Read-only access to the generated curriculum, its index and the
/// preparation content. Cheap to clone.
#[derive(Clone)]
pub struct CurriculumService {
    curriculum: Arc<Curriculum>,
    index: Arc<CurriculumIndex>,
    prep: Arc<PrepContent>,
}

impl CurriculumService {
    /// Generate the curriculum once and log any adjustments made to fit the calendar
    pub fn new(content: &AuthoredContent, target_year: i32) -> Result<Self> {
        let (curriculum, notes) = generate_curriculum(content, target_year)?;

        for adjustment in &notes.truncated {
            warn!(
                "Month {} has {} more authored questions than days in {}; surplus dropped",
                adjustment.month_id, adjustment.count, target_year
            );
        }
        for adjustment in &notes.filled {
            warn!(
                "Month {} filled {} days with the free-reflection prompt",
                adjustment.month_id, adjustment.count
            );
        }

        let index = CurriculumIndex::build(&curriculum);
        info!(
            "Generated curriculum for {}: {} day entries, {} entries total",
            target_year,
            curriculum.total_days,
            index.len()
        );

        Ok(Self {
            curriculum: Arc::new(curriculum),
            index: Arc::new(index),
            prep: Arc::new(content.prep.clone()),
        })
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn index(&self) -> &CurriculumIndex {
        &self.index
    }

    pub fn prep(&self) -> &PrepContent {
        &self.prep
    }

    pub fn target_year(&self) -> i32 {
        self.curriculum.target_year
    }

    pub fn total_days(&self) -> u32 {
        self.curriculum.total_days
    }

    pub fn month(&self, month_id: u32) -> Option<&DomainMonth> {
        self.curriculum.month(month_id)
    }

    /// Look up an entry with its month and position
    pub fn entry(&self, entry_id: &str) -> Option<(&DomainMonth, &DomainEntry, EntryPosition)> {
        let position = self.index.get(entry_id)?;
        let month = self.curriculum.month(position.month_id)?;
        let entry = month.entries.get(position.position)?;
        Some((month, entry, position))
    }

    /// Whether a typed answer may be saved under this id. Review entries
    /// only ever arrive through a backup import.
    pub fn accepts_answer_for(&self, entry_id: &str) -> bool {
        self.index.is_day_entry(entry_id) || self.prep.contains(entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::content::QuestionBlock;
    use std::collections::HashSet;

    fn embedded() -> AuthoredContent {
        AuthoredContent::embedded().unwrap()
    }

    #[test]
    fn test_every_month_matches_calendar_length() {
        for year in [2024, 2026] {
            let (curriculum, _) = generate_curriculum(&embedded(), year).unwrap();
            assert_eq!(curriculum.months.len(), 12);
            for month in &curriculum.months {
                assert_eq!(month.day_count() as u32, days_in_month(month.id, year));
                assert_eq!(month.entries.len() as u32, days_in_month(month.id, year) + 1);
                assert!(month.entries.last().unwrap().is_monthly_review());
                let days: Vec<u32> = month.entries.iter().map(|e| e.day_of_month).collect();
                assert!(days.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_total_days_follows_target_year() {
        let (regular, _) = generate_curriculum(&embedded(), 2026).unwrap();
        let (leap, _) = generate_curriculum(&embedded(), 2024).unwrap();
        assert_eq!(regular.total_days, 365);
        assert_eq!(leap.total_days, 366);
    }

    #[test]
    fn test_ids_are_unique() {
        let (curriculum, _) = generate_curriculum(&embedded(), 2026).unwrap();
        let ids: Vec<&str> = curriculum.entries().map(|(_, e)| e.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), 365 + 12);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let content = embedded();
        let first = generate_curriculum(&content, 2026).unwrap();
        let second = generate_curriculum(&content, 2026).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_day_numbers_are_sequential_and_skip_reviews() {
        let (curriculum, _) = generate_curriculum(&embedded(), 2026).unwrap();
        let numbers: Vec<u32> = curriculum.entries().filter_map(|(_, e)| e.day_number).collect();
        assert_eq!(numbers, (1..=365).collect::<Vec<u32>>());

        let march = curriculum.month(3).unwrap();
        assert_eq!(march.entries[0].id, "mes_3_dia_1");
        assert_eq!(march.entries[0].day_number, Some(31 + 28 + 1));
        let review = march.review_entry().unwrap();
        assert_eq!(review.id, "mes_3_revisao");
        assert_eq!(review.day_number, None);
    }

    #[test]
    fn test_february_is_truncated_in_regular_year() {
        let (curriculum, notes) = generate_curriculum(&embedded(), 2026).unwrap();
        assert_eq!(notes.truncated, vec![MonthAdjustment { month_id: 2, count: 1 }]);
        assert!(notes.filled.is_empty());
        assert_eq!(curriculum.month(2).unwrap().day_count(), 28);

        let (_, leap_notes) = generate_curriculum(&embedded(), 2024).unwrap();
        assert!(leap_notes.is_empty());
    }

    #[test]
    fn test_short_month_is_filled_with_free_prompt() {
        let mut content = embedded();
        content.months[3].question_blocks = vec![QuestionBlock {
            questions: vec!["Primeira".to_string(), "Segunda".to_string()],
        }];

        let (curriculum, notes) = generate_curriculum(&content, 2026).unwrap();
        assert_eq!(notes.filled, vec![MonthAdjustment { month_id: 4, count: 28 }]);

        let april = curriculum.month(4).unwrap();
        assert_eq!(april.day_count(), 30);
        assert_eq!(april.entries[1].question, "Segunda");
        assert_eq!(april.entries[2].question, content.free_reflection_prompt);
        assert_eq!(april.entries[29].id, "mes_4_dia_30");
    }

    #[test]
    fn test_empty_question_blocks_is_an_error() {
        let mut content = embedded();
        content.months[5].question_blocks.clear();
        assert_eq!(
            generate_curriculum(&content, 2026).unwrap_err(),
            CurriculumError::EmptyQuestionBlocks { month_id: 6 }
        );

        let mut content = embedded();
        content.months[5].question_blocks = vec![QuestionBlock { questions: vec![] }];
        assert_eq!(
            generate_curriculum(&content, 2026).unwrap_err(),
            CurriculumError::NoQuestions { month_id: 6 }
        );
    }

    #[test]
    fn test_missing_month_is_an_error() {
        let mut content = embedded();
        content.months.pop();
        assert!(matches!(
            generate_curriculum(&content, 2026),
            Err(CurriculumError::MonthSetMismatch { .. })
        ));
    }

    #[test]
    fn test_service_lookup() {
        let service = CurriculumService::new(&embedded(), 2026).unwrap();
        let (month, entry, position) = service.entry("mes_12_dia_31").unwrap();
        assert_eq!(month.id, 12);
        assert_eq!(entry.day_number, Some(365));
        assert_eq!(position.position, 30);

        assert!(!service.accepts_answer_for("mes_1_revisao"));
        assert!(service.accepts_answer_for("mes_1_dia_31"));
        assert!(service.accepts_answer_for("prep_intention"));
        assert!(!service.accepts_answer_for("mes_2_dia_29"));
        assert!(service.index().is_day_entry("mes_1_dia_1"));
        assert!(!service.index().is_day_entry("mes_1_revisao"));
        assert!(!service.index().is_day_entry("prep_q1"));
    }
}
