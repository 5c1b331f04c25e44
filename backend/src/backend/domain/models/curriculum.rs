//! Domain model for the generated yearly curriculum.
use std::collections::HashMap;

/// Whether an entry is a calendar day or the synthetic end-of-month review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Day,
    MonthlyReview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainEntry {
    pub id: String,
    pub day_number: Option<u32>,
    pub day_of_month: u32,
    pub question: String,
    pub placeholder: Option<String>,
    pub kind: EntryKind,
}

impl DomainEntry {
    /// Storage key of a day entry. Must never change for existing content.
    pub fn day_id(month_id: u32, day_of_month: u32) -> String {
        format!("mes_{}_dia_{}", month_id, day_of_month)
    }

    /// Storage key of a month's review entry
    pub fn review_id(month_id: u32) -> String {
        format!("mes_{}_revisao", month_id)
    }

    pub fn is_monthly_review(&self) -> bool {
        self.kind == EntryKind::MonthlyReview
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainMonth {
    pub id: u32,
    pub name: String,
    pub theme: String,
    pub objective: String,
    pub anchor_question: String,
    pub exercise_title: String,
    pub exercise_steps: Vec<String>,
    pub review_questions: Vec<String>,
    /// Day entries in `day_of_month` order, review entry last
    pub entries: Vec<DomainEntry>,
}

impl DomainMonth {
    pub fn day_entries(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::Day)
    }

    pub fn day_count(&self) -> usize {
        self.day_entries().count()
    }

    pub fn review_entry(&self) -> Option<&DomainEntry> {
        self.entries.iter().find(|e| e.is_monthly_review())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curriculum {
    pub target_year: i32,
    pub months: Vec<DomainMonth>,
    /// Number of day entries across all months (365 or 366)
    pub total_days: u32,
}

impl Curriculum {
    pub fn month(&self, month_id: u32) -> Option<&DomainMonth> {
        self.months.iter().find(|m| m.id == month_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&DomainMonth, &DomainEntry)> {
        self.months
            .iter()
            .flat_map(|m| m.entries.iter().map(move |e| (m, e)))
    }
}

/// Adjustment applied to one month while fitting authored questions to the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAdjustment {
    pub month_id: u32,
    pub count: usize,
}

/// Side notes produced by generation, logged at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationNotes {
    /// Months whose authored questions exceeded the calendar; `count` questions dropped
    pub truncated: Vec<MonthAdjustment>,
    /// Months padded with the free-reflection prompt; `count` days filled
    pub filled: Vec<MonthAdjustment>,
}

impl GenerationNotes {
    pub fn is_empty(&self) -> bool {
        self.truncated.is_empty() && self.filled.is_empty()
    }
}

/// Where an entry lives in the curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPosition {
    pub month_id: u32,
    /// Index within the month's entry list
    pub position: usize,
    pub day_number: Option<u32>,
}

/// id -> position lookup, built once from a generated curriculum.
///
/// Display ordering and the statistics namespace filter go through here
/// rather than through map insertion order or id prefixes.
#[derive(Debug, Clone, Default)]
pub struct CurriculumIndex {
    positions: HashMap<String, EntryPosition>,
}

impl CurriculumIndex {
    pub fn build(curriculum: &Curriculum) -> Self {
        let positions = curriculum
            .months
            .iter()
            .flat_map(|month| {
                month.entries.iter().enumerate().map(move |(position, entry)| {
                    (
                        entry.id.clone(),
                        EntryPosition {
                            month_id: month.id,
                            position,
                            day_number: entry.day_number,
                        },
                    )
                })
            })
            .collect();
        Self { positions }
    }

    pub fn get(&self, entry_id: &str) -> Option<EntryPosition> {
        self.positions.get(entry_id).copied()
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.positions.contains_key(entry_id)
    }

    /// True only for calendar day entries. Review entries, preparation
    /// entries and ids from other curricula are all excluded.
    pub fn is_day_entry(&self, entry_id: &str) -> bool {
        self.positions
            .get(entry_id)
            .map_or(false, |p| p.day_number.is_some())
    }

    /// Sort key for display order: (month, position within month)
    pub fn sort_key(&self, entry_id: &str) -> Option<(u32, usize)> {
        self.get(entry_id).map(|p| (p.month_id, p.position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
