use crate::backend::domain::models::{DomainEntry, DomainMonth};
use shared::{JournalEntry, MonthConfig};

pub struct CurriculumMapper;

impl CurriculumMapper {
    /// Convert a domain entry to the shared JournalEntry DTO
    pub fn entry_to_dto(entry: &DomainEntry) -> JournalEntry {
        JournalEntry {
            id: entry.id.clone(),
            day_number: entry.day_number,
            day_of_month: entry.day_of_month,
            question: entry.question.clone(),
            placeholder: entry.placeholder.clone(),
            is_monthly_review: entry.is_monthly_review(),
        }
    }

    /// Convert a domain month to the shared MonthConfig DTO
    pub fn month_to_dto(month: &DomainMonth) -> MonthConfig {
        MonthConfig {
            id: month.id,
            name: month.name.clone(),
            theme: month.theme.clone(),
            objective: month.objective.clone(),
            anchor_question: month.anchor_question.clone(),
            exercise_title: month.exercise_title.clone(),
            exercise_steps: month.exercise_steps.clone(),
            review_questions: month.review_questions.clone(),
            days: month.entries.iter().map(Self::entry_to_dto).collect(),
        }
    }

    pub fn months_to_dto(months: &[DomainMonth]) -> Vec<MonthConfig> {
        months.iter().map(Self::month_to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::content::AuthoredContent;
    use crate::backend::domain::curriculum_service::generate_curriculum;

    #[test]
    fn test_month_to_dto_keeps_review_last() {
        let (curriculum, _) = generate_curriculum(&AuthoredContent::embedded().unwrap(), 2026).unwrap();
        let dto = CurriculumMapper::month_to_dto(curriculum.month(2).unwrap());

        assert_eq!(dto.days.len(), 29);
        let review = dto.days.last().unwrap();
        assert!(review.is_monthly_review);
        assert_eq!(review.id, "mes_2_revisao");
        assert_eq!(review.day_number, None);
        assert!(!dto.days[0].is_monthly_review);
        assert_eq!(dto.days[0].day_number, Some(32));
    }
}
