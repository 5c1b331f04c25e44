//! Preparation flow, answered before the journey starts.

use crate::backend::domain::content::PrepContent;
use shared::{PrepChecklist, PrepFlowResponse, PrepQuestion, UserData};

fn answered(answers: &UserData, entry_id: &str) -> bool {
    answers
        .get(entry_id)
        .map_or(false, |a| !a.text.trim().is_empty())
}

/// Questions with their current answers and the preparation checklist
pub fn prep_flow(
    prep: &PrepContent,
    answers: &UserData,
    has_origin_photo: bool,
    journey_unlocked: bool,
) -> PrepFlowResponse {
    let answer_of = |id: &str| answers.get(id).map(|a| a.text.clone());

    let mut questions: Vec<PrepQuestion> = prep
        .questions
        .iter()
        .map(|q| PrepQuestion {
            id: q.id.clone(),
            question: q.question.clone(),
            answer: answer_of(&q.id),
        })
        .collect();
    questions.push(PrepQuestion {
        id: prep.wish_id.clone(),
        question: prep.wish_question.clone(),
        answer: answer_of(&prep.wish_id),
    });

    let reflection_done = prep
        .questions
        .first()
        .map_or(false, |q| answered(answers, &q.id));

    PrepFlowResponse {
        questions,
        intention_options: prep.intention_options.clone(),
        checklist: PrepChecklist {
            reflection_done,
            intention_set: answered(answers, &prep.intention_id),
            origin_photo_saved: has_origin_photo,
        },
        journey_unlocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::content::AuthoredContent;
    use shared::UserAnswer;

    fn answer(text: &str) -> UserAnswer {
        UserAnswer {
            text: text.to_string(),
            timestamp: 0,
            completed: true,
            date_string: None,
        }
    }

    #[test]
    fn test_empty_checklist() {
        let prep = AuthoredContent::embedded().unwrap().prep;
        let flow = prep_flow(&prep, &UserData::new(), false, false);

        assert_eq!(flow.questions.len(), 5);
        assert!(flow.questions.iter().all(|q| q.answer.is_none()));
        assert_eq!(flow.intention_options.len(), 6);
        assert_eq!(
            flow.checklist,
            PrepChecklist { reflection_done: false, intention_set: false, origin_photo_saved: false }
        );
    }

    #[test]
    fn test_checklist_follows_answers_and_photo() {
        let prep = AuthoredContent::embedded().unwrap().prep;
        let mut answers = UserData::new();
        answers.insert("prep_q1".into(), answer("Foi um ano de mudanças"));
        answers.insert("prep_intention".into(), answer("Crescer"));
        answers.insert("prep_wish".into(), answer("Paz"));

        let flow = prep_flow(&prep, &answers, true, false);
        assert!(flow.checklist.reflection_done);
        assert!(flow.checklist.intention_set);
        assert!(flow.checklist.origin_photo_saved);
        assert_eq!(flow.questions.last().unwrap().answer.as_deref(), Some("Paz"));
    }
}
