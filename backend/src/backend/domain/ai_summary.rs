//! Monthly summary generation.
//!
//! A summary is written by a language model from the month's non-empty day
//! answers. Building the prompt is local and checked up front, so a month
//! without content fails before any network call is made.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::config::SummaryConfig;
use crate::backend::domain::models::{DomainMonth, JournalError};
use shared::UserData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub day_of_month: u32,
    pub question: String,
    pub answer: String,
}

/// Everything the model is told about one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub month_id: u32,
    pub month_name: String,
    pub theme: String,
    pub user_name: String,
    pub entries: Vec<SummaryEntry>,
}

impl SummaryPrompt {
    pub fn render(&self) -> String {
        let entries = self
            .entries
            .iter()
            .map(|e| {
                format!(
                    "Dia {} - Pergunta: \"{}\"\nResposta: \"{}\"\n",
                    e.day_of_month, e.question, e.answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n---\n");

        format!(
            "Você é um terapeuta e mentor sábio, empático e perspicaz analisando o diário de {user}.\n\n\
             Aqui estão as entradas do diário para o mês de {month}, cujo tema foi \"{theme}\".\n\n\
             ENTRADAS DO USUÁRIO:\n{entries}\n\n\
             TAREFA:\n\
             Escreva um resumo profundo e acolhedor (máximo 200 palavras) sobre o mês dessa pessoa.\n\
             - Identifique padrões emocionais recorrentes.\n\
             - Destaque uma força ou crescimento que ela demonstrou.\n\
             - Ofereça uma pergunta suave para ela levar para o próximo mês.\n\
             - Use um tom pessoal, direto (\"Você...\") e encorajador.\n\
             - Não julgue, apenas espelhe com sabedoria.\n",
            user = self.user_name,
            month = self.month_name,
            theme = self.theme,
            entries = entries,
        )
    }
}

/// Collect the month's non-empty day answers. The review entry is skipped.
pub fn build_prompt(
    month: &DomainMonth,
    answers: &UserData,
    user_name: &str,
) -> Result<SummaryPrompt, JournalError> {
    let entries: Vec<SummaryEntry> = month
        .day_entries()
        .filter_map(|day| {
            let answer = answers.get(&day.id)?;
            let text = answer.text.trim();
            (!text.is_empty()).then(|| SummaryEntry {
                day_of_month: day.day_of_month,
                question: day.question.clone(),
                answer: text.to_string(),
            })
        })
        .collect();

    if entries.is_empty() {
        return Err(JournalError::NoContentForSummary(month.name.clone()));
    }

    Ok(SummaryPrompt {
        month_id: month.id,
        month_name: month.name.clone(),
        theme: month.theme.clone(),
        user_name: user_name.to_string(),
        entries,
    })
}

/// Something that turns a prompt into summary text
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, prompt: &SummaryPrompt) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Calls the Gemini `generateContent` REST endpoint
pub struct GeminiSummaryGenerator {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiSummaryGenerator {
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl SummaryGenerator for GeminiSummaryGenerator {
    async fn generate(&self, prompt: &SummaryPrompt) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            JournalError::SummaryFailed("no API key configured (set GEMINI_API_KEY)".to_string())
        })?;

        let rendered = prompt.render();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &rendered }],
            }],
        };

        debug!("Requesting summary for month {} from {}", prompt.month_id, self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Summary request failed: {}", e);
                JournalError::SummaryFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Summary endpoint returned {}: {}", status, detail);
            return Err(JournalError::SummaryFailed(format!("upstream returned {}", status)).into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| JournalError::SummaryFailed(format!("unreadable response: {}", e)))?;

        parsed
            .text()
            .ok_or_else(|| JournalError::SummaryFailed("empty response".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::content::AuthoredContent;
    use crate::backend::domain::curriculum_service::CurriculumService;
    use shared::UserAnswer;

    fn january() -> DomainMonth {
        let service = CurriculumService::new(&AuthoredContent::embedded().unwrap(), 2026).unwrap();
        service.month(1).unwrap().clone()
    }

    fn answer(text: &str) -> UserAnswer {
        UserAnswer {
            text: text.to_string(),
            timestamp: 0,
            completed: true,
            date_string: None,
        }
    }

    #[test]
    fn test_month_without_answers_fails_before_generation() {
        let mut answers = UserData::new();
        answers.insert("mes_1_dia_1".into(), answer("   "));
        answers.insert("mes_1_revisao".into(), answer("resumo antigo"));

        assert_eq!(
            build_prompt(&january(), &answers, "Ana").unwrap_err(),
            JournalError::NoContentForSummary("Janeiro".to_string())
        );
    }

    #[test]
    fn test_prompt_lists_non_empty_day_answers_in_order() {
        let month = january();
        let mut answers = UserData::new();
        answers.insert("mes_1_dia_10".into(), answer("décimo"));
        answers.insert("mes_1_dia_2".into(), answer(" segundo "));
        answers.insert("mes_2_dia_1".into(), answer("outro mês"));

        let prompt = build_prompt(&month, &answers, "Ana").unwrap();
        let days: Vec<u32> = prompt.entries.iter().map(|e| e.day_of_month).collect();
        assert_eq!(days, vec![2, 10]);
        assert_eq!(prompt.entries[0].answer, "segundo");

        let rendered = prompt.render();
        assert!(rendered.contains("diário de Ana"));
        assert!(rendered.contains("mês de Janeiro"));
        assert!(rendered.contains("Dia 2 - Pergunta:"));
        assert!(!rendered.contains("outro mês"));
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Você "},{"text":"cresceu."}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Você cresceu."));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails() {
        let config = SummaryConfig { api_key: None, ..SummaryConfig::default() };
        let generator = GeminiSummaryGenerator::new(&config).unwrap();
        let prompt = SummaryPrompt {
            month_id: 1,
            month_name: "Janeiro".into(),
            theme: "Raízes".into(),
            user_name: "Ana".into(),
            entries: vec![],
        };
        let err = generator.generate(&prompt).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<JournalError>(), Some(JournalError::SummaryFailed(_))));
    }
}
