//! Export service domain logic.
//!
//! Handles backup files and the printable journal.
//!
//! ## Key Responsibilities
//!
//! - **JSON Export**: The full answer map, pretty-printed, named after the export date
//! - **JSON Import**: Parsing a backup and replacing every stored answer with it
//! - **PDF Export**: A cover page and one section per month with written answers
//!
//! The PDF is planned first as a `PdfLayout` (pure, positions in millimetres
//! from the top-left corner) and only then drawn with `printpdf`.

use anyhow::{Context, Result};
use log::{info, warn};
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};
use std::sync::Arc;

use crate::backend::domain::calendar::{format_display_date, Clock};
use crate::backend::domain::journal_service::JournalService;
use crate::backend::domain::models::{Curriculum, JournalError};
use crate::backend::domain::profile_service::ProfileService;
use shared::{JournalStats, UserData};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 20.0;
const SECTION_START_Y: f32 = 40.0;
/// A new entry starts on a fresh page past this point
const ENTRY_BREAK_Y: f32 = 250.0;
/// A wrapped line continues on a fresh page past this point
const LINE_BREAK_Y: f32 = 280.0;
const PAGE_TOP_Y: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 5.0;
/// Characters per line for 10pt text across 170 mm
pub const WRAP_COLUMNS: usize = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFont {
    TimesBold,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfText {
    pub text: String,
    pub x: f32,
    /// Distance from the top edge
    pub y: f32,
    pub size: f32,
    pub font: PdfFont,
    pub muted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub texts: Vec<PdfText>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfLayout {
    pub pages: Vec<PdfPage>,
}

/// Rough centring for builtin fonts, which have no metrics available here
fn centered_x(text: &str, size: f32) -> f32 {
    let approx_width_mm = text.chars().count() as f32 * size * 0.5 * 0.3528;
    ((PAGE_WIDTH_MM - approx_width_mm) / 2.0).max(0.0)
}

fn text(text: impl Into<String>, x: f32, y: f32, size: f32, font: PdfFont) -> PdfText {
    PdfText {
        text: text.into(),
        x,
        y,
        size,
        font,
        muted: false,
    }
}

fn centered(content: &str, y: f32, size: f32, font: PdfFont) -> PdfText {
    text(content, centered_x(content, size), y, size, font)
}

/// Greedy word wrap. Paragraph breaks are kept and over-long words are split.
pub fn wrap_text(content: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();

    for paragraph in content.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > columns {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if line.is_empty() { 0 } else { line.chars().count() + 1 };
            if needed + word.chars().count() > columns {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct LayoutCursor {
    layout: PdfLayout,
    y: f32,
}

impl LayoutCursor {
    fn new_page(&mut self, y: f32) {
        self.layout.pages.push(PdfPage::default());
        self.y = y;
    }

    fn push(&mut self, item: PdfText) {
        if let Some(page) = self.layout.pages.last_mut() {
            page.texts.push(item);
        }
    }

    /// Wrapped lines at the cursor, breaking pages when the bottom is reached
    fn push_lines(&mut self, lines: Vec<String>, font: PdfFont, muted: bool) {
        for line in lines {
            if self.y > LINE_BREAK_Y {
                self.new_page(PAGE_TOP_Y);
            }
            let y = self.y;
            self.push(PdfText {
                muted,
                ..text(line, MARGIN_LEFT_MM, y, 10.0, font)
            });
            self.y += LINE_HEIGHT_MM;
        }
    }
}

/// Plan the printable journal
pub fn build_pdf_layout(
    curriculum: &Curriculum,
    answers: &UserData,
    user_name: Option<&str>,
    exported_on: &str,
) -> PdfLayout {
    let mut cursor = LayoutCursor {
        layout: PdfLayout::default(),
        y: 0.0,
    };

    cursor.new_page(0.0);
    cursor.push(centered("Eu por Inteiro", 100.0, 24.0, PdfFont::TimesBold));
    cursor.push(centered("Diário de Autoconhecimento", 110.0, 14.0, PdfFont::Helvetica));
    if let Some(name) = user_name {
        cursor.push(centered(&format!("Pertence a: {}", name), 130.0, 12.0, PdfFont::Helvetica));
    }
    cursor.push(centered(&format!("Exportado em: {}", exported_on), 280.0, 10.0, PdfFont::Helvetica));

    for month in &curriculum.months {
        let written: Vec<_> = month
            .entries
            .iter()
            .filter_map(|entry| {
                let answer = answers.get(&entry.id)?;
                (!answer.text.trim().is_empty()).then_some((entry, answer))
            })
            .collect();
        if written.is_empty() {
            continue;
        }

        cursor.new_page(SECTION_START_Y);
        cursor.push(text(month.name.clone(), MARGIN_LEFT_MM, 20.0, 18.0, PdfFont::TimesBold));
        cursor.push(text(month.theme.clone(), MARGIN_LEFT_MM, 30.0, 12.0, PdfFont::HelveticaOblique));

        for (entry, answer) in written {
            if cursor.y > ENTRY_BREAK_Y {
                cursor.new_page(PAGE_TOP_Y);
            }

            let title = match entry.day_number {
                Some(day_number) if !entry.is_monthly_review() => {
                    format!("Dia {} ({}/{})", day_number, entry.day_of_month, month.id)
                }
                _ => "Revisão Mensal".to_string(),
            };
            let heading = match answer.date_string.as_deref().filter(|d| !d.is_empty()) {
                Some(date) => format!("{} ({})", title, date),
                None => title,
            };
            let y = cursor.y;
            cursor.push(text(heading, MARGIN_LEFT_MM, y, 12.0, PdfFont::TimesBold));
            cursor.y += 7.0;

            cursor.push_lines(wrap_text(&entry.question, WRAP_COLUMNS), PdfFont::HelveticaBold, true);
            cursor.y += 2.0;

            cursor.push_lines(wrap_text(&answer.text, WRAP_COLUMNS), PdfFont::Helvetica, false);
            cursor.y += 10.0;
        }
    }

    cursor.layout
}

/// Draw a planned layout as an A4 PDF
pub fn render_pdf(layout: &PdfLayout, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let fonts = [
        doc.add_builtin_font(BuiltinFont::TimesBold)?,
        doc.add_builtin_font(BuiltinFont::Helvetica)?,
        doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
    ];
    let font_slot = |font: PdfFont| match font {
        PdfFont::TimesBold => 0,
        PdfFont::Helvetica => 1,
        PdfFont::HelveticaBold => 2,
        PdfFont::HelveticaOblique => 3,
    };

    for (n, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if n == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for item in &page.texts {
            let grey = if item.muted { 0.4 } else { 0.0 };
            layer.set_fill_color(Color::Rgb(Rgb::new(grey, grey, grey, None)));
            layer.use_text(
                item.text.clone(),
                item.size,
                Mm(item.x),
                Mm(PAGE_HEIGHT_MM - item.y),
                &fonts[font_slot(item.font)],
            );
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Parse a backup file into an answer map
pub fn parse_backup(content: &str) -> Result<UserData, JournalError> {
    serde_json::from_str(content).map_err(|e| JournalError::ImportFailed(e.to_string()))
}

/// Service for backups and the printable journal
#[derive(Clone)]
pub struct ExportService {
    journal: JournalService,
    profile: ProfileService,
    clock: Arc<dyn Clock>,
}

impl ExportService {
    /// Create a new ExportService
    pub fn new(journal: JournalService, profile: ProfileService, clock: Arc<dyn Clock>) -> Self {
        Self { journal, profile, clock }
    }

    /// `eu_por_inteiro_backup_YYYY-MM-DD.json`
    pub fn backup_filename(&self) -> String {
        format!("eu_por_inteiro_backup_{}.json", self.clock.today().format("%Y-%m-%d"))
    }

    /// The whole answer map as pretty-printed JSON. Returns (filename, content, answer count).
    pub fn export_json(&self) -> Result<(String, String, usize)> {
        let answers = self.journal.snapshot();
        let content = serde_json::to_string_pretty(answers.as_ref())?;
        info!("Exported {} answers to JSON", answers.len());
        Ok((self.backup_filename(), content, answers.len()))
    }

    /// Replace every answer with the backup's content. On a parse failure
    /// nothing changes.
    pub async fn import_json(&self, content: &str) -> Result<(usize, JournalStats)> {
        let answers = match parse_backup(content) {
            Ok(answers) => answers,
            Err(e) => {
                warn!("Import rejected: {}", e);
                return Err(e.into());
            }
        };
        let count = answers.len();
        let stats = self.journal.replace_answers(answers).await?;
        info!("Imported {} answers from backup", count);
        Ok((count, stats))
    }

    /// Render the printable journal. Returns (filename, PDF bytes).
    pub async fn export_pdf(&self) -> Result<(String, Vec<u8>)> {
        let user_name = self.profile.user_name().await?;
        let exported_on = format_display_date(self.clock.today());
        let answers = self.journal.snapshot();
        let layout = build_pdf_layout(
            self.journal.curriculum().curriculum(),
            &answers,
            user_name.as_deref(),
            &exported_on,
        );
        let pages = layout.pages.len();

        let bytes = tokio::task::spawn_blocking(move || render_pdf(&layout, "Eu por Inteiro"))
            .await
            .context("PDF rendering task failed")??;

        info!("Exported journal PDF ({} pages, {} bytes)", pages, bytes.len());
        Ok(("eu_por_inteiro_diario.pdf".to_string(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::content::AuthoredContent;
    use crate::backend::domain::curriculum_service::generate_curriculum;
    use shared::UserAnswer;

    fn curriculum() -> Curriculum {
        generate_curriculum(&AuthoredContent::embedded().unwrap(), 2026).unwrap().0
    }

    fn answer(text: &str, date: Option<&str>) -> UserAnswer {
        UserAnswer {
            text: text.to_string(),
            timestamp: 0,
            completed: true,
            date_string: date.map(str::to_string),
        }
    }

    fn all_text(page: &PdfPage) -> Vec<&str> {
        page.texts.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("um dois tres", 7), vec!["um dois", "tres"]);
        assert_eq!(wrap_text("linha 1\nlinha 2", 40), vec!["linha 1", "linha 2"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_cover_page_only_without_answers() {
        let layout = build_pdf_layout(&curriculum(), &UserData::new(), None, "05/01/2026");
        assert_eq!(layout.pages.len(), 1);
        let cover = all_text(&layout.pages[0]);
        assert!(cover.contains(&"Eu por Inteiro"));
        assert!(cover.contains(&"Exportado em: 05/01/2026"));
        assert!(!cover.iter().any(|t| t.starts_with("Pertence a")));
    }

    #[test]
    fn test_month_sections_only_for_written_answers() {
        let mut answers = UserData::new();
        answers.insert("mes_1_dia_2".into(), answer("Escrevi algo", Some("02/01/2026")));
        answers.insert("mes_1_revisao".into(), answer("Resumo do mês", None));
        answers.insert("mes_2_dia_1".into(), answer("   ", None));

        let layout = build_pdf_layout(&curriculum(), &answers, Some("Ana"), "05/01/2026");
        assert_eq!(layout.pages.len(), 2);
        assert!(all_text(&layout.pages[0]).contains(&"Pertence a: Ana"));

        let january = all_text(&layout.pages[1]);
        assert_eq!(january[0], "Janeiro");
        assert!(january.contains(&"Dia 2 (2/1) (02/01/2026)"));
        assert!(january.contains(&"Revisão Mensal"));
        assert!(january.contains(&"Escrevi algo"));
    }

    #[test]
    fn test_long_months_paginate() {
        let curriculum = curriculum();
        let long_text = "palavra ".repeat(200);
        let answers: UserData = curriculum
            .month(3)
            .unwrap()
            .day_entries()
            .map(|e| (e.id.clone(), answer(&long_text, None)))
            .collect();

        let layout = build_pdf_layout(&curriculum, &answers, None, "05/01/2026");
        assert!(layout.pages.len() > 3);
        for page in &layout.pages[1..] {
            assert!(page.texts.iter().all(|t| t.y <= LINE_BREAK_Y + LINE_HEIGHT_MM));
        }
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let mut answers = UserData::new();
        answers.insert("mes_1_dia_1".into(), answer("Primeiro dia", None));
        let layout = build_pdf_layout(&curriculum(), &answers, Some("Ana"), "05/01/2026");

        let bytes = render_pdf(&layout, "Eu por Inteiro").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_parse_backup() {
        let content = r#"{"mes_1_dia_1":{"text":"oi","timestamp":1,"completed":true}}"#;
        let answers = parse_backup(content).unwrap();
        assert_eq!(answers["mes_1_dia_1"].text, "oi");

        assert!(matches!(parse_backup("[1, 2"), Err(JournalError::ImportFailed(_))));
        assert!(matches!(parse_backup("[]"), Err(JournalError::ImportFailed(_))));
    }
}
