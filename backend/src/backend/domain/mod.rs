//! # Domain Module
//!
//! Business logic for the yearly journal, independent of storage and
//! transport.
//!
//! ## Key Responsibilities
//!
//! - **Curriculum**: Generating the dated entries of the year from authored content
//! - **Statistics**: Completion rate and streaks from the answer snapshot
//! - **Progress**: Per-month completion
//! - **Journal**: Saving, importing and erasing answers
//! - **Photos and Summaries**: The photo journal and generated monthly summaries
//! - **Navigation**: Where the user is and which moves are allowed
//! - **Export**: JSON backups and the printable PDF journal

pub mod ai_summary;
pub mod calendar;
pub mod content;
pub mod curriculum_service;
pub mod data_service;
pub mod export_service;
pub mod image_compression;
pub mod in_flight;
pub mod journal_service;
pub mod models;
pub mod navigation;
pub mod photo_service;
pub mod prep;
pub mod profile_service;
pub mod progress;
pub mod statistics;
pub mod summary_service;

pub use ai_summary::{GeminiSummaryGenerator, SummaryGenerator, SummaryPrompt};
pub use calendar::{Clock, FixedClock, SystemClock};
pub use content::AuthoredContent;
pub use curriculum_service::CurriculumService;
pub use data_service::DataService;
pub use export_service::ExportService;
pub use image_compression::ImageCompressor;
pub use journal_service::JournalService;
pub use navigation::NavigationService;
pub use photo_service::PhotoService;
pub use profile_service::ProfileService;
pub use summary_service::SummaryService;
