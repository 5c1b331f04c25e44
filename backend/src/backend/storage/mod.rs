//! # Storage Module
//!
//! Local-first persistence for the journal. Every logical category (answers,
//! photos, summaries, profile) is one file in the data directory and every
//! write replaces that file as a whole.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Writing each category atomically (temp file + rename)
//! - **Data Retrieval**: Loading categories at startup, recovering from corrupted files
//! - **Capacity Limits**: Rejecting writes that would exceed the per-category quota
//! - **Storage Abstraction**: Traits the domain layer depends on instead of files
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── config.yaml      (optional, see `backend::config`)
//! ├── answers.json
//! ├── photos.json
//! ├── summaries.json
//! └── profile.yaml
//! ```

pub mod errors;
pub mod json;
pub mod traits;

pub use errors::StorageError;
pub use json::{
    AnswerRepository, JsonConnection, PhotoRepository, ProfileRepository, SummaryRepository,
};
pub use traits::{AnswerStorage, PhotoStorage, ProfileStorage, SummaryStorage};
