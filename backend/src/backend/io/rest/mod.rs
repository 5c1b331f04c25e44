//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the journal.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Request logging
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: One router per area, nested under `/api`
//! - **Error Handling**: Typed domain errors become proper HTTP responses
//! - **Serialization**: JSON request/response handling with the shared DTOs

pub mod answer_apis;
pub mod curriculum_apis;
pub mod data_apis;
pub mod error_mapping;
pub mod export_apis;
pub mod mappers;
pub mod navigation_apis;
pub mod photo_apis;
pub mod prep_apis;
pub mod profile_apis;
pub mod stats_apis;
pub mod summary_apis;
