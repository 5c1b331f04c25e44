//! # IO Module
//!
//! Interface layer between clients and the domain logic. Translates HTTP
//! requests into domain operations and domain results into JSON responses.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: REST endpoints for the journal frontend
//! - **Data Serialization**: Converting between shared DTOs and domain objects
//! - **Error Translation**: Mapping typed domain errors to HTTP status codes

pub mod rest;

pub use rest::*;
