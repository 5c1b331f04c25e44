//! # Backend Module
//!
//! Contains all non-UI logic for the Eu por Inteiro journal.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: Curriculum generation, statistics, navigation and exports
//! - **Storage**: Local JSON and YAML files under the data directory
//! - **IO**: REST interface consumed by the journal frontend
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! UI Layer (web frontend)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (JSON files, persistence)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with proper CORS configuration
//! - Coordinate between domain logic and data persistence

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::config::AppConfig;
use crate::backend::domain::{
    AuthoredContent, Clock, CurriculumService, DataService, ExportService, GeminiSummaryGenerator,
    ImageCompressor, JournalService, NavigationService, PhotoService, ProfileService,
    SummaryGenerator, SummaryService, SystemClock,
};
use crate::backend::storage::{
    AnswerRepository, JsonConnection, PhotoRepository, ProfileRepository, SummaryRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub curriculum_service: CurriculumService,
    pub journal_service: JournalService,
    pub profile_service: ProfileService,
    pub navigation_service: NavigationService,
    pub photo_service: PhotoService,
    pub summary_service: SummaryService,
    pub export_service: ExportService,
    pub data_service: DataService,
}

/// Initialize the backend with the system clock and the Gemini summary generator
pub async fn initialize_backend(config: AppConfig) -> Result<AppState> {
    let generator = Arc::new(GeminiSummaryGenerator::new(&config.summary)?);
    if config.summary.api_key.is_none() {
        warn!("No summary API key configured; monthly summaries will fail until GEMINI_API_KEY is set");
    }
    initialize_backend_with(config, generator, Arc::new(SystemClock)).await
}

/// Initialize the backend with an explicit summary generator and clock
pub async fn initialize_backend_with(
    config: AppConfig,
    generator: Arc<dyn SummaryGenerator>,
    clock: Arc<dyn Clock>,
) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_directory.display());
    let connection = JsonConnection::new(&config.data_directory, config.max_store_bytes)?;

    info!("Setting up curriculum for {}", config.target_year);
    let content = AuthoredContent::embedded()?;
    let curriculum_service = CurriculumService::new(&content, config.target_year)?;

    info!("Setting up domain model");
    let profile_service = ProfileService::new(Arc::new(ProfileRepository::new(connection.clone())));
    let journal_service = JournalService::new(
        curriculum_service.clone(),
        Arc::new(AnswerRepository::new(connection.clone())),
        Arc::clone(&clock),
        config.force_unlock,
    )
    .await?;
    let photo_service = PhotoService::new(
        Arc::new(PhotoRepository::new(connection.clone())),
        ImageCompressor::new(config.image_max_dimension, config.image_jpeg_quality),
        Arc::clone(&clock),
    )
    .await?;
    let summary_service = SummaryService::new(
        generator,
        Arc::new(SummaryRepository::new(connection)),
        journal_service.clone(),
        profile_service.clone(),
    )
    .await?;
    let navigation_service = NavigationService::new(
        curriculum_service.clone(),
        profile_service.clone(),
        Arc::clone(&clock),
        config.force_unlock,
    );
    let export_service = ExportService::new(journal_service.clone(), profile_service.clone(), clock);
    let data_service = DataService::new(
        journal_service.clone(),
        photo_service.clone(),
        summary_service.clone(),
        profile_service.clone(),
        navigation_service.clone(),
    );

    info!("Setting up application state");
    Ok(AppState {
        config: Arc::new(config),
        curriculum_service,
        journal_service,
        profile_service,
        navigation_service,
        photo_service,
        summary_service,
        export_service,
        data_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match app_state.config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!(
                "Ignoring allowed origin '{}': {}",
                app_state.config.allowed_origin, e
            );
            cors
        }
    };

    let api_routes = Router::new()
        .nest("/curriculum", io::rest::curriculum_apis::router())
        .nest("/answers", io::rest::answer_apis::router())
        .nest("/photos", io::rest::photo_apis::router())
        .nest("/summaries", io::rest::summary_apis::router())
        .nest("/profile", io::rest::profile_apis::router())
        .nest("/navigation", io::rest::navigation_apis::router())
        .nest("/prep", io::rest::prep_apis::router())
        .nest("/data", io::rest::data_apis::router())
        .merge(io::rest::stats_apis::router())
        .merge(io::rest::export_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
