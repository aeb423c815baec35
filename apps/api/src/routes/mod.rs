pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::engine::handlers as engine;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Feature extraction
        .route(
            "/api/v1/analyze/github",
            post(extraction::handle_analyze_github),
        )
        .route(
            "/api/v1/analyze/resume",
            post(extraction::handle_analyze_resume),
        )
        .route(
            "/api/v1/analyze/resume/text",
            post(extraction::handle_analyze_resume_text),
        )
        .route(
            "/api/v1/taxonomy/:category",
            get(extraction::handle_taxonomy_category),
        )
        .route(
            "/api/v1/assessment/start",
            post(extraction::handle_assessment_start),
        )
        .route(
            "/api/v1/assessment/submit",
            post(extraction::handle_assessment_submit),
        )
        // Prediction
        .route("/api/v1/predict", post(engine::handle_predict))
        .route("/api/v1/model", get(engine::handle_model_report))
        .with_state(state)
}
