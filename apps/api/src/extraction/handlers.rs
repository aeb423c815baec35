use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{anyhow, Context};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::document::{analyze_document, DocumentAnalysis};
use crate::extraction::profile::{analyze_profile, ProfileAnalysis};
use crate::extraction::quiz::{
    score_submission, AssessmentResult, AssessmentSubmission, RngSampler, SampledQuiz,
};
use crate::features::FeatureRecord;
use crate::state::AppState;

/// Multipart field carrying the uploaded resume.
pub const RESUME_FIELD: &str = "resume";

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub identifier: String,
}

#[derive(Deserialize)]
pub struct ResumeTextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub result: AssessmentResult,
    /// The partial record merged with sentinel defaults.
    pub features: FeatureRecord,
}

/// POST /api/v1/analyze/github
pub async fn handle_analyze_github(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileAnalysis>, AppError> {
    if req.identifier.trim().is_empty() {
        return Err(AppError::Validation("identifier must not be empty".to_string()));
    }
    let analysis = analyze_profile(
        state.profile_source.as_ref(),
        &state.profile_extractor,
        &req.identifier,
        Utc::now(),
    )
    .await?;
    Ok(Json(analysis))
}

/// POST /api/v1/analyze/resume
///
/// The upload is spooled to a temp file and extracted on the blocking pool.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentAnalysis>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            info!("Received resume upload {file_name} ({} bytes)", bytes.len());
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| {
        AppError::Validation(format!("multipart field \"{RESUME_FIELD}\" is required"))
    })?;

    let text_extractor = state.text_extractor.clone();
    let document_extractor = state.document_extractor.clone();

    let analysis = tokio::task::spawn_blocking(move || -> Result<DocumentAnalysis, AppError> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile()
            .context("Failed to create temp file for upload")?;
        file.write_all(&bytes)
            .context("Failed to write upload to temp file")?;
        Ok(analyze_document(
            text_extractor.as_ref(),
            &document_extractor,
            file.path(),
        )?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in resume analysis: {e}")))??;

    Ok(Json(analysis))
}

/// POST /api/v1/analyze/resume/text
pub async fn handle_analyze_resume_text(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<DocumentAnalysis>, AppError> {
    Ok(Json(state.document_extractor.extract(&req.text)?))
}

/// GET /api/v1/taxonomy/:category
/// Subcategory → keyword list for one taxonomy category.
pub async fn handle_taxonomy_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let lists = state
        .taxonomy
        .keyword_lists(&category)
        .ok_or_else(|| AppError::NotFound(format!("Taxonomy category {category} not found")))?;
    let subcategories: BTreeMap<&str, Vec<&str>> = lists.into_iter().collect();
    Ok(Json(json!({ "category": category, "subcategories": subcategories })))
}

/// POST /api/v1/assessment/start
pub async fn handle_assessment_start(State(state): State<AppState>) -> Json<SampledQuiz> {
    let mut sampler = RngSampler::new(rand::thread_rng());
    Json(SampledQuiz::draw(&state.question_bank, &mut sampler))
}

/// POST /api/v1/assessment/submit
pub async fn handle_assessment_submit(
    State(state): State<AppState>,
    Json(submission): Json<AssessmentSubmission>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let result = score_submission(&state.question_bank, &submission)?;
    let features = result.features();
    Ok(Json(AssessmentResponse { result, features }))
}
