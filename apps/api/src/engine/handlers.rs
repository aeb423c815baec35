use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::engine::{ClassProbability, PredictionEngine, TrainingReport};
use crate::errors::AppError;
use crate::features::FeatureRecord;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PredictRequest {
    pub record: FeatureRecord,
    /// Replace out-of-vocabulary categorical values with `"Unknown"` instead of failing.
    #[serde(default)]
    pub remap_unknown: bool,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub label: String,
    /// Only classes above the display threshold, most likely first.
    pub probabilities: Vec<ClassProbability>,
    /// Column names of fields that were re-mapped to `"Unknown"`.
    pub remapped_fields: Vec<&'static str>,
}

fn trained_engine(state: &AppState) -> Result<Arc<dyn PredictionEngine>, AppError> {
    state.engine.clone().ok_or(AppError::ModelNotTrained)
}

/// POST /api/v1/predict
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    req.record
        .check_ranges()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let engine = trained_engine(&state)?;

    let (record, remapped) = if req.remap_unknown {
        engine.vocabulary().conform(&req.record)
    } else {
        (req.record, Vec::new())
    };

    let prediction = engine.predict(&record)?;
    Ok(Json(PredictResponse {
        probabilities: prediction.significant(),
        label: prediction.label,
        remapped_fields: remapped.iter().map(|f| f.column()).collect(),
    }))
}

/// GET /api/v1/model
pub async fn handle_model_report(
    State(state): State<AppState>,
) -> Result<Json<TrainingReport>, AppError> {
    let engine = trained_engine(&state)?;
    Ok(Json(engine.report().clone()))
}
