//! Prediction Engines: one capability, two model families.
//!
//! `AppState` holds an `Arc<dyn PredictionEngine>` chosen at startup via `MODEL_ENGINE`.
//! Each engine owns its fitted encoding artifact, so the feature record never needs to
//! know which family will consume it.

pub mod dataset;
pub mod gradient_boosting;
pub mod handlers;
pub mod metrics;
pub mod network;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::encoding::{CategoricalVocabulary, EncodingError, LabelEncoder};
use crate::features::FeatureRecord;

pub use dataset::TrainingTable;
pub use gradient_boosting::{GradientBoostingEngine, GradientBoostingParams};
pub use metrics::ClassificationReport;
pub use network::{EmbeddingNetworkEngine, NetworkParams};

/// Classes at or below this probability are not surfaced to end callers.
pub const DISPLAY_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    GradientBoosting,
    Embedding,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::GradientBoosting => "gradient_boosting",
            EngineKind::Embedding => "embedding",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gradient_boosting" | "gbdt" => Ok(EngineKind::GradientBoosting),
            "embedding" | "network" => Ok(EngineKind::Embedding),
            other => Err(TrainingError::UnknownEngine(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed training data: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Training needs at least two career labels, found {0}")]
    TooFewClasses(usize),

    #[error("Unknown engine kind {0:?} (expected gradient_boosting or embedding)")]
    UnknownEngine(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// A predicted label with the full probability vector, in target-class order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub probabilities: Vec<ClassProbability>,
}

impl Prediction {
    /// Labels the probability vector; the predicted label is its argmax.
    pub fn from_probabilities(target: &LabelEncoder, probabilities: &[f64]) -> Self {
        Self {
            label: target
                .decode(argmax(probabilities))
                .unwrap_or_default()
                .to_string(),
            probabilities: target
                .classes()
                .iter()
                .zip(probabilities)
                .map(|(label, &probability)| ClassProbability {
                    label: label.clone(),
                    probability,
                })
                .collect(),
        }
    }

    /// Classes above `DISPLAY_THRESHOLD`, most likely first.
    pub fn significant(&self) -> Vec<ClassProbability> {
        let mut shown: Vec<_> = self
            .probabilities
            .iter()
            .filter(|c| c.probability > DISPLAY_THRESHOLD)
            .cloned()
            .collect();
        shown.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        shown
    }
}

/// What a trained engine reports about itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub engine: EngineKind,
    pub classes: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Network only: epochs actually run and the epoch whose weights were kept.
    pub epochs_run: Option<usize>,
    pub best_epoch: Option<usize>,
    /// `None` when no rows were held out.
    pub evaluation: Option<ClassificationReport>,
}

pub trait PredictionEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Fitted categorical vocabulary, for re-mapping unseen values.
    fn vocabulary(&self) -> &CategoricalVocabulary;

    /// `Predict(record)`. Fails only with `UnknownCategory`.
    fn predict(&self, record: &FeatureRecord) -> Result<Prediction, EncodingError>;

    fn report(&self) -> &TrainingReport;
}

/// `FitModel(trainingTable)` with the default hyperparameters of `kind`.
pub fn train_engine(
    kind: EngineKind,
    table: &TrainingTable,
) -> Result<Arc<dyn PredictionEngine>, TrainingError> {
    info!("Training {kind} engine on {} rows", table.len());
    let engine: Arc<dyn PredictionEngine> = match kind {
        EngineKind::GradientBoosting => Arc::new(GradientBoostingEngine::fit(
            table,
            &GradientBoostingParams::default(),
        )?),
        EngineKind::Embedding => Arc::new(EmbeddingNetworkEngine::fit(
            table,
            &NetworkParams::default(),
        )?),
    };

    let report = engine.report();
    match &report.evaluation {
        Some(eval) => info!(
            "{kind} engine trained: accuracy={:.4}, weighted_f1={:.4}, held_out={}",
            eval.accuracy, eval.weighted_f1, report.test_rows
        ),
        None => info!("{kind} engine trained without held-out rows"),
    }
    Ok(engine)
}

/// Shared by both engines: every class must be present and there must be a choice to make.
pub(crate) fn check_classes(table: &TrainingTable) -> Result<(), TrainingError> {
    let distinct = table
        .labels
        .iter()
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    if table.is_empty() {
        return Err(EncodingError::EmptyTrainingSet.into());
    }
    if distinct < 2 {
        return Err(TrainingError::TooFewClasses(distinct));
    }
    Ok(())
}

/// Row index of the largest value.
pub(crate) fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}

/// Numerically stable softmax, in place.
pub(crate) fn softmax(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

/// Three careers separable by every feature, `per_class` rows each.
#[cfg(test)]
pub(crate) fn separable_table(per_class: usize) -> TrainingTable {
    use crate::features::{normalize, PartialFeatureRecord, WorkPreference};

    let profiles = [
        ("Data Scientist", 9.0, 4.0, ["Python", "Pandas"], "Statistics", "INTJ", WorkPreference::Remote),
        ("Frontend Developer", 4.0, 2.0, ["JavaScript", "React"], "Design", "ENFP", WorkPreference::Hybrid),
        ("DevOps Engineer", 6.0, 6.0, ["Docker", "Kubernetes"], "Computer Science", "ISTJ", WorkPreference::Onsite),
    ];
    let mut table = TrainingTable::default();
    for (label, score, years, skills, background, personality, preference) in profiles {
        for i in 0..per_class {
            let jitter = i as f64 * 0.05;
            table.records.push(normalize(PartialFeatureRecord {
                problem_solving_score: Some(score + jitter),
                coding_experience_years: Some(years + jitter),
                work_experience_years: Some(years - 1.0),
                project_experience_score: Some(score - 1.0),
                technical_skills: Some(skills.iter().map(|s| s.to_string()).collect()),
                soft_skills: None,
                academic_background: Some(background.to_string()),
                personality_type: Some(personality.to_string()),
                work_preference: Some(preference),
            }));
            table.labels.push(label.to_string());
        }
    }
    table
}
