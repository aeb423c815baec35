//! Encoding/Scaling Layer.
//!
//! Two fitted artifacts, one per engine family:
//! - `LabelScaleArtifact`: scaled numerics followed by label codes, one flat vector.
//! - `EmbeddingArtifact`: scaled numerics plus one token per categorical field, with
//!   the per-field vocabulary sizes and embedding widths the network is built from.
//!
//! Both are immutable after `fit` and shared read-only across requests. A categorical
//! value outside the fitted vocabulary is an `UnknownCategory` error; re-mapping onto the
//! sentinel is an explicit caller decision (`CategoricalVocabulary::conform`).

pub mod artifact;
pub mod label;
pub mod scaler;

use thiserror::Error;

use crate::features::CategoricalField;

pub use artifact::{CategoricalVocabulary, EmbeddingArtifact, EmbeddingInput, LabelScaleArtifact};
pub use label::LabelEncoder;
pub use scaler::StandardScaler;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Unknown category {value:?} for {field}")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    #[error("Unknown target label {0:?}")]
    UnknownLabel(String),

    #[error("Cannot fit encoders on an empty training set")]
    EmptyTrainingSet,

    #[error("{records} records but {labels} labels")]
    LengthMismatch { records: usize, labels: usize },
}
