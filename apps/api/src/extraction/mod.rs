//! Signal extractors, one per input modality (profile, document, quiz).
//! Each turns raw input into a `PartialFeatureRecord` and the normalizer makes it canonical.
//! Fetching and file handling stay at the edges. The extract functions are pure.

pub mod document;
pub mod handlers;
pub mod profile;
pub mod questions;
pub mod quiz;

use thiserror::Error;

use crate::sources::SourceError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("{0}")]
    EmptySource(String),

    #[error("Not a valid profile username or URL: {0:?}")]
    InvalidIdentifier(String),
}
