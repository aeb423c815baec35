use std::sync::Arc;

use crate::engine::PredictionEngine;
use crate::extraction::document::DocumentExtractor;
use crate::extraction::profile::ProfileExtractor;
use crate::extraction::questions::QuestionBank;
use crate::sources::{ProfileSource, TextExtractor};
use crate::taxonomy::Taxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hosted-code profile API. Default: `GithubClient`.
    pub profile_source: Arc<dyn ProfileSource>,
    /// PDF text extraction. Default: `PdfTextExtractor`.
    pub text_extractor: Arc<dyn TextExtractor>,
    pub taxonomy: Arc<Taxonomy>,
    pub profile_extractor: Arc<ProfileExtractor>,
    pub document_extractor: Arc<DocumentExtractor>,
    pub question_bank: Arc<QuestionBank>,
    /// `None` until a training table has been loaded and fit.
    pub engine: Option<Arc<dyn PredictionEngine>>,
}
