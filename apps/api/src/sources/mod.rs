//! External collaborators: the hosted-code profile API and document text extraction.
//! The core only talks to these through the traits below, never to the network or
//! filesystem directly, so tests swap in in-memory doubles.

pub mod github;
pub mod pdf;

use thiserror::Error;

pub use github::{GithubClient, ProfileSource};
pub use pdf::{PdfTextExtractor, TextExtractor};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Refusing to request path segment {0:?}")]
    InvalidPathSegment(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
