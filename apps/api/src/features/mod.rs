//! Canonical feature schema shared by every signal extractor and both prediction engines.
//! Extractors emit a `PartialFeatureRecord` and the normalizer is the only way to obtain a
//! `FeatureRecord`, so sentinel handling lives in exactly one place.

pub mod normalizer;
pub mod record;

pub use normalizer::normalize;
pub use record::{
    CategoricalField, FeatureRecord, PartialFeatureRecord, WorkPreference, UNKNOWN,
};
