use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::encoding::{EncodingError, LabelEncoder, StandardScaler};
use crate::features::{CategoricalField, FeatureRecord, UNKNOWN};

/// Upper bound on an embedding's output width.
pub const MAX_EMBEDDING_WIDTH: usize = 10;

/// One label encoder per categorical field, in `CategoricalField::ALL` order.
/// Every vocabulary contains the `"Unknown"` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalVocabulary {
    encoders: Vec<LabelEncoder>,
}

impl CategoricalVocabulary {
    pub fn fit(records: &[FeatureRecord]) -> Self {
        let encoders = CategoricalField::ALL
            .iter()
            .map(|&field| {
                LabelEncoder::fit_with_sentinel(
                    records.iter().map(|r| r.categorical_value(field).into_owned()),
                    UNKNOWN,
                )
            })
            .collect();
        Self { encoders }
    }

    pub fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        &self.encoders[field.index()]
    }

    /// Label codes for the five categorical fields.
    pub fn encode(&self, record: &FeatureRecord) -> Result<[usize; 5], EncodingError> {
        let mut codes = [0usize; 5];
        for field in CategoricalField::ALL {
            let value = record.categorical_value(field);
            codes[field.index()] = self.encoder(field).encode(&value).ok_or_else(|| {
                EncodingError::UnknownCategory {
                    field,
                    value: value.into_owned(),
                }
            })?;
        }
        Ok(codes)
    }

    /// Copy of `record` with every out-of-vocabulary categorical value replaced by the
    /// sentinel, plus the fields that were replaced.
    pub fn conform(&self, record: &FeatureRecord) -> (FeatureRecord, Vec<CategoricalField>) {
        let mut conformed = record.clone();
        let mut remapped = Vec::new();
        for field in CategoricalField::ALL {
            let value = record.categorical_value(field);
            if !self.encoder(field).contains(&value) {
                warn!("Re-mapping unseen {field} value {value:?} to {UNKNOWN}");
                conformed.set_categorical(field, UNKNOWN);
                remapped.push(field);
            }
        }
        (conformed, remapped)
    }
}

fn check_shapes(records: &[FeatureRecord], labels: &[String]) -> Result<(), EncodingError> {
    if records.len() != labels.len() {
        return Err(EncodingError::LengthMismatch {
            records: records.len(),
            labels: labels.len(),
        });
    }
    if records.is_empty() {
        return Err(EncodingError::EmptyTrainingSet);
    }
    Ok(())
}

fn fit_scaler(records: &[FeatureRecord]) -> Result<StandardScaler, EncodingError> {
    let rows: Vec<[f64; 4]> = records.iter().map(FeatureRecord::numeric_features).collect();
    StandardScaler::fit(&rows).ok_or(EncodingError::EmptyTrainingSet)
}

/// Scaler + per-field label encoders + target encoder, for the tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScaleArtifact {
    scaler: StandardScaler,
    vocabulary: CategoricalVocabulary,
    target: LabelEncoder,
}

impl LabelScaleArtifact {
    pub fn fit(records: &[FeatureRecord], labels: &[String]) -> Result<Self, EncodingError> {
        check_shapes(records, labels)?;
        let artifact = Self {
            scaler: fit_scaler(records)?,
            vocabulary: CategoricalVocabulary::fit(records),
            target: LabelEncoder::fit(labels.iter().cloned()),
        };
        info!(
            "Fitted label/scale encoders over {} rows, {} classes",
            records.len(),
            artifact.target.len()
        );
        Ok(artifact)
    }

    /// Four scaled numerics then five label codes.
    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, EncodingError> {
        let codes = self.vocabulary.encode(record)?;
        let mut row = self.scaler.transform(&record.numeric_features());
        row.extend(codes.iter().map(|&c| c as f64));
        Ok(row)
    }

    pub fn vocabulary(&self) -> &CategoricalVocabulary {
        &self.vocabulary
    }

    pub fn target(&self) -> &LabelEncoder {
        &self.target
    }
}

/// Model-ready input for the embedding network.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingInput {
    pub numeric: Vec<f64>,
    /// One token per categorical field, in `CategoricalField::ALL` order.
    pub tokens: [usize; 5],
}

/// Scaler + encoders + vocabulary sizes, for the embedding network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingArtifact {
    scaler: StandardScaler,
    vocabulary: CategoricalVocabulary,
    target: LabelEncoder,
    vocab_sizes: Vec<usize>,
}

impl EmbeddingArtifact {
    pub fn fit(records: &[FeatureRecord], labels: &[String]) -> Result<Self, EncodingError> {
        check_shapes(records, labels)?;
        let vocabulary = CategoricalVocabulary::fit(records);
        // One extra row per table, reserved for padding.
        let vocab_sizes = CategoricalField::ALL
            .iter()
            .map(|&f| vocabulary.encoder(f).len() + 1)
            .collect();
        let artifact = Self {
            scaler: fit_scaler(records)?,
            vocabulary,
            target: LabelEncoder::fit(labels.iter().cloned()),
            vocab_sizes,
        };
        info!(
            "Fitted embedding encoders over {} rows, vocab sizes {:?}",
            records.len(),
            artifact.vocab_sizes
        );
        Ok(artifact)
    }

    pub fn transform(&self, record: &FeatureRecord) -> Result<EmbeddingInput, EncodingError> {
        Ok(EmbeddingInput {
            tokens: self.vocabulary.encode(record)?,
            numeric: self.scaler.transform(&record.numeric_features()),
        })
    }

    pub fn vocab_size(&self, field: CategoricalField) -> usize {
        self.vocab_sizes[field.index()]
    }

    /// `min(10, vocab_size / 2)`, never below one.
    pub fn embedding_width(&self, field: CategoricalField) -> usize {
        (self.vocab_size(field) / 2).clamp(1, MAX_EMBEDDING_WIDTH)
    }

    pub fn numeric_width(&self) -> usize {
        self.scaler.width()
    }

    pub fn vocabulary(&self) -> &CategoricalVocabulary {
        &self.vocabulary
    }

    pub fn target(&self) -> &LabelEncoder {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{normalize, PartialFeatureRecord};
    use proptest::prelude::*;

    fn record(skills: &[&str], background: &str, personality: &str, years: f64) -> FeatureRecord {
        normalize(PartialFeatureRecord {
            problem_solving_score: Some(7.0),
            coding_experience_years: Some(years),
            work_experience_years: Some(years / 2.0),
            project_experience_score: Some(6.0),
            technical_skills: Some(skills.iter().map(|s| s.to_string()).collect()),
            soft_skills: Some(vec!["Leadership".into()]),
            academic_background: Some(background.into()),
            personality_type: Some(personality.into()),
            work_preference: None,
        })
    }

    fn training() -> (Vec<FeatureRecord>, Vec<String>) {
        (
            vec![
                record(&["Python", "PyTorch"], "Computer Science", "INTJ", 3.0),
                record(&["JavaScript"], "Design", "ENFP", 1.0),
                record(&["Go"], "Computer Science", "ISTP", 5.0),
            ],
            vec!["ML Engineer".into(), "Frontend Developer".into(), "Backend Developer".into()],
        )
    }

    #[test]
    fn test_label_scale_transform_layout() {
        let (records, labels) = training();
        let artifact = LabelScaleArtifact::fit(&records, &labels).unwrap();
        let row = artifact.transform(&records[0]).unwrap();
        assert_eq!(row.len(), 9);

        let tech = artifact.vocabulary().encoder(CategoricalField::TechnicalSkills);
        assert_eq!(row[4], tech.encode("Python, PyTorch").unwrap() as f64);
        assert_eq!(artifact.target().classes()[0], "Backend Developer");
    }

    #[test]
    fn test_sentinel_is_in_every_vocabulary() {
        let (records, labels) = training();
        let artifact = LabelScaleArtifact::fit(&records, &labels).unwrap();
        for field in CategoricalField::ALL {
            assert!(artifact.vocabulary().encoder(field).contains(UNKNOWN), "{field}");
        }
        // work_preference was never provided, so the whole column is the sentinel.
        let mut quiz_only = normalize(PartialFeatureRecord::default());
        quiz_only.problem_solving_score = 0.5;
        assert!(artifact.transform(&quiz_only).is_ok());
    }

    #[test]
    fn test_unseen_category_fails_with_field_and_value() {
        let (records, labels) = training();
        let artifact = LabelScaleArtifact::fit(&records, &labels).unwrap();
        let novel = record(&["Python", "PyTorch"], "Astrophysics", "INTJ", 2.0);
        match artifact.transform(&novel) {
            Err(EncodingError::UnknownCategory { field, value }) => {
                assert_eq!(field, CategoricalField::AcademicBackground);
                assert_eq!(value, "Astrophysics");
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_conform_remaps_only_unseen_fields() {
        let (records, labels) = training();
        let artifact = LabelScaleArtifact::fit(&records, &labels).unwrap();
        let novel = record(&["Rust"], "Astrophysics", "INTJ", 2.0);
        let (conformed, remapped) = artifact.vocabulary().conform(&novel);
        assert_eq!(
            remapped,
            vec![CategoricalField::TechnicalSkills, CategoricalField::AcademicBackground]
        );
        assert!(conformed.technical_skills.is_empty());
        assert_eq!(conformed.academic_background, UNKNOWN);
        assert_eq!(conformed.personality_type, "INTJ");
        assert!(artifact.transform(&conformed).is_ok());
    }

    #[test]
    fn test_fit_rejects_bad_shapes() {
        assert!(matches!(
            LabelScaleArtifact::fit(&[], &[]),
            Err(EncodingError::EmptyTrainingSet)
        ));
        let (records, _) = training();
        assert!(matches!(
            EmbeddingArtifact::fit(&records, &["x".to_string()]),
            Err(EncodingError::LengthMismatch { records: 3, labels: 1 })
        ));
    }

    #[test]
    fn test_embedding_sizes_and_widths() {
        let (records, labels) = training();
        let artifact = EmbeddingArtifact::fit(&records, &labels).unwrap();
        // 3 distinct skill strings + sentinel + padding
        assert_eq!(artifact.vocab_size(CategoricalField::TechnicalSkills), 5);
        assert_eq!(artifact.embedding_width(CategoricalField::TechnicalSkills), 2);
        // only the sentinel + padding
        assert_eq!(artifact.vocab_size(CategoricalField::WorkPreference), 2);
        assert_eq!(artifact.embedding_width(CategoricalField::WorkPreference), 1);
        assert_eq!(artifact.numeric_width(), 4);

        let input = artifact.transform(&records[2]).unwrap();
        assert_eq!(input.numeric.len(), 4);
        for field in CategoricalField::ALL {
            assert!(input.tokens[field.index()] < artifact.vocab_size(field));
        }
    }

    #[test]
    fn test_embedding_width_caps_at_ten() {
        let records: Vec<_> = (0..40)
            .map(|i| record(&[format!("skill-{i}").as_str()], "CS", "INTJ", 1.0))
            .collect();
        let labels = vec!["x".to_string(); 40];
        let artifact = EmbeddingArtifact::fit(&records, &labels).unwrap();
        assert_eq!(artifact.embedding_width(CategoricalField::TechnicalSkills), MAX_EMBEDDING_WIDTH);
    }

    proptest! {
        #[test]
        fn prop_training_vocabulary_round_trips(
            picks in proptest::collection::vec((0usize..4, 0usize..3, 0.0f64..20.0), 1..12),
            pick in 0usize..12,
        ) {
            let skills = ["Python", "Rust", "SQL", "Go"];
            let majors = ["CS", "Math", "Physics"];
            let records: Vec<_> = picks
                .iter()
                .map(|&(s, m, y)| record(&[skills[s]], majors[m], "INTJ", y))
                .collect();
            let labels: Vec<String> = (0..records.len()).map(|i| format!("c{}", i % 3)).collect();
            let artifact = EmbeddingArtifact::fit(&records, &labels).unwrap();

            let seen = &records[pick % records.len()];
            prop_assert!(artifact.transform(seen).is_ok());

            let mut unseen = seen.clone();
            unseen.academic_background = "Underwater Basket Weaving".into();
            let is_unknown = matches!(
                artifact.transform(&unseen),
                Err(EncodingError::UnknownCategory { field: CategoricalField::AcademicBackground, .. })
            );
            prop_assert!(is_unknown);
        }
    }
}
