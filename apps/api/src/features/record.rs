//! Canonical feature record and its partial (extractor-side) counterpart.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A numeric feature outside its documented range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be {expected}, got {value}")]
pub struct OutOfRange {
    pub field: &'static str,
    pub expected: &'static str,
    pub value: f64,
}

/// Sentinel for categorical information a source cannot provide.
/// Every fitted vocabulary contains it.
pub const UNKNOWN: &str = "Unknown";

/// The five categorical features, in tensor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    TechnicalSkills,
    SoftSkills,
    AcademicBackground,
    PersonalityType,
    WorkPreference,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::TechnicalSkills,
        CategoricalField::SoftSkills,
        CategoricalField::AcademicBackground,
        CategoricalField::PersonalityType,
        CategoricalField::WorkPreference,
    ];

    /// Column name used by the training table.
    pub fn column(&self) -> &'static str {
        match self {
            CategoricalField::TechnicalSkills => "Technical_Skills",
            CategoricalField::SoftSkills => "Soft_Skills",
            CategoricalField::AcademicBackground => "Academic Background",
            CategoricalField::PersonalityType => "Personality Type",
            CategoricalField::WorkPreference => "Work Preference",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            CategoricalField::TechnicalSkills => 0,
            CategoricalField::SoftSkills => 1,
            CategoricalField::AcademicBackground => 2,
            CategoricalField::PersonalityType => 3,
            CategoricalField::WorkPreference => 4,
        }
    }
}

impl std::fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Closed work-preference vocabulary produced by the extractors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkPreference {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Unknown,
}

impl WorkPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkPreference::Remote => "Remote",
            WorkPreference::Hybrid => "Hybrid",
            WorkPreference::Onsite => "Onsite",
            WorkPreference::Unknown => UNKNOWN,
        }
    }

    /// Maps free text onto the vocabulary. Returns `None` for anything unrecognised
    /// so the caller decides whether to fall back to the sentinel.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "remote" | "work from home" | "wfh" => Some(WorkPreference::Remote),
            "hybrid" => Some(WorkPreference::Hybrid),
            "onsite" | "on-site" | "on site" | "office" | "in-office" => {
                Some(WorkPreference::Onsite)
            }
            "unknown" | "" => Some(WorkPreference::Unknown),
            _ => None,
        }
    }
}

/// The contract between extractors and prediction engines.
///
/// List-valued skills are encoded as a single categorical value (comma-joined), so the
/// order of `technical_skills` and `soft_skills` is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub problem_solving_score: f64,
    pub coding_experience_years: f64,
    pub work_experience_years: f64,
    pub project_experience_score: f64,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub academic_background: String,
    pub personality_type: String,
    pub work_preference: String,
}

impl FeatureRecord {
    /// Checks each numeric feature against its range. Extractor output always passes;
    /// this guards records supplied directly by callers.
    pub fn check_ranges(&self) -> Result<(), OutOfRange> {
        let checks = [
            ("problem_solving_score", "within [0, 10]", self.problem_solving_score, 0.0, 10.0),
            ("coding_experience_years", ">= 0", self.coding_experience_years, 0.0, f64::MAX),
            ("work_experience_years", ">= 0", self.work_experience_years, 0.0, f64::MAX),
            ("project_experience_score", "within [1, 10]", self.project_experience_score, 1.0, 10.0),
        ];
        for (field, expected, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(OutOfRange {
                    field,
                    expected,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Problem-solving, coding years, work years, project experience.
    pub fn numeric_features(&self) -> [f64; 4] {
        [
            self.problem_solving_score,
            self.coding_experience_years,
            self.work_experience_years,
            self.project_experience_score,
        ]
    }

    /// The value a categorical encoder sees for `field`.
    /// Empty lists and blank strings collapse to the sentinel.
    pub fn categorical_value(&self, field: CategoricalField) -> Cow<'_, str> {
        let value: Cow<'_, str> = match field {
            CategoricalField::TechnicalSkills => Cow::Owned(join_skills(&self.technical_skills)),
            CategoricalField::SoftSkills => Cow::Owned(join_skills(&self.soft_skills)),
            CategoricalField::AcademicBackground => Cow::Borrowed(self.academic_background.trim()),
            CategoricalField::PersonalityType => Cow::Borrowed(self.personality_type.trim()),
            CategoricalField::WorkPreference => Cow::Borrowed(self.work_preference.trim()),
        };
        if value.is_empty() {
            Cow::Borrowed(UNKNOWN)
        } else {
            value
        }
    }

    /// Overwrites a categorical field with a single value (used when re-mapping unseen
    /// categories onto the sentinel).
    pub fn set_categorical(&mut self, field: CategoricalField, value: &str) {
        match field {
            CategoricalField::TechnicalSkills => self.technical_skills = split_skills(value),
            CategoricalField::SoftSkills => self.soft_skills = split_skills(value),
            CategoricalField::AcademicBackground => self.academic_background = value.to_string(),
            CategoricalField::PersonalityType => self.personality_type = value.to_string(),
            CategoricalField::WorkPreference => self.work_preference = value.to_string(),
        }
    }
}

/// What a single extractor knows. `None` means "this modality cannot tell".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialFeatureRecord {
    pub problem_solving_score: Option<f64>,
    pub coding_experience_years: Option<f64>,
    pub work_experience_years: Option<f64>,
    pub project_experience_score: Option<f64>,
    pub technical_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
    pub academic_background: Option<String>,
    pub personality_type: Option<String>,
    pub work_preference: Option<WorkPreference>,
}

pub fn join_skills(skills: &[String]) -> String {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits a comma-joined skill string. The sentinel and blank input yield an empty list.
pub fn split_skills(value: &str) -> Vec<String> {
    if value.trim().eq_ignore_ascii_case(UNKNOWN) {
        return Vec::new();
    }
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord {
            problem_solving_score: 6.0,
            coding_experience_years: 2.5,
            work_experience_years: 1.0,
            project_experience_score: 4.0,
            technical_skills: vec!["Python".into(), "docker".into()],
            soft_skills: vec![],
            academic_background: "Computer Science".into(),
            personality_type: "".into(),
            work_preference: "Remote".into(),
        }
    }

    #[test]
    fn test_check_ranges_accepts_bounds() {
        let mut r = record();
        assert!(r.check_ranges().is_ok());
        r.problem_solving_score = 0.0;
        r.project_experience_score = 10.0;
        r.coding_experience_years = 0.0;
        assert!(r.check_ranges().is_ok());
    }

    #[test]
    fn test_check_ranges_names_the_field() {
        let mut r = record();
        r.problem_solving_score = 42.0;
        let err = r.check_ranges().unwrap_err();
        assert_eq!(err.field, "problem_solving_score");
        assert_eq!(err.to_string(), "problem_solving_score must be within [0, 10], got 42");

        let mut r = record();
        r.work_experience_years = -1.0;
        assert_eq!(r.check_ranges().unwrap_err().field, "work_experience_years");

        let mut r = record();
        r.project_experience_score = 0.5;
        assert_eq!(r.check_ranges().unwrap_err().field, "project_experience_score");
    }

    #[test]
    fn test_skills_are_comma_joined_for_encoding() {
        let r = record();
        assert_eq!(
            r.categorical_value(CategoricalField::TechnicalSkills),
            "Python, docker"
        );
    }

    #[test]
    fn test_empty_categoricals_become_sentinel() {
        let r = record();
        assert_eq!(r.categorical_value(CategoricalField::SoftSkills), UNKNOWN);
        assert_eq!(r.categorical_value(CategoricalField::PersonalityType), UNKNOWN);
    }

    #[test]
    fn test_split_skills_trims_and_drops_blanks() {
        assert_eq!(
            split_skills(" Python ,NLP,, PyTorch"),
            vec!["Python", "NLP", "PyTorch"]
        );
        assert!(split_skills("Unknown").is_empty());
    }

    #[test]
    fn test_set_categorical_to_sentinel_round_trips() {
        let mut r = record();
        r.set_categorical(CategoricalField::TechnicalSkills, UNKNOWN);
        assert!(r.technical_skills.is_empty());
        assert_eq!(r.categorical_value(CategoricalField::TechnicalSkills), UNKNOWN);
    }

    #[test]
    fn test_work_preference_parse() {
        assert_eq!(WorkPreference::parse("remote"), Some(WorkPreference::Remote));
        assert_eq!(WorkPreference::parse("On-site"), Some(WorkPreference::Onsite));
        assert_eq!(WorkPreference::parse(""), Some(WorkPreference::Unknown));
        assert_eq!(WorkPreference::parse("Freelance"), None);
    }

    #[test]
    fn test_field_indices_follow_tensor_order() {
        for (i, field) in CategoricalField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }
}
