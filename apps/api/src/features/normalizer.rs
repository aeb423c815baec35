//! Feature Record Normalizer. Turns any extractor's partial output into the canonical record.
//!
//! Rules:
//! - missing numeric fields take neutral defaults (problem solving 5, years 0, project 1)
//! - numeric fields are clamped into their documented ranges; NaN falls back to the default
//! - missing, blank, or whitespace categorical fields become `"Unknown"`
//! - skill lists are trimmed and de-duplicated case-insensitively, first spelling wins

use std::collections::HashSet;

use crate::features::record::{FeatureRecord, PartialFeatureRecord, WorkPreference, UNKNOWN};

pub const DEFAULT_PROBLEM_SOLVING_SCORE: f64 = 5.0;
pub const DEFAULT_PROJECT_EXPERIENCE_SCORE: f64 = 1.0;

pub fn normalize(partial: PartialFeatureRecord) -> FeatureRecord {
    FeatureRecord {
        problem_solving_score: bounded(
            partial.problem_solving_score,
            DEFAULT_PROBLEM_SOLVING_SCORE,
            0.0,
            10.0,
        ),
        coding_experience_years: bounded(partial.coding_experience_years, 0.0, 0.0, f64::MAX),
        work_experience_years: bounded(partial.work_experience_years, 0.0, 0.0, f64::MAX),
        project_experience_score: bounded(
            partial.project_experience_score,
            DEFAULT_PROJECT_EXPERIENCE_SCORE,
            1.0,
            10.0,
        ),
        technical_skills: dedup_skills(partial.technical_skills.unwrap_or_default()),
        soft_skills: dedup_skills(partial.soft_skills.unwrap_or_default()),
        academic_background: or_sentinel(partial.academic_background),
        personality_type: or_sentinel(partial.personality_type),
        work_preference: partial
            .work_preference
            .unwrap_or(WorkPreference::Unknown)
            .as_str()
            .to_string(),
    }
}

fn bounded(value: Option<f64>, default: f64, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => default,
    }
}

fn or_sentinel(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(UNKNOWN))
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::record::CategoricalField;

    #[test]
    fn test_empty_partial_yields_all_sentinels() {
        let record = normalize(PartialFeatureRecord::default());
        for field in CategoricalField::ALL {
            assert_eq!(record.categorical_value(field), UNKNOWN, "{field}");
        }
        assert_eq!(record.problem_solving_score, DEFAULT_PROBLEM_SOLVING_SCORE);
        assert_eq!(record.project_experience_score, DEFAULT_PROJECT_EXPERIENCE_SCORE);
        assert_eq!(record.coding_experience_years, 0.0);
    }

    #[test]
    fn test_quiz_shaped_partial_keeps_its_two_dimensions() {
        let record = normalize(PartialFeatureRecord {
            problem_solving_score: Some(0.73),
            coding_experience_years: Some(3.2),
            ..Default::default()
        });
        assert_eq!(record.problem_solving_score, 0.73);
        assert_eq!(record.coding_experience_years, 3.2);
        assert_eq!(record.work_experience_years, 0.0);
        assert_eq!(record.work_preference, UNKNOWN);
    }

    #[test]
    fn test_numeric_fields_are_clamped() {
        let record = normalize(PartialFeatureRecord {
            problem_solving_score: Some(42.0),
            coding_experience_years: Some(-1.0),
            work_experience_years: Some(f64::NAN),
            project_experience_score: Some(0.0),
            ..Default::default()
        });
        assert_eq!(record.problem_solving_score, 10.0);
        assert_eq!(record.coding_experience_years, 0.0);
        assert_eq!(record.work_experience_years, 0.0);
        assert_eq!(record.project_experience_score, 1.0);
    }

    #[test]
    fn test_skills_dedup_case_insensitive_first_spelling_wins() {
        let record = normalize(PartialFeatureRecord {
            technical_skills: Some(vec![
                "Python".into(),
                "python".into(),
                " React ".into(),
                "".into(),
            ]),
            ..Default::default()
        });
        assert_eq!(record.technical_skills, vec!["Python", "React"]);
    }

    #[test]
    fn test_blank_strings_become_sentinel() {
        let record = normalize(PartialFeatureRecord {
            academic_background: Some("   ".into()),
            personality_type: Some("INTJ".into()),
            ..Default::default()
        });
        assert_eq!(record.academic_background, UNKNOWN);
        assert_eq!(record.personality_type, "INTJ");
    }
}
