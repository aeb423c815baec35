use serde::{Deserialize, Serialize};

use crate::features::record::{split_skills, FeatureRecord};

/// One row of the labelled training table (CSV headers as produced by the data team).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRow {
    #[serde(rename = "Problem-Solving Score")]
    pub problem_solving_score: f64,
    #[serde(rename = "Coding Experience (Years)")]
    pub coding_experience_years: f64,
    #[serde(rename = "Work_Experience")]
    pub work_experience_years: f64,
    #[serde(rename = "Project Experience")]
    pub project_experience_score: f64,
    #[serde(rename = "Technical_Skills", default)]
    pub technical_skills: String,
    #[serde(rename = "Soft_Skills", default)]
    pub soft_skills: String,
    #[serde(rename = "Academic Background", default)]
    pub academic_background: String,
    #[serde(rename = "Personality Type", default)]
    pub personality_type: String,
    #[serde(rename = "Work Preference", default)]
    pub work_preference: String,
    #[serde(rename = "Recommended Career")]
    pub recommended_career: String,
}

impl TrainingRow {
    /// Splits the row into a feature record and its target label.
    ///
    /// Training rows are taken as-is (no clamping); the scaler absorbs whatever numeric
    /// range the table uses.
    pub fn into_labeled(self) -> (FeatureRecord, String) {
        let record = FeatureRecord {
            problem_solving_score: self.problem_solving_score,
            coding_experience_years: self.coding_experience_years,
            work_experience_years: self.work_experience_years,
            project_experience_score: self.project_experience_score,
            technical_skills: split_skills(&self.technical_skills),
            soft_skills: split_skills(&self.soft_skills),
            academic_background: self.academic_background.trim().to_string(),
            personality_type: self.personality_type.trim().to_string(),
            work_preference: self.work_preference.trim().to_string(),
        };
        (record, self.recommended_career.trim().to_string())
    }
}
