//! Document-based signal extractor (resume text).
//!
//! All pattern knowledge lives in the injected `PatternTable`; this module only decides
//! which rules feed which feature.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::extraction::AnalysisError;
use crate::features::{normalize, FeatureRecord, PartialFeatureRecord};
use crate::scoring::{self, ProjectIndicatorCounts};
use crate::sources::TextExtractor;
use crate::taxonomy::patterns::{
    PatternTable, EDUCATION, EXPERIENCE, PROJECT_INDICATORS, PROJECT_KEYWORDS, SOFT_SKILLS,
    TECHNICAL_SKILLS,
};

pub const NO_TEXT: &str = "No text could be extracted from the document";

const PROBLEM_SOLVING_WITH_SKILL: f64 = 8.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// True for "Problem Solving" with any single separator between the words, in any case,
/// which is every spelling the soft-skill pattern can match.
fn is_problem_solving(skill: &str) -> bool {
    let skill = skill.to_lowercase();
    skill.chars().count() == "problem solving".len()
        && skill.starts_with("problem")
        && skill.ends_with("solving")
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"));

#[derive(Debug, Clone, Default, Serialize)]
pub struct EducationDetails {
    pub degrees: Vec<String>,
    pub majors: Vec<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TechnicalSkillMatches {
    pub programming: Vec<String>,
    pub frameworks: Vec<String>,
    pub ml_tools: Vec<String>,
    pub databases: Vec<String>,
    pub devops: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub education: EducationDetails,
    pub technical_skills: TechnicalSkillMatches,
    pub soft_skills: Vec<String>,
    pub project_keywords: Vec<String>,
    pub experience_years: Option<f64>,
    pub project_indicators: ProjectIndicatorCounts,
    pub project_experience_score: f64,
    pub features: FeatureRecord,
}

pub struct DocumentExtractor {
    patterns: Arc<PatternTable>,
}

impl DocumentExtractor {
    pub fn new(patterns: Arc<PatternTable>) -> Self {
        Self { patterns }
    }

    pub fn project_indicators(&self, text: &str) -> ProjectIndicatorCounts {
        let count = |sub| self.patterns.count(PROJECT_INDICATORS, sub, text);
        ProjectIndicatorCounts {
            development: count("development"),
            hackathon: count("hackathon"),
            team: count("team"),
            award: count("award"),
        }
    }

    /// First experience phrase, in years (month phrases divided by 12), one decimal.
    pub fn experience_years(&self, text: &str) -> Option<f64> {
        let phrase = self.patterns.first(EXPERIENCE, "years", text)?;
        let amount: f64 = NUMBER.find(&phrase)?.as_str().parse().ok()?;
        let years = if phrase.to_lowercase().contains("month") {
            amount / MONTHS_PER_YEAR
        } else {
            amount
        };
        Some(scoring::round_one_decimal(years))
    }

    pub fn extract(&self, text: &str) -> Result<DocumentAnalysis, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptySource(NO_TEXT.to_string()));
        }
        let text = text.replace(['\n', '\r'], " ");
        let text = text.as_str();

        let education = EducationDetails {
            degrees: self.patterns.matches(EDUCATION, "degree", text),
            majors: self.patterns.matches(EDUCATION, "major", text),
            gpa: self
                .patterns
                .first(EDUCATION, "gpa", text)
                .and_then(|m| NUMBER.find(&m).and_then(|n| n.as_str().parse().ok())),
        };

        let technical = |sub| self.patterns.matches(TECHNICAL_SKILLS, sub, text);
        let technical_skills = TechnicalSkillMatches {
            programming: technical("programming"),
            frameworks: technical("frameworks"),
            ml_tools: technical("ml_tools"),
            databases: technical("databases"),
            devops: technical("devops"),
        };

        let soft_skills = self.patterns.matches(SOFT_SKILLS, "all", text);
        let project_keywords = self.patterns.matches(PROJECT_KEYWORDS, "all", text);
        let experience_years = self.experience_years(text);
        let project_indicators = self.project_indicators(text);
        let project_experience_score = scoring::project_experience_score(&project_indicators);

        debug!(
            "Document indicators: development={}, hackathon={}, team={}, award={}",
            project_indicators.development,
            project_indicators.hackathon,
            project_indicators.team,
            project_indicators.award
        );

        let problem_solving = if soft_skills.iter().any(|s| is_problem_solving(s)) {
            PROBLEM_SOLVING_WITH_SKILL
        } else {
            scoring::PROBLEM_SOLVING_DEFAULT
        };

        let skills: Vec<String> = technical_skills
            .programming
            .iter()
            .chain(&technical_skills.frameworks)
            .chain(&technical_skills.ml_tools)
            .cloned()
            .collect();

        let partial = PartialFeatureRecord {
            problem_solving_score: Some(problem_solving),
            coding_experience_years: Some(experience_years.unwrap_or(0.0)),
            work_experience_years: Some(experience_years.unwrap_or(0.0)),
            project_experience_score: Some(project_experience_score),
            technical_skills: Some(skills),
            soft_skills: Some(soft_skills.clone()),
            academic_background: education.majors.first().cloned(),
            personality_type: None,
            work_preference: None,
        };

        let features = normalize(partial);
        info!(
            "Document analyzed: {} technical skills, project score {}",
            features.technical_skills.len(),
            project_experience_score
        );

        Ok(DocumentAnalysis {
            education,
            technical_skills,
            soft_skills,
            project_keywords,
            experience_years,
            project_indicators,
            project_experience_score,
            features,
        })
    }
}

/// `AnalyzeDocument(path)`: blocking text extraction followed by pattern analysis.
pub fn analyze_document(
    source: &dyn TextExtractor,
    extractor: &DocumentExtractor,
    path: &Path,
) -> Result<DocumentAnalysis, AnalysisError> {
    let text = source.extract_text(path)?;
    extractor.extract(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::UNKNOWN;
    use crate::sources::SourceError;
    use proptest::prelude::*;

    fn extractor() -> DocumentExtractor {
        DocumentExtractor::new(Arc::new(PatternTable::resume().unwrap()))
    }

    const RESUME: &str = "Jane Doe\nB.Tech in Computer Science, 8.9 CGPA\n\
        Skills: Python, React, TensorFlow, MySQL, Docker\n\
        Leadership and Problem Solving\n\
        3 years of experience in Machine Learning";

    #[test]
    fn test_full_resume_features() {
        let analysis = extractor().extract(RESUME).unwrap();

        assert_eq!(analysis.education.degrees, vec!["B.Tech"]);
        assert_eq!(analysis.education.majors.first().map(String::as_str), Some("Computer Science"));
        assert_eq!(analysis.education.gpa, Some(8.9));
        assert_eq!(analysis.technical_skills.databases, vec!["MySQL"]);
        assert_eq!(analysis.technical_skills.devops, vec!["Docker"]);
        assert_eq!(analysis.soft_skills, vec!["Leadership", "Problem Solving"]);
        assert_eq!(analysis.project_keywords, vec!["Machine Learning"]);
        assert_eq!(analysis.experience_years, Some(3.0));

        let f = &analysis.features;
        // "SQL" inside "MySQL" is matched by the programming rule too.
        assert_eq!(f.technical_skills, vec!["Python", "SQL", "React", "TensorFlow"]);
        assert_eq!(f.problem_solving_score, 8.0);
        assert_eq!(f.coding_experience_years, 3.0);
        assert_eq!(f.work_experience_years, 3.0);
        assert_eq!(f.project_experience_score, 1.0);
        assert_eq!(f.academic_background, "Computer Science");
        assert_eq!(f.personality_type, UNKNOWN);
        assert_eq!(f.work_preference, UNKNOWN);
    }

    #[test]
    fn test_hackathon_and_project_example() {
        let text = "Hackathon finalist. Second hackathon: a project on graphs.";
        let analysis = extractor().extract(text).unwrap();
        assert_eq!(
            analysis.project_indicators,
            ProjectIndicatorCounts {
                development: 1,
                hackathon: 2,
                team: 0,
                award: 0
            }
        );
        assert_eq!(analysis.project_experience_score, 5.0);
    }

    #[test]
    fn test_month_phrases_convert_to_years() {
        let ex = extractor();
        assert_eq!(ex.experience_years("6 months of experience"), Some(0.5));
        assert_eq!(ex.experience_years("18 months"), Some(1.5));
        assert_eq!(ex.experience_years("5+ years of experience"), Some(5.0));
        assert_eq!(ex.experience_years("no numbers here"), None);
    }

    #[test]
    fn test_problem_solving_spellings_all_score_eight() {
        for text in ["Problem Solving", "problem-solving", "PROBLEM_SOLVING", "Problem/Solving"] {
            let analysis = extractor().extract(text).unwrap();
            assert_eq!(analysis.soft_skills.len(), 1, "{text}");
            assert_eq!(analysis.features.problem_solving_score, 8.0, "{text}");
        }
    }

    #[test]
    fn test_is_problem_solving() {
        assert!(is_problem_solving("Problem-Solving"));
        assert!(is_problem_solving("problem solving"));
        assert!(!is_problem_solving("Problems Solving"));
        assert!(!is_problem_solving("Leadership"));
    }

    #[test]
    fn test_without_problem_solving_skill_defaults_to_five() {
        let analysis = extractor().extract("Python developer").unwrap();
        assert_eq!(analysis.features.problem_solving_score, 5.0);
        assert_eq!(analysis.features.academic_background, UNKNOWN);
        assert_eq!(analysis.features.coding_experience_years, 0.0);
    }

    #[test]
    fn test_empty_text_is_an_error() {
        for text in ["", "   \n\t "] {
            let err = extractor().extract(text).unwrap_err();
            assert!(matches!(err, AnalysisError::EmptySource(ref m) if m == NO_TEXT));
        }
    }

    struct FixedText(Result<&'static str, ()>);

    impl TextExtractor for FixedText {
        fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
            self.0
                .map(String::from)
                .map_err(|_| SourceError::Extraction(path.display().to_string()))
        }
    }

    #[test]
    fn test_analyze_document_uses_extractor() {
        let analysis =
            analyze_document(&FixedText(Ok(RESUME)), &extractor(), Path::new("cv.pdf")).unwrap();
        assert_eq!(analysis.features.academic_background, "Computer Science");
    }

    #[test]
    fn test_analyze_document_extraction_failure() {
        let err = analyze_document(&FixedText(Err(())), &extractor(), Path::new("cv.pdf"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SourceUnavailable(SourceError::Extraction(_))));
    }

    proptest! {
        #[test]
        fn prop_project_score_saturates(
            projects in 0usize..1_000,
            hackathons in 0usize..200,
            awards in 0usize..200,
        ) {
            let text = format!(
                "intro {} {} {}",
                "project ".repeat(projects),
                "hackathon ".repeat(hackathons),
                "award ".repeat(awards)
            );
            let score = extractor().extract(&text).unwrap().project_experience_score;
            prop_assert!((1.0..=10.0).contains(&score));
        }
    }
}
