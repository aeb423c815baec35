//! Pattern rules for document (resume) text.
//!
//! A static table of `(category, subcategory) → regex` rules, compiled once and evaluated
//! by pure lookup functions. Document extraction only asks the table questions; it never
//! builds regexes itself, so the table can be swapped for a reduced one in tests.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub category: &'static str,
    pub subcategory: &'static str,
    pub pattern: &'static str,
    pub case_insensitive: bool,
}

const fn rule(category: &'static str, subcategory: &'static str, pattern: &'static str) -> PatternRule {
    PatternRule {
        category,
        subcategory,
        pattern,
        case_insensitive: true,
    }
}

pub const EDUCATION: &str = "education";
pub const TECHNICAL_SKILLS: &str = "technical_skills";
pub const SOFT_SKILLS: &str = "soft_skills";
pub const PROJECT_KEYWORDS: &str = "project_keywords";
pub const EXPERIENCE: &str = "experience";
pub const PROJECT_INDICATORS: &str = "project_indicators";

/// Alternations are leftmost-first: `Java` wins over `JavaScript` when it is listed first.
pub const RESUME_RULES: &[PatternRule] = &[
    rule(EDUCATION, "degree", r"Bachelor|Master|B\.[A-Za-z]+|M\.[A-Za-z]+|Ph\.D"),
    rule(
        EDUCATION,
        "major",
        r"Computer Science|Engineering|Information Technology|Data Science|AI|ML",
    ),
    PatternRule {
        category: EDUCATION,
        subcategory: "gpa",
        pattern: r"[0-9]+\.[0-9]+\s*(?:CGPA|GPA|CPI)",
        case_insensitive: false,
    },
    rule(
        TECHNICAL_SKILLS,
        "programming",
        r"Python|Java|C\+\+|JavaScript|TypeScript|HTML|CSS|SQL",
    ),
    rule(
        TECHNICAL_SKILLS,
        "frameworks",
        r"React|Angular|Vue|Django|Flask|Spring|Express|Node\.js",
    ),
    rule(
        TECHNICAL_SKILLS,
        "ml_tools",
        r"TensorFlow|PyTorch|Scikit-learn|Keras|Pandas|NumPy",
    ),
    rule(TECHNICAL_SKILLS, "databases", r"MySQL|MongoDB|PostgreSQL|SQLite|Redis"),
    rule(TECHNICAL_SKILLS, "devops", r"Docker|Kubernetes|AWS|Azure|GCP|Git"),
    rule(
        SOFT_SKILLS,
        "all",
        r"Leadership|Communication|Team Player|Problem.Solving|Analytical|Critical Thinking|Time Management",
    ),
    rule(
        PROJECT_KEYWORDS,
        "all",
        r"Machine Learning|Deep Learning|Web Development|Full Stack|Database|API|Algorithm|System Design",
    ),
    rule(EXPERIENCE, "years", r"\d+\+?\s*(?:year|yr|month)s?\s*(?:of experience)?"),
    rule(
        PROJECT_INDICATORS,
        "development",
        r"project|developed|created|built|implemented",
    ),
    rule(PROJECT_INDICATORS, "hackathon", r"hackathon|competition|contest"),
    rule(PROJECT_INDICATORS, "team", r"team|collaborated|led"),
    rule(PROJECT_INDICATORS, "award", r"won|winner|award|place"),
];

#[derive(Debug)]
struct CompiledRule {
    category: &'static str,
    subcategory: &'static str,
    regex: Regex,
}

#[derive(Debug)]
pub struct PatternTable {
    rules: Vec<CompiledRule>,
}

impl PatternTable {
    pub fn compile(rules: &[PatternRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|r| {
                RegexBuilder::new(r.pattern)
                    .case_insensitive(r.case_insensitive)
                    .build()
                    .map(|regex| CompiledRule {
                        category: r.category,
                        subcategory: r.subcategory,
                        regex,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn resume() -> Result<Self, regex::Error> {
        Self::compile(RESUME_RULES)
    }

    fn rule(&self, category: &str, subcategory: &str) -> Option<&Regex> {
        self.rules
            .iter()
            .find(|r| r.category == category && r.subcategory == subcategory)
            .map(|r| &r.regex)
    }

    /// Distinct matches in order of first appearance; duplicates differing only in case
    /// keep the first spelling. An absent rule matches nothing.
    pub fn matches(&self, category: &str, subcategory: &str, text: &str) -> Vec<String> {
        let Some(regex) = self.rule(category, subcategory) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|m| seen.insert(m.to_lowercase()))
            .collect()
    }

    /// Number of non-overlapping matches.
    pub fn count(&self, category: &str, subcategory: &str, text: &str) -> usize {
        self.rule(category, subcategory)
            .map(|r| r.find_iter(text).count())
            .unwrap_or(0)
    }

    pub fn first(&self, category: &str, subcategory: &str, text: &str) -> Option<String> {
        self.rule(category, subcategory)
            .and_then(|r| r.find(text))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::resume().unwrap()
    }

    #[test]
    fn test_resume_rules_compile() {
        assert_eq!(table().rules.len(), RESUME_RULES.len());
    }

    #[test]
    fn test_matches_dedup_case_insensitively() {
        let found = table().matches(TECHNICAL_SKILLS, "programming", "Python, python and SQL");
        assert_eq!(found, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_leftmost_alternative_wins() {
        let found = table().matches(TECHNICAL_SKILLS, "programming", "JavaScript");
        assert_eq!(found, vec!["Java"]);
    }

    #[test]
    fn test_gpa_is_case_sensitive() {
        assert_eq!(
            table().first(EDUCATION, "gpa", "GPA 3.8 GPA"),
            Some("3.8 GPA".to_string())
        );
        assert_eq!(table().first(EDUCATION, "gpa", "3.8 gpa"), None);
    }

    #[test]
    fn test_count_is_non_overlapping() {
        let text = "hackathon winner, two hackathons and a contest";
        assert_eq!(table().count(PROJECT_INDICATORS, "hackathon", text), 3);
    }

    #[test]
    fn test_unknown_rule_matches_nothing() {
        assert!(table().matches("hobbies", "all", "chess").is_empty());
        assert_eq!(table().count("hobbies", "all", "chess"), 0);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let bad = [rule("x", "y", "(unclosed")];
        assert!(PatternTable::compile(&bad).is_err());
    }
}
