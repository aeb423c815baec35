//! Quiz question banks.

use serde::{Deserialize, Serialize};

/// Options per question; answers are 1-based indices into this range.
pub const OPTIONS_PER_QUESTION: usize = 4;
/// Questions sampled from each bank per assessment.
pub const QUESTIONS_PER_DIMENSION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ProblemSolving,
    CodingExperience,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::ProblemSolving, Dimension::CodingExperience];
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub dimension: Dimension,
    pub prompt: &'static str,
    pub options: [&'static str; OPTIONS_PER_QUESTION],
    /// Hidden from callers; answer `n` scores `weights[n - 1]`.
    #[serde(skip)]
    pub weights: [f64; OPTIONS_PER_QUESTION],
}

const fn q(
    id: &'static str,
    dimension: Dimension,
    prompt: &'static str,
    options: [&'static str; OPTIONS_PER_QUESTION],
    weights: [f64; OPTIONS_PER_QUESTION],
) -> Question {
    Question {
        id,
        dimension,
        prompt,
        options,
        weights,
    }
}

use Dimension::{CodingExperience as CE, ProblemSolving as PS};

pub const PROBLEM_SOLVING_QUESTIONS: [Question; 10] = [
    q(
        "ps-01",
        PS,
        "How do you typically approach a complex programming problem?",
        [
            "Jump straight into coding",
            "Break it down into smaller sub-problems",
            "Look for existing solutions to copy",
            "Ask someone else to solve it",
        ],
        [0.3, 0.9, 0.4, 0.2],
    ),
    q(
        "ps-02",
        PS,
        "When faced with a bug, what's your first step?",
        [
            "Use print statements everywhere",
            "Use a debugger and set breakpoints",
            "Read documentation and error messages carefully",
            "Start over from scratch",
        ],
        [0.4, 0.8, 0.7, 0.2],
    ),
    q(
        "ps-03",
        PS,
        "How do you handle algorithm optimization?",
        [
            "Ignore it if the code works",
            "Profile the code and identify bottlenecks",
            "Add more hardware resources",
            "Only optimize if someone complains",
        ],
        [0.2, 0.9, 0.4, 0.3],
    ),
    q(
        "ps-04",
        PS,
        "What's your approach to code organization?",
        [
            "Keep everything in one file",
            "Use design patterns and modular structure",
            "Copy-paste similar code",
            "No specific organization",
        ],
        [0.3, 0.8, 0.2, 0.1],
    ),
    q(
        "ps-05",
        PS,
        "How do you validate your solution?",
        [
            "Manual testing only",
            "Comprehensive test cases and edge cases",
            "Basic happy path testing",
            "Let users find bugs",
        ],
        [0.4, 0.9, 0.5, 0.1],
    ),
    q(
        "ps-06",
        PS,
        "When working on a new feature, you...",
        [
            "Start coding immediately",
            "Plan architecture and design first",
            "Copy from similar features",
            "Wait for detailed instructions",
        ],
        [0.3, 0.8, 0.4, 0.2],
    ),
    q(
        "ps-07",
        PS,
        "How do you handle technical debt?",
        [
            "Ignore it",
            "Regular refactoring and improvements",
            "Only fix when broken",
            "Complete rewrite when messy",
        ],
        [0.1, 0.9, 0.4, 0.3],
    ),
    q(
        "ps-08",
        PS,
        "When learning a new technology, you...",
        [
            "Copy-paste examples",
            "Build small projects to experiment",
            "Read documentation thoroughly",
            "Watch video tutorials only",
        ],
        [0.3, 0.8, 0.7, 0.4],
    ),
    q(
        "ps-09",
        PS,
        "How do you handle project requirements?",
        [
            "Start coding immediately",
            "Analyze and clarify requirements first",
            "Make assumptions",
            "Follow orders exactly",
        ],
        [0.2, 0.9, 0.3, 0.4],
    ),
    q(
        "ps-10",
        PS,
        "When reviewing code, you focus on...",
        [
            "Syntax only",
            "Logic, performance, and maintainability",
            "Formatting",
            "Finding any issues",
        ],
        [0.3, 0.9, 0.2, 0.5],
    ),
];

pub const CODING_EXPERIENCE_QUESTIONS: [Question; 10] = [
    q(
        "ce-01",
        CE,
        "How often do you code?",
        ["Daily", "Few times a week", "Occasionally", "Rarely"],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-02",
        CE,
        "What's the largest project you've worked on?",
        [
            "Enterprise application",
            "Medium-sized application",
            "Small projects",
            "Practice exercises",
        ],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-03",
        CE,
        "How many programming languages are you proficient in?",
        ["4 or more", "2-3", "1", "Learning first language"],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-04",
        CE,
        "Have you contributed to open source?",
        [
            "Regular contributor",
            "Few contributions",
            "No, but familiar with process",
            "Never",
        ],
        [0.9, 0.6, 0.3, 0.1],
    ),
    q(
        "ce-05",
        CE,
        "How comfortable are you with debugging tools?",
        [
            "Expert level",
            "Comfortable with most features",
            "Basic usage",
            "Minimal experience",
        ],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-06",
        CE,
        "Experience with version control (e.g., Git)?",
        [
            "Advanced (branching, merging, resolving conflicts)",
            "Intermediate (basic operations)",
            "Basic (commit, push, pull)",
            "No experience",
        ],
        [0.9, 0.6, 0.3, 0.1],
    ),
    q(
        "ce-07",
        CE,
        "How often do you learn new technologies?",
        [
            "Constantly learning",
            "When needed for projects",
            "Occasionally",
            "Rarely",
        ],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-08",
        CE,
        "Experience with code review?",
        [
            "Regular reviewer and contributor",
            "Occasional participation",
            "Submitted for review only",
            "No experience",
        ],
        [0.9, 0.6, 0.3, 0.1],
    ),
    q(
        "ce-09",
        CE,
        "How do you test your code?",
        [
            "TDD and comprehensive testing",
            "Unit tests for critical parts",
            "Basic testing",
            "Manual testing only",
        ],
        [0.9, 0.7, 0.4, 0.2],
    ),
    q(
        "ce-10",
        CE,
        "Experience with deployment and CI/CD?",
        [
            "Set up and maintained pipelines",
            "Used existing pipelines",
            "Basic understanding",
            "No experience",
        ],
        [0.9, 0.6, 0.3, 0.1],
    ),
];

/// The two banks an assessment samples from.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    problem_solving: Vec<Question>,
    coding_experience: Vec<Question>,
}

impl QuestionBank {
    pub fn new(problem_solving: Vec<Question>, coding_experience: Vec<Question>) -> Self {
        Self {
            problem_solving,
            coding_experience,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            PROBLEM_SOLVING_QUESTIONS.to_vec(),
            CODING_EXPERIENCE_QUESTIONS.to_vec(),
        )
    }

    pub fn questions(&self, dimension: Dimension) -> &[Question] {
        match dimension {
            Dimension::ProblemSolving => &self.problem_solving,
            Dimension::CodingExperience => &self.coding_experience,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Question> {
        self.problem_solving
            .iter()
            .chain(&self.coding_experience)
            .find(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_banks_have_ten_questions_each() {
        let bank = QuestionBank::standard();
        for dimension in Dimension::ALL {
            let questions = bank.questions(dimension);
            assert_eq!(questions.len(), 10);
            assert!(questions.iter().all(|q| q.dimension == dimension));
        }
    }

    #[test]
    fn test_ids_are_unique_and_weights_in_unit_range() {
        let bank = QuestionBank::standard();
        let mut ids = HashSet::new();
        for dimension in Dimension::ALL {
            for q in bank.questions(dimension) {
                assert!(ids.insert(q.id), "duplicate id {}", q.id);
                assert!(q.weights.iter().all(|w| (0.0..=1.0).contains(w)));
            }
        }
    }

    #[test]
    fn test_find_by_id() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.find("ce-06").unwrap().dimension, Dimension::CodingExperience);
        assert!(bank.find("zz-99").is_none());
    }

    #[test]
    fn test_weights_are_not_serialized() {
        let json = serde_json::to_value(&PROBLEM_SOLVING_QUESTIONS[0]).unwrap();
        assert!(json.get("weights").is_none());
        assert_eq!(json["dimension"], "problem_solving");
    }
}
