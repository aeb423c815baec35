//! Quiz-based signal extractor.
//!
//! Sampling and answer input are both injected: `QuestionSampler` picks which questions
//! are asked, `AnswerSource` supplies raw answers. Production uses `RngSampler` over a
//! non-seeded RNG; tests use fixed picks and scripted answers.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::questions::{
    Dimension, Question, QuestionBank, OPTIONS_PER_QUESTION, QUESTIONS_PER_DIMENSION,
};
use crate::features::{normalize, FeatureRecord, PartialFeatureRecord};
use crate::scoring::{self, QUIZ_YEARS_SCALE};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Malformed answer {0:?}: expected a number between 1 and 4")]
    MalformedAnswer(String),

    #[error("Unknown question {id} for {dimension:?}")]
    UnknownQuestion { id: String, dimension: Dimension },

    #[error("No answers submitted for {0:?}")]
    MissingAnswers(Dimension),

    #[error("Expected {expected} answers for {dimension:?}, got {got}")]
    WrongAnswerCount {
        dimension: Dimension,
        expected: usize,
        got: usize,
    },

    #[error("Question {0} was answered more than once")]
    DuplicateQuestion(String),

    #[error("Answer input closed before the assessment finished")]
    InputClosed,
}

/// Chooses `amount` distinct indices out of `0..len`.
pub trait QuestionSampler {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

pub struct RngSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> QuestionSampler for RngSampler<R> {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

/// `ReadAnswer()`: one raw answer per call, `None` once input is exhausted.
pub trait AnswerSource {
    fn read_answer(&mut self, question: &Question) -> Option<String>;

    /// Called after a malformed answer, before the question is asked again.
    fn rejected(&mut self, _question: &Question, _error: &QuizError) {}
}

/// Line-based answers for a terminal session: each question is printed to `output`
/// and one line of `input` is read as the answer.
pub struct ConsoleAnswers<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, question: &Question) -> std::io::Result<()> {
        writeln!(self.output, "\n{}", question.prompt)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", i + 1)?;
        }
        write!(self.output, "Your answer (1-{OPTIONS_PER_QUESTION}): ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsoleAnswers<R, W> {
    fn read_answer(&mut self, question: &Question) -> Option<String> {
        self.prompt(question).ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    fn rejected(&mut self, _question: &Question, error: &QuizError) {
        // A broken output stream surfaces as closed input on the next read
        let _ = writeln!(self.output, "{error}. Please try again.");
    }
}

/// Validates a 1-based option number.
pub fn check_answer(answer: i64) -> Result<usize, QuizError> {
    match usize::try_from(answer) {
        Ok(n) if (1..=OPTIONS_PER_QUESTION).contains(&n) => Ok(n),
        _ => Err(QuizError::MalformedAnswer(answer.to_string())),
    }
}

pub fn parse_answer(raw: &str) -> Result<usize, QuizError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| QuizError::MalformedAnswer(raw.trim().to_string()))
        .and_then(check_answer)
}

fn weight_of(question: &Question, answer: usize) -> f64 {
    question.weights[answer - 1]
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResult {
    /// Display-range score in [0.35, 0.92].
    pub problem_solving_score: f64,
    /// Display-range score in [0.35, 0.92].
    pub coding_experience_score: f64,
    pub coding_experience_years: f64,
    pub partial: PartialFeatureRecord,
}

impl AssessmentResult {
    fn from_weights(problem_solving: &[f64], coding_experience: &[f64]) -> Result<Self, QuizError> {
        let ps_mean = scoring::mean(problem_solving)
            .ok_or(QuizError::MissingAnswers(Dimension::ProblemSolving))?;
        let ce_mean = scoring::mean(coding_experience)
            .ok_or(QuizError::MissingAnswers(Dimension::CodingExperience))?;

        let problem_solving_score = scoring::rescale_quiz_score(ps_mean);
        let coding_experience_score = scoring::rescale_quiz_score(ce_mean);
        let coding_experience_years = coding_experience_score * QUIZ_YEARS_SCALE;

        info!(
            "Assessment scored: problem_solving={:.2}, coding_experience={:.2}",
            problem_solving_score, coding_experience_score
        );

        Ok(Self {
            problem_solving_score,
            coding_experience_score,
            coding_experience_years,
            partial: PartialFeatureRecord {
                problem_solving_score: Some(problem_solving_score),
                coding_experience_years: Some(coding_experience_years),
                ..Default::default()
            },
        })
    }

    /// The partial record merged with sentinel defaults.
    pub fn features(&self) -> FeatureRecord {
        normalize(self.partial.clone())
    }
}

/// The questions drawn for one assessment.
#[derive(Debug, Clone, Serialize)]
pub struct SampledQuiz {
    pub problem_solving: Vec<Question>,
    pub coding_experience: Vec<Question>,
}

impl SampledQuiz {
    pub fn draw(bank: &QuestionBank, sampler: &mut dyn QuestionSampler) -> Self {
        let mut pick = |dimension| {
            let pool = bank.questions(dimension);
            sampler
                .sample_indices(pool.len(), QUESTIONS_PER_DIMENSION)
                .into_iter()
                .filter_map(|i| pool.get(i).cloned())
                .collect::<Vec<_>>()
        };
        Self {
            problem_solving: pick(Dimension::ProblemSolving),
            coding_experience: pick(Dimension::CodingExperience),
        }
    }

    /// Asks every question, re-prompting on malformed input.
    pub fn administer(&self, answers: &mut dyn AnswerSource) -> Result<AssessmentResult, QuizError> {
        let problem_solving = ask_all(&self.problem_solving, answers)?;
        let coding_experience = ask_all(&self.coding_experience, answers)?;
        AssessmentResult::from_weights(&problem_solving, &coding_experience)
    }
}

fn ask_all(questions: &[Question], answers: &mut dyn AnswerSource) -> Result<Vec<f64>, QuizError> {
    let mut weights = Vec::with_capacity(questions.len());
    for question in questions {
        let answer = loop {
            let raw = answers.read_answer(question).ok_or(QuizError::InputClosed)?;
            match parse_answer(&raw) {
                Ok(answer) => break answer,
                Err(err) => {
                    warn!("Re-asking {}: {}", question.id, err);
                    answers.rejected(question, &err);
                }
            }
        };
        weights.push(weight_of(question, answer));
    }
    Ok(weights)
}

/// `RunAssessment()`: draw questions, then ask them.
pub fn run_assessment(
    bank: &QuestionBank,
    sampler: &mut dyn QuestionSampler,
    answers: &mut dyn AnswerSource,
) -> Result<AssessmentResult, QuizError> {
    SampledQuiz::draw(bank, sampler).administer(answers)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: i64,
}

/// Answers collected outside the interactive loop (e.g. over HTTP). There is no one to
/// re-prompt here, so a malformed answer is an error.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub problem_solving: Vec<SubmittedAnswer>,
    #[serde(default)]
    pub coding_experience: Vec<SubmittedAnswer>,
}

impl AssessmentSubmission {
    pub fn answers(&self, dimension: Dimension) -> &[SubmittedAnswer] {
        match dimension {
            Dimension::ProblemSolving => &self.problem_solving,
            Dimension::CodingExperience => &self.coding_experience,
        }
    }
}

/// Scores a submission the same way `administer` scores an interactive run: exactly
/// `QUESTIONS_PER_DIMENSION` distinct questions from each bank.
pub fn score_submission(
    bank: &QuestionBank,
    submission: &AssessmentSubmission,
) -> Result<AssessmentResult, QuizError> {
    let mut seen = HashSet::new();
    let mut weights = Vec::with_capacity(Dimension::ALL.len());

    for dimension in Dimension::ALL {
        let submitted = submission.answers(dimension);
        if submitted.len() != QUESTIONS_PER_DIMENSION {
            return Err(QuizError::WrongAnswerCount {
                dimension,
                expected: QUESTIONS_PER_DIMENSION,
                got: submitted.len(),
            });
        }

        let mut dimension_weights = Vec::with_capacity(submitted.len());
        for s in submitted {
            let question = bank
                .find(&s.question_id)
                .filter(|q| q.dimension == dimension)
                .ok_or_else(|| QuizError::UnknownQuestion {
                    id: s.question_id.clone(),
                    dimension,
                })?;
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateQuestion(question.id.to_string()));
            }
            dimension_weights.push(weight_of(question, check_answer(s.answer)?));
        }
        weights.push(dimension_weights);
    }

    AssessmentResult::from_weights(&weights[0], &weights[1])
}
