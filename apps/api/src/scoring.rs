//! Heuristic Scorer: pure capped-sum scoring functions.
//!
//! Every term is capped independently before summation, and every total is bounded,
//! so no raw count (however large) can push a score outside its range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::RepositoryMetadata;

/// Kilobytes of repository size worth one point.
const SIZE_UNIT_KB: f64 = 5000.0;
const SIZE_CAP: f64 = 3.0;
const TECH_UNIT: f64 = 3.0;
const TECH_CAP: f64 = 2.0;
const STARS_UNIT: f64 = 10.0;
const FORKS_UNIT: f64 = 5.0;
const WATCHERS_UNIT: f64 = 5.0;
const REPO_SCORE_CAP: f64 = 10.0;

const AVG_REPO_WEIGHT: f64 = 0.7;
const DIVERSITY_UNIT: f64 = 5.0;
const DIVERSITY_POINTS: f64 = 3.0;

/// Problem-solving points per indicator hit, and the neutral default for zero hits.
const PROBLEM_SOLVING_PER_HIT: f64 = 2.0;
pub const PROBLEM_SOLVING_DEFAULT: f64 = 5.0;

pub const QUIZ_DISPLAY_MIN: f64 = 0.35;
pub const QUIZ_DISPLAY_MAX: f64 = 0.92;
/// Scale applied to the coding-experience quiz dimension to approximate years.
pub const QUIZ_YEARS_SCALE: f64 = 5.0;

/// Per-term contributions to a repository's quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryScoreBreakdown {
    pub size: f64,
    pub technology: f64,
    pub stars: f64,
    pub forks: f64,
    pub watchers: f64,
    pub recency: f64,
    /// Sum of the terms, capped at 10 and rounded to one decimal.
    pub total: f64,
}

/// Scores one repository (0–10) from size, engagement, technology count and recency.
pub fn score_repository(
    repo: &RepositoryMetadata,
    technology_count: usize,
    now: DateTime<Utc>,
) -> RepositoryScoreBreakdown {
    let size = (repo.size as f64 / SIZE_UNIT_KB).min(SIZE_CAP);
    let technology = (technology_count as f64 / TECH_UNIT).min(TECH_CAP);
    let stars = (repo.stargazers_count as f64 / STARS_UNIT).min(1.0);
    let forks = (repo.forks_count as f64 / FORKS_UNIT).min(1.0);
    let watchers = (repo.watchers_count as f64 / WATCHERS_UNIT).min(1.0);
    let recency = recency_score(repo.updated_at, now);

    let sum = size + technology + stars + forks + watchers + recency;
    RepositoryScoreBreakdown {
        size,
        technology,
        stars,
        forks,
        watchers,
        recency,
        total: round_one_decimal(sum.min(REPO_SCORE_CAP)),
    }
}

/// 2 points if touched within a month, 1 within six months, else 0.
/// A "month" is 30 days.
pub fn recency_score(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let months_since = (now - updated_at).num_days() as f64 / 30.0;
    if months_since < 1.0 {
        2.0
    } else if months_since < 6.0 {
        1.0
    } else {
        0.0
    }
}

/// Final profile score (integer 1–10): 70% average repository score plus a technology
/// diversity bonus worth up to 3 points. `None` when there are no repositories.
pub fn profile_score(repository_scores: &[f64], unique_technologies: usize) -> Option<u8> {
    if repository_scores.is_empty() {
        return None;
    }
    let average = repository_scores.iter().sum::<f64>() / repository_scores.len() as f64;
    let diversity = (unique_technologies as f64 / DIVERSITY_UNIT).min(1.0) * DIVERSITY_POINTS;
    let score = (average * AVG_REPO_WEIGHT + diversity).round_ties_even();
    Some(score.clamp(1.0, 10.0) as u8)
}

/// Two points per indicator hit, capped at 10; zero hits means "no signal" → 5.
pub fn problem_solving_score(indicator_hits: usize) -> f64 {
    let score = (indicator_hits as f64 * PROBLEM_SOLVING_PER_HIT).min(10.0);
    if score > 0.0 {
        score
    } else {
        PROBLEM_SOLVING_DEFAULT
    }
}

/// Weight and saturation cap of one project-indicator class.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorWeight {
    pub weight: f64,
    pub cap: f64,
}

pub const DEVELOPMENT_WEIGHT: IndicatorWeight = IndicatorWeight { weight: 2.0, cap: 4.0 };
pub const HACKATHON_WEIGHT: IndicatorWeight = IndicatorWeight { weight: 2.0, cap: 3.0 };
pub const TEAM_WEIGHT: IndicatorWeight = IndicatorWeight { weight: 1.0, cap: 2.0 };
pub const AWARD_WEIGHT: IndicatorWeight = IndicatorWeight { weight: 2.0, cap: 1.0 };

/// Raw indicator counts found in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIndicatorCounts {
    pub development: usize,
    pub hackathon: usize,
    pub team: usize,
    pub award: usize,
}

fn capped(count: usize, w: IndicatorWeight) -> f64 {
    (count as f64 * w.weight).min(w.cap)
}

/// Project-experience score in [1, 10].
pub fn project_experience_score(counts: &ProjectIndicatorCounts) -> f64 {
    let score = capped(counts.development, DEVELOPMENT_WEIGHT)
        + capped(counts.hackathon, HACKATHON_WEIGHT)
        + capped(counts.team, TEAM_WEIGHT)
        + capped(counts.award, AWARD_WEIGHT);
    score.round().clamp(1.0, 10.0)
}

/// Years elapsed since `since`, one decimal, never negative.
pub fn years_since(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - since).num_days().max(0) as f64;
    round_one_decimal(days / 365.0)
}

/// Mean of answer weights, or `None` for an empty slice.
pub fn mean(weights: &[f64]) -> Option<f64> {
    if weights.is_empty() {
        None
    } else {
        Some(weights.iter().sum::<f64>() / weights.len() as f64)
    }
}

/// Linearly maps a [0,1] quiz mean onto the display range [0.35, 0.92].
pub fn rescale_quiz_score(mean: f64) -> f64 {
    let mean = if mean.is_finite() { mean.clamp(0.0, 1.0) } else { 0.0 };
    QUIZ_DISPLAY_MIN + mean * (QUIZ_DISPLAY_MAX - QUIZ_DISPLAY_MIN)
}

/// One decimal place, halves to even (`0.25` → `0.2`, `0.35` → `0.4`).
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn repo(size: u64, stars: u64, forks: u64, watchers: u64, age_days: i64) -> RepositoryMetadata {
        RepositoryMetadata {
            name: "sample".into(),
            language: Some("Python".into()),
            size,
            stargazers_count: stars,
            forks_count: forks,
            watchers_count: watchers,
            updated_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_worked_example_scores_7_3() {
        let now = Utc::now();
        let mut r = repo(10_000, 20, 10, 10, 0);
        r.updated_at = now;
        let b = score_repository(&r, 1, now);
        assert_eq!(b.size, 2.0);
        assert!((b.technology - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!((b.stars, b.forks, b.watchers, b.recency), (1.0, 1.0, 1.0, 2.0));
        assert_eq!(b.total, 7.3);
    }

    #[test]
    fn test_size_term_caps_at_three() {
        let now = Utc::now();
        let b = score_repository(&repo(15_000, 0, 0, 0, 400), 0, now);
        assert_eq!(b.size, 3.0);
        assert_eq!(b.total, 3.0);
        let b = score_repository(&repo(10_000_000, 0, 0, 0, 400), 0, now);
        assert_eq!(b.total, 3.0);
    }

    #[test]
    fn test_repository_total_rounds_half_to_even() {
        // 1250 KB is exactly a quarter point
        let b = score_repository(&repo(1_250, 0, 0, 0, 400), 0, Utc::now());
        assert_eq!(b.size, 0.25);
        assert_eq!(b.total, 0.2);
        let b = score_repository(&repo(3_750, 0, 0, 0, 400), 0, Utc::now());
        assert_eq!(b.total, 0.8);
    }

    #[test]
    fn test_round_one_decimal_ties() {
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(7.33), 7.3);
        assert_eq!(round_one_decimal(2.0), 2.0);
    }

    #[test]
    fn test_recency_bands() {
        let now = Utc::now();
        assert_eq!(recency_score(now - Duration::days(10), now), 2.0);
        assert_eq!(recency_score(now - Duration::days(45), now), 1.0);
        assert_eq!(recency_score(now - Duration::days(200), now), 0.0);
    }

    #[test]
    fn test_profile_score_empty_is_none() {
        assert_eq!(profile_score(&[], 3), None);
    }

    #[test]
    fn test_profile_score_weights_average_and_diversity() {
        // 7.3 * 0.7 = 5.11, one tech → 0.6 → 5.71 → 6
        assert_eq!(profile_score(&[7.3], 1), Some(6));
        // zero everything clamps up to 1
        assert_eq!(profile_score(&[0.0, 0.0], 0), Some(1));
        // saturated
        assert_eq!(profile_score(&[10.0; 4], 50), Some(10));
    }

    #[test]
    fn test_problem_solving_default_and_cap() {
        assert_eq!(problem_solving_score(0), 5.0);
        assert_eq!(problem_solving_score(2), 4.0);
        assert_eq!(problem_solving_score(9), 10.0);
    }

    #[test]
    fn test_project_score_worked_example() {
        let counts = ProjectIndicatorCounts {
            development: 1,
            hackathon: 2,
            team: 0,
            award: 0,
        };
        assert_eq!(project_experience_score(&counts), 5.0);
    }

    #[test]
    fn test_project_score_floor_is_one() {
        assert_eq!(project_experience_score(&ProjectIndicatorCounts::default()), 1.0);
    }

    #[test]
    fn test_years_since() {
        let now = Utc::now();
        assert_eq!(years_since(now - Duration::days(730), now), 2.0);
        assert_eq!(years_since(now + Duration::days(30), now), 0.0);
    }

    #[test]
    fn test_quiz_rescale_endpoints() {
        assert!((rescale_quiz_score(0.0) - 0.35).abs() < 1e-12);
        assert!((rescale_quiz_score(1.0) - 0.92).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_repository_score_in_range(
            size in 0u64..100_000_000,
            stars in 0u64..1_000_000,
            forks in 0u64..1_000_000,
            watchers in 0u64..1_000_000,
            techs in 0usize..500,
            age in -1000i64..10_000,
        ) {
            let now = Utc::now();
            let b = score_repository(&repo(size, stars, forks, watchers, age), techs, now);
            prop_assert!((0.0..=10.0).contains(&b.total));
        }

        #[test]
        fn prop_size_term_monotonic_and_capped(a in 0u64..50_000_000, b in 0u64..50_000_000) {
            let now = Utc::now();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let s_lo = score_repository(&repo(lo, 0, 0, 0, 400), 0, now).size;
            let s_hi = score_repository(&repo(hi, 0, 0, 0, 400), 0, now).size;
            prop_assert!(s_lo <= s_hi);
            prop_assert!(s_hi <= 3.0);
            if hi >= 15_000 {
                prop_assert_eq!(s_hi, 3.0);
            }
        }

        #[test]
        fn prop_profile_score_in_range(
            scores in proptest::collection::vec(0.0f64..=10.0, 1..40),
            techs in 0usize..200,
        ) {
            let s = profile_score(&scores, techs).unwrap();
            prop_assert!((1..=10).contains(&s));
        }

        #[test]
        fn prop_project_score_saturates(
            development in 0usize..5_000,
            hackathon in 0usize..5_000,
            team in 0usize..5_000,
            award in 0usize..5_000,
        ) {
            let s = project_experience_score(&ProjectIndicatorCounts { development, hackathon, team, award });
            prop_assert!((1.0..=10.0).contains(&s));
        }

        #[test]
        fn prop_quiz_rescale_in_display_range(mean in 0.0f64..=1.0) {
            let s = rescale_quiz_score(mean);
            prop_assert!((QUIZ_DISPLAY_MIN..=QUIZ_DISPLAY_MAX + 1e-12).contains(&s));
        }
    }
}
