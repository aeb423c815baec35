//! Profile-based signal extractor.
//!
//! `analyze_profile` fetches everything through a `ProfileSource` first, then hands a
//! `ProfileSnapshot` to `ProfileExtractor::extract`, which is pure apart from `now`.
//! A fetch failure or a profile without repositories is an error, never a partial record.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::extraction::AnalysisError;
use crate::features::{normalize, FeatureRecord, PartialFeatureRecord, WorkPreference};
use crate::models::profile::{ProfileSnapshot, RepositoryMetadata, RepositorySnapshot};
use crate::scoring::{self, RepositoryScoreBreakdown};
use crate::sources::ProfileSource;
use crate::taxonomy::Taxonomy;

pub const NO_REPOSITORIES: &str = "No repositories found";

/// README keywords hinting at algorithmic practice. Each counts once per README.
pub const PROBLEM_SOLVING_INDICATORS: [&str; 5] =
    ["algorithms", "leetcode", "hackerrank", "competitive", "problem"];

static PROFILE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/?#]+)").expect("valid profile URL pattern"));

/// Alphanumerics and single inner hyphens, at most 39 characters.
static LOGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$").expect("valid login pattern")
});

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryAnalysis {
    pub name: String,
    pub score: f64,
    pub tech_stack: Vec<String>,
    pub breakdown: RepositoryScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechStackSummary {
    pub total_technologies: usize,
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileAnalysis {
    pub username: String,
    pub profile_score: u8,
    pub repositories: Vec<RepositoryAnalysis>,
    pub tech_stack_summary: TechStackSummary,
    pub features: FeatureRecord,
}

/// Accepts a bare username or a profile URL and returns the username.
///
/// The result is interpolated into request paths, so anything that is not a valid
/// login (`..`, slashes, query characters) is rejected before any fetch.
pub fn extract_username(input: &str) -> Result<String, AnalysisError> {
    let username = PROFILE_URL
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| input.trim());
    if LOGIN.is_match(username) && username.len() <= 39 {
        Ok(username.to_string())
    } else {
        Err(AnalysisError::InvalidIdentifier(input.trim().to_string()))
    }
}

pub struct ProfileExtractor {
    taxonomy: Arc<Taxonomy>,
}

impl ProfileExtractor {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    /// Technologies and quality score for one repository.
    /// `readme` is the decoded, lower-cased README text.
    pub fn analyze_repository(
        &self,
        repo: &RepositoryMetadata,
        readme: Option<&str>,
        now: DateTime<Utc>,
    ) -> RepositoryAnalysis {
        let mut tech_stack = BTreeSet::new();
        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            tech_stack.insert(language.to_string());
        }
        if let Some(text) = readme.filter(|t| !t.is_empty()) {
            tech_stack.extend(self.taxonomy.find_technologies(text));
        }

        let breakdown = scoring::score_repository(repo, tech_stack.len(), now);
        debug!(
            "Repository {} scored {} with {} technologies",
            repo.name,
            breakdown.total,
            tech_stack.len()
        );

        RepositoryAnalysis {
            name: repo.name.clone(),
            score: breakdown.total,
            tech_stack: tech_stack.into_iter().collect(),
            breakdown,
        }
    }

    pub fn extract(
        &self,
        snapshot: &ProfileSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ProfileAnalysis, AnalysisError> {
        if snapshot.repositories.is_empty() {
            return Err(AnalysisError::EmptySource(NO_REPOSITORIES.to_string()));
        }

        let mut repositories = Vec::with_capacity(snapshot.repositories.len());
        let mut all_technologies = BTreeSet::new();
        let mut indicator_hits = 0usize;

        for RepositorySnapshot { metadata, readme } in &snapshot.repositories {
            let decoded = readme
                .as_deref()
                .map(|bytes| String::from_utf8_lossy(bytes).to_lowercase());

            if let Some(text) = decoded.as_deref() {
                indicator_hits += PROBLEM_SOLVING_INDICATORS
                    .iter()
                    .filter(|indicator| text.contains(*indicator))
                    .count();
            }

            let analysis = self.analyze_repository(metadata, decoded.as_deref(), now);
            all_technologies.extend(analysis.tech_stack.iter().cloned());
            repositories.push(analysis);
        }

        let scores: Vec<f64> = repositories.iter().map(|r| r.score).collect();
        let profile_score = scoring::profile_score(&scores, all_technologies.len())
            .ok_or_else(|| AnalysisError::EmptySource(NO_REPOSITORIES.to_string()))?;

        let years = snapshot
            .profile
            .created_at
            .map(|created| scoring::years_since(created, now))
            .unwrap_or(0.0);

        let name_mentions = |needle: &str| {
            snapshot
                .repositories
                .iter()
                .any(|r| r.metadata.name.to_lowercase().contains(needle))
        };

        let partial = PartialFeatureRecord {
            problem_solving_score: Some(scoring::problem_solving_score(indicator_hits)),
            coding_experience_years: Some(years),
            work_experience_years: Some(years),
            project_experience_score: Some(f64::from(profile_score)),
            technical_skills: Some(all_technologies.iter().cloned().collect()),
            soft_skills: name_mentions("team").then(|| vec!["Team Player".to_string()]),
            academic_background: None,
            personality_type: None,
            work_preference: name_mentions("remote").then_some(WorkPreference::Remote),
        };

        let categories = self
            .taxonomy
            .categorize(all_technologies.iter().map(String::as_str));

        info!(
            "Profile {} analyzed: score={}, repositories={}, technologies={}",
            snapshot.profile.login,
            profile_score,
            repositories.len(),
            all_technologies.len()
        );

        Ok(ProfileAnalysis {
            username: snapshot.profile.login.clone(),
            profile_score,
            repositories,
            tech_stack_summary: TechStackSummary {
                total_technologies: all_technologies.len(),
                categories,
            },
            features: normalize(partial),
        })
    }
}

/// `AnalyzeProfile(identifier)`: fetch, then extract.
///
/// Repositories are fetched first so an empty profile fails before any README request.
pub async fn analyze_profile(
    source: &dyn ProfileSource,
    extractor: &ProfileExtractor,
    identifier: &str,
    now: DateTime<Utc>,
) -> Result<ProfileAnalysis, AnalysisError> {
    let username = extract_username(identifier)?;

    let repositories = source.fetch_repositories(&username).await?;
    if repositories.is_empty() {
        return Err(AnalysisError::EmptySource(NO_REPOSITORIES.to_string()));
    }

    let profile = source.fetch_profile(&username).await?;

    let mut snapshots = Vec::with_capacity(repositories.len());
    for metadata in repositories {
        let readme = source.fetch_readme(&username, &metadata.name).await?;
        if readme.is_none() {
            debug!("Repository {} has no README", metadata.name);
        }
        snapshots.push(RepositorySnapshot { metadata, readme });
    }

    extractor.extract(
        &ProfileSnapshot {
            profile,
            repositories: snapshots,
        },
        now,
    )
}
