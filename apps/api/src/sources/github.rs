//! Profile source: the hosted-code API behind `AnalyzeProfile`.
//!
//! The analysis core sees only the `ProfileSource` trait. `GithubClient` is the production
//! implementation over the public REST API. It performs no retries and any failure is
//! reported straight back to the caller.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::profile::{ProfileMetadata, RepositoryMetadata};
use crate::sources::SourceError;

const USER_AGENT: &str = concat!("careerpath/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
/// Asks the API for README bytes instead of the base64 JSON envelope.
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const REPOS_PER_PAGE: u32 = 100;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileMetadata, SourceError>;

    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepositoryMetadata>, SourceError>;

    /// `Ok(None)` when the repository has no README.
    async fn fetch_readme(
        &self,
        username: &str,
        repository: &str,
    ) -> Result<Option<Vec<u8>>, SourceError>;
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url).header("accept", accept);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SourceError> {
        let response = self.get(&url, JSON_MEDIA_TYPE).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

/// Returns `value` if it is safe to interpolate as one URL path segment.
/// Logins and repository names only ever use `[A-Za-z0-9._-]`.
fn path_segment(value: &str) -> Result<&str, SourceError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if value.is_empty() || value == "." || value == ".." || !value.chars().all(allowed) {
        return Err(SourceError::InvalidPathSegment(value.to_string()));
    }
    Ok(value)
}

#[async_trait]
impl ProfileSource for GithubClient {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileMetadata, SourceError> {
        let username = path_segment(username)?;
        self.get_json(format!("{}/users/{username}", self.base_url))
            .await
    }

    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepositoryMetadata>, SourceError> {
        let username = path_segment(username)?;
        let repos: Vec<RepositoryMetadata> = self
            .get_json(format!(
                "{}/users/{username}/repos?per_page={REPOS_PER_PAGE}",
                self.base_url
            ))
            .await?;
        debug!("Fetched {} repositories for {username}", repos.len());
        Ok(repos)
    }

    async fn fetch_readme(
        &self,
        username: &str,
        repository: &str,
    ) -> Result<Option<Vec<u8>>, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/readme",
            self.base_url,
            path_segment(username)?,
            path_segment(repository)?
        );
        let response = self.get(&url, RAW_MEDIA_TYPE).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GithubClient::new("https://api.github.com/".to_string(), None);
        assert_eq!(client.base_url, "https://api.github.com");
    }

    #[test]
    fn test_path_segment_accepts_logins_and_repository_names() {
        for value in ["octocat", "mona-lisa", "dot.files", "my_repo", ".github"] {
            assert_eq!(path_segment(value).unwrap(), value);
        }
    }

    #[test]
    fn test_path_segment_rejects_traversal() {
        for value in ["", ".", "..", "../user", "a/b", "octo?per_page=1", "a%2Fb"] {
            assert!(matches!(
                path_segment(value),
                Err(SourceError::InvalidPathSegment(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_unsafe_username_without_a_request() {
        // Unroutable base: reaching the network would fail with Http instead
        let client = GithubClient::new("http://127.0.0.1:9".to_string(), None);
        let err = client.fetch_repositories("../user").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidPathSegment(ref s) if s == "../user"));
        let err = client.fetch_readme("octo", "..").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidPathSegment(_)));
    }

    #[test]
    fn test_user_agent_names_the_service() {
        assert!(USER_AGENT.starts_with("careerpath/"));
    }
}
