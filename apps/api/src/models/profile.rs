use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account-level metadata from the hosted-code profile source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub login: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository metadata as returned by the profile source's repository listing.
/// `size` is in kilobytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    pub updated_at: DateTime<Utc>,
}

/// One repository plus its README bytes, if it has one.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub metadata: RepositoryMetadata,
    pub readme: Option<Vec<u8>>,
}

/// Everything the profile extractor needs, fetched up front by the orchestration layer.
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    pub profile: ProfileMetadata,
    pub repositories: Vec<RepositorySnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_metadata_deserializes_api_shape() {
        let json = r#"{
            "name": "team-chat",
            "language": "Python",
            "size": 10000,
            "stargazers_count": 20,
            "forks_count": 10,
            "watchers_count": 10,
            "updated_at": "2024-05-01T12:00:00Z",
            "private": false
        }"#;
        let repo: RepositoryMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "team-chat");
        assert_eq!(repo.language.as_deref(), Some("Python"));
        assert_eq!(repo.size, 10000);
    }

    #[test]
    fn test_repository_language_may_be_null() {
        let json = r#"{"name": "dotfiles", "language": null, "updated_at": "2020-01-01T00:00:00Z"}"#;
        let repo: RepositoryMetadata = serde_json::from_str(json).unwrap();
        assert!(repo.language.is_none());
        assert_eq!(repo.stargazers_count, 0);
    }
}
