use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::engine::EngineKind;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
/// Everything has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    /// When unset the service starts without a prediction engine.
    pub training_data_path: Option<PathBuf>,
    pub model_engine: EngineKind,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            training_data_path: optional_env("TRAINING_DATA_PATH").map(PathBuf::from),
            model_engine: optional_env("MODEL_ENGINE")
                .map(|v| v.parse::<EngineKind>())
                .transpose()
                .context("MODEL_ENGINE must be gradient_boosting or embedding")?
                .unwrap_or(EngineKind::GradientBoosting),
        })
    }
}

/// Unset and empty are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
