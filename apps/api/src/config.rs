use anyhow::{Context, Result};

const DEFAULT_SURVEY_API_BASE_URL: &str = "https://staging-v2.gradientcyber.net/quorum/api";

/// Application configuration loaded from environment variables.
/// Only the OpenAI key is required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub survey_api_base_url: String,
    pub survey_api_user: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            survey_api_base_url: std::env::var("SURVEY_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SURVEY_API_BASE_URL.to_string()),
            survey_api_user: std::env::var("SURVEY_API_USER").unwrap_or_else(|_| "9".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
