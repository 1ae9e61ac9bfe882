use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::ExtractorConfig;
use crate::llm_client::{LlmSettings, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::matching::MatcherBackend;

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or unparsable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Unset → the catalog is served from seed data in memory.
    pub database_url: Option<String>,
    pub seed_catalog: bool,
    pub journal_seed_path: Option<PathBuf>,
    pub matcher_backend: MatcherBackend,
    /// `Some` whenever `matcher_backend` is `Llm`.
    pub llm: Option<LlmSettings>,
    pub max_results: usize,
    pub max_upload_bytes: usize,
    pub extractor: ExtractorConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let matcher_backend = env_or("MATCHER_BACKEND", "llm")
            .parse::<MatcherBackend>()
            .map_err(|e| anyhow!(e))
            .context("MATCHER_BACKEND must be 'llm' or 'keyword'")?;

        let llm = match matcher_backend {
            MatcherBackend::Llm => Some(LlmSettings {
                api_key: require_env("ANTHROPIC_API_KEY")?,
                api_url: env_or("ANTHROPIC_API_URL", DEFAULT_API_URL),
                model: env_or("LLM_MODEL", DEFAULT_MODEL),
                timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
                max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            }),
            MatcherBackend::Keyword => None,
        };

        let max_results: usize = parse_env("MAX_RESULTS", 10)?;
        if max_results == 0 {
            return Err(anyhow!("MAX_RESULTS must be at least 1"));
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            database_url: optional_env("DATABASE_URL"),
            seed_catalog: parse_env("SEED_CATALOG", true)?,
            journal_seed_path: optional_env("JOURNAL_SEED_PATH").map(PathBuf::from),
            matcher_backend,
            llm,
            max_results,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            extractor: ExtractorConfig {
                doc_converter: env_or("DOC_CONVERTER", "soffice"),
                convert_timeout: Duration::from_secs(parse_env("DOC_CONVERT_TIMEOUT_SECS", 60)?),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}"))
}
