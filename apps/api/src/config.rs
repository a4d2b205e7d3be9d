use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where uploaded resumes live, keyed by filename.
    /// Read-only from this service's point of view.
    pub resume_storage_dir: PathBuf,
    /// Path to the scoring script handed to the Python interpreter.
    pub scorer_script: PathBuf,
    /// Python interpreter used to run the scoring script.
    pub scorer_python: PathBuf,
    /// Wall-clock bound on one scorer run.
    pub scorer_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            resume_storage_dir: PathBuf::from(require_env("RESUME_STORAGE_DIR")?),
            scorer_script: PathBuf::from(require_env("SCORER_SCRIPT")?),
            scorer_python: PathBuf::from(
                std::env::var("SCORER_PYTHON").unwrap_or_else(|_| "python3".to_string()),
            ),
            scorer_timeout: Duration::from_secs(
                std::env::var("SCORER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("SCORER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
