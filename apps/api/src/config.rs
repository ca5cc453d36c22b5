use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_DATA_PATH: &str = "data/industry_cycles.csv";
const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_LLM_MODEL: &str = "deepseek-chat";

/// Application configuration loaded from environment variables.
/// Every key has a default; a missing `LLM_API_KEY` disables LLM features.
#[derive(Debug, Clone)]
pub struct Config {
    pub industry_data_path: PathBuf,
    pub transition_map_path: Option<PathBuf>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            industry_data_path: optional_env("INDUSTRY_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            transition_map_path: optional_env("TRANSITION_MAP_PATH").map(PathBuf::from),
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            port: parse_port(optional_env("PORT").as_deref())?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    raw.unwrap_or("8080")
        .parse::<u16>()
        .context("PORT must be a valid port number")
}
