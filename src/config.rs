//! Configuration from the environment (and `.env`).

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_DATA_DIR: &str = "data/documents";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `<cdp>_docs.json`
    pub data_dir: PathBuf,
    /// Parallel page fetches during ingestion
    pub ingest_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ingest_concurrency: 4,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            data_dir: dotenv::var("CDP_AGENT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            ingest_concurrency: parse_var("INGEST_CONCURRENCY", defaults.ingest_concurrency)?,
        })
    }
}

/// Gemini API settings. Only commands that call the model need these.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            max_output_tokens: 1024,
            temperature: 0.2,
            top_p: 0.95,
            top_k: 40,
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    /// Fails if `GEMINI_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = dotenv::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::config("GEMINI_API_KEY environment variable not set"))?;

        let defaults = Self::default();
        Ok(Self {
            api_key,
            model: dotenv::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: dotenv::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            max_output_tokens: parse_var("GEMINI_MAX_OUTPUT_TOKENS", defaults.max_output_tokens)?,
            temperature: parse_var("GEMINI_TEMPERATURE", defaults.temperature)?,
            top_p: parse_var("GEMINI_TOP_P", defaults.top_p)?,
            top_k: parse_var("GEMINI_TOP_K", defaults.top_k)?,
            timeout_secs: parse_var("GEMINI_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match dotenv::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::config(format!("{} has an invalid value: {:?}", name, raw)))
}
