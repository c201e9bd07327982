use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the per-user state files (preferences, watched, watch later)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path to the title-basics TSV table
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the title-ratings TSV table
    #[serde(default = "default_ratings_path")]
    pub ratings_path: PathBuf,

    /// Base URL of the review site
    #[serde(default = "default_reviews_base_url")]
    pub reviews_base_url: String,

    /// Emotion classification inference endpoint
    #[serde(default = "default_emotion_api_url")]
    pub emotion_api_url: String,

    /// Optional bearer token for the emotion endpoint
    #[serde(default)]
    pub emotion_api_token: Option<String>,

    /// Timeout for external HTTP requests, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Pause between accepted candidates during a recommendation run, in seconds
    #[serde(default = "default_politeness_delay_secs")]
    pub politeness_delay_secs: u64,

    /// Maximum number of recommendations per run
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("full_title.basics.tsv")
}

fn default_ratings_path() -> PathBuf {
    PathBuf::from("title.ratings.tsv")
}

fn default_reviews_base_url() -> String {
    "https://www.imdb.com".to_string()
}

fn default_emotion_api_url() -> String {
    "https://api-inference.huggingface.co/models/nateraw/bert-base-uncased-emotion".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_politeness_delay_secs() -> u64 {
    1
}

fn default_max_results() -> usize {
    3
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
