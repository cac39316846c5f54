use std::path::PathBuf;

use serde::Deserialize;

/// Prefix shared by every environment variable the service reads
pub const ENV_PREFIX: &str = "RERANK_";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Mandatory rating data (`user,item[,rating]`)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: PathBuf,

    /// Optional demographics table (`user|sex|birth_year`)
    #[serde(default = "default_demographics_path")]
    pub demographics_path: PathBuf,

    /// Optional genre table (`item|genre|genre...`)
    #[serde(default = "default_genres_path")]
    pub genres_path: PathBuf,

    /// Optional synopsis table (`item|text`)
    #[serde(default = "default_synopsis_path")]
    pub synopsis_path: PathBuf,

    /// Precomputed baseline candidates (`user,item,score`)
    #[serde(default = "default_candidates_path")]
    pub candidates_path: PathBuf,

    /// Baseline recommender service; takes precedence over `candidates_path`
    #[serde(default)]
    pub upstream_url: Option<String>,

    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,

    #[serde(default = "default_final_count")]
    pub final_count: usize,

    #[serde(default = "default_enabled")]
    pub demographics_enabled: bool,

    #[serde(default = "default_enabled")]
    pub genre_enabled: bool,

    #[serde(default = "default_enabled")]
    pub content_enabled: bool,

    /// Users re-ranked concurrently during a batch run
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_ratings_path() -> PathBuf {
    PathBuf::from("data/data.csv")
}

fn default_demographics_path() -> PathBuf {
    PathBuf::from("data/demographics.txt")
}

fn default_genres_path() -> PathBuf {
    PathBuf::from("data/genres.txt")
}

fn default_synopsis_path() -> PathBuf {
    PathBuf::from("data/synopsis.txt")
}

fn default_candidates_path() -> PathBuf {
    PathBuf::from("data/candidates.csv")
}

fn default_candidate_count() -> usize {
    20
}

fn default_final_count() -> usize {
    5
}

fn default_enabled() -> bool {
    true
}

fn default_batch_concurrency() -> usize {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        Ok(config)
    }

    /// The per-call settings handed to the re-ranker
    pub fn rerank_config(&self) -> RerankConfig {
        RerankConfig {
            candidate_count: self.candidate_count,
            final_count: self.final_count,
            demographics_enabled: self.demographics_enabled,
            genre_enabled: self.genre_enabled,
            content_enabled: self.content_enabled,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Re-ranking settings passed explicitly to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerankConfig {
    /// Candidates requested from the baseline source
    pub candidate_count: usize,
    /// Recommendations kept after blending
    pub final_count: usize,
    pub demographics_enabled: bool,
    pub genre_enabled: bool,
    pub content_enabled: bool,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            final_count: default_final_count(),
            demographics_enabled: true,
            genre_enabled: true,
            content_enabled: true,
        }
    }
}

impl RerankConfig {
    /// Same counts with every auxiliary signal switched off
    pub fn base_only(self) -> Self {
        Self {
            demographics_enabled: false,
            genre_enabled: false,
            content_enabled: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.ratings_path, PathBuf::from("data/data.csv"));
        assert_eq!(config.candidate_count, 20);
        assert_eq!(config.final_count, 5);
        assert!(config.demographics_enabled);
        assert!(config.upstream_url.is_none());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.rerank_config(), RerankConfig::default());
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = Config::from_vars(vars(&[
            ("RERANK_FINAL_COUNT", "10"),
            ("RERANK_GENRE_ENABLED", "false"),
            ("RERANK_UPSTREAM_URL", "http://baseline:8080"),
            ("FINAL_COUNT", "99"),
        ]))
        .unwrap();

        assert_eq!(config.final_count, 10);
        assert!(!config.genre_enabled);
        assert_eq!(config.upstream_url.as_deref(), Some("http://baseline:8080"));

        let rerank = config.rerank_config();
        assert_eq!(rerank.final_count, 10);
        assert!(!rerank.genre_enabled);
        assert!(rerank.content_enabled);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let result = Config::from_vars(vars(&[("RERANK_PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_base_only_keeps_counts() {
        let config = RerankConfig {
            final_count: 3,
            ..RerankConfig::default()
        }
        .base_only();
        assert_eq!(config.final_count, 3);
        assert!(!config.demographics_enabled && !config.genre_enabled && !config.content_enabled);
    }
}
