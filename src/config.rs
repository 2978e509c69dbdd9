use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key used for day analysis and recommendations
    pub gemini_api_key: String,

    /// OMDb API key used for movie metadata lookups
    pub omdb_api_key: String,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini REST API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Redis connection URL. Metadata lookups are cached only when this is set.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL for cached metadata lookups, in seconds
    #[serde(default = "default_metadata_cache_ttl")]
    pub metadata_cache_ttl: u64,

    /// Seconds a session may sit untouched before it is dropped
    #[serde(default = "default_session_idle_ttl")]
    pub session_idle_ttl: u64,

    /// Seconds between idle-session sweeps
    #[serde(default = "default_session_sweep_interval")]
    pub session_sweep_interval: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

pub(crate) fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

pub(crate) fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub(crate) fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

pub(crate) fn default_metadata_cache_ttl() -> u64 {
    86400
}

fn default_session_idle_ttl() -> u64 {
    3600
}

fn default_session_sweep_interval() -> u64 {
    60
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
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval.max(1))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[
            ("GEMINI_API_KEY", "g-key"),
            ("OMDB_API_KEY", "o-key"),
        ]))
        .unwrap();

        assert_eq!(config.gemini_api_key, "g-key");
        assert_eq!(config.omdb_api_key, "o-key");
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.metadata_cache_ttl, 86400);
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(3600));
        assert_eq!(config.session_sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_keys_rejected() {
        let result = envy::from_iter::<_, Config>(vars(&[("OMDB_API_KEY", "o-key")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("GEMINI_API_KEY", "g-key"),
            ("OMDB_API_KEY", "o-key"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("REDIS_URL", "redis://cache:6379"),
            ("PORT", "8080"),
            ("SESSION_IDLE_TTL", "900"),
            ("SESSION_SWEEP_INTERVAL", "0"),
        ]))
        .unwrap();

        assert_eq!(config.session_idle_ttl(), Duration::from_secs(900));
        assert_eq!(config.session_sweep_interval(), Duration::from_secs(1));

        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.port, 8080);
    }
}
