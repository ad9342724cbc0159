use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key used for recommendation and details generation
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Catalog (iTunes Search) API base URL used for poster lookups
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where the saved selection lives: "file", "redis" or "memory"
    #[serde(default = "default_selection_backend")]
    pub selection_backend: String,

    /// File path used by the "file" selection backend
    #[serde(default = "default_selection_path")]
    pub selection_path: String,

    /// Redis key used by the "redis" selection backend
    #[serde(default = "default_selection_key")]
    pub selection_key: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage medium for the persisted selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBackend {
    File,
    Redis,
    Memory,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_catalog_api_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_selection_backend() -> String {
    "file".to_string()
}

fn default_selection_path() -> String {
    "moodcine-watchlist.json".to_string()
}

fn default_selection_key() -> String {
    "moodcine-watchlist".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
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

    /// Resolves the configured selection backend name
    pub fn selection_backend(&self) -> anyhow::Result<SelectionBackend> {
        match self.selection_backend.to_lowercase().as_str() {
            "file" => Ok(SelectionBackend::File),
            "redis" => Ok(SelectionBackend::Redis),
            "memory" => Ok(SelectionBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown selection backend: {}", other)),
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_backend(backend: &str) -> Config {
        Config {
            gemini_api_key: "test_key".to_string(),
            gemini_api_url: default_gemini_api_url(),
            gemini_model: default_gemini_model(),
            catalog_api_url: default_catalog_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            selection_backend: backend.to_string(),
            selection_path: default_selection_path(),
            selection_key: default_selection_key(),
            redis_url: default_redis_url(),
            host: default_host(),
            port: default_port(),
        }
    }

    #[test]
    fn test_selection_backend_parsing() {
        assert_eq!(
            config_with_backend("file").selection_backend().unwrap(),
            SelectionBackend::File
        );
        assert_eq!(
            config_with_backend("Redis").selection_backend().unwrap(),
            SelectionBackend::Redis
        );
        assert_eq!(
            config_with_backend("memory").selection_backend().unwrap(),
            SelectionBackend::Memory
        );
        assert!(config_with_backend("postgres").selection_backend().is_err());
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(config_with_backend("file").bind_addr(), "127.0.0.1:3000");
    }
}
