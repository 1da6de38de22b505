use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Path of the local SQLite cache file.
    pub cache_path: PathBuf,
    /// Optional taxonomy override file; the builtin taxonomy is used when unset.
    pub taxonomy_path: Option<PathBuf>,
    /// Optional fallback provider list override; the builtin list is used when unset.
    pub fallback_providers_path: Option<PathBuf>,
    /// API key for the profile-enrichment service. When absent, every
    /// provider gets a degraded fallback profile instead of a live one.
    pub profiler_api_key: Option<String>,
    pub profiler_base_url: String,
    pub profiler_model: String,
    pub profiler_timeout_secs: u64,
    /// Providers per enrichment request.
    pub profiler_batch_size: usize,
    /// Hard cap on providers sent for enrichment in one run (cost control).
    pub profiler_max_providers: usize,
    pub directory_base_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("cache_path", &self.cache_path)
            .field("taxonomy_path", &self.taxonomy_path)
            .field("fallback_providers_path", &self.fallback_providers_path)
            .field(
                "profiler_api_key",
                &self.profiler_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("profiler_base_url", &self.profiler_base_url)
            .field("profiler_model", &self.profiler_model)
            .field("profiler_timeout_secs", &self.profiler_timeout_secs)
            .field("profiler_batch_size", &self.profiler_batch_size)
            .field("profiler_max_providers", &self.profiler_max_providers)
            .field("directory_base_url", &self.directory_base_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .finish()
    }
}
