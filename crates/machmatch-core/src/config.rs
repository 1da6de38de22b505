use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid. All variables have
/// defaults; none are required.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("MACHMATCH_ENV", "development"));
    let log_level = or_default("MACHMATCH_LOG_LEVEL", "info");
    let cache_path = PathBuf::from(or_default("MACHMATCH_CACHE_PATH", "./machinery_cache.db"));
    let taxonomy_path = lookup("MACHMATCH_TAXONOMY_PATH").ok().map(PathBuf::from);
    let fallback_providers_path = lookup("MACHMATCH_FALLBACK_PROVIDERS_PATH")
        .ok()
        .map(PathBuf::from);

    let profiler_api_key = lookup("MACHMATCH_API_KEY").ok();
    let profiler_base_url = or_default("MACHMATCH_PROFILER_BASE_URL", "https://api.anthropic.com");
    let profiler_model = or_default("MACHMATCH_PROFILER_MODEL", "claude-sonnet-4-5");
    let profiler_timeout_secs = parse_u64("MACHMATCH_PROFILER_TIMEOUT_SECS", "60")?;
    let profiler_batch_size = parse_usize("MACHMATCH_PROFILER_BATCH_SIZE", "10")?;
    let profiler_max_providers = parse_usize("MACHMATCH_PROFILER_MAX_PROVIDERS", "50")?;

    let directory_base_url = or_default("MACHMATCH_DIRECTORY_BASE_URL", "https://www.k-online.com");
    let scraper_request_timeout_secs = parse_u64("MACHMATCH_SCRAPER_REQUEST_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default(
        "MACHMATCH_SCRAPER_USER_AGENT",
        "machmatch/0.1 (machinery-matching)",
    );
    let scraper_inter_request_delay_ms =
        parse_u64("MACHMATCH_SCRAPER_INTER_REQUEST_DELAY_MS", "500")?;
    let scraper_max_retries = parse_u32("MACHMATCH_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("MACHMATCH_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        cache_path,
        taxonomy_path,
        fallback_providers_path,
        profiler_api_key,
        profiler_base_url,
        profiler_model,
        profiler_timeout_secs,
        profiler_batch_size,
        profiler_max_providers,
        directory_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.cache_path.to_string_lossy(), "./machinery_cache.db");
        assert!(cfg.taxonomy_path.is_none());
        assert!(cfg.profiler_api_key.is_none());
        assert_eq!(cfg.profiler_base_url, "https://api.anthropic.com");
        assert_eq!(cfg.profiler_batch_size, 10);
        assert_eq!(cfg.profiler_max_providers, 50);
        assert_eq!(cfg.directory_base_url, "https://www.k-online.com");
        assert_eq!(cfg.scraper_request_timeout_secs, 15);
        assert_eq!(cfg.scraper_inter_request_delay_ms, 500);
        assert_eq!(cfg.scraper_max_retries, 3);
        assert_eq!(cfg.scraper_retry_backoff_base_secs, 5);
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("MACHMATCH_ENV", "production");
        map.insert("MACHMATCH_API_KEY", "sk-test");
        map.insert("MACHMATCH_PROFILER_BATCH_SIZE", "5");
        map.insert("MACHMATCH_TAXONOMY_PATH", "./config/taxonomy.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.profiler_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.profiler_batch_size, 5);
        assert_eq!(
            cfg.taxonomy_path.as_ref().unwrap().to_string_lossy(),
            "./config/taxonomy.yaml"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_numeric() {
        let mut map = HashMap::new();
        map.insert("MACHMATCH_PROFILER_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MACHMATCH_PROFILER_TIMEOUT_SECS"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_retries() {
        let mut map = HashMap::new();
        map.insert("MACHMATCH_SCRAPER_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MACHMATCH_SCRAPER_MAX_RETRIES"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut map = HashMap::new();
        map.insert("MACHMATCH_API_KEY", "sk-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
