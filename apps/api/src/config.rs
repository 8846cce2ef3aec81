use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default except `REDIS_URL`, whose absence selects the
/// in-memory layout cache.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub redis_url: Option<String>,
    /// Maximum layouts held by the in-memory cache.
    pub layout_cache_capacity: usize,
    /// Expiry for layouts stored in Redis.
    pub layout_cache_ttl_secs: u64,
    /// Larger layout requests are rejected.
    pub max_creators: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            redis_url: None,
            layout_cache_capacity: 256,
            layout_cache_ttl_secs: 86_400,
            max_creators: 5_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            layout_cache_capacity: parse_env(
                "LAYOUT_CACHE_CAPACITY",
                defaults.layout_cache_capacity,
            )?,
            layout_cache_ttl_secs: parse_env(
                "LAYOUT_CACHE_TTL_SECS",
                defaults.layout_cache_ttl_secs,
            )?,
            max_creators: parse_env("FOREST_MAX_CREATORS", defaults.max_creators)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("FOREST_TEST_SURELY_UNSET_VAR", 1234).unwrap();
        assert_eq!(value, 1234);
    }

    #[test]
    fn test_parse_env_reads_and_rejects() {
        std::env::set_var("FOREST_TEST_CAPACITY_OK", " 42 ");
        let value: usize = parse_env("FOREST_TEST_CAPACITY_OK", 1).unwrap();
        assert_eq!(value, 42);

        std::env::set_var("FOREST_TEST_CAPACITY_BAD", "lots");
        let err = parse_env::<usize>("FOREST_TEST_CAPACITY_BAD", 1).unwrap_err();
        assert!(err.to_string().contains("FOREST_TEST_CAPACITY_BAD"));
    }

    #[test]
    fn test_default_config_sanity() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!(config.redis_url.is_none());
        assert!(config.max_creators >= 1000);
    }
}
