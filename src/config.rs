use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Upstream API key. Never printed, not even through `Debug`.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    pub pexels_api_key: ApiKey,

    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
    #[serde(default = "default_upstream_connect_timeout")]
    pub upstream_connect_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_upstream_base_url() -> String {
    "https://api.pexels.com/videos/search".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_upstream_connect_timeout() -> u64 {
    10
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars)?;
        if config.pexels_api_key.expose().trim().is_empty() {
            return Err(envy::Error::Custom(
                "PEXELS_API_KEY must not be empty".to_string(),
            ));
        }
        // The inbound query is appended after a `?`, so the base must not carry its own.
        if config.upstream_base_url.contains(|c| c == '?' || c == '#') {
            return Err(envy::Error::Custom(
                "UPSTREAM_BASE_URL must not contain a query or fragment".to_string(),
            ));
        }
        if config.upstream_timeout_secs == 0 || config.upstream_connect_timeout_secs == 0 {
            return Err(envy::Error::Custom(
                "upstream timeouts must be at least one second".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn upstream_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_connect_timeout_secs)
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
        let config = Config::from_vars(vars(&[("PEXELS_API_KEY", "abc123")])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8787");
        assert_eq!(
            config.upstream_base_url,
            "https://api.pexels.com/videos/search"
        );
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.upstream_connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.pexels_api_key.expose(), "abc123");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("PEXELS_API_KEY", "abc123"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("UPSTREAM_BASE_URL", "http://localhost:1234/videos/search"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            config.upstream_base_url,
            "http://localhost:1234/videos/search"
        );
        assert_eq!(config.upstream_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(Config::from_vars(vars(&[("PORT", "9000")])).is_err());
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        assert!(Config::from_vars(vars(&[("PEXELS_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_vars(vars(&[("PEXELS_API_KEY", "super-secret")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("[redacted]"));
        assert_eq!(config.pexels_api_key.to_string(), "[redacted]");
    }

    #[test]
    fn test_base_url_with_query_is_rejected() {
        for base in [
            "https://api.pexels.com/videos/search?per_page=5",
            "https://api.pexels.com/videos/search?",
            "https://api.pexels.com/videos/search#top",
        ] {
            let result = Config::from_vars(vars(&[
                ("PEXELS_API_KEY", "abc123"),
                ("UPSTREAM_BASE_URL", base),
            ]));
            assert!(result.is_err(), "{}", base);
        }
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        for name in ["UPSTREAM_TIMEOUT_SECS", "UPSTREAM_CONNECT_TIMEOUT_SECS"] {
            let result = Config::from_vars(vars(&[("PEXELS_API_KEY", "abc123"), (name, "0")]));
            assert!(result.is_err(), "{}", name);
        }
        assert!(Config::from_vars(vars(&[
            ("PEXELS_API_KEY", "abc123"),
            ("UPSTREAM_TIMEOUT_SECS", "1"),
            ("UPSTREAM_CONNECT_TIMEOUT_SECS", "1"),
        ]))
        .is_ok());
    }
}
