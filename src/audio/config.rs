use std::{str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://apitest.suno.com/api/";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub api_url: String,
    pub page_size: u32,
    pub first_page: u32,
    /// Queue positions from the end at which the next page is fetched.
    pub look_ahead: usize,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 10,
            first_page: 0,
            look_ahead: 1,
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size = parse(&lookup, "SONGFEED_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(invalid("SONGFEED_PAGE_SIZE", "0"));
        }
        let poll_ms = parse(
            &lookup,
            "SONGFEED_POLL_INTERVAL_MS",
            defaults.poll_interval.as_millis() as u64,
        )?;
        if poll_ms == 0 {
            return Err(invalid("SONGFEED_POLL_INTERVAL_MS", "0"));
        }

        Ok(Self {
            api_url: lookup("SONGFEED_API_URL").unwrap_or(defaults.api_url),
            page_size,
            first_page: parse(&lookup, "SONGFEED_FIRST_PAGE", defaults.first_page)?,
            look_ahead: parse(&lookup, "SONGFEED_LOOK_AHEAD", defaults.look_ahead)?,
            poll_interval: Duration::from_millis(poll_ms),
            request_timeout: Duration::from_secs(parse(
                &lookup,
                "SONGFEED_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<FeedConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FeedConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.look_ahead, 1);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("SONGFEED_API_URL", "http://localhost:8080"),
            ("SONGFEED_PAGE_SIZE", "25"),
            ("SONGFEED_LOOK_AHEAD", " 2 "),
            ("SONGFEED_POLL_INTERVAL_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.look_ahead, 2);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config_from(&[("SONGFEED_PAGE_SIZE", "ten")]).unwrap_err(),
            ConfigError::Invalid {
                key: "SONGFEED_PAGE_SIZE",
                value: "ten".to_string()
            }
        );
        assert!(config_from(&[("SONGFEED_PAGE_SIZE", "0")]).is_err());
        assert!(config_from(&[("SONGFEED_POLL_INTERVAL_MS", "0")]).is_err());
    }
}
