//! Client configuration baked in at build time.
//!
//! A WASM bundle has no process environment, so values are captured with
//! `option_env!` when the crate is compiled. Parsing goes through
//! [`ClientConfig::from_lookup`] so it can be exercised with any key source.
//!
//! Keys (all optional):
//! - `BUDGET_API_URL`: backend base URL, default `http://localhost:8080`
//! - `BUDGET_REFRESH_INTERVAL_SECS`: session renewal cadence, default 480
//! - `BUDGET_REFRESH_ON_START`: renew immediately on login, default `true`
//! - `BUDGET_REFRESH_FAILURE_POLICY`: `logout` (default) or `log`
//! - `BUDGET_REGISTER_REDIRECT_MS`: delay before leaving the register page, default 2000

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::session::guard::RouteTable;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 8 * 60;
pub const DEFAULT_REGISTER_REDIRECT_MS: u64 = 2000;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const HOME_PATH: &str = "/";

/// Errors produced while parsing build-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: expected a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key}: expected true or false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key}: expected logout or log, got {value:?}")]
    InvalidPolicy { key: &'static str, value: String },

    #[error("{key}: must be greater than zero")]
    Zero { key: &'static str },
}

/// What the refresh scheduler does when a renewal call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshFailurePolicy {
    /// Only log; the client keeps believing it is authenticated.
    LogOnly,
    /// Force local logout on a definitive 401/403; log anything else.
    #[default]
    LogoutOnUnauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub renew_on_start: bool,
    pub failure_policy: RefreshFailurePolicy,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            renew_on_start: true,
            failure_policy: RefreshFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub refresh: RefreshSettings,
    pub registration_redirect_delay: Duration,
    pub login_path: String,
    pub register_path: String,
    pub home_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            refresh: RefreshSettings::default(),
            registration_redirect_delay: Duration::from_millis(DEFAULT_REGISTER_REDIRECT_MS),
            login_path: LOGIN_PATH.to_owned(),
            register_path: REGISTER_PATH.to_owned(),
            home_path: HOME_PATH.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Parse config from values captured at compile time.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a provided value cannot be parsed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            match key {
                "BUDGET_API_URL" => option_env!("BUDGET_API_URL"),
                "BUDGET_REFRESH_INTERVAL_SECS" => option_env!("BUDGET_REFRESH_INTERVAL_SECS"),
                "BUDGET_REFRESH_ON_START" => option_env!("BUDGET_REFRESH_ON_START"),
                "BUDGET_REFRESH_FAILURE_POLICY" => option_env!("BUDGET_REFRESH_FAILURE_POLICY"),
                "BUDGET_REGISTER_REDIRECT_MS" => option_env!("BUDGET_REGISTER_REDIRECT_MS"),
                _ => None,
            }
            .map(str::to_owned)
        })
    }

    /// Parse config from an arbitrary key source. Absent keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a provided value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = lookup("BUDGET_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let interval_secs = parse_u64(
            "BUDGET_REFRESH_INTERVAL_SECS",
            lookup("BUDGET_REFRESH_INTERVAL_SECS"),
            DEFAULT_REFRESH_INTERVAL_SECS,
        )?;
        if interval_secs == 0 {
            return Err(ConfigError::Zero { key: "BUDGET_REFRESH_INTERVAL_SECS" });
        }
        let renew_on_start = parse_bool("BUDGET_REFRESH_ON_START", lookup("BUDGET_REFRESH_ON_START"), true)?;
        let failure_policy = parse_policy(lookup("BUDGET_REFRESH_FAILURE_POLICY"))?;
        let redirect_ms = parse_u64(
            "BUDGET_REGISTER_REDIRECT_MS",
            lookup("BUDGET_REGISTER_REDIRECT_MS"),
            DEFAULT_REGISTER_REDIRECT_MS,
        )?;

        Ok(Self {
            api_base_url,
            refresh: RefreshSettings { interval: Duration::from_secs(interval_secs), renew_on_start, failure_policy },
            registration_redirect_delay: Duration::from_millis(redirect_ms),
            ..defaults
        })
    }

    /// Public-path allowlist and login target derived from this config.
    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(&self.login_path, [self.login_path.as_str(), self.register_path.as_str()])
    }
}

fn parse_u64(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(default),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidBool { key, value: other.to_owned() }),
    }
}

fn parse_policy(raw: Option<String>) -> Result<RefreshFailurePolicy, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("logout") => Ok(RefreshFailurePolicy::LogoutOnUnauthorized),
        Some("log") => Ok(RefreshFailurePolicy::LogOnly),
        Some(other) => {
            Err(ConfigError::InvalidPolicy { key: "BUDGET_REFRESH_FAILURE_POLICY", value: other.to_owned() })
        }
    }
}
