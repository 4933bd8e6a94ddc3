//! Action inputs with layered loading.
//!
//! Inputs are loaded with figment from multiple sources (highest wins):
//!
//! 1. Action inputs (`INPUT_*`, as exported by the Actions runner) and the
//!    workflow context (`GITHUB_REPOSITORY`, `GITHUB_API_URL`), taken verbatim
//! 2. Tool settings (`CACHE_SWEEPER_*`)
//! 3. TOML config file (if `CACHE_SWEEPER_CONFIG_FILE` set)
//! 4. Built-in defaults
//!
//! Loading keeps inputs as raw strings. [`SweepConfig::from_inputs`] turns
//! them into typed settings so a bad value can be reported by input name.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Names of the action inputs, as declared in the action metadata.
pub mod inputs {
    pub const DEBUG: &str = "debug";
    pub const MAX_AGE: &str = "max-age";
    pub const ACCESSED: &str = "accessed";
    pub const TOKEN: &str = "token";
    pub const CACHE_KEY: &str = "cache_key";
}

/// Raw inputs and settings, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInputs {
    /// `"true"` enables extra console output.
    #[serde(default)]
    pub debug: Option<String>,

    /// Age threshold in seconds. Required.
    #[serde(default, rename = "max-age")]
    pub max_age: Option<String>,

    /// Declared by the action but has no effect on the sweep.
    #[serde(default)]
    pub accessed: Option<String>,

    /// API credential. Required.
    #[serde(default)]
    pub token: Option<String>,

    /// Exact key of the cache entry to delete.
    #[serde(default)]
    pub cache_key: Option<String>,

    /// `owner/repo` the caches belong to.
    ///
    /// Set via GITHUB_REPOSITORY.
    #[serde(default)]
    pub repository: Option<String>,

    /// REST API root.
    ///
    /// Set via GITHUB_API_URL or CACHE_SWEEPER_API_URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent string for API requests.
    ///
    /// Set via CACHE_SWEEPER_USER_AGENT.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CACHE_SWEEPER_TIMEOUT_MS.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_user_agent() -> String {
    "cache-sweeper/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for ActionInputs {
    fn default() -> Self {
        Self {
            debug: None,
            max_age: None,
            accessed: None,
            token: None,
            cache_key: None,
            repository: None,
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Values exported by the runner, read verbatim.
///
/// Kept out of figment's `Env` provider, which would parse `007` into a
/// number or `[a, b]` into an array and change what the user typed.
#[derive(Debug, Default, Serialize)]
struct RunnerEnv {
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<String>,
    #[serde(rename = "max-age", skip_serializing_if = "Option::is_none")]
    max_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accessed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
}

/// `INPUT_<NAME>`, with the name upper-cased and spaces turned into `_`.
fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

impl RunnerEnv {
    fn read() -> Self {
        let input = |name: &str| std::env::var(input_var(name)).ok();
        Self {
            debug: input(inputs::DEBUG),
            max_age: input(inputs::MAX_AGE),
            accessed: input(inputs::ACCESSED),
            token: input(inputs::TOKEN),
            cache_key: input(inputs::CACHE_KEY),
            repository: std::env::var("GITHUB_REPOSITORY").ok(),
            api_url: std::env::var("GITHUB_API_URL").ok(),
        }
    }
}

impl ActionInputs {
    /// The layered figment these inputs are extracted from.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CACHE_SWEEPER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(
                Env::prefixed("CACHE_SWEEPER_")
                    .map(|key| key.as_str().to_lowercase().into())
                    .only(&["api_url", "user_agent", "timeout_ms"]),
            )
            .merge(Serialized::defaults(RunnerEnv::read()))
    }

    /// Load inputs from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the config file cannot be read or
    /// a value has the wrong shape.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }

    /// Whether the `debug` input is switched on.
    ///
    /// Only the exact string `true` counts, matching how the runner passes
    /// boolean inputs.
    pub fn debug_enabled(&self) -> bool {
        self.debug.as_deref().map(str::trim) == Some("true")
    }
}

/// Owner and name of the repository whose caches are swept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::Invalid { field: "repository".into(), reason: reason.into() };

        let (owner, name) = s.trim().split_once('/').ok_or_else(|| invalid("expected owner/repo"))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid("expected owner/repo"));
        }

        Ok(Self { owner: owner.to_string(), name: name.to_string() })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validated settings for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub debug: bool,

    /// Age threshold in seconds.
    pub max_age: u64,

    /// `now - max_age`. Computed for every run; no entry is compared against it.
    pub max_date: DateTime<Utc>,

    pub accessed: Option<String>,

    pub token: String,

    /// Key to delete. `None` skips the delete phase.
    pub cache_key: Option<String>,

    pub repository: Repository,

    pub api_url: String,

    pub user_agent: String,

    pub timeout_ms: u64,
}

impl SweepConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
