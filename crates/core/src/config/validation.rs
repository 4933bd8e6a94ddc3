//! Input validation rules.
//!
//! Turns raw [`ActionInputs`] into a [`SweepConfig`]. Required inputs follow
//! the runner's convention: surrounding whitespace is trimmed and an empty
//! value counts as not supplied.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::config::{ActionInputs, Repository, SweepConfig, inputs};

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("Input required and not supplied: {field} ({hint})")]
    Missing { field: String, hint: String },

    #[error("Wrong value for the input '{input}': {value}")]
    WrongValue { input: String, value: String },
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str, hint: &str) -> Result<String, ConfigError> {
    trimmed(value).ok_or_else(|| ConfigError::Missing { field: field.into(), hint: hint.into() })
}

/// Parse `max-age` and derive the cutoff timestamp from it.
///
/// Only a plain non-negative integer is accepted. A value too large to
/// subtract from `now` is rejected the same way.
fn parse_max_age(raw: &str, now: DateTime<Utc>) -> Result<(u64, DateTime<Utc>), ConfigError> {
    let wrong = || ConfigError::WrongValue { input: inputs::MAX_AGE.into(), value: raw.to_string() };

    let seconds: u64 = raw.parse().map_err(|_| wrong())?;
    let delta = i64::try_from(seconds).ok().and_then(TimeDelta::try_seconds).ok_or_else(wrong)?;
    let max_date = now.checked_sub_signed(delta).ok_or_else(wrong)?;

    Ok((seconds, max_date))
}

impl SweepConfig {
    /// Validate raw inputs into sweep settings.
    ///
    /// `now` anchors the `max-age` cutoff.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` if `max-age`, `token` or the repository is absent
    /// - `ConfigError::WrongValue` if `max-age` is not a non-negative integer
    /// - `ConfigError::Invalid` if the repository, timeout or user agent is malformed
    pub fn from_inputs(raw: ActionInputs, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let debug = raw.debug_enabled();

        let max_age_raw = required(raw.max_age, inputs::MAX_AGE, "set the `max-age` input")?;
        let (max_age, max_date) = parse_max_age(&max_age_raw, now)?;

        let token = required(raw.token, inputs::TOKEN, "set the `token` input")?;
        let cache_key = trimmed(raw.cache_key);
        let accessed = trimmed(raw.accessed);

        let repository: Repository =
            required(raw.repository, "repository", "set GITHUB_REPOSITORY to owner/repo")?.parse()?;

        let config = Self {
            debug,
            max_age,
            max_date,
            accessed,
            token,
            cache_key,
            repository,
            api_url: raw.api_url,
            user_agent: raw.user_agent,
            timeout_ms: raw.timeout_ms,
        };
        config.validate()?;

        tracing::debug!(
            max_age = config.max_age,
            max_date = %config.max_date,
            repository = %config.repository,
            cache_key = config.cache_key.as_deref(),
            "inputs validated"
        );

        Ok(config)
    }

    /// Validate client settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `api_url` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "api_url".into(), reason: "must not be empty".into() });
        }

        if self.accessed.is_some() {
            tracing::warn!("the `accessed` input is accepted but has no effect");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn valid_inputs() -> ActionInputs {
        ActionInputs {
            max_age: Some("3600".into()),
            token: Some("ghs_secret".into()),
            repository: Some("octo/widgets".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_inputs() {
        let config = SweepConfig::from_inputs(valid_inputs(), now()).unwrap();
        assert!(!config.debug);
        assert_eq!(config.max_age, 3600);
        assert_eq!(config.max_date, Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap());
        assert_eq!(config.token, "ghs_secret");
        assert_eq!(config.repository.owner, "octo");
        assert!(config.cache_key.is_none());
    }

    #[test]
    fn test_zero_max_age_is_now() {
        let inputs = ActionInputs { max_age: Some("0".into()), ..valid_inputs() };
        let config = SweepConfig::from_inputs(inputs, now()).unwrap();
        assert_eq!(config.max_date, now());
    }

    #[test]
    fn test_wrong_max_age_names_input_and_value() {
        for bad in ["abc", "-5", "1.5", "10s", "99999999999999999999"] {
            let inputs = ActionInputs { max_age: Some(bad.into()), ..valid_inputs() };
            let err = SweepConfig::from_inputs(inputs, now()).unwrap_err();
            assert!(
                matches!(&err, ConfigError::WrongValue { input, value } if input == "max-age" && value == bad),
                "unexpected error for {bad:?}: {err}"
            );
            assert_eq!(err.to_string(), format!("Wrong value for the input 'max-age': {bad}"));
        }
    }

    #[test]
    fn test_max_age_too_large_for_cutoff() {
        let inputs = ActionInputs { max_age: Some(u64::MAX.to_string()), ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::WrongValue { .. })));
    }

    #[test]
    fn test_missing_max_age() {
        let inputs = ActionInputs { max_age: Some("  ".into()), ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "max-age"));
    }

    #[test]
    fn test_missing_token() {
        let inputs = ActionInputs { token: None, ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "token"));
    }

    #[test]
    fn test_missing_repository() {
        let inputs = ActionInputs { repository: None, ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "repository"));
    }

    #[test]
    fn test_empty_cache_key_skips_delete() {
        let inputs = ActionInputs { cache_key: Some("".into()), ..valid_inputs() };
        let config = SweepConfig::from_inputs(inputs, now()).unwrap();
        assert!(config.cache_key.is_none());
    }

    #[test]
    fn test_cache_key_is_trimmed() {
        let inputs = ActionInputs { cache_key: Some(" build-abc\n".into()), ..valid_inputs() };
        let config = SweepConfig::from_inputs(inputs, now()).unwrap();
        assert_eq!(config.cache_key.as_deref(), Some("build-abc"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let inputs = ActionInputs { timeout_ms: 50, ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let inputs = ActionInputs { timeout_ms: 301_000, ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let inputs = ActionInputs { timeout_ms: 100, ..valid_inputs() };
        assert!(SweepConfig::from_inputs(inputs, now()).is_ok());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let inputs = ActionInputs { user_agent: String::new(), ..valid_inputs() };
        let result = SweepConfig::from_inputs(inputs, now());
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
