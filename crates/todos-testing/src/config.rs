//! Suite configuration
//!
//! Defaults target a service on `http://localhost:3000`. Environment
//! variables overlay the defaults and the CLI overlays the environment.

use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::checks::CheckKind;
use crate::todo::TodoId;

/// Primary base URL variable
pub const ENV_BASE_URL: &str = "TODOS_API_URL";
/// Fallback base URL variable, shared with other todos clients
pub const ENV_BASE_URL_FALLBACK: &str = "API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TODOS_API_TIMEOUT_SECS";
pub const ENV_FALLBACK_ID: &str = "TODOS_FALLBACK_ID";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TITLE: &str = "test";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Everything a suite run needs to know about its target
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Base address of the todos service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Title submitted by the create check
    pub todo_title: String,
    /// Id deleted when no todo was created earlier in the run
    pub fallback_todo_id: TodoId,
    /// Checks to run; execution order is always create, list, delete
    pub checks: Vec<CheckKind>,
    /// Give every check its own context instead of sharing one
    pub isolated: bool,
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            todo_title: DEFAULT_TITLE.to_string(),
            fallback_todo_id: TodoId::default(),
            checks: CheckKind::all().to_vec(),
            isolated: false,
        }
    }

    /// Load and validate configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay variables from an arbitrary source onto the defaults.
    ///
    /// Values are parsed but the result is not validated, so callers can
    /// apply their own overrides first and call [`SuiteConfig::validate`]
    /// once. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::new();

        if let Some(url) = lookup(ENV_BASE_URL).or_else(|| lookup(ENV_BASE_URL_FALLBACK)) {
            config.base_url = url;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout_secs(&secs)?;
        }

        if let Some(id) = lookup(ENV_FALLBACK_ID) {
            config.fallback_todo_id = id.parse()?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.todo_title = title.into();
        self
    }

    pub fn with_fallback_id(mut self, id: impl Into<TodoId>) -> Self {
        self.fallback_todo_id = id.into();
        self
    }

    pub fn with_checks(mut self, checks: Vec<CheckKind>) -> Self {
        self.checks = checks;
        self
    }

    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::invalid_value("base_url", &self.base_url, format!("absolute URL ({})", e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_value(
                "base_url",
                &self.base_url,
                "http or https scheme",
            ));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::invalid_value("base_url", &self.base_url, "a host"));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::validation_failed("timeout must be greater than zero"));
        }

        if self.todo_title.is_empty() {
            return Err(ConfigError::validation_failed("todo title must not be empty"));
        }

        if self.checks.is_empty() {
            return Err(ConfigError::validation_failed("at least one check must be selected"));
        }

        Ok(())
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a timeout given in whole seconds
pub fn parse_timeout_secs(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::invalid_value("timeout", value, "positive number of seconds"))
}
