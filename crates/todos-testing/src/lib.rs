//! # todos-testing - Contract checks for a todos HTTP API
//!
//! Drives a running todos service through its three public operations and
//! reports whether each one honours the expected HTTP contract:
//!
//! | Check    | Request              | Expected                          |
//! |----------|----------------------|-----------------------------------|
//! | `create` | `POST /todos`        | `201`, object with `id`, `title`  |
//! | `list`   | `GET /todos`         | `200`, JSON array                 |
//! | `delete` | `DELETE /todos/{id}` | `204`, empty body                 |
//!
//! ## Features
//!
//! - **Pluggable transport**: requests go through [`HttpTransport`], with a
//!   `reqwest` implementation for real services
//! - **Fluent test client**: [`TestClient`] with assertion helpers on
//!   [`TestResponse`]
//! - **Explicit fixtures**: the id recorded by `create` travels in a
//!   [`SuiteContext`] rather than global state
//! - **Reports**: [`SuiteReport`] renders as text or JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use todos_testing::prelude::*;
//!
//! # async fn run() -> TestResult<()> {
//! let config = SuiteConfig::from_env()?;
//! let client = TestClient::from_config(&config)?;
//! let report = SuiteRunner::todos(client, &config).run().await;
//!
//! println!("{}", report.render_text());
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod checks;
pub mod client;
pub mod config;
pub mod context;
pub mod logging;
pub mod report;
pub mod runner;
pub mod todo;
pub mod transport;

// Re-export commonly used types
pub use assertions::TestAssertions;
pub use checks::{Check, CheckKind, CreateTodoCheck, DeleteTodoCheck, ListTodosCheck};
pub use client::{RequestBuilder, TestClient, TestResponse};
pub use config::{ConfigError, SuiteConfig};
pub use context::SuiteContext;
pub use logging::{init_logging, LoggingConfig};
pub use report::{CheckReport, CheckStatus, SuiteReport};
pub use runner::SuiteRunner;
pub use todo::{NewTodo, Todo, TodoId};
pub use transport::{ApiRequest, HttpTransport, ReqwestTransport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        assertions::TestAssertions,
        checks::{Check, CheckKind},
        client::{TestClient, TestResponse},
        config::SuiteConfig,
        context::SuiteContext,
        report::SuiteReport,
        runner::SuiteRunner,
        todo::{Todo, TodoId},
        TestError, TestResult,
    };

    pub use serde_json::{json, Value as JsonValue};
}

// Error handling
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Expected status {expected}, got {actual} (body: {body})")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Missing field '{field}' in response: {body}")]
    MissingField { field: String, body: String },

    #[error("Expected field '{field}' to be {expected}, got {actual} in {body}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
        body: String,
    },

    #[error("Expected JSON {expected}, got: {body}")]
    UnexpectedShape { expected: String, body: String },

    #[error("Assertion failed: {message}")]
    Assertion { message: String },

    #[error("Test setup error: {0}")]
    Setup(String),
}

impl TestError {
    /// Create a new assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Whether the service never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, TestError::Transport(_))
    }
}

pub type TestResult<T> = Result<T, TestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message_carries_body() {
        let err = TestError::UnexpectedStatus {
            expected: 201,
            actual: 500,
            body: "{\"error\":\"boom\"}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("201"));
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_assertion_helper() {
        let err = TestError::assertion("title mismatch");
        assert_eq!(err.to_string(), "Assertion failed: title mismatch");
        assert!(!err.is_transport());
    }
}
