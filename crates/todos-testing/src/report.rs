//! Suite results and their rendering

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
}

/// Outcome of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub description: String,
    pub status: CheckStatus,
    pub duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckReport {
    pub fn passed(name: impl Into<String>, description: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: CheckStatus::Passed,
            duration_ms: duration.as_millis(),
            message: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        description: impl Into<String>,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: CheckStatus::Failed,
            duration_ms: duration.as_millis(),
            message: Some(message.into()),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

/// Aggregated outcome of one suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub checks: Vec<CheckReport>,
}

impl SuiteReport {
    pub fn new(run_id: Uuid, base_url: impl Into<String>) -> Self {
        Self {
            run_id,
            base_url: base_url.into(),
            started_at: Utc::now(),
            duration_ms: 0,
            checks: Vec::new(),
        }
    }

    pub fn push(&mut self, check: CheckReport) {
        self.checks.push(check);
    }

    pub fn finish(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis();
    }

    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    /// True when at least one check ran and none failed
    pub fn is_success(&self) -> bool {
        !self.checks.is_empty() && self.failed() == 0
    }

    pub fn check(&self, name: &str) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "todos API checks against {}", self.base_url);

        for check in &self.checks {
            let marker = match check.status {
                CheckStatus::Passed => "PASS",
                CheckStatus::Failed => "FAIL",
            };
            let _ = writeln!(
                out,
                "  {} {:<7} {} ({} ms)",
                marker, check.name, check.description, check.duration_ms
            );
            if let Some(message) = &check.message {
                let _ = writeln!(out, "         {}", message);
            }
        }

        let _ = write!(
            out,
            "{} passed, {} failed in {} ms",
            self.passed(),
            self.failed(),
            self.duration_ms
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
