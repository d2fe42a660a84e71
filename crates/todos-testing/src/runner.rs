//! Sequential suite runner
//!
//! Runs checks one after another in registration order. A failing check is
//! recorded and the runner moves on; nothing is retried.

use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

use crate::checks::Check;
use crate::client::TestClient;
use crate::config::SuiteConfig;
use crate::context::SuiteContext;
use crate::report::{CheckReport, SuiteReport};

pub struct SuiteRunner {
    client: TestClient,
    checks: Vec<Box<dyn Check>>,
    isolated: bool,
}

impl SuiteRunner {
    /// Create a runner with no checks
    pub fn new(client: TestClient) -> Self {
        Self {
            client,
            checks: Vec::new(),
            isolated: false,
        }
    }

    /// Runner for the standard create, list, delete sequence.
    ///
    /// The configured selection filters the checks but never reorders them.
    pub fn todos(client: TestClient, config: &SuiteConfig) -> Self {
        let mut kinds = config.checks.clone();
        kinds.sort();
        kinds.dedup();

        kinds
            .iter()
            .fold(Self::new(client), |runner, kind| {
                runner.with_check(kind.build(config))
            })
            .isolated(config.isolated)
    }

    pub fn with_check(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Give every check a fresh context instead of sharing one
    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check and collect the outcomes
    pub async fn run(&self) -> SuiteReport {
        let mut ctx = SuiteContext::new();
        let run_id = ctx.run_id();
        let span = info_span!("suite", %run_id, base_url = %self.client.base_url());

        async {
            let started = Instant::now();
            let mut report = SuiteReport::new(run_id, self.client.base_url());
            info!(checks = self.checks.len(), isolated = self.isolated, "starting suite");

            for check in &self.checks {
                if self.isolated {
                    ctx = SuiteContext::with_run_id(run_id);
                }
                report.push(self.run_check(check.as_ref(), &mut ctx).await);
            }

            report.finish(started.elapsed());
            info!(
                passed = report.passed(),
                failed = report.failed(),
                duration_ms = report.duration_ms as u64,
                "suite finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn run_check(&self, check: &dyn Check, ctx: &mut SuiteContext) -> CheckReport {
        let name = check.name().to_string();
        let description = check.describe();
        let started = Instant::now();

        info!(check = %name, "{}", description);
        let outcome = check.run(&self.client, ctx).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(()) => {
                info!(check = %name, duration_ms = elapsed.as_millis() as u64, "check passed");
                CheckReport::passed(name, description, elapsed)
            }
            Err(e) => {
                error!(
                    check = %name,
                    duration_ms = elapsed.as_millis() as u64,
                    unreachable = e.is_transport(),
                    error = %e,
                    "check failed"
                );
                CheckReport::failed(name, description, elapsed, e.to_string())
            }
        }
    }
}
