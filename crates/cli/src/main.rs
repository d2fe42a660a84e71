use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;
use todos_testing::config::{
    parse_timeout_secs, ENV_BASE_URL, ENV_BASE_URL_FALLBACK, ENV_FALLBACK_ID, ENV_TIMEOUT_SECS,
};
use todos_testing::{
    init_logging, CheckKind, LoggingConfig, SuiteConfig, SuiteRunner, TestClient, TodoId,
};

#[derive(Parser, Debug)]
#[command(name = "todos-check")]
#[command(about = "Check a running todos API against its HTTP contract")]
#[command(version)]
struct Cli {
    /// Base URL of the todos service [env: TODOS_API_URL, API_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds [env: TODOS_API_TIMEOUT_SECS]
    #[arg(long = "timeout-secs", value_parser = parse_timeout_secs)]
    timeout: Option<Duration>,

    /// Title submitted by the create check
    #[arg(long)]
    title: Option<String>,

    /// Id to delete when no todo was created [env: TODOS_FALLBACK_ID]
    #[arg(long)]
    fallback_id: Option<TodoId>,

    /// Run only these checks (comma separated: create,list,delete)
    #[arg(long, value_delimiter = ',')]
    only: Vec<CheckKind>,

    /// Give every check a fresh context instead of sharing the created id
    #[arg(long)]
    isolated: bool,

    /// Report output format
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl Cli {
    /// Overlay command-line flags on top of `base`
    fn apply(&self, mut config: SuiteConfig) -> SuiteConfig {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(title) = &self.title {
            config.todo_title = title.clone();
        }
        if let Some(id) = &self.fallback_id {
            config.fallback_todo_id = id.clone();
        }
        if !self.only.is_empty() {
            config.checks = self.only.clone();
        }
        if self.isolated {
            config.isolated = true;
        }
        config
    }

    /// Environment variables shadowed by a flag given on the command line
    fn overridden_vars(&self) -> Vec<&'static str> {
        let mut vars = Vec::new();
        if self.base_url.is_some() {
            vars.extend([ENV_BASE_URL, ENV_BASE_URL_FALLBACK]);
        }
        if self.timeout.is_some() {
            vars.push(ENV_TIMEOUT_SECS);
        }
        if self.fallback_id.is_some() {
            vars.push(ENV_FALLBACK_ID);
        }
        vars
    }

    /// Resolve flags over variables from `lookup` over defaults, then validate once
    fn suite_config_with<F>(&self, lookup: F) -> anyhow::Result<SuiteConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shadowed = self.overridden_vars();
        let config = SuiteConfig::from_lookup(|key| {
            if shadowed.iter().any(|var| *var == key) {
                None
            } else {
                lookup(key)
            }
        })
        .context("Failed to load configuration from environment")?;

        let config = self.apply(config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn suite_config(&self) -> anyhow::Result<SuiteConfig> {
        self.suite_config_with(|key| std::env::var(key).ok())
    }
}

/// Run the suite and print the report; returns whether every check passed
async fn run(config: &SuiteConfig, format: ReportFormat) -> anyhow::Result<bool> {
    let client = TestClient::from_config(config).context("Failed to create HTTP client")?;
    let report = SuiteRunner::todos(client, config).run().await;

    match format {
        ReportFormat::Text => println!("{}", report.render_text()),
        ReportFormat::Json => println!(
            "{}",
            report.to_json().context("Failed to serialize report")?
        ),
    }

    Ok(report.is_success())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig::default()
        .with_level(&cli.log_level)
        .with_json(cli.log_json);
    if let Err(e) = init_logging(&logging) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    let config = match cli.suite_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    match run(&config, cli.format).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
