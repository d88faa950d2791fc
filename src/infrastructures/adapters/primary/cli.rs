use crate::application::use_cases::build_commit_report::{BuildCommitReportInteractor, BuildCommitReportUseCase};
use crate::config::{ApiConfig, DEFAULT_API_URL, MAX_PER_PAGE};
use crate::domain::errors::GitHubError;
use crate::domain::models::report::{Report, ReportEntry};
use crate::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Count the commits of every repository a GitHub user owns.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// GitHub user whose repositories are reported
    pub user: String,

    /// Leave forked repositories out of the report
    #[arg(long)]
    pub exclude_forks: bool,

    /// Base URL of the REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Items requested per page (1-100)
    #[arg(long, env = "GITHUB_PER_PAGE", default_value_t = MAX_PER_PAGE)]
    pub per_page: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Commit listings fetched in parallel
    #[arg(long, env = "REPORT_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,
}

impl Cli {
    pub fn config(&self) -> ApiConfig {
        ApiConfig::default()
            .with_base_url(self.api_url.clone())
            .with_per_page(self.per_page)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_concurrency(self.concurrency)
    }
}

pub const USAGE_EXIT_CODE: u8 = 1;
pub const FAILURE_EXIT_CODE: u8 = 2;

/// Exit code for an argument error: 0 for `--help`/`--version`, otherwise
/// the usage code.
pub fn parse_error_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() { USAGE_EXIT_CODE } else { 0 }
}

/// Prints clap's rendering of `error`, falling back to plain stderr when
/// that write fails.
pub fn report_parse_error(error: &clap::Error) -> u8 {
    if error.print().is_err() {
        eprintln!("{error}");
    }
    parse_error_exit_code(error)
}

/// `Repo: <name>[ (fork)] Number of commits: <count>`
pub fn format_entry(entry: &ReportEntry) -> String {
    let tag = if entry.fork { " (fork)" } else { "" };
    format!("Repo: {}{} Number of commits: {}", entry.name, tag, entry.commits)
}

pub fn write_report(out: &mut impl Write, report: &Report) -> std::io::Result<()> {
    for entry in report.iter() {
        writeln!(out, "{}", format_entry(entry))?;
    }
    Ok(())
}

#[tracing::instrument(name = "cli::run", skip(cli), fields(user = %cli.user))]
pub async fn run(cli: &Cli) -> Result<Report, GitHubError> {
    let config = cli.config();
    let transport = Arc::new(GitHubApiAdapter::new(&config)?);
    let interactor = BuildCommitReportInteractor::from_transport(transport, &config);
    interactor.build(&cli.user, !cli.exclude_forks).await
}
