use anyhow::Context;
use clap::Parser;
use gh_commit_report::infrastructures::adapters::primary::cli::{Cli, FAILURE_EXIT_CODE, report_parse_error, run, write_report};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return ExitCode::from(report_parse_error(&e)),
    };

    let provider = match init_tracing() {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };

    let result = report(&cli).await;

    if let Some(provider) = provider
        && let Err(e) = provider.shutdown()
    {
        eprintln!("Failed to flush traces: {e}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

async fn report(cli: &Cli) -> anyhow::Result<()> {
    let report = run(cli)
        .await
        .with_context(|| format!("Failed to build the commit report for {}", cli.user))?;
    tracing::info!("Report has {} repositories", report.len());

    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, &report).context("Failed to write the report")?;
    Ok(())
}

/// Logs go to stderr so stdout carries only the report. Spans are exported
/// over OTLP when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracing() -> anyhow::Result<Option<SdkTracerProvider>> {
    let provider = if env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()
            .context("Failed to create OTLP exporter")?;
        Some(
            SdkTracerProvider::builder()
                .with_batch_exporter(otlp_exporter)
                .build(),
        )
    } else {
        None
    };

    let telemetry = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer("gh-commit-report")));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(telemetry)
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    Ok(provider)
}
