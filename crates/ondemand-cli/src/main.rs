//! nhk-radio-ondemand - NHK radio on-demand listing CLI.

/// Application configuration (TOML).
mod config;
/// Line-flushed record output.
mod output;

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;
use crate::output::{OutputClosed, RecordWriter};
use ondemand_api::nhk::{FIELD_NAMES, OnDemandClient, SiteCorner, flatten};
use ondemand_api::{ErrorKind, OnDemandError};

/// Name used as the prefix of diagnostics.
const BIN_NAME: &str = "nhk-radio-ondemand";

/// Long help text before the column list.
const ABOUT_HEAD: &str = "\
Retrieves NHK radio on-demand program information.

Without options, prints one summary record per program.
With -d SITEID_CORNERID, prints one record per streamable episode of that program.

Records are written to stdout, tab-separated, with these 13 fields:
";

/// Long help text after the column list.
const ABOUT_TAIL: &str = "
Example: stream URL of the latest episode of site 2295, corner 17
  $ nhk-radio-ondemand -d 2295_17 | head -n 1 | cut -f 13";

/// Builds the long help text, numbering the output columns.
fn long_about() -> String {
    let mut text = String::from(ABOUT_HEAD);
    for (n, name) in (1_u8..).zip(FIELD_NAMES) {
        let _ = writeln!(text, "  {n:>2}. {name}");
    }
    text.push_str(ABOUT_TAIL);
    text
}

/// Builds the clap command with the generated long help.
fn command() -> clap::Command {
    Cli::command().long_about(long_about())
}

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Show episodes of one program: site_id and corner_id joined by an underscore.
    #[arg(short = 'd', value_name = "SITEID_CORNERID")]
    detail: Option<String>,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Override config directory.
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Builds the log filter: `--verbose` wins, then `RUST_LOG`, then `warn`.
fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Installs the global tracing subscriber. Logs go to stderr; stdout is
/// reserved for records.
fn init_tracing(verbose: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(env_filter(verbose))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter(verbose))
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Parses the filter, builds the client from config, and streams records
/// to stdout.
///
/// # Errors
///
/// Returns an error if the filter is malformed, the config cannot be
/// loaded, any fetch fails, or stdout cannot be written.
#[allow(clippy::future_not_send)]
#[instrument(skip_all)]
async fn run(cli: &Cli) -> Result<usize> {
    // Validated before any network access.
    let filter = cli
        .detail
        .as_deref()
        .map(str::parse::<SiteCorner>)
        .transpose()?;

    let config = AppConfig::load_from(cli.dir.as_deref()).context("failed to load config")?;

    let mut builder = OnDemandClient::builder().user_agent(config.user_agent());
    if let Some(url) = config.index_url()? {
        builder = builder.index_url(url);
    }
    let client = builder.build().context("failed to build API client")?;
    tracing::debug!(index_url = %client.index_url(), "client ready");

    let stdout = std::io::stdout();
    let mut writer = RecordWriter::new(stdout.lock());
    flatten(&client, filter.as_ref(), |record| writer.write(record)).await?;

    Ok(writer.written())
}

/// Writes a one-line diagnostic for `err` to stderr.
fn report(err: &anyhow::Error) {
    let kind = OnDemandError::classify(err);
    tracing::debug!(?kind, error = ?err, "run failed");

    let message = match kind {
        ErrorKind::MalformedFilter => {
            OnDemandError::find(err).map_or_else(|| err.to_string(), ToString::to_string)
        }
        ErrorKind::Remote | ErrorKind::Unexpected => format!("{err:#}"),
    };
    let mut stderr = std::io::stderr().lock();
    // Nothing left to report to if stderr itself is gone.
    let _ = writeln!(stderr, "{BIN_NAME}: Error: {message}.");
}

/// Entry point.
///
/// Exits 0 on success (or when the reader closes stdout early) and 1 on
/// any failure, including argument errors.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let parsed = command()
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(count) => {
            tracing::info!(count, "records written");
            ExitCode::SUCCESS
        }
        Err(err) if OutputClosed::is_cause_of(&err) => {
            tracing::debug!("reader closed stdout");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
