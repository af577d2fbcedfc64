//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sickle_deluge::DelugeClient;
use sickle_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::{CliError, CliResult, resolve_settings};
use crate::commands::check::handle_check;
use crate::commands::submit::{SubmitArgs, handle_submit};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("sickle", %run_id, command = cli.command.label());
    match dispatch(cli).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let settings = resolve_settings(&cli.connection)?;
    let client = DelugeClient::from_settings(settings).map_err(CliError::failure)?;

    match cli.command {
        Command::Submit(args) => handle_submit(&client, args, cli.output).await,
        Command::Check => handle_check(&client, cli.output).await,
    }
}

#[derive(Parser)]
#[command(name = "sickle", about = "Submit torrents to a Deluge Web UI")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    #[arg(long, global = true, env = "SICKLE_LOG_LEVEL", default_value = "info")]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "SICKLE_LOG_FORMAT")]
    pub(crate) log_format: Option<LogFormat>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for command results"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Connection settings; flags override values from `--config`.
#[derive(Args, Debug, Default)]
pub(crate) struct ConnectionArgs {
    #[arg(long, global = true, env = "SICKLE_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, global = true, env = "SICKLE_DELUGE_HOST", value_parser = parse_url)]
    pub(crate) host: Option<Url>,
    #[arg(long, global = true, env = "SICKLE_DELUGE_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    #[arg(long, global = true, help = "Skip TLS certificate verification")]
    pub(crate) insecure: bool,
    #[arg(long, global = true, env = "SICKLE_HTTP_TIMEOUT_SECS")]
    pub(crate) timeout: Option<u64>,
    #[arg(long, global = true)]
    pub(crate) label: Option<String>,
    #[arg(long, global = true)]
    pub(crate) anime_label: Option<String>,
    #[arg(long, global = true, help = "Move completed downloads to this directory")]
    pub(crate) download_path: Option<String>,
    #[arg(long, global = true, help = "Pause torrents after adding them")]
    pub(crate) paused: bool,
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub(crate) seed_ratio: Option<f64>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Add a magnet URI or `.torrent` file and apply post-processing.
    Submit(SubmitArgs),
    /// Run the login/connect handshake and report the result.
    Check,
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Check => "check",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Parse the Web UI URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}
