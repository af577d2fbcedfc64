//! Output renderers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;
use sickle_torrent_core::{ConnectionCheck, StepOutcome, SubmissionReport};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_submission(
    name: &str,
    report: &SubmissionReport,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            println!("name: {name}");
            println!("hash: {}", report.hash);
            println!("{:<8} OUTCOME", "STEP");
            for (step, outcome) in [
                ("label", &report.label),
                ("ratio", &report.ratio),
                ("path", &report.path),
                ("pause", &report.pause),
            ] {
                println!("{step:<8} {}", outcome_to_str(outcome));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_check(check: &ConnectionCheck, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(check)?,
        OutputFormat::Table => println!("{}", check.message),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn outcome_to_str(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Applied => "applied".to_string(),
        StepOutcome::Skipped => "skipped".to_string(),
        StepOutcome::Failed { reason } => format!("failed: {reason}"),
    }
}
