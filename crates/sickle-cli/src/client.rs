//! CLI error type and settings resolution.

use std::fmt::{self, Display, Formatter};

use sickle_config::{ConfigError, DelugeSettings, load_from_path, validate_settings};

use crate::cli::ConnectionArgs;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidField {
                section,
                field,
                value,
                reason,
            } => {
                let shown = value.map(|value| format!(" ('{value}')")).unwrap_or_default();
                Self::validation(format!("{section}.{field}{shown} {reason}"))
            }
            other => Self::failure(other),
        }
    }
}

/// Combine the optional settings document with command-line overrides.
pub(crate) fn resolve_settings(args: &ConnectionArgs) -> CliResult<DelugeSettings> {
    let mut settings = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let host = args.host.clone().ok_or_else(|| {
                CliError::validation("--host is required when no --config document is given")
            })?;
            let password = args.password.clone().ok_or_else(|| {
                CliError::validation("--password is required when no --config document is given")
            })?;
            DelugeSettings::new(host, password)
        }
    };

    if let Some(host) = &args.host {
        settings.host = host.clone();
    }
    if let Some(password) = &args.password {
        settings.password.clone_from(password);
    }
    if args.insecure {
        settings.verify_cert = false;
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }
    if let Some(label) = &args.label {
        settings.labels.normal.clone_from(label);
    }
    if let Some(label) = &args.anime_label {
        settings.labels.anime.clone_from(label);
    }
    if let Some(path) = &args.download_path {
        settings.download_path = Some(path.clone());
    }
    if args.paused {
        settings.add_paused = true;
    }
    if let Some(ratio) = args.seed_ratio {
        settings.seed_ratio = Some(ratio);
    }

    validate_settings(&settings)?;
    Ok(settings)
}
