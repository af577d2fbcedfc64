//! Torrent submission command.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use clap::Args;
use sickle_config::validate_ratio;
use sickle_torrent_core::{PendingResult, ShowInfo, TorrentClient};
use tracing::warn;
use url::Url;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::output::render_submission;

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub(crate) magnet: Option<String>,
    #[arg(long, help = "Path to a .torrent file")]
    pub(crate) file: Option<PathBuf>,
    #[arg(long, help = "Release name; defaults to the magnet dn or file stem")]
    pub(crate) name: Option<String>,
    #[arg(long, help = "Show the release belongs to")]
    pub(crate) show: Option<String>,
    #[arg(long, help = "Use the anime label")]
    pub(crate) anime: bool,
    #[arg(long, allow_negative_numbers = true, help = "Seed ratio; -1 seeds forever")]
    pub(crate) ratio: Option<f64>,
}

pub(crate) async fn handle_submit(
    client: &dyn TorrentClient,
    args: SubmitArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let mut result = build_result(args).await?;
    let report = client
        .send_torrent(&mut result)
        .await
        .map_err(CliError::failure)?;

    if !report.fully_applied() {
        warn!(hash = %report.hash, "some post-processing steps failed");
    }
    render_submission(&result.name, &report, format)
}

async fn build_result(args: SubmitArgs) -> CliResult<PendingResult> {
    let mut result = match (args.magnet, args.file) {
        (Some(uri), _) => {
            let name = match args.name {
                Some(name) => name,
                None => magnet_display_name(&uri).ok_or_else(|| {
                    CliError::validation("--name is required when the magnet has no dn")
                })?,
            };
            PendingResult::magnet(name, uri)
        }
        (None, Some(path)) => {
            let content = tokio::fs::read(&path).await.map_err(|err| {
                CliError::failure(anyhow!("failed to read {}: {err}", path.display()))
            })?;
            let name = match args.name {
                Some(name) => name,
                None => file_stem(&path).ok_or_else(|| {
                    CliError::validation("--name is required for this torrent file")
                })?,
            };
            PendingResult::file(name, content)
        }
        (None, None) => {
            return Err(CliError::validation("either --magnet or --file is required"));
        }
    };

    if args.anime || args.show.is_some() {
        result = result.with_show(ShowInfo {
            name: args.show.unwrap_or_default(),
            is_anime: args.anime,
        });
    }
    if let Some(ratio) = args.ratio {
        validate_ratio(ratio).map_err(|_| {
            CliError::validation(format!("--ratio {ratio} must be at least 0 or exactly -1"))
        })?;
        result = result.with_ratio(ratio);
    }
    Ok(result)
}

/// Display name (`dn`) carried by a magnet URI.
pub(crate) fn magnet_display_name(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "dn")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use sickle_config::DelugeSettings;
    use sickle_deluge::DelugeClient;
    use sickle_torrent_core::TorrentSource;
    use std::io::Write;

    const MAGNET: &str = "magnet:?xt=urn:btih:4ef6a0d5b3c1a2e7&dn=Show.S01E01.720p+HDTV";

    fn args() -> SubmitArgs {
        SubmitArgs {
            magnet: None,
            file: None,
            name: None,
            show: None,
            anime: false,
            ratio: None,
        }
    }

    #[test]
    fn magnet_name_comes_from_dn() {
        assert_eq!(
            magnet_display_name(MAGNET).as_deref(),
            Some("Show.S01E01.720p HDTV")
        );
        assert_eq!(magnet_display_name("magnet:?xt=urn:btih:abc"), None);
        assert_eq!(magnet_display_name("not a uri"), None);
    }

    #[tokio::test]
    async fn file_submission_uses_stem_and_show() -> CliResult<()> {
        let dir = tempfile::tempdir().map_err(CliError::failure)?;
        let path = dir.path().join("Show.S02E03.torrent");
        let mut file = std::fs::File::create(&path).map_err(CliError::failure)?;
        file.write_all(b"d4:infoe").map_err(CliError::failure)?;

        let result = build_result(SubmitArgs {
            file: Some(path),
            show: Some("Show".to_string()),
            anime: true,
            ratio: Some(-1.0),
            ..args()
        })
        .await?;

        assert_eq!(result.name, "Show.S02E03");
        assert_eq!(
            result.source,
            TorrentSource::File {
                content: b"d4:infoe".to_vec()
            }
        );
        assert!(result.is_anime());
        assert_eq!(result.ratio, Some(-1.0));
        Ok(())
    }

    #[tokio::test]
    async fn magnet_without_name_is_rejected() {
        let err = build_result(SubmitArgs {
            magnet: Some("magnet:?xt=urn:btih:abc".to_string()),
            ..args()
        })
        .await
        .expect_err("no name available");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn unsupported_ratio_is_rejected_before_submission() {
        let err = build_result(SubmitArgs {
            magnet: Some(MAGNET.to_string()),
            ratio: Some(-3.0),
            ..args()
        })
        .await
        .expect_err("ratio below -1 is unsupported");

        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("--ratio -3"));
    }

    #[tokio::test]
    async fn submits_magnet_to_web_ui() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/json")
                .json_body(json!({"method": "auth.login", "params": ["deluge"], "id": 1}));
            then.status(200)
                .json_body(json!({"result": true, "error": null, "id": 1}));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/json")
                .json_body(json!({"method": "web.connected", "params": [], "id": 10}));
            then.status(200)
                .json_body(json!({"result": true, "error": null, "id": 10}));
        });
        let add = server.mock(|when, then| {
            when.method(POST).path("/json").json_body(json!({
                "method": "core.add_torrent_magnet",
                "params": [MAGNET, {}],
                "id": 2
            }));
            then.status(200)
                .json_body(json!({"result": "4ef6a0d5b3c1a2e7", "error": null, "id": 2}));
        });

        let client =
            DelugeClient::from_settings(DelugeSettings::new(server.base_url().parse()?, "deluge"))?;
        let outcome = handle_submit(
            &client,
            SubmitArgs {
                magnet: Some(MAGNET.to_string()),
                ..args()
            },
            OutputFormat::Json,
        )
        .await;

        add.assert();
        assert!(outcome.is_ok());
        Ok(())
    }
}
