//! Connection test command.

use anyhow::anyhow;
use sickle_torrent_core::TorrentClient;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::output::render_check;

pub(crate) async fn handle_check(client: &dyn TorrentClient, format: OutputFormat) -> CliResult<()> {
    let check = client.test_authentication().await;
    render_check(&check, format)?;
    if check.ok {
        Ok(())
    } else {
        Err(CliError::failure(anyhow!(
            "{} connection test failed",
            client.name()
        )))
    }
}
