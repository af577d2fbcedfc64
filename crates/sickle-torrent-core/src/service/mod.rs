//! Traits implemented by torrent client adapters.

use async_trait::async_trait;

use crate::error::TorrentResult;
use crate::model::{ConnectionCheck, PendingResult, SubmissionReport};

/// Torrent client that accepts submissions from the download pipeline.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Short client identifier used in logs.
    fn name(&self) -> &'static str;

    /// Authenticate, add the torrent, then apply best-effort post-processing.
    ///
    /// On success `result.hash` holds the client-assigned hash. Post-processing
    /// failures are reported in the returned [`SubmissionReport`] rather than
    /// as errors.
    async fn send_torrent(&self, result: &mut PendingResult) -> TorrentResult<SubmissionReport>;

    /// Verify that the client is reachable and accepts the configured credentials.
    async fn test_authentication(&self) -> ConnectionCheck;
}
