//! Fallback values applied when a settings document omits a field.

/// Section name used when reporting Deluge settings errors.
pub(crate) const SECTION: &str = "deluge";
/// Path appended to the Web UI base URL to reach the JSON-RPC endpoint.
pub(crate) const RPC_PATH: &str = "json";
/// Request timeout applied to every RPC call, in seconds.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

pub(crate) const fn verify_cert() -> bool {
    true
}

pub(crate) const fn timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}
