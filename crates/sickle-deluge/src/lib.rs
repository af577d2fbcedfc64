#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Deluge Web UI adapter speaking the daemon's JSON-RPC surface.
//!
//! Layout:
//! - `rpc.rs`: call/response envelopes and the `RpcTransport` seam
//! - `transport.rs`: reqwest-backed transport with a cookie session
//! - `session.rs`: login and daemon-connect handshake
//! - `dispatcher.rs`: add and post-processing actions against a session
//! - `client.rs`: `TorrentClient` implementation tying the pieces together

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod rpc;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CLIENT_NAME, DelugeClient};
pub use dispatcher::ActionDispatcher;
pub use error::{AuthError, DelugeError, DelugeResult, TransportError};
pub use rpc::{RpcCall, RpcResponse, RpcTransport};
pub use session::{Session, SessionAuthenticator};
pub use transport::HttpTransport;
