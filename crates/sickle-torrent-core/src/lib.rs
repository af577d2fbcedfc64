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

//! Client-agnostic torrent submission types, policies, and traits.
//!
//! Layout: `model/` (submission DTOs and reports), `policy.rs` (label and
//! ratio normalisation), `service/` (the `TorrentClient` trait), `error.rs`.

pub mod error;
pub mod model;
pub mod policy;
pub mod service;

pub use error::{PolicyViolation, TorrentError, TorrentResult};
pub use model::{
    ConnectionCheck, PendingResult, ShowInfo, StepOutcome, SubmissionReport, TorrentSource,
};
pub use policy::{RatioPlan, resolve_label};
pub use service::TorrentClient;
