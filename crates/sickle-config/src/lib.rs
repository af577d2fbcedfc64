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

//! Torrent client settings consumed by the Deluge adapter.
//!
//! Layout: `model.rs` (typed settings), `defaults.rs` (fallback values),
//! `validate.rs` (field checks), `loader.rs` (JSON documents on disk).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_from_path;
pub use model::{DelugeSettings, LabelSettings};
pub use validate::{SEED_FOREVER_RATIO, label_is_valid, validate_ratio, validate_settings};
