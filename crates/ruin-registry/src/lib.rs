//! Package registry access for Ruin.
//!
//! This crate provides the channel snapshot model (per-system package
//! catalogs published under a versioned channel), locator parsing, and the
//! snapshot sources that fetch a channel either from a local directory or
//! over HTTP. Snapshots are consumed, never mutated: resolution reads one
//! snapshot and produces outputs from it.

pub mod catalog;
pub mod http;
pub mod source;

pub use catalog::{parse_locator, ChannelSnapshot, PackageCatalog, PackageEntry};
pub use http::HttpSource;
pub use source::{select_source, DirSource, SnapshotSource};

/// Protocol version sent as `X-Ruin-Protocol` header on all HTTP requests.
/// Servers can reject clients with incompatible protocol versions.
pub const PROTOCOL_VERSION: u32 = 1;

use ruin_schema::SystemId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("snapshot serialization error: {0}")]
    Serialization(String),
    #[error("channel not found: {0}")]
    NotFound(String),
    #[error("channel '{channel}' provides no catalog for system '{system}'")]
    MissingSystem { channel: String, system: SystemId },
    #[error("channel revision mismatch: locator pins '{pinned}', snapshot has '{actual}'")]
    RevisionMismatch { pinned: String, actual: String },
    #[error("offline mode forbids remote channel source: {0}")]
    Offline(String),
}
