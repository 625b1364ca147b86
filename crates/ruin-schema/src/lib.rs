//! Manifest parsing, normalization, lock files, and configuration identity for Ruin.
//!
//! This crate defines the schema layer: TOML manifest parsing (`ManifestV1`),
//! the supported target system identifiers (`SystemId`), normalized
//! representations (`NormalizedManifest`), deterministic configuration
//! identity computation (`compute_config_id`), lock file generation and
//! verification (`LockFile`), and built-in preset definitions.

pub mod identity;
pub mod lock;
pub mod manifest;
pub mod normalize;
pub mod preset;
pub mod system;
pub mod types;

pub use identity::{compute_config_id, ConfigIdentity};
pub use lock::{LockError, LockFile, LockedTarget, ResolutionResult, ResolvedTool};
pub use manifest::{
    parse_manifest_file, parse_manifest_str, ChannelSection, ManifestError, ManifestV1,
    ProjectSection, ShellSection, TargetsSection,
};
pub use normalize::NormalizedManifest;
pub use preset::{get_preset, list_presets, Preset, BUILTIN_PRESETS};
pub use system::{SystemId, SUPPORTED_SYSTEMS};
pub use types::{ArtifactDigest, ConfigId, OutputName, ShortId};
