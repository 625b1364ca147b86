//! Resolve orchestration for Ruin multi-target configurations.
//!
//! This crate ties together schema parsing, channel snapshots, and the
//! delegated build recipe into the `Engine` — the central API for turning a
//! manifest into per-system output sets (package artifacts and dev shells)
//! plus a lock file. The per-system fan-out itself lives in [`generator`].

pub mod engine;
pub mod generator;
pub mod outputs;
pub mod recipe;

pub use engine::{Engine, ResolveOptions, ResolveResult, LOCK_FILE};
pub use generator::per_system;
pub use outputs::{DevShell, PackageArtifact, ResolvedOutputs, DEFAULT_OUTPUT};
pub use recipe::{Recipe, RecipeError};

use ruin_schema::SystemId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ruin_schema::ManifestError),
    #[error("lock error: {0}")]
    Lock(#[from] ruin_schema::LockError),
    #[error("registry error: {0}")]
    Registry(#[from] ruin_registry::RegistryError),
    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),
    #[error("system '{0}' declared more than once")]
    DuplicateSystem(SystemId),
    #[error("tool '{tool}' cannot be resolved for system '{system}' under strict mode")]
    ToolUnsatisfied { tool: String, system: SystemId },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
