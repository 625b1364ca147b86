use crate::identity::ConfigIdentity;
use crate::manifest::ManifestError;
use crate::normalize::NormalizedManifest;
use crate::system::SystemId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("lock file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock file parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lock file serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("lock file config_id mismatch: lock has '{lock_id}', recomputed '{computed_id}'")]
    ConfigIdMismatch {
        lock_id: String,
        computed_id: String,
    },
    #[error("lock file manifest drift: {0}")]
    ManifestDrift(String),
}

/// A shell tool pinned to the version resolved from the channel catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedTool {
    pub name: String,
    pub version: String,
}

/// The fully resolved state of one target system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockedTarget {
    pub system: SystemId,
    /// Content hash (blake3) of the delegated build recipe file.
    pub recipe_digest: String,
    /// Deterministic digest of the package artifact for this system.
    pub artifact_digest: String,
    /// Shell tools with pinned versions, sorted by name.
    pub tools: Vec<ResolvedTool>,
}

/// Result of resolving a manifest against a channel snapshot.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// The snapshot revision the resolution ran against.
    pub channel_revision: String,
    pub targets: Vec<LockedTarget>,
}

/// The lock file captures the fully resolved state of a configuration.
///
/// The config_id is computed deterministically from the locked fields,
/// not from unresolved manifest data. This guarantees:
///   same lock file → same config_id → same outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockFile {
    pub lock_version: u32,
    pub config_id: String,
    pub short_id: String,

    pub project_name: String,

    // Channel identity: locator plus the revision it resolved to
    pub channel_locator: String,
    pub channel_revision: String,

    // Per-system resolved state, sorted by system
    pub targets: Vec<LockedTarget>,
}

impl LockFile {
    /// Generate a lock file from a normalized manifest and resolution results.
    ///
    /// The config_id is computed from the resolved state, ensuring that
    /// identical resolved targets always produce the same identity.
    pub fn from_resolved(normalized: &NormalizedManifest, resolution: &ResolutionResult) -> Self {
        let mut targets = resolution.targets.clone();
        targets.sort_by_key(|t| t.system);
        for target in &mut targets {
            target.tools.sort();
        }

        let lock = LockFile {
            lock_version: 1,
            config_id: String::new(), // computed below
            short_id: String::new(),
            project_name: normalized.project_name.clone(),
            channel_locator: normalized.channel_locator.clone(),
            channel_revision: resolution.channel_revision.clone(),
            targets,
        };

        let identity = lock.compute_identity();
        LockFile {
            config_id: identity.config_id.into_inner(),
            short_id: identity.short_id.into_inner(),
            ..lock
        }
    }

    /// Compute the configuration identity from the locked state.
    ///
    /// This is the canonical hash computation. It uses only resolved,
    /// pinned data — never unresolved tool names or an unpinned locator.
    pub fn compute_identity(&self) -> ConfigIdentity {
        let mut hasher = blake3::Hasher::new();

        hasher.update(format!("project:{}", self.project_name).as_bytes());
        hasher.update(
            format!("channel:{}@{}", self.channel_locator, self.channel_revision).as_bytes(),
        );

        for target in &self.targets {
            hasher.update(format!("target:{}", target.system).as_bytes());
            hasher.update(format!("recipe:{}", target.recipe_digest).as_bytes());
            hasher.update(format!("artifact:{}", target.artifact_digest).as_bytes());
            for tool in &target.tools {
                hasher.update(format!("tool:{}@{}", tool.name, tool.version).as_bytes());
            }
        }

        let hex = hasher.finalize().to_hex().to_string();
        let short = hex[..12].to_owned();

        ConfigIdentity {
            config_id: crate::types::ConfigId::new(hex),
            short_id: crate::types::ShortId::new(short),
        }
    }

    /// Verify that this lock file is internally consistent
    /// (stored config_id matches recomputed config_id).
    pub fn verify_integrity(&self) -> Result<ConfigIdentity, LockError> {
        let identity = self.compute_identity();
        if self.config_id != identity.config_id.as_str() {
            return Err(LockError::ConfigIdMismatch {
                lock_id: self.config_id.clone(),
                computed_id: identity.config_id.into_inner(),
            });
        }
        Ok(identity)
    }

    /// Check that a manifest's declared intent matches this lock file.
    ///
    /// This catches cases where the manifest changed but the lock wasn't updated.
    pub fn verify_manifest_intent(&self, normalized: &NormalizedManifest) -> Result<(), LockError> {
        if self.project_name != normalized.project_name {
            return Err(LockError::ManifestDrift(format!(
                "project name changed: lock has '{}', manifest has '{}'",
                self.project_name, normalized.project_name
            )));
        }
        if self.channel_locator != normalized.channel_locator {
            return Err(LockError::ManifestDrift(format!(
                "channel locator changed: lock has '{}', manifest has '{}'",
                self.channel_locator, normalized.channel_locator
            )));
        }

        let locked_systems: Vec<SystemId> = self.targets.iter().map(|t| t.system).collect();
        for system in &normalized.systems {
            if !locked_systems.contains(system) {
                return Err(LockError::ManifestDrift(format!(
                    "system '{system}' is in manifest but not in lock file. Run 'ruin resolve' to re-resolve."
                )));
            }
        }
        for system in &locked_systems {
            if !normalized.systems.contains(system) {
                return Err(LockError::ManifestDrift(format!(
                    "system '{system}' is in lock file but not in manifest. Run 'ruin resolve' to re-resolve."
                )));
            }
        }

        for target in &self.targets {
            let locked_names: Vec<&str> = target.tools.iter().map(|t| t.name.as_str()).collect();
            for tool in &normalized.shell_tools {
                if !locked_names.contains(&tool.as_str()) {
                    return Err(LockError::ManifestDrift(format!(
                        "tool '{}' is in manifest but not locked for '{}'. Run 'ruin resolve' to re-resolve.",
                        tool, target.system
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| LockError::Io(e.error))?;
        // Fsync parent directory to ensure rename durability on power loss.
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
