use crate::generator::per_system;
use crate::outputs::{DevShell, PackageArtifact, ResolvedOutputs, DEFAULT_OUTPUT};
use crate::recipe::Recipe;
use crate::CoreError;
use ruin_registry::{parse_locator, RegistryError, SnapshotSource};
use ruin_schema::{
    parse_manifest_file, ConfigIdentity, LockFile, LockedTarget, ManifestError, OutputName,
    ResolutionResult,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the lock file written next to the manifest.
pub const LOCK_FILE: &str = "ruin.lock";

/// Central orchestration engine for Ruin resolution.
///
/// Coordinates manifest parsing, snapshot fetching, recipe loading, and the
/// per-system fan-out into a single `resolve` operation. The engine holds no
/// state between calls; each resolve reads one snapshot and produces one
/// complete output set or fails.
pub struct Engine {
    source: Box<dyn SnapshotSource>,
}

/// Result of a successful resolve.
pub struct ResolveResult {
    pub identity: ConfigIdentity,
    pub lock_file: LockFile,
    pub outputs: ResolvedOutputs,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Require an existing lock file and fail if resolved state would drift.
    pub locked: bool,
    /// Forbid remote snapshot sources.
    pub offline: bool,
    /// Require the channel locator to carry an explicit `@<revision>` pin.
    pub require_pinned_channel: bool,
}

impl Engine {
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    pub fn resolve(&self, manifest_path: &Path) -> Result<ResolveResult, CoreError> {
        self.resolve_with_options(manifest_path, ResolveOptions::default())
    }

    #[allow(clippy::too_many_lines)]
    pub fn resolve_with_options(
        &self,
        manifest_path: &Path,
        options: ResolveOptions,
    ) -> Result<ResolveResult, CoreError> {
        info!("resolving manifest {}", manifest_path.display());

        let manifest = parse_manifest_file(manifest_path)?;
        let normalized = manifest.normalize()?;

        if options.offline && self.source.is_remote() {
            return Err(CoreError::Registry(RegistryError::Offline(
                normalized.channel_locator.clone(),
            )));
        }

        if options.require_pinned_channel
            && parse_locator(&normalized.channel_locator).1.is_none()
        {
            return Err(CoreError::Manifest(ManifestError::UnpinnedLocator(
                normalized.channel_locator.clone(),
            )));
        }

        let manifest_dir = manifest_path.parent().unwrap_or(Path::new("."));
        let lock_path = manifest_dir.join(LOCK_FILE);

        let existing_lock = if options.locked {
            let lock = LockFile::read_from_file(&lock_path)?;
            let _ = lock.verify_integrity()?;
            lock.verify_manifest_intent(&normalized)?;
            Some(lock)
        } else {
            None
        };

        let snapshot = self.source.fetch(&normalized.channel_locator)?;
        debug!(
            "channel '{}' at revision {} covers {} systems",
            snapshot.channel,
            snapshot.revision,
            snapshot.systems.len()
        );

        let recipe = Recipe::load(resolve_recipe_path(manifest_dir, &normalized.recipe_path))?;

        let packages = per_system(&normalized.systems, &snapshot, |system, _catalog| {
            let artifact = PackageArtifact::derive(
                &normalized.project_name,
                system,
                &recipe,
                &snapshot.revision,
            );
            let mut named = BTreeMap::new();
            named.insert(OutputName::new(&normalized.project_name), artifact.clone());
            named.insert(OutputName::new(DEFAULT_OUTPUT), artifact);
            Ok(named)
        })?;

        let dev_shells = per_system(&normalized.systems, &snapshot, |system, catalog| {
            DevShell::resolve(
                system,
                catalog,
                normalized.shell_strict,
                &normalized.shell_tools,
            )
        })?;

        let outputs = ResolvedOutputs {
            packages,
            dev_shells,
        };

        let targets: Vec<LockedTarget> = outputs
            .systems()
            .into_iter()
            .map(|system| {
                // Both lookups are present for every fan-out key.
                let artifact = &outputs.packages[&system][&OutputName::new(DEFAULT_OUTPUT)];
                LockedTarget {
                    system,
                    recipe_digest: recipe.digest.clone(),
                    artifact_digest: artifact.artifact_digest.to_string(),
                    tools: outputs.dev_shells[&system].tools.clone(),
                }
            })
            .collect();

        let resolution = ResolutionResult {
            channel_revision: snapshot.revision.clone(),
            targets,
        };
        let lock = LockFile::from_resolved(&normalized, &resolution);
        let identity = lock.compute_identity();

        if let Some(existing) = existing_lock {
            if existing.config_id != identity.config_id.as_str() {
                return Err(CoreError::Lock(ruin_schema::LockError::ManifestDrift(
                    format!(
                        "locked mode: lock config_id '{}' does not match resolved config_id '{}'",
                        existing.config_id, identity.config_id
                    ),
                )));
            }
        }

        lock.write_to_file(&lock_path)?;
        info!(
            "canonical config_id: {} ({})",
            identity.config_id, identity.short_id
        );

        Ok(ResolveResult {
            identity,
            lock_file: lock,
            outputs,
        })
    }
}

fn resolve_recipe_path(manifest_dir: &Path, recipe: &str) -> PathBuf {
    let path = Path::new(recipe);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        manifest_dir.join(path)
    }
}
