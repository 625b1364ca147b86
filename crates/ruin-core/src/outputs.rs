//! Per-system output sets: package artifacts and dev shells.

use crate::recipe::Recipe;
use crate::CoreError;
use ruin_registry::PackageCatalog;
use ruin_schema::{ArtifactDigest, OutputName, ResolvedTool, SystemId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Name of the alias every package set carries, and of the one dev shell.
pub const DEFAULT_OUTPUT: &str = "default";

/// The project's built package for one system.
///
/// The build itself is delegated to the recipe file; the artifact carries
/// only identity: which project, which system, which recipe content, and
/// which channel revision the resolution ran against.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageArtifact {
    pub name: String,
    pub system: SystemId,
    pub recipe_digest: String,
    pub channel_revision: String,
    pub artifact_digest: ArtifactDigest,
}

impl PackageArtifact {
    /// Derive the artifact for one system from the opaque recipe.
    pub fn derive(name: &str, system: SystemId, recipe: &Recipe, channel_revision: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(format!("name:{name}").as_bytes());
        hasher.update(format!("system:{system}").as_bytes());
        hasher.update(format!("recipe:{}", recipe.digest).as_bytes());
        hasher.update(format!("revision:{channel_revision}").as_bytes());

        Self {
            name: name.to_owned(),
            system,
            recipe_digest: recipe.digest.clone(),
            channel_revision: channel_revision.to_owned(),
            artifact_digest: ArtifactDigest::new(hasher.finalize().to_hex().to_string()),
        }
    }
}

/// An interactive dev-shell definition for one system.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DevShell {
    pub name: OutputName,
    pub system: SystemId,
    pub strict: bool,
    /// Declared tools pinned to the versions the catalog carries, sorted by name.
    pub tools: Vec<ResolvedTool>,
}

impl DevShell {
    /// Resolve the declared tool list against one system's catalog.
    ///
    /// Strict mode: a tool the catalog does not carry aborts resolution —
    /// no implicit substitution. Non-strict mode drops the tool with a
    /// warning instead.
    pub fn resolve(
        system: SystemId,
        catalog: &PackageCatalog,
        strict: bool,
        declared_tools: &[String],
    ) -> Result<Self, CoreError> {
        let mut tools = Vec::with_capacity(declared_tools.len());
        for tool in declared_tools {
            match catalog.lookup(tool) {
                Some(entry) => tools.push(ResolvedTool {
                    name: tool.clone(),
                    version: entry.version.clone(),
                }),
                None if strict => {
                    return Err(CoreError::ToolUnsatisfied {
                        tool: tool.clone(),
                        system,
                    });
                }
                None => {
                    warn!("tool '{tool}' not in catalog for '{system}', skipping");
                }
            }
        }
        tools.sort();

        Ok(Self {
            name: OutputName::new(DEFAULT_OUTPUT),
            system,
            strict,
            tools,
        })
    }
}

/// Everything a resolve produces, keyed by system.
///
/// Every declared system appears exactly once in both mappings; none is
/// dropped, none duplicated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub packages: BTreeMap<SystemId, BTreeMap<OutputName, PackageArtifact>>,
    pub dev_shells: BTreeMap<SystemId, DevShell>,
}

impl ResolvedOutputs {
    pub fn package(&self, system: SystemId, name: &str) -> Option<&PackageArtifact> {
        self.packages.get(&system)?.get(&OutputName::new(name))
    }

    pub fn dev_shell(&self, system: SystemId) -> Option<&DevShell> {
        self.dev_shells.get(&system)
    }

    /// Systems covered by the package mapping, in key order.
    pub fn systems(&self) -> Vec<SystemId> {
        self.packages.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruin_registry::PackageEntry;
    use std::fs;

    fn catalog_with(names: &[&str]) -> PackageCatalog {
        let mut catalog = PackageCatalog::new();
        for name in names {
            catalog.insert(
                (*name).to_owned(),
                PackageEntry {
                    version: "1.82.0".to_owned(),
                    digest: "c".repeat(64),
                },
            );
        }
        catalog
    }

    fn sample_recipe(dir: &std::path::Path) -> Recipe {
        let path = dir.join("recipe.toml");
        fs::write(&path, b"[build]\n").unwrap();
        Recipe::load(&path).unwrap()
    }

    #[test]
    fn artifact_identity_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = sample_recipe(dir.path());

        let a = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "4f2a9c01");
        let b = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "4f2a9c01");
        assert_eq!(a, b);
    }

    #[test]
    fn artifact_digest_depends_on_system() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = sample_recipe(dir.path());

        let x86 = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "4f2a9c01");
        let arm = PackageArtifact::derive("ruin", SystemId::Aarch64Linux, &recipe, "4f2a9c01");
        assert_ne!(x86.artifact_digest, arm.artifact_digest);
    }

    #[test]
    fn artifact_digest_depends_on_channel_revision() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = sample_recipe(dir.path());

        let a = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "4f2a9c01");
        let b = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "deadbeef");
        assert_ne!(a.artifact_digest, b.artifact_digest);
    }

    #[test]
    fn shell_pins_declared_tools() {
        let catalog = catalog_with(&["cargo", "rustc", "clippy"]);
        let shell = DevShell::resolve(
            SystemId::X86_64Linux,
            &catalog,
            true,
            &["rustc".to_owned(), "cargo".to_owned()],
        )
        .unwrap();

        assert_eq!(shell.name.as_str(), DEFAULT_OUTPUT);
        assert!(shell.strict);
        assert_eq!(shell.tools.len(), 2);
        assert_eq!(shell.tools[0].name, "cargo");
        assert_eq!(shell.tools[0].version, "1.82.0");
        assert_eq!(shell.tools[1].name, "rustc");
    }

    #[test]
    fn strict_shell_rejects_missing_tool() {
        let catalog = catalog_with(&["cargo"]);
        let result = DevShell::resolve(
            SystemId::Aarch64Linux,
            &catalog,
            true,
            &["cargo".to_owned(), "rust-analyzer".to_owned()],
        );
        assert!(matches!(
            result,
            Err(CoreError::ToolUnsatisfied { tool, system })
                if tool == "rust-analyzer" && system == SystemId::Aarch64Linux
        ));
    }

    #[test]
    fn lenient_shell_drops_missing_tool() {
        let catalog = catalog_with(&["cargo"]);
        let shell = DevShell::resolve(
            SystemId::X86_64Linux,
            &catalog,
            false,
            &["cargo".to_owned(), "rust-analyzer".to_owned()],
        )
        .unwrap();
        assert_eq!(shell.tools.len(), 1);
        assert_eq!(shell.tools[0].name, "cargo");
    }

    #[test]
    fn outputs_lookup_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = sample_recipe(dir.path());
        let artifact = PackageArtifact::derive("ruin", SystemId::X86_64Linux, &recipe, "4f2a9c01");

        let mut named = BTreeMap::new();
        named.insert(OutputName::new("ruin"), artifact.clone());
        named.insert(OutputName::new(DEFAULT_OUTPUT), artifact);
        let mut packages = BTreeMap::new();
        packages.insert(SystemId::X86_64Linux, named);

        let shell = DevShell::resolve(
            SystemId::X86_64Linux,
            &catalog_with(&["cargo"]),
            true,
            &["cargo".to_owned()],
        )
        .unwrap();
        let mut dev_shells = BTreeMap::new();
        dev_shells.insert(SystemId::X86_64Linux, shell);

        let outputs = ResolvedOutputs {
            packages,
            dev_shells,
        };

        assert!(outputs.package(SystemId::X86_64Linux, "ruin").is_some());
        assert!(outputs.package(SystemId::X86_64Linux, DEFAULT_OUTPUT).is_some());
        assert!(outputs.package(SystemId::Aarch64Linux, "ruin").is_none());
        assert!(outputs.dev_shell(SystemId::X86_64Linux).is_some());
        assert_eq!(outputs.systems(), vec![SystemId::X86_64Linux]);
    }
}
