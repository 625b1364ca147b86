use crate::manifest::{ManifestError, ManifestV1};
use crate::system::SystemId;
use serde::{Deserialize, Serialize};

/// Canonical, sorted, deduplicated representation of a parsed manifest.
///
/// All optional fields are resolved to defaults, the tool list is sorted,
/// and system identifiers are parsed into [`SystemId`]. This is the input
/// to identity hashing and lock file generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedManifest {
    pub manifest_version: u32,
    pub project_name: String,
    pub recipe_path: String,
    pub channel_locator: String,
    pub systems: Vec<SystemId>,
    pub shell_strict: bool,
    pub shell_tools: Vec<String>,
}

impl ManifestV1 {
    /// Normalize the manifest: validate fields, parse systems, sort tools.
    ///
    /// A duplicated system identifier is an error rather than a silent
    /// collapse: every declared target must map to exactly one output slot.
    pub fn normalize(&self) -> Result<NormalizedManifest, ManifestError> {
        if self.manifest_version != 1 {
            return Err(ManifestError::UnsupportedVersion(self.manifest_version));
        }

        let project_name = self.project.name.trim().to_owned();
        if project_name.is_empty() {
            return Err(ManifestError::EmptyProjectName);
        }

        let recipe_path = self.project.recipe.trim().to_owned();
        if recipe_path.is_empty() {
            return Err(ManifestError::EmptyRecipePath);
        }

        let channel_locator = self.channel.locator.trim().to_owned();
        if channel_locator.is_empty() {
            return Err(ManifestError::EmptyLocator);
        }

        if self.targets.systems.is_empty() {
            return Err(ManifestError::NoTargetSystems);
        }
        let mut systems = Vec::with_capacity(self.targets.systems.len());
        for raw in &self.targets.systems {
            let system: SystemId = raw.trim().parse()?;
            if systems.contains(&system) {
                return Err(ManifestError::DuplicateSystem(system.to_string()));
            }
            systems.push(system);
        }
        systems.sort();

        Ok(NormalizedManifest {
            manifest_version: self.manifest_version,
            project_name,
            recipe_path,
            channel_locator,
            systems,
            shell_strict: self.shell.strict,
            shell_tools: normalize_string_list(&self.shell.tools),
        })
    }
}

fn normalize_string_list(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
