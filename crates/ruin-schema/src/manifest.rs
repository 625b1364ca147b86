use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported manifest_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("project.name must not be empty")]
    EmptyProjectName,
    #[error("project.recipe must not be empty")]
    EmptyRecipePath,
    #[error("channel.locator must not be empty")]
    EmptyLocator,
    #[error("channel.locator is not pinned: '{0}' (expected <name>@<revision>)")]
    UnpinnedLocator(String),
    #[error("targets.systems must not be empty")]
    NoTargetSystems,
    #[error("unknown system identifier: '{0}' (supported: x86_64-linux, aarch64-linux)")]
    UnknownSystem(String),
    #[error("duplicate system identifier: '{0}'")]
    DuplicateSystem(String),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ManifestV1 {
    pub manifest_version: u32,
    pub project: ProjectSection,
    pub channel: ChannelSection,
    #[serde(default)]
    pub targets: TargetsSection,
    #[serde(default)]
    pub shell: ShellSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,
    /// Path to the delegated build recipe, relative to the manifest.
    #[serde(default = "default_recipe")]
    pub recipe: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    /// Registry source locator, optionally pinned as `<name>@<revision>`.
    pub locator: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TargetsSection {
    #[serde(default)]
    pub systems: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Strict dependency resolution: every declared tool must resolve.
    #[serde(default = "default_strict")]
    pub strict: bool,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            tools: Vec::new(),
        }
    }
}

fn default_recipe() -> String {
    "recipe.toml".to_owned()
}

fn default_strict() -> bool {
    true
}

pub fn parse_manifest_str(input: &str) -> Result<ManifestV1, ManifestError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<ManifestV1, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}
