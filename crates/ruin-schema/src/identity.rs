use crate::normalize::NormalizedManifest;
use crate::types::{ConfigId, ShortId};
use serde::Serialize;

/// Deterministic identity for a configuration, derived from manifest content.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigIdentity {
    pub config_id: ConfigId,
    pub short_id: ShortId,
}

/// Compute a **preliminary** configuration identity from unresolved manifest data.
///
/// This is NOT the canonical identity. The canonical identity is computed by
/// [`LockFile::compute_identity()`](crate::lock::LockFile::compute_identity)
/// after resolution, which uses the recipe content digest, the resolved
/// channel revision, and pinned tool versions — not just declared names.
///
/// This function is used for the `new` command (before any resolution has
/// occurred) and for identity display in `inspect` when no lock exists.
pub fn compute_config_id(normalized: &NormalizedManifest) -> ConfigIdentity {
    let mut hasher = blake3::Hasher::new();

    hasher.update(format!("project:{}", normalized.project_name).as_bytes());
    hasher.update(format!("recipe:{}", normalized.recipe_path).as_bytes());
    hasher.update(format!("channel:{}", normalized.channel_locator).as_bytes());

    for system in &normalized.systems {
        hasher.update(format!("system:{system}").as_bytes());
    }

    if normalized.shell_strict {
        hasher.update(b"shell:strict");
    }
    for tool in &normalized.shell_tools {
        hasher.update(format!("tool:{tool}").as_bytes());
    }

    let hex = hasher.finalize().to_hex().to_string();
    let short = hex[..12].to_owned();

    ConfigIdentity {
        config_id: ConfigId::new(hex),
        short_id: ShortId::new(short),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest_str;

    fn normalized(input: &str) -> NormalizedManifest {
        parse_manifest_str(input).unwrap().normalize().unwrap()
    }

    #[test]
    fn stable_id_for_equivalent_manifests() {
        let a = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux", "aarch64-linux"]
[shell]
tools = ["rustc", "cargo"]
"#,
        );
        let b = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["aarch64-linux", "x86_64-linux"]
[shell]
tools = ["cargo", "rustc"]
"#,
        );
        assert_eq!(compute_config_id(&a), compute_config_id(&b));
    }

    #[test]
    fn different_inputs_produce_different_ids() {
        let a = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux"]
"#,
        );
        let b = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux", "aarch64-linux"]
"#,
        );
        assert_ne!(compute_config_id(&a), compute_config_id(&b));
    }

    #[test]
    fn locator_change_changes_id() {
        let a = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux"]
"#,
        );
        let b = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "unstable"
[targets]
systems = ["x86_64-linux"]
"#,
        );
        assert_ne!(compute_config_id(&a), compute_config_id(&b));
    }

    #[test]
    fn strict_flag_changes_id() {
        let a = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux"]
[shell]
strict = true
tools = ["cargo"]
"#,
        );
        let b = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux"]
[shell]
strict = false
tools = ["cargo"]
"#,
        );
        assert_ne!(compute_config_id(&a), compute_config_id(&b));
    }

    #[test]
    fn short_id_is_12_chars() {
        let n = normalized(
            r#"
manifest_version = 1
[project]
name = "ruin"
[channel]
locator = "stable-24.11"
[targets]
systems = ["x86_64-linux"]
"#,
        );
        let id = compute_config_id(&n);
        assert_eq!(id.short_id.as_str().len(), 12);
        assert!(id.config_id.as_str().starts_with(id.short_id.as_str()));
    }
}
