use crate::manifest::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported target platform: CPU architecture plus OS family.
///
/// The set is closed. Requesting anything outside it is a parse error,
/// never a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SystemId {
    #[serde(rename = "x86_64-linux")]
    X86_64Linux,
    #[serde(rename = "aarch64-linux")]
    Aarch64Linux,
}

/// Every system identifier Ruin can produce outputs for.
pub const SUPPORTED_SYSTEMS: &[SystemId] = &[SystemId::X86_64Linux, SystemId::Aarch64Linux];

impl SystemId {
    /// The canonical string form, as written in manifests and lock files.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemId::X86_64Linux => "x86_64-linux",
            SystemId::Aarch64Linux => "aarch64-linux",
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemId {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64-linux" => Ok(SystemId::X86_64Linux),
            "aarch64-linux" => Ok(SystemId::Aarch64Linux),
            other => Err(ManifestError::UnknownSystem(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for &system in SUPPORTED_SYSTEMS {
            let parsed: SystemId = system.as_str().parse().unwrap();
            assert_eq!(parsed, system);
        }
    }

    #[test]
    fn unknown_system_is_rejected() {
        let result = "riscv64-linux".parse::<SystemId>();
        assert!(matches!(result, Err(ManifestError::UnknownSystem(s)) if s == "riscv64-linux"));
    }

    #[test]
    fn display_matches_manifest_form() {
        assert_eq!(SystemId::X86_64Linux.to_string(), "x86_64-linux");
        assert_eq!(SystemId::Aarch64Linux.to_string(), "aarch64-linux");
    }

    #[test]
    fn serde_uses_canonical_strings() {
        let json = serde_json::to_string(&SystemId::Aarch64Linux).unwrap();
        assert_eq!(json, "\"aarch64-linux\"");
        let back: SystemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SystemId::Aarch64Linux);
    }

    #[test]
    fn supported_list_has_exactly_two_entries() {
        assert_eq!(SUPPORTED_SYSTEMS.len(), 2);
        assert!(SUPPORTED_SYSTEMS.contains(&SystemId::X86_64Linux));
        assert!(SUPPORTED_SYSTEMS.contains(&SystemId::Aarch64Linux));
    }

    #[test]
    fn ordering_is_stable_for_map_keys() {
        let mut systems = vec![SystemId::Aarch64Linux, SystemId::X86_64Linux];
        systems.sort();
        assert_eq!(systems, vec![SystemId::X86_64Linux, SystemId::Aarch64Linux]);
    }
}
