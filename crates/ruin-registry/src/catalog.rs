use crate::RegistryError;
use chrono::{DateTime, Utc};
use ruin_schema::SystemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One package as published in a channel catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageEntry {
    pub version: String,
    /// Content digest of the published package, as recorded by the channel.
    pub digest: String,
}

/// All packages available for one system identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageCatalog {
    pub packages: BTreeMap<String, PackageEntry>,
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a package by name. `None` means the channel does not carry it.
    pub fn lookup(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: PackageEntry) {
        self.packages.insert(name.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// A published channel snapshot: one catalog per system, under one revision.
///
/// The snapshot is the "package registry" collaborator of resolution. The
/// set of systems a snapshot carries is the channel publisher's choice; a
/// manifest may declare a system the snapshot lacks, which is a resolution
/// error, not a fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub channel: String,
    pub revision: String,
    pub published_at: DateTime<Utc>,
    pub systems: BTreeMap<SystemId, PackageCatalog>,
}

impl ChannelSnapshot {
    pub fn from_bytes(data: &[u8]) -> Result<Self, RegistryError> {
        serde_json::from_slice(data)
            .map_err(|e| RegistryError::Serialization(format!("invalid snapshot: {e}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RegistryError> {
        serde_json::to_vec_pretty(self).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    /// The catalog for one system, or [`RegistryError::MissingSystem`].
    pub fn catalog_for(&self, system: SystemId) -> Result<&PackageCatalog, RegistryError> {
        self.systems
            .get(&system)
            .ok_or_else(|| RegistryError::MissingSystem {
                channel: self.channel.clone(),
                system,
            })
    }

    /// Verify an optional locator pin against this snapshot's revision.
    pub fn verify_pin(&self, pinned: Option<&str>) -> Result<(), RegistryError> {
        match pinned {
            Some(rev) if rev != self.revision => Err(RegistryError::RevisionMismatch {
                pinned: rev.to_owned(),
                actual: self.revision.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Parse a locator like `stable-24.11@4f2a9c01` into (channel, revision).
/// Without an `@` the whole string is the channel and the revision floats.
pub fn parse_locator(locator: &str) -> (&str, Option<&str>) {
    match locator.rsplit_once('@') {
        Some((channel, revision)) => (channel, Some(revision)),
        None => (locator, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> ChannelSnapshot {
        let mut x86 = PackageCatalog::new();
        x86.insert(
            "cargo",
            PackageEntry {
                version: "1.82.0".to_owned(),
                digest: "a".repeat(64),
            },
        );
        x86.insert(
            "rustc",
            PackageEntry {
                version: "1.82.0".to_owned(),
                digest: "b".repeat(64),
            },
        );

        let mut systems = BTreeMap::new();
        systems.insert(SystemId::X86_64Linux, x86);

        ChannelSnapshot {
            channel: "stable-24.11".to_owned(),
            revision: "4f2a9c01".to_owned(),
            published_at: "2026-01-15T00:00:00Z".parse().unwrap(),
            systems,
        }
    }

    #[test]
    fn snapshot_roundtrip() {
        let snapshot = sample_snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        let loaded = ChannelSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn invalid_snapshot_is_rejected() {
        let result = ChannelSnapshot::from_bytes(b"not json");
        assert!(matches!(result, Err(RegistryError::Serialization(_))));
    }

    #[test]
    fn catalog_lookup() {
        let snapshot = sample_snapshot();
        let catalog = snapshot.catalog_for(SystemId::X86_64Linux).unwrap();
        assert_eq!(catalog.lookup("cargo").unwrap().version, "1.82.0");
        assert!(catalog.lookup("zig").is_none());
    }

    #[test]
    fn missing_system_is_an_error_not_a_fallback() {
        let snapshot = sample_snapshot();
        let result = snapshot.catalog_for(SystemId::Aarch64Linux);
        assert!(matches!(
            result,
            Err(RegistryError::MissingSystem { system, .. }) if system == SystemId::Aarch64Linux
        ));
    }

    #[test]
    fn parse_locator_with_revision() {
        assert_eq!(
            parse_locator("stable-24.11@4f2a9c01"),
            ("stable-24.11", Some("4f2a9c01"))
        );
    }

    #[test]
    fn parse_locator_without_revision() {
        assert_eq!(parse_locator("stable-24.11"), ("stable-24.11", None));
    }

    #[test]
    fn verify_pin_accepts_matching_revision() {
        let snapshot = sample_snapshot();
        assert!(snapshot.verify_pin(None).is_ok());
        assert!(snapshot.verify_pin(Some("4f2a9c01")).is_ok());
    }

    #[test]
    fn verify_pin_rejects_stale_revision() {
        let snapshot = sample_snapshot();
        let result = snapshot.verify_pin(Some("00000000"));
        assert!(matches!(
            result,
            Err(RegistryError::RevisionMismatch { pinned, actual })
                if pinned == "00000000" && actual == "4f2a9c01"
        ));
    }

    #[test]
    fn system_keys_serialize_as_canonical_strings() {
        let snapshot = sample_snapshot();
        let json = String::from_utf8(snapshot.to_bytes().unwrap()).unwrap();
        assert!(json.contains("\"x86_64-linux\""));
    }
}
