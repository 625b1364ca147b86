//! Per-system fan-out over a channel snapshot.

use crate::CoreError;
use ruin_registry::{ChannelSnapshot, PackageCatalog};
use ruin_schema::SystemId;
use std::collections::BTreeMap;

/// Apply `produce` once per declared system and collect the results into a
/// mapping keyed by system.
///
/// Each system's catalog is looked up in the snapshot before `produce` runs;
/// a system the snapshot does not carry aborts the whole call. Any failure
/// from `produce` also aborts the whole call: partial multi-target output
/// sets are never returned. An empty system list yields an empty map. A
/// system appearing twice in the input is an error, never a silent collapse.
///
/// The fan-out itself has no side effects beyond what `produce` performs.
pub fn per_system<T, F>(
    systems: &[SystemId],
    snapshot: &ChannelSnapshot,
    mut produce: F,
) -> Result<BTreeMap<SystemId, T>, CoreError>
where
    F: FnMut(SystemId, &PackageCatalog) -> Result<T, CoreError>,
{
    let mut out = BTreeMap::new();
    for &system in systems {
        let catalog = snapshot.catalog_for(system)?;
        let value = produce(system, catalog)?;
        if out.insert(system, value).is_some() {
            return Err(CoreError::DuplicateSystem(system));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruin_registry::{PackageEntry, RegistryError};

    fn snapshot_with(systems: &[SystemId]) -> ChannelSnapshot {
        let mut catalogs = BTreeMap::new();
        for &system in systems {
            let mut catalog = PackageCatalog::new();
            catalog.insert(
                "cargo",
                PackageEntry {
                    version: "1.82.0".to_owned(),
                    digest: "a".repeat(64),
                },
            );
            catalogs.insert(system, catalog);
        }
        ChannelSnapshot {
            channel: "stable-24.11".to_owned(),
            revision: "4f2a9c01".to_owned(),
            published_at: "2026-01-15T00:00:00Z".parse().unwrap(),
            systems: catalogs,
        }
    }

    #[test]
    fn yields_one_entry_per_system() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux, SystemId::Aarch64Linux]);
        let result = per_system(
            &[SystemId::X86_64Linux, SystemId::Aarch64Linux],
            &snapshot,
            |_, _| Ok(42_u32),
        )
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[&SystemId::X86_64Linux], 42);
        assert_eq!(result[&SystemId::Aarch64Linux], 42);
    }

    #[test]
    fn single_system_yields_single_entry() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux]);
        let result =
            per_system(&[SystemId::X86_64Linux], &snapshot, |system, _| {
                Ok(system.to_string())
            })
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[&SystemId::X86_64Linux], "x86_64-linux");
    }

    #[test]
    fn empty_system_list_yields_empty_map() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux]);
        let result = per_system(&[], &snapshot, |_, _| Ok(0_u8)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn missing_catalog_fails_the_whole_call() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux]);
        let mut calls = 0;
        let result = per_system(
            &[SystemId::X86_64Linux, SystemId::Aarch64Linux],
            &snapshot,
            |_, _| {
                calls += 1;
                Ok(())
            },
        );

        assert!(matches!(
            result,
            Err(CoreError::Registry(RegistryError::MissingSystem { system, .. }))
                if system == SystemId::Aarch64Linux
        ));
        assert_eq!(calls, 1, "fan-out must stop at the first failing system");
    }

    #[test]
    fn producer_failure_fails_the_whole_call() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux, SystemId::Aarch64Linux]);
        let result = per_system(
            &[SystemId::X86_64Linux, SystemId::Aarch64Linux],
            &snapshot,
            |system, _| {
                if system == SystemId::X86_64Linux {
                    Err(CoreError::ToolUnsatisfied {
                        tool: "clippy".to_owned(),
                        system,
                    })
                } else {
                    Ok(())
                }
            },
        );
        assert!(matches!(result, Err(CoreError::ToolUnsatisfied { .. })));
    }

    #[test]
    fn duplicate_system_is_an_error() {
        let snapshot = snapshot_with(&[SystemId::X86_64Linux]);
        let result = per_system(
            &[SystemId::X86_64Linux, SystemId::X86_64Linux],
            &snapshot,
            |_, _| Ok(()),
        );
        assert!(matches!(
            result,
            Err(CoreError::DuplicateSystem(SystemId::X86_64Linux))
        ));
    }

    #[test]
    fn producer_sees_the_right_catalog() {
        let mut snapshot = snapshot_with(&[SystemId::X86_64Linux, SystemId::Aarch64Linux]);
        snapshot
            .systems
            .get_mut(&SystemId::Aarch64Linux)
            .unwrap()
            .insert(
                "rustc",
                PackageEntry {
                    version: "1.82.0".to_owned(),
                    digest: "b".repeat(64),
                },
            );

        let sizes = per_system(
            &[SystemId::X86_64Linux, SystemId::Aarch64Linux],
            &snapshot,
            |_, catalog| Ok(catalog.len()),
        )
        .unwrap();

        assert_eq!(sizes[&SystemId::X86_64Linux], 1);
        assert_eq!(sizes[&SystemId::Aarch64Linux], 2);
    }
}
