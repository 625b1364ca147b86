use crate::catalog::{parse_locator, ChannelSnapshot};
use crate::http::HttpSource;
use crate::RegistryError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A place channel snapshots can be fetched from.
pub trait SnapshotSource {
    /// Fetch the snapshot a locator names, verifying any pinned revision.
    fn fetch(&self, locator: &str) -> Result<ChannelSnapshot, RegistryError>;

    /// Whether fetching touches the network.
    fn is_remote(&self) -> bool {
        false
    }
}

/// Reads channel snapshots from `<dir>/<channel>.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn snapshot_path(&self, channel: &str) -> PathBuf {
        self.dir.join(format!("{channel}.json"))
    }
}

impl SnapshotSource for DirSource {
    fn fetch(&self, locator: &str) -> Result<ChannelSnapshot, RegistryError> {
        let (channel, pinned) = parse_locator(locator);
        let path = self.snapshot_path(channel);
        debug!("reading channel snapshot from {}", path.display());

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RegistryError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(RegistryError::Io(e)),
        };

        let snapshot = ChannelSnapshot::from_bytes(&data)?;
        snapshot.verify_pin(pinned)?;
        Ok(snapshot)
    }
}

/// Pick a snapshot source for a locator: HTTP for `http(s)://` locators,
/// the local channel directory otherwise. `offline` forbids remote sources.
pub fn select_source(
    locator: &str,
    channel_dir: &Path,
    offline: bool,
) -> Result<Box<dyn SnapshotSource>, RegistryError> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        if offline {
            return Err(RegistryError::Offline(locator.to_owned()));
        }
        return Ok(Box::new(HttpSource::new()));
    }
    Ok(Box::new(DirSource::new(channel_dir)))
}
