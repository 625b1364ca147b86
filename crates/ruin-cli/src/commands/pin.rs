use super::{json_pretty, EXIT_SUCCESS};
use ruin_registry::{parse_locator, select_source};
use ruin_schema::manifest::{parse_manifest_file, ManifestV1};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = dest
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("persist manifest: {}", e.error))?;
    Ok(())
}

pub fn run(
    manifest_path: &Path,
    channel_dir: &Path,
    check: bool,
    json: bool,
) -> Result<u8, String> {
    let manifest =
        parse_manifest_file(manifest_path).map_err(|e| format!("failed to parse manifest: {e}"))?;
    let locator = manifest.channel.locator.trim().to_owned();

    if check {
        if parse_locator(&locator).1.is_some() {
            if json {
                let payload = serde_json::json!({
                    "status": "pinned",
                    "manifest": manifest_path,
                    "locator": locator,
                });
                println!("{}", json_pretty(&payload)?);
            }
            return Ok(EXIT_SUCCESS);
        }
        return Err(format!(
            "channel.locator is not pinned: '{locator}' (run 'ruin pin')"
        ));
    }

    let (channel, _) = parse_locator(&locator);
    let source = select_source(&locator, channel_dir, false).map_err(|e| e.to_string())?;
    let snapshot = source
        .fetch(channel)
        .map_err(|e| format!("failed to fetch channel snapshot: {e}"))?;
    let pinned = format!("{channel}@{}", snapshot.revision);

    let mut updated: ManifestV1 = manifest;
    updated.channel.locator = pinned.clone();

    let toml =
        toml::to_string_pretty(&updated).map_err(|e| format!("TOML serialization failed: {e}"))?;
    write_atomic(manifest_path, &toml)?;

    if json {
        let payload = serde_json::json!({
            "status": "pinned",
            "manifest": manifest_path,
            "locator": pinned,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("pinned channel to '{pinned}' in {}", manifest_path.display());
    }

    Ok(EXIT_SUCCESS)
}
