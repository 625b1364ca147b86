use super::{json_pretty, EXIT_SUCCESS};
use ruin_schema::LockFile;
use std::path::Path;

pub fn run(lock_path: &Path, json: bool) -> Result<u8, String> {
    let lock = LockFile::read_from_file(lock_path).map_err(|e| e.to_string())?;
    let identity = lock.verify_integrity().map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "config_id": identity.config_id,
            "short_id": identity.short_id,
            "targets": lock.targets.len(),
            "status": "verified"
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "✓ lock verified: {} ({} targets)",
            identity.short_id,
            lock.targets.len()
        );
    }
    Ok(EXIT_SUCCESS)
}
