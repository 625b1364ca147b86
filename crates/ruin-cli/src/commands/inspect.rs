use super::{dim, json_pretty, system_label, EXIT_SUCCESS};
use ruin_schema::LockFile;
use std::path::Path;

pub fn run(lock_path: &Path, json: bool) -> Result<u8, String> {
    let lock = LockFile::read_from_file(lock_path).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&lock)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("project:  {}", lock.project_name);
    println!(
        "channel:  {}@{}",
        lock.channel_locator, lock.channel_revision
    );
    println!("config:   {} ({})", lock.config_id, lock.short_id);
    for target in &lock.targets {
        println!("target {}:", system_label(target.system));
        println!("  artifact {}", dim(&target.artifact_digest));
        for tool in &target.tools {
            println!("  tool {} {}", tool.name, dim(&tool.version));
        }
    }
    Ok(EXIT_SUCCESS)
}
