use super::{json_pretty, EXIT_SUCCESS};
use dialoguer::{Confirm, Input, Select};
use ruin_schema::compute_config_id;
use ruin_schema::manifest::{parse_manifest_str, ManifestV1};
use ruin_schema::preset::{get_preset, list_presets};
use std::io::{stderr, stdin, IsTerminal};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DEST_MANIFEST: &str = "ruin.toml";

fn load_preset(name: &str) -> Result<ManifestV1, String> {
    let preset = get_preset(name).ok_or_else(|| {
        let known = list_presets()
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown preset '{name}' (expected: {known})")
    })?;
    parse_manifest_str(preset.manifest).map_err(|e| format!("preset parse error: {e}"))
}

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

fn ensure_can_write(dest: &Path, force: bool, is_tty: bool) -> Result<(), String> {
    if !dest.exists() || force {
        return Ok(());
    }
    if !is_tty {
        return Err(format!(
            "refusing to overwrite existing ./{DEST_MANIFEST} (pass --force)"
        ));
    }
    let overwrite = Confirm::new()
        .with_prompt(format!("overwrite ./{DEST_MANIFEST}?"))
        .default(false)
        .interact()
        .map_err(|e| format!("prompt failed: {e}"))?;
    if overwrite {
        Ok(())
    } else {
        Err(format!(
            "refusing to overwrite existing ./{DEST_MANIFEST} (pass --force)"
        ))
    }
}

fn print_result(
    name: &str,
    preset: Option<&str>,
    short_id: &str,
    json: bool,
) -> Result<(), String> {
    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": format!("./{DEST_MANIFEST}"),
            "name": name,
            "preset": preset,
            "short_id": short_id,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote ./{DEST_MANIFEST} for '{name}'");
        if let Some(p) = preset {
            println!("preset: {p}");
        }
        println!("preliminary config: {short_id} (canonical id comes from 'ruin resolve')");
    }
    Ok(())
}

pub fn run(name: &str, preset: Option<&str>, force: bool, json: bool) -> Result<u8, String> {
    let dest = Path::new(DEST_MANIFEST);
    let is_tty = stdin().is_terminal() && stderr().is_terminal();
    ensure_can_write(dest, force, is_tty)?;

    let chosen_preset = match preset {
        Some(p) => p.to_owned(),
        None => {
            if !is_tty {
                return Err("no --preset provided and stdin is not a TTY".to_owned());
            }
            let presets = list_presets();
            let items: Vec<String> = presets
                .iter()
                .map(|p| format!("{} ({})", p.name, p.description))
                .collect();
            let idx = Select::new()
                .with_prompt("preset")
                .items(&items)
                .default(0)
                .interact()
                .map_err(|e| format!("prompt failed: {e}"))?;
            presets[idx].name.to_owned()
        }
    };

    let mut manifest = load_preset(&chosen_preset)?;
    manifest.project.name = name.to_owned();

    if is_tty {
        let locator: String = Input::new()
            .with_prompt("channel locator")
            .default(manifest.channel.locator.clone())
            .interact_text()
            .map_err(|e| format!("prompt failed: {e}"))?;
        manifest.channel.locator = locator;

        let strict = Confirm::new()
            .with_prompt("strict dev-shell dependency resolution?")
            .default(manifest.shell.strict)
            .interact()
            .map_err(|e| format!("prompt failed: {e}"))?;
        manifest.shell.strict = strict;
    }

    let normalized = manifest
        .normalize()
        .map_err(|e| format!("manifest error: {e}"))?;
    let identity = compute_config_id(&normalized);

    let toml =
        toml::to_string_pretty(&manifest).map_err(|e| format!("TOML serialization failed: {e}"))?;
    write_atomic(dest, &toml)?;
    print_result(name, Some(&chosen_preset), identity.short_id.as_str(), json)?;
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_load() {
        for preset in list_presets() {
            let m = load_preset(preset.name).unwrap();
            assert_eq!(m.manifest_version, 1);
            assert!(!m.project.name.is_empty());
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = load_preset("nonexistent").unwrap_err();
        assert!(err.contains("unknown preset"));
    }
}
