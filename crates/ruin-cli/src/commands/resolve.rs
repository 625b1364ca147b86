use super::{json_pretty, spin_fail, spin_ok, spinner, system_label, EXIT_SUCCESS};
use ruin_core::{Engine, ResolveOptions, DEFAULT_OUTPUT};
use ruin_registry::select_source;
use ruin_schema::parse_manifest_file;
use std::path::Path;

pub fn run(
    manifest: &Path,
    channel_dir: &Path,
    options: ResolveOptions,
    json: bool,
) -> Result<u8, String> {
    // Peek at the manifest for the locator so the right source gets picked.
    let parsed = parse_manifest_file(manifest).map_err(|e| e.to_string())?;
    let locator = parsed.channel.locator.trim().to_owned();
    let source = select_source(&locator, channel_dir, options.offline).map_err(|e| e.to_string())?;
    tracing::debug!(
        "using {} source for '{locator}'",
        if source.is_remote() { "remote" } else { "local" }
    );
    let engine = Engine::new(source);

    let pb = if json {
        None
    } else {
        Some(spinner("resolving outputs..."))
    };

    let result = match engine.resolve_with_options(manifest, options) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "outputs resolved");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "resolve failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        let payload = serde_json::json!({
            "config_id": result.identity.config_id,
            "short_id": result.identity.short_id,
            "channel": result.lock_file.channel_locator,
            "revision": result.lock_file.channel_revision,
            "outputs": result.outputs,
            "status": "resolved"
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "resolved '{}' against {}@{}",
            result.lock_file.project_name,
            result.lock_file.channel_locator,
            result.lock_file.channel_revision
        );
        for system in result.outputs.systems() {
            println!("  packages.{}:", system_label(system));
            if let Some(names) = result.outputs.packages.get(&system) {
                for name in names.keys() {
                    println!("    {name}");
                }
            }
            if let Some(shell) = result.outputs.dev_shell(system) {
                println!(
                    "  devShells.{}.{} ({} tools)",
                    system_label(system),
                    DEFAULT_OUTPUT,
                    shell.tools.len()
                );
            }
        }
        println!("config_id: {}", result.identity.config_id);
    }
    Ok(EXIT_SUCCESS)
}
