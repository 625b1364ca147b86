mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR, EXIT_REGISTRY_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "ruin",
    version,
    about = "Declarative multi-target package and dev-shell resolver"
)]
struct Cli {
    /// Directory holding channel snapshot files (`<channel>.json`).
    #[arg(long, default_value = "channels")]
    channel_dir: PathBuf,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a starter manifest from a built-in preset.
    New {
        /// Project name recorded in the manifest.
        name: String,
        /// Preset to start from (default, minimal, pinned).
        #[arg(long)]
        preset: Option<String>,
        /// Overwrite an existing ruin.toml without asking.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Resolve a manifest into per-system outputs and write ruin.lock.
    Resolve {
        /// Path to manifest TOML file.
        #[arg(default_value = "ruin.toml")]
        manifest: PathBuf,
        /// Require an existing lock file and fail if resolved state would drift.
        #[arg(long, default_value_t = false)]
        locked: bool,
        /// Forbid remote channel sources.
        #[arg(long, default_value_t = false)]
        offline: bool,
        /// Require channel.locator to carry an explicit @revision pin.
        #[arg(long, default_value_t = false)]
        require_pinned_channel: bool,
    },
    /// Show the resolved outputs recorded in a lock file.
    Inspect {
        /// Path to the lock file.
        #[arg(default_value = "ruin.lock")]
        lock: PathBuf,
    },
    /// Rewrite the manifest's channel locator to pin the current revision.
    Pin {
        /// Path to manifest TOML file.
        #[arg(default_value = "ruin.toml")]
        manifest: PathBuf,
        /// Exit non-zero if the manifest is not already pinned.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// Verify lock file integrity.
    Verify {
        /// Path to the lock file.
        #[arg(default_value = "ruin.lock")]
        lock: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUIN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::New {
            name,
            preset,
            force,
        } => commands::new::run(&name, preset.as_deref(), force, json_output),
        Commands::Resolve {
            manifest,
            locked,
            offline,
            require_pinned_channel,
        } => commands::resolve::run(
            &manifest,
            &cli.channel_dir,
            ruin_core::ResolveOptions {
                locked,
                offline,
                require_pinned_channel,
            },
            json_output,
        ),
        Commands::Inspect { lock } => commands::inspect::run(&lock, json_output),
        Commands::Pin { manifest, check } => {
            commands::pin::run(&manifest, &cli.channel_dir, check, json_output)
        }
        Commands::Verify { lock } => commands::verify::run(&lock, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:")
                || msg.starts_with("failed to parse manifest")
                || msg.starts_with("failed to read manifest")
            {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("registry error:") || msg.starts_with("channel not found") {
                EXIT_REGISTRY_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
