use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub manifest: &'static str,
}

pub const BUILTIN_PRESETS: &[Preset] = &[
    Preset {
        name: "default",
        description: "Both supported systems with the full Rust dev-shell toolchain",
        manifest: r#"manifest_version = 1

[project]
name = "ruin"
recipe = "recipe.toml"

[channel]
locator = "stable-24.11"

[targets]
systems = ["x86_64-linux", "aarch64-linux"]

[shell]
strict = true
tools = ["cargo", "rustc", "rust-analyzer", "rustfmt", "clippy"]
"#,
    },
    Preset {
        name: "minimal",
        description: "Single system, no dev shell",
        manifest: r#"manifest_version = 1

[project]
name = "ruin"

[channel]
locator = "stable-24.11"

[targets]
systems = ["x86_64-linux"]
"#,
    },
    Preset {
        name: "pinned",
        description: "Both systems with the channel pinned to an explicit revision",
        manifest: r#"manifest_version = 1

[project]
name = "ruin"
recipe = "recipe.toml"

[channel]
locator = "stable-24.11@4f2a9c01"

[targets]
systems = ["x86_64-linux", "aarch64-linux"]

[shell]
strict = true
tools = ["cargo", "rustc", "rust-analyzer", "rustfmt", "clippy"]
"#,
    },
];

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

pub fn list_presets() -> &'static [Preset] {
    BUILTIN_PRESETS
}
