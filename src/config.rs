use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_manifest() -> String {
    "index.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            route_prefix: default_route_prefix(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}
fn default_route_prefix() -> String {
    "/".to_string()
}

impl Config {
    /// Minimal configuration for runs that bypass the config file
    /// (`--root DIR`): the given archive root plus defaults for
    /// everything else.
    pub fn from_root(root: PathBuf) -> Self {
        Self {
            archive: ArchiveConfig {
                root,
                manifest: default_manifest(),
            },
            server: ServerConfig::default(),
        }
    }

    /// Path to the manifest file inside the archive root.
    pub fn manifest_path(&self) -> PathBuf {
        self.archive.root.join(&self.archive.manifest)
    }

    /// Route prefix normalized to lead with `/` and carry no trailing
    /// slash, so `archive` and `/archive/` both nest as `/archive`.
    pub fn route_prefix(&self) -> String {
        let trimmed = self.server.route_prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    Ok(config)
}

/// Startup validation: the archive root must be a directory containing the
/// manifest file. Violations abort the process before any index build.
pub fn validate_archive(config: &Config) -> Result<()> {
    let root = &config.archive.root;
    if !root.is_dir() {
        anyhow::bail!(
            "Archive root '{}' does not point to a directory",
            root.display()
        );
    }

    let manifest = config.manifest_path();
    if !manifest.is_file() {
        anyhow::bail!(
            "Directory '{}' does not contain a '{}' file",
            root.display(),
            config.archive.manifest
        );
    }

    Ok(())
}
