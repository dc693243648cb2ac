//! CLI configuration.
//!
//! The config file is optional; a missing file means defaults (encryption
//! enabled, default Argon2id cost). The encryption flag is read once at
//! startup and gates whether the CLI calls the encryption core at all;
//! with the flag off, text passes through unmodified in both directions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use taskvault_core::KdfParams;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub encryption: EncryptionSection,

    #[serde(default)]
    pub kdf: KdfSection,
}

/// The encryption feature flag.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptionSection {
    pub enabled: bool,
}

impl Default for EncryptionSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Argon2id work-factor overrides. Unset fields keep the library default
/// (64 MiB, 3 iterations, 1 lane).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KdfSection {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl KdfSection {
    pub fn to_params(&self) -> KdfParams {
        let defaults = KdfParams::default();
        KdfParams::new(
            self.memory_kib.unwrap_or(defaults.memory_kib),
            self.iterations.unwrap_or(defaults.iterations),
            self.parallelism.unwrap_or(defaults.parallelism),
        )
    }
}

/// Load the configuration.
///
/// An explicitly given path must exist and parse; the default XDG path is
/// allowed to be absent.
pub fn load_config(explicit_path: Option<&str>) -> anyhow::Result<VaultConfig> {
    if let Some(path) = explicit_path {
        return read_config(Path::new(path));
    }

    let path = default_config_path()?;
    if path.exists() {
        read_config(&path)
    } else {
        Ok(VaultConfig::default())
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<VaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("taskvault"));
        }
    }
    Ok(home_dir()?.join(".config").join("taskvault"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
