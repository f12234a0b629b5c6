/* src/assets/rust/src/config.rs */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Declarative description of the asset containers an application registers.
///
/// ```toml
/// manifest_dir = "dist"
/// base_url = "https://example.com/wp-content/themes/site/dist"
///
/// [[assets]]
/// name = "main"
/// src = "src/main.ts"
/// enqueue = true
/// frontend_only = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
  pub manifest_dir: PathBuf,
  #[serde(default)]
  pub base_url: String,
  #[serde(default)]
  pub assets: Vec<AssetEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetEntry {
  /// Container name.
  pub name: String,
  /// Manifest entry key.
  pub src: String,
  /// Base script/style handle; defaults to `name`.
  #[serde(default)]
  pub handle: Option<String>,
  #[serde(default)]
  pub dependencies: Vec<String>,
  /// Enqueue as soon as the container is registered.
  #[serde(default)]
  pub enqueue: bool,
  #[serde(default)]
  pub admin_only: bool,
  #[serde(default)]
  pub frontend_only: bool,
}

impl AssetEntry {
  pub fn handle(&self) -> &str {
    self.handle.as_deref().unwrap_or(&self.name)
  }

  /// Whether this entry is enqueued eagerly in the given request phase.
  pub fn enqueues_for(&self, is_admin: bool) -> bool {
    self.enqueue && !(self.frontend_only && is_admin) && !(self.admin_only && !is_admin)
  }
}

impl AssetsConfig {
  pub fn validate(&self) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &self.assets {
      if entry.name.is_empty() {
        bail!("assets: entry for \"{}\" has an empty name", entry.src);
      }
      if !seen.insert(entry.name.as_str()) {
        bail!("assets: duplicate name \"{}\"", entry.name);
      }
      if entry.admin_only && entry.frontend_only {
        bail!("assets.{}: admin_only and frontend_only are mutually exclusive", entry.name);
      }
    }
    Ok(())
  }
}

/// Read and validate an assets config. A relative `manifest_dir` is taken
/// relative to the config file's directory.
pub fn load_assets_config(path: &Path) -> Result<AssetsConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let mut config: AssetsConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  if config.manifest_dir.is_relative()
    && let Some(parent) = path.parent()
  {
    config.manifest_dir = parent.join(&config.manifest_dir);
  }
  config.validate().with_context(|| format!("invalid config {}", path.display()))?;
  Ok(config)
}
