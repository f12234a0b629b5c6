/* src/manifest/rust/src/manifest.rs */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One node of the bundler's dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
  #[serde(default)]
  pub file: Option<String>,
  #[serde(default)]
  pub css: Vec<String>,
  #[serde(default)]
  pub imports: Vec<String>,
}

/// Live dev server standing in for a static build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServer {
  pub base: String,
  /// Scheme, host and port, e.g. `https://0.0.0.0:3000`.
  pub origin: String,
  pub port: u16,
  #[serde(default)]
  pub plugins: Vec<String>,
}

impl DevServer {
  pub fn has_plugin(&self, name: &str) -> bool {
    self.plugins.iter().any(|p| p == name)
  }
}

/// Parsed manifest, immutable once loaded.
///
/// The import relation is expected to be acyclic; nothing here checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
  entries: HashMap<String, ManifestEntry>,
  dev: Option<DevServer>,
  source_dir: PathBuf,
}

impl Manifest {
  pub fn production(
    source_dir: impl Into<PathBuf>,
    entries: HashMap<String, ManifestEntry>,
  ) -> Self {
    Self { entries, dev: None, source_dir: source_dir.into() }
  }

  pub fn development(source_dir: impl Into<PathBuf>, server: DevServer) -> Self {
    Self { entries: HashMap::new(), dev: Some(server), source_dir: source_dir.into() }
  }

  pub fn entry(&self, key: &str) -> Option<&ManifestEntry> {
    self.entries.get(key)
  }

  pub fn entries(&self) -> &HashMap<String, ManifestEntry> {
    &self.entries
  }

  pub fn is_dev(&self) -> bool {
    self.dev.is_some()
  }

  pub fn dev_server(&self) -> Option<&DevServer> {
    self.dev.as_ref()
  }

  pub fn source_dir(&self) -> &Path {
    &self.source_dir
  }
}
