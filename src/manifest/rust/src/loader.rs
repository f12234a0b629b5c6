/* src/manifest/rust/src/loader.rs */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use wp_vite_host::Hooks;

use crate::DEV_MANIFEST_FILTER;
use crate::errors::ManifestError;
use crate::manifest::{DevServer, Manifest, ManifestEntry};

/// Manifest file names looked up under a manifest directory, in order.
pub const MANIFEST_FILE_NAMES: &[&str] = &["manifest.json", ".vite/manifest.json"];

const ORIGIN_ENV: &str = "WP_VITE_MANIFEST_ORIGIN";
const PORT_ENV: &str = "VITE_SERVER_PORT";
const DEFAULT_ORIGIN: &str = "https://0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Dev-server overrides read from the process environment. Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevEnv {
  pub origin: Option<String>,
  pub port: Option<String>,
}

impl DevEnv {
  pub fn from_process() -> Self {
    Self { origin: non_empty_var(ORIGIN_ENV), port: non_empty_var(PORT_ENV) }
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Filterable dev-server descriptor, before `origin` and `port` are composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
  pub base: String,
  pub origin: String,
  pub port: u16,
  #[serde(default)]
  pub plugins: Vec<String>,
  pub manifest_dir: PathBuf,
}

impl DevServerConfig {
  pub fn from_env(env: &DevEnv, manifest_dir: &Path) -> Self {
    let port = match env.port.as_deref() {
      Some(raw) => raw.parse().unwrap_or_else(|_| {
        tracing::warn!(value = raw, "{PORT_ENV} is not a port number, using {DEFAULT_PORT}");
        DEFAULT_PORT
      }),
      None => DEFAULT_PORT,
    };
    Self {
      base: "/".to_string(),
      origin: env.origin.clone().unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
      port,
      plugins: Vec::new(),
      manifest_dir: manifest_dir.to_path_buf(),
    }
  }

  pub fn into_server(self) -> DevServer {
    DevServer {
      origin: format!("{}:{}", self.origin, self.port),
      base: self.base,
      port: self.port,
      plugins: self.plugins,
    }
  }
}

/// Loads manifests and keeps them for the loader's lifetime, one per directory.
///
/// A directory without a manifest file yields a development manifest pointing
/// at the dev server; that is a mode switch, not an error.
pub struct ManifestLoader {
  env: DevEnv,
  cache: Mutex<HashMap<PathBuf, Arc<Manifest>>>,
}

impl ManifestLoader {
  pub fn new() -> Self {
    Self::with_env(DevEnv::from_process())
  }

  pub fn with_env(env: DevEnv) -> Self {
    Self { env, cache: Mutex::new(HashMap::new()) }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Manifest>>> {
    self.cache.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn load(&self, hooks: &Hooks, manifest_dir: &Path) -> Result<Arc<Manifest>, ManifestError> {
    let key = resolve_dir(manifest_dir);
    if let Some(cached) = self.lock().get(&key) {
      tracing::debug!(dir = %key.display(), "manifest cache hit");
      return Ok(Arc::clone(cached));
    }

    let manifest = match find_manifest_file(&key) {
      Some(path) => read_manifest(&key, &path)?,
      None => {
        let config = DevServerConfig::from_env(&self.env, &key);
        let config = hooks.apply_filters_as(DEV_MANIFEST_FILTER, config, &[]);
        let server = config.into_server();
        tracing::debug!(
          dir = %key.display(),
          origin = %server.origin,
          "no manifest file, using dev server"
        );
        Manifest::development(key.clone(), server)
      }
    };

    let mut cache = self.lock();
    Ok(Arc::clone(cache.entry(key).or_insert_with(|| Arc::new(manifest))))
  }

  /// Number of directories loaded so far.
  pub fn cached(&self) -> usize {
    self.lock().len()
  }
}

impl Default for ManifestLoader {
  fn default() -> Self {
    Self::new()
  }
}

fn resolve_dir(dir: &Path) -> PathBuf {
  dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}

fn find_manifest_file(dir: &Path) -> Option<PathBuf> {
  MANIFEST_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

fn read_manifest(dir: &Path, path: &Path) -> Result<Manifest, ManifestError> {
  let content = std::fs::read_to_string(path)
    .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
  let entries: HashMap<String, ManifestEntry> = serde_json::from_str(&content)
    .map_err(|source| ManifestError::Parse { path: path.to_path_buf(), source })?;
  tracing::debug!(path = %path.display(), entries = entries.len(), "manifest loaded");
  Ok(Manifest::production(dir, entries))
}
