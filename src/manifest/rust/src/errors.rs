/* src/manifest/rust/src/errors.rs */

use std::path::PathBuf;

use thiserror::Error;
use wp_vite_host::Host;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
  #[error("[Vite] Entry {entry} not found.")]
  MissingEntry { entry: String },
}

/// Debug mode surfaces the fault; otherwise it is logged and the caller gets nothing.
pub(crate) fn degrade<T>(host: &Host, err: ManifestError) -> Result<Option<T>, ManifestError> {
  if host.is_debug() {
    return Err(err);
  }
  tracing::warn!(error = %err, "asset pipeline degraded");
  Ok(None)
}
