/* src/assets/rust/src/errors.rs */

use thiserror::Error;
use wp_vite_manifest::ManifestError;

#[derive(Debug, Error)]
pub enum AssetsError {
  #[error("Invalid asset name: {0}")]
  UnknownAsset(String),
  #[error(transparent)]
  Manifest(#[from] ManifestError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_asset_names_the_container() {
    assert_eq!(AssetsError::UnknownAsset("admin".into()).to_string(), "Invalid asset name: admin");
  }

  #[test]
  fn manifest_errors_pass_through() {
    let err: AssetsError = ManifestError::MissingEntry { entry: "main.js".into() }.into();
    assert_eq!(err.to_string(), "[Vite] Entry main.js not found.");
  }
}
