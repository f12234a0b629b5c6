/* src/manifest/rust/src/registrar.rs */

use std::path::Path;
use std::sync::Arc;

use wp_vite_host::Host;

use crate::OPTIONS_FILTER;
use crate::asset_set::ResolvedAssetSet;
use crate::errors::{ManifestError, degrade};
use crate::loader::ManifestLoader;
use crate::manifest::Manifest;
use crate::options::ResolutionOptions;
use crate::resolve::{ProductionResolver, asset_url, resolve_development};
use crate::styles::collect_styles;

/// Single entry point for turning a manifest entry into registered handles.
///
/// Outside debug mode every fault degrades to `Ok(None)` so a page still renders
/// without its assets.
pub struct AssetRegistrar {
  loader: ManifestLoader,
}

impl AssetRegistrar {
  pub fn new() -> Self {
    Self::with_loader(ManifestLoader::new())
  }

  pub fn with_loader(loader: ManifestLoader) -> Self {
    Self { loader }
  }

  pub fn loader(&self) -> &ManifestLoader {
    &self.loader
  }

  fn manifest(
    &self,
    host: &Host,
    manifest_dir: &Path,
  ) -> Result<Option<Arc<Manifest>>, ManifestError> {
    match self.loader.load(&host.hooks, manifest_dir) {
      Ok(manifest) => Ok(Some(manifest)),
      Err(e) => degrade(host, e),
    }
  }

  pub fn register_asset(
    &self,
    host: &Host,
    manifest_dir: &Path,
    entry: &str,
    options: ResolutionOptions,
  ) -> Result<Option<ResolvedAssetSet>, ManifestError> {
    let Some(manifest) = self.manifest(host, manifest_dir)? else {
      return Ok(None);
    };
    let options = host.hooks.apply_filters_as(OPTIONS_FILTER, options, &[]);

    match manifest.dev_server() {
      Some(server) => Ok(resolve_development(host, server, entry, &options)),
      None => ProductionResolver::new(host, &manifest).resolve(entry, &options),
    }
  }

  /// Register `entry` and enqueue everything it resolved to.
  /// Returns `false` when nothing was registered.
  pub fn enqueue_asset(
    &self,
    host: &Host,
    manifest_dir: &Path,
    entry: &str,
    options: ResolutionOptions,
  ) -> Result<bool, ManifestError> {
    let Some(assets) = self.register_asset(host, manifest_dir, entry, options)? else {
      return Ok(false);
    };
    for handle in &assets.scripts {
      host.registry.enqueue_script(handle);
    }
    for handle in &assets.styles {
      host.registry.enqueue_style(handle);
    }
    Ok(true)
  }

  /// Stylesheet URLs `entry` needs, for consumers that only want CSS.
  /// Empty in dev mode, where the dev server injects styles itself.
  pub fn entry_style_urls(
    &self,
    host: &Host,
    manifest_dir: &Path,
    entry: &str,
    base_url: &str,
  ) -> Result<Vec<String>, ManifestError> {
    let Some(manifest) = self.manifest(host, manifest_dir)? else {
      return Ok(Vec::new());
    };
    if manifest.is_dev() {
      return Ok(Vec::new());
    }
    Ok(collect_styles(&manifest, entry).iter().map(|css| asset_url(base_url, css)).collect())
  }
}

impl Default for AssetRegistrar {
  fn default() -> Self {
    Self::new()
  }
}
