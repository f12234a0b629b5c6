/* src/manifest/rust/src/resolve/production.rs */

use std::collections::HashMap;

use wp_vite_host::{Host, ScriptRegistration, StyleRegistration};

use super::asset_url;
use crate::asset_set::{ResolvedAssetSet, merge_unique};
use crate::errors::{ManifestError, degrade};
use crate::handle::{child_suffix, style_handle};
use crate::manifest::Manifest;
use crate::options::ResolutionOptions;
use crate::script_tag::filter_script_tag;

/// Walks a production manifest from one entry, registering every reachable
/// script and stylesheet with the host.
///
/// Each node is resolved once per resolver; a node reachable through several
/// imports keeps the handles of the first path that reached it. The walk
/// assumes an acyclic import graph.
pub(crate) struct ProductionResolver<'a> {
  host: &'a Host,
  manifest: &'a Manifest,
  resolved: HashMap<String, ResolvedAssetSet>,
}

impl<'a> ProductionResolver<'a> {
  pub(crate) fn new(host: &'a Host, manifest: &'a Manifest) -> Self {
    Self { host, manifest, resolved: HashMap::new() }
  }

  pub(crate) fn resolve(
    &mut self,
    entry: &str,
    options: &ResolutionOptions,
  ) -> Result<Option<ResolvedAssetSet>, ManifestError> {
    self.resolve_node(entry, options, "")
  }

  fn resolve_node(
    &mut self,
    entry: &str,
    options: &ResolutionOptions,
    suffix: &str,
  ) -> Result<Option<ResolvedAssetSet>, ManifestError> {
    if let Some(done) = self.resolved.get(entry) {
      return Ok(Some(done.clone()));
    }
    let manifest = self.manifest;
    let Some(item) = manifest.entry(entry) else {
      return degrade(self.host, ManifestError::MissingEntry { entry: entry.to_string() });
    };

    let handle = format!("{}{suffix}", options.handle);
    let mut script_deps = options.dependencies.clone();
    let mut style_deps = options.css_dependencies.clone();
    let mut child_scripts: Vec<String> = Vec::new();

    // Children see the dependency lists as accumulated so far, so a later
    // import's styles also depend on the earlier imports' styles.
    for (index, import) in item.imports.iter().enumerate() {
      let child_options = ResolutionOptions {
        handle: handle.clone(),
        dependencies: script_deps.clone(),
        css_dependencies: style_deps.clone(),
        ..options.clone()
      };
      let Some(child) = self.resolve_node(import, &child_options, &child_suffix(suffix, index))?
      else {
        continue;
      };
      if !options.skip_js_dependencies {
        merge_unique(&mut script_deps, &child.scripts);
      }
      if !options.skip_css_dependencies {
        merge_unique(&mut style_deps, &child.styles);
      }
      merge_unique(&mut child_scripts, &child.scripts);
    }

    let mut assets = ResolvedAssetSet::default();

    if !options.css_only
      && let Some(file) = &item.file
    {
      filter_script_tag(&self.host.hooks, &handle);
      let registered = self.host.registry.register_script(ScriptRegistration {
        handle: handle.clone(),
        src: asset_url(&options.base_url, file),
        deps: script_deps,
        version: None,
        in_footer: options.in_footer,
      });
      if registered {
        assets.scripts.push(handle.clone());
      } else {
        tracing::warn!(handle = %handle, entry, "script registration refused");
      }
    }
    merge_unique(&mut assets.scripts, &child_scripts);

    let mut own_styles = Vec::with_capacity(item.css.len());
    for (index, css) in item.css.iter().enumerate() {
      let style = style_handle(&handle, index);
      let registered = self.host.registry.register_style(StyleRegistration {
        handle: style.clone(),
        src: asset_url(&options.base_url, css),
        deps: style_deps.clone(),
        version: None,
        media: options.css_media.clone(),
      });
      if registered {
        own_styles.push(style);
      } else {
        tracing::warn!(handle = %style, entry, "style registration refused");
      }
    }

    // Dependency styles first: base stylesheets print before the entry's own.
    assets.styles = style_deps;
    merge_unique(&mut assets.styles, &own_styles);

    tracing::debug!(
      entry,
      handle = %handle,
      scripts = assets.scripts.len(),
      styles = assets.styles.len(),
      "entry resolved"
    );
    self.resolved.insert(entry.to_string(), assets.clone());
    Ok(Some(assets))
  }
}
