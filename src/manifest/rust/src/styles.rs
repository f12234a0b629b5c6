/* src/manifest/rust/src/styles.rs */

use std::collections::HashSet;

use crate::manifest::Manifest;

/// Stylesheet paths needed by `entry` and everything it imports, without
/// registering anything.
///
/// Each node contributes once however many paths reach it, which also makes
/// the walk safe on cyclic input. An imported node's styles are placed ahead of
/// those collected so far, so shared base styles load before entry overrides.
pub fn collect_styles(manifest: &Manifest, entry: &str) -> Vec<String> {
  let mut visited = HashSet::new();
  let mut styles = Vec::new();
  visit(manifest, entry, &mut visited, &mut styles);
  styles
}

fn visit(manifest: &Manifest, key: &str, visited: &mut HashSet<String>, styles: &mut Vec<String>) {
  if !visited.insert(key.to_string()) {
    return;
  }
  let Some(item) = manifest.entry(key) else {
    return;
  };

  let mut merged: Vec<String> = Vec::with_capacity(item.css.len() + styles.len());
  for css in &item.css {
    if !merged.contains(css) && !styles.contains(css) {
      merged.push(css.clone());
    }
  }
  merged.append(styles);
  *styles = merged;

  for import in &item.imports {
    visit(manifest, import, visited, styles);
  }
}
