/* src/manifest/rust/src/asset_set.rs */

use serde::{Deserialize, Serialize};

/// Script and style handles registered for one entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAssetSet {
  #[serde(default)]
  pub scripts: Vec<String>,
  #[serde(default)]
  pub styles: Vec<String>,
}

impl ResolvedAssetSet {
  pub fn is_empty(&self) -> bool {
    self.scripts.is_empty() && self.styles.is_empty()
  }
}

/// Append the items of `extra` not already present in `list`, keeping first occurrences.
pub(crate) fn merge_unique(list: &mut Vec<String>, extra: &[String]) {
  for item in extra {
    if !list.contains(item) {
      list.push(item.clone());
    }
  }
}
