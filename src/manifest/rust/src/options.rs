/* src/manifest/rust/src/options.rs */

use serde::{Deserialize, Serialize};

/// Per-registration options. Absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolutionOptions {
  /// Base name for generated script and style handles.
  pub handle: String,
  /// Script handles every registered script depends on.
  pub dependencies: Vec<String>,
  /// Style handles every registered style depends on.
  pub css_dependencies: Vec<String>,
  pub css_only: bool,
  pub css_media: String,
  pub in_footer: bool,
  /// Prefix for production asset URLs.
  pub base_url: String,
  // Imported chunks are already loaded through `import`, so their script
  // handles are not threaded as dependencies unless asked for.
  pub skip_js_dependencies: bool,
  pub skip_css_dependencies: bool,
}

impl Default for ResolutionOptions {
  fn default() -> Self {
    Self {
      handle: String::new(),
      dependencies: Vec::new(),
      css_dependencies: Vec::new(),
      css_only: false,
      css_media: "all".to_string(),
      in_footer: false,
      base_url: String::new(),
      skip_js_dependencies: true,
      skip_css_dependencies: false,
    }
  }
}

impl ResolutionOptions {
  pub fn new(handle: impl Into<String>) -> Self {
    Self { handle: handle.into(), ..Self::default() }
  }

  pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn dependencies(mut self, deps: Vec<String>) -> Self {
    self.dependencies = deps;
    self
  }

  pub fn css_dependencies(mut self, deps: Vec<String>) -> Self {
    self.css_dependencies = deps;
    self
  }

  pub fn css_only(mut self, css_only: bool) -> Self {
    self.css_only = css_only;
    self
  }

  pub fn css_media(mut self, media: impl Into<String>) -> Self {
    self.css_media = media.into();
    self
  }

  pub fn in_footer(mut self, in_footer: bool) -> Self {
    self.in_footer = in_footer;
    self
  }

  pub fn skip_js_dependencies(mut self, skip: bool) -> Self {
    self.skip_js_dependencies = skip;
    self
  }

  pub fn skip_css_dependencies(mut self, skip: bool) -> Self {
    self.skip_css_dependencies = skip;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let opts = ResolutionOptions::default();
    assert_eq!(opts.css_media, "all");
    assert!(opts.skip_js_dependencies);
    assert!(!opts.skip_css_dependencies);
    assert!(!opts.css_only);
    assert!(!opts.in_footer);
  }

  #[test]
  fn partial_kebab_case_input_keeps_defaults() {
    let opts: ResolutionOptions = serde_json::from_str(
      r#"{"handle": "theme", "css-dependencies": ["fonts"], "skip-js-dependencies": false}"#,
    )
    .unwrap();
    assert_eq!(opts.handle, "theme");
    assert_eq!(opts.css_dependencies, vec!["fonts"]);
    assert!(!opts.skip_js_dependencies);
    assert_eq!(opts.css_media, "all");
  }

  #[test]
  fn builder_sets_fields() {
    let opts = ResolutionOptions::new("app").base_url("/dist").css_only(true).css_media("print");
    assert_eq!(opts.handle, "app");
    assert_eq!(opts.base_url, "/dist");
    assert!(opts.css_only);
    assert_eq!(opts.css_media, "print");
  }
}
