/* src/manifest/rust/src/script_tag.rs */

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use wp_vite_host::{DEFAULT_PRIORITY, Hooks, SCRIPT_LOADER_TAG};

use crate::VITE_CLIENT_SCRIPT_HANDLE;

const MODULE_ATTRIBUTE: &str = r#"type="module""#;

fn type_attribute_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r#"type=(["'])([\w/]+)(["'])"#).unwrap())
}

fn open_tag_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(<script)(.*)").unwrap())
}

fn closed_tag_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(<script)(.*></script>)").unwrap())
}

fn script_line_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"<script(.+)").unwrap())
}

/// Rewrite the printed tag of `target_handle` into an ES module script.
///
/// An existing `type=` attribute is replaced, otherwise one is inserted. Inline
/// `<script>` blocks printed alongside (no `src=`) stay classic scripts so the
/// globals they declare remain visible. The dev client's after-block holds the
/// fast-refresh preamble, which uses `import`, and stays a module.
pub fn set_script_type_attribute(target_handle: &str, tag: &str, handle: &str) -> String {
  if target_handle != handle {
    return tag.to_string();
  }

  let mut tag = if type_attribute_re().is_match(tag) {
    type_attribute_re().replace_all(tag, MODULE_ATTRIBUTE).into_owned()
  } else {
    // The client tag is printed without a closing tag on the same line.
    let re = if handle == VITE_CLIENT_SCRIPT_HANDLE { open_tag_re() } else { closed_tag_re() };
    re.replace_all(tag, format!("${{1}} {MODULE_ATTRIBUTE}${{2}}").as_str()).into_owned()
  };

  let preamble_id = format!("id=\"{VITE_CLIENT_SCRIPT_HANDLE}-js-after\"");
  let inline_lines: Vec<String> = script_line_re()
    .find_iter(&tag)
    .map(|m| m.as_str().to_string())
    .filter(|line| !line.contains(" src="))
    .filter(|line| handle != VITE_CLIENT_SCRIPT_HANDLE || !line.contains(&preamble_id))
    .collect();
  for line in inline_lines {
    let stripped = line.replace(&format!(" {MODULE_ATTRIBUTE}"), "").replace(MODULE_ATTRIBUTE, "");
    tag = tag.replace(&line, &stripped);
  }

  tag
}

/// Register a `script_loader_tag` filter turning `handle`'s tag into a module script.
/// Registering the same handle again is a no-op.
pub fn filter_script_tag(hooks: &Hooks, handle: &str) {
  let target = handle.to_string();
  hooks.add_filter_once(SCRIPT_LOADER_TAG, handle, DEFAULT_PRIORITY, move |tag, args| {
    let (Some(current), Some(printed)) = (args.first().and_then(Value::as_str), tag.as_str())
    else {
      return tag;
    };
    Value::String(set_script_type_attribute(&target, printed, current))
  });
}
