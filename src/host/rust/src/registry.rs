/* src/host/rust/src/registry.rs */

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::json;

use crate::SCRIPT_LOADER_TAG;
use crate::hooks::Hooks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRegistration {
  pub handle: String,
  pub src: String,
  pub deps: Vec<String>,
  pub version: Option<String>,
  pub in_footer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRegistration {
  pub handle: String,
  pub src: String,
  pub deps: Vec<String>,
  pub version: Option<String>,
  pub media: String,
}

/// Where an inline script is emitted relative to the script it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlinePosition {
  Before,
  After,
}

/// Script/style registry of the host platform.
///
/// Registering an existing handle with the same source is accepted; a different
/// source for an existing handle is refused.
pub trait AssetRegistry: Send + Sync {
  fn register_script(&self, script: ScriptRegistration) -> bool;
  fn register_style(&self, style: StyleRegistration) -> bool;
  fn is_script_registered(&self, handle: &str) -> bool;
  fn registered_style(&self, handle: &str) -> Option<StyleRegistration>;
  fn enqueue_script(&self, handle: &str);
  fn enqueue_style(&self, handle: &str);
  fn add_inline_script(&self, handle: &str, code: &str, position: InlinePosition) -> bool;
}

#[derive(Default)]
struct RegistryState {
  scripts: HashMap<String, ScriptRegistration>,
  styles: HashMap<String, StyleRegistration>,
  script_queue: Vec<String>,
  style_queue: Vec<String>,
  inline: HashMap<(String, InlinePosition), Vec<String>>,
}

/// In-process [`AssetRegistry`] that records everything it is asked to do.
#[derive(Default)]
pub struct MemoryRegistry {
  state: Mutex<RegistryState>,
}

impl MemoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, RegistryState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn script(&self, handle: &str) -> Option<ScriptRegistration> {
    self.lock().scripts.get(handle).cloned()
  }

  pub fn style(&self, handle: &str) -> Option<StyleRegistration> {
    self.lock().styles.get(handle).cloned()
  }

  pub fn script_count(&self) -> usize {
    self.lock().scripts.len()
  }

  pub fn style_count(&self) -> usize {
    self.lock().styles.len()
  }

  pub fn enqueued_scripts(&self) -> Vec<String> {
    self.lock().script_queue.clone()
  }

  pub fn enqueued_styles(&self) -> Vec<String> {
    self.lock().style_queue.clone()
  }

  pub fn inline_scripts(&self, handle: &str, position: InlinePosition) -> Vec<String> {
    self.lock().inline.get(&(handle.to_string(), position)).cloned().unwrap_or_default()
  }

  /// Render the printed form of a registered script, inline blocks included,
  /// then pass it through the `script_loader_tag` filter.
  pub fn render_script(&self, hooks: &Hooks, handle: &str) -> Option<String> {
    let tag = {
      let state = self.lock();
      let script = state.scripts.get(handle)?;
      let mut tag = String::new();
      if let Some(before) = state.inline.get(&(handle.to_string(), InlinePosition::Before)) {
        let code = before.join("\n");
        tag.push_str(&format!("<script id=\"{handle}-js-before\">\n{code}\n</script>\n"));
      }
      tag.push_str(&format!("<script src=\"{}\" id=\"{handle}-js\"></script>\n", script.src));
      if let Some(after) = state.inline.get(&(handle.to_string(), InlinePosition::After)) {
        let code = after.join("\n");
        tag.push_str(&format!("<script id=\"{handle}-js-after\">\n{code}\n</script>\n"));
      }
      tag
    };
    let filtered = hooks.apply_filters(SCRIPT_LOADER_TAG, json!(tag), &[json!(handle)]);
    match filtered {
      serde_json::Value::String(s) => Some(s),
      _ => Some(tag),
    }
  }
}

impl AssetRegistry for MemoryRegistry {
  fn register_script(&self, script: ScriptRegistration) -> bool {
    let mut state = self.lock();
    if let Some(existing) = state.scripts.get(&script.handle) {
      return existing.src == script.src;
    }
    state.scripts.insert(script.handle.clone(), script);
    true
  }

  fn register_style(&self, style: StyleRegistration) -> bool {
    let mut state = self.lock();
    if let Some(existing) = state.styles.get(&style.handle) {
      return existing.src == style.src;
    }
    state.styles.insert(style.handle.clone(), style);
    true
  }

  fn is_script_registered(&self, handle: &str) -> bool {
    self.lock().scripts.contains_key(handle)
  }

  fn registered_style(&self, handle: &str) -> Option<StyleRegistration> {
    self.style(handle)
  }

  fn enqueue_script(&self, handle: &str) {
    let mut state = self.lock();
    if !state.scripts.contains_key(handle) {
      tracing::debug!(handle, "enqueue of unregistered script ignored");
      return;
    }
    if !state.script_queue.iter().any(|h| h == handle) {
      state.script_queue.push(handle.to_string());
    }
  }

  fn enqueue_style(&self, handle: &str) {
    let mut state = self.lock();
    if !state.styles.contains_key(handle) {
      tracing::debug!(handle, "enqueue of unregistered style ignored");
      return;
    }
    if !state.style_queue.iter().any(|h| h == handle) {
      state.style_queue.push(handle.to_string());
    }
  }

  fn add_inline_script(&self, handle: &str, code: &str, position: InlinePosition) -> bool {
    let mut state = self.lock();
    if !state.scripts.contains_key(handle) {
      return false;
    }
    state.inline.entry((handle.to_string(), position)).or_default().push(code.to_string());
    true
  }
}
