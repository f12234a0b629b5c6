/* src/assets/rust/src/container.rs */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;
use wp_vite_host::{ADMIN_ENQUEUE, DEFAULT_PRIORITY, FRONTEND_ENQUEUE, Host};
use wp_vite_manifest::ResolvedAssetSet;

use crate::errors::AssetsError;
use crate::inline::{InlineScript, InlineTarget};
use crate::{REGISTER_ACTION, TO_ENQUEUE_FILTER};

/// Named asset sets, enqueued on demand.
///
/// One container is shared by everything wired into an application; pass it
/// around as `Arc<AssetContainer>`.
#[derive(Default)]
pub struct AssetContainer {
  assets: Mutex<HashMap<String, ResolvedAssetSet>>,
  // Style handles already printed as <link> tags in this response.
  printed: Mutex<HashSet<String>>,
  // Inline targets already attached, per script handle.
  inlined: Mutex<HashSet<(String, InlineTarget)>>,
}

impl AssetContainer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Store `assets` under `name`, replacing whatever was there.
  pub fn register(&self, name: impl Into<String>, assets: ResolvedAssetSet) {
    let name = name.into();
    tracing::debug!(name = %name, scripts = assets.scripts.len(), "asset container registered");
    self.assets.lock().unwrap_or_else(PoisonError::into_inner).insert(name, assets);
  }

  pub fn get(&self, name: &str) -> Option<ResolvedAssetSet> {
    self.assets.lock().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.assets.lock().unwrap_or_else(PoisonError::into_inner).contains_key(name)
  }

  /// Enqueue every script and style registered under `name`.
  ///
  /// Scripts go to the host queue, optionally preceded by `inline` data. Styles
  /// are printed as `<link>` tags once per handle when the enqueue phase is
  /// already running, and queued with the host otherwise.
  pub fn enqueue(
    &self,
    host: &Host,
    name: &str,
    inline: Option<&InlineScript>,
  ) -> Result<(), AssetsError> {
    host.hooks.do_action(REGISTER_ACTION, &[json!(name)]);

    let assets = match self.get(name) {
      Some(assets) => assets,
      None if host.is_debug() => return Err(AssetsError::UnknownAsset(name.to_string())),
      None => {
        tracing::warn!(name, "enqueueing an unknown asset container");
        ResolvedAssetSet::default()
      }
    };
    let assets = host.hooks.apply_filters_as(TO_ENQUEUE_FILTER, assets, &[json!(name)]);

    for handle in &assets.scripts {
      host.hooks.do_action(&format!("{REGISTER_ACTION}/{handle}"), &[json!(name)]);
      if let Some(inline) = inline {
        self.attach_inline(host, handle, inline);
      }
      host.registry.enqueue_script(handle);
    }

    if host.enqueue_phase_started() {
      for handle in &assets.styles {
        self.print_style(host, handle);
      }
      return Ok(());
    }
    for handle in &assets.styles {
      host.registry.enqueue_style(handle);
    }
    Ok(())
  }

  fn attach_inline(&self, host: &Host, handle: &str, inline: &InlineScript) {
    let key = (handle.to_string(), inline.target.clone());
    if self.inlined.lock().unwrap_or_else(PoisonError::into_inner).contains(&key) {
      return;
    }
    if inline.attach(host, handle) {
      self.inlined.lock().unwrap_or_else(PoisonError::into_inner).insert(key);
    }
  }

  fn print_style(&self, host: &Host, handle: &str) {
    let Some(style) = host.registry.registered_style(handle) else {
      return;
    };
    if !self.printed.lock().unwrap_or_else(PoisonError::into_inner).insert(handle.to_string()) {
      return;
    }
    host.output.print(&format!(
      "<link rel='stylesheet' href='{}' type='text/css' media='{}' />",
      style.src, style.media
    ));
  }

  /// Enqueue `name` during the frontend enqueue phase: now if it has begun,
  /// otherwise once when it fires.
  pub fn frontend_enqueue(
    self: &Arc<Self>,
    host: &Host,
    name: &str,
    inline: Option<InlineScript>,
  ) -> Result<(), AssetsError> {
    self.enqueue_in_phase(FRONTEND_ENQUEUE, host, name, inline)
  }

  /// Admin counterpart of [`AssetContainer::frontend_enqueue`].
  pub fn admin_enqueue(
    self: &Arc<Self>,
    host: &Host,
    name: &str,
    inline: Option<InlineScript>,
  ) -> Result<(), AssetsError> {
    self.enqueue_in_phase(ADMIN_ENQUEUE, host, name, inline)
  }

  fn enqueue_in_phase(
    self: &Arc<Self>,
    phase: &'static str,
    host: &Host,
    name: &str,
    inline: Option<InlineScript>,
  ) -> Result<(), AssetsError> {
    if host.hooks.did_action(phase) > 0 {
      return self.enqueue(host, name, inline.as_ref());
    }

    let container = Arc::clone(self);
    let deferred_host = host.downgrade();
    let name = name.to_string();
    let pending = AtomicBool::new(true);
    tracing::debug!(name = %name, phase, "enqueue deferred");
    host.hooks.add_action(phase, DEFAULT_PRIORITY, move |_| {
      if !pending.swap(false, Ordering::SeqCst) {
        return;
      }
      let Some(host) = deferred_host.upgrade() else {
        return;
      };
      if let Err(e) = container.enqueue(&host, &name, inline.as_ref()) {
        tracing::error!(name = %name, phase, error = %e, "deferred enqueue failed");
      }
    });
    Ok(())
  }
}

#[cfg(test)]
mod tests;
