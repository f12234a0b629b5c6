/* src/assets/rust/src/binder.rs */

use std::sync::Arc;

use wp_vite_host::{ADMIN_ENQUEUE, DEFAULT_PRIORITY, FRONTEND_ENQUEUE, Host};
use wp_vite_manifest::{AssetRegistrar, ResolutionOptions};

use crate::config::{AssetEntry, AssetsConfig};
use crate::container::AssetContainer;
use crate::errors::AssetsError;

type EnqueueFn = fn(&Arc<AssetContainer>, &Host, &str) -> Result<(), AssetsError>;

/// Action that enqueues container `name` when fired.
pub fn enqueue_action(name: &str) -> String {
  format!("wp-vite/{name}")
}

/// Action that enqueues container `name` in the frontend phase.
pub fn frontend_action(name: &str) -> String {
  format!("wp-vite/frontend/{name}")
}

/// Action that enqueues container `name` in the admin phase.
pub fn admin_action(name: &str) -> String {
  format!("wp-vite/admin/{name}")
}

/// Registers every configured asset container when an enqueue phase begins,
/// and exposes per-container enqueue actions.
pub struct Assets {
  config: AssetsConfig,
  registrar: AssetRegistrar,
  container: Arc<AssetContainer>,
}

impl Assets {
  pub fn new(config: AssetsConfig, container: Arc<AssetContainer>) -> Self {
    Self { config, registrar: AssetRegistrar::new(), container }
  }

  pub fn with_registrar(mut self, registrar: AssetRegistrar) -> Self {
    self.registrar = registrar;
    self
  }

  pub fn config(&self) -> &AssetsConfig {
    &self.config
  }

  pub fn container(&self) -> &Arc<AssetContainer> {
    &self.container
  }

  /// Hook [`Assets::register_assets`] into both enqueue phases.
  pub fn hooks(self: &Arc<Self>, host: &Host) {
    for phase in [ADMIN_ENQUEUE, FRONTEND_ENQUEUE] {
      let assets = Arc::clone(self);
      let phase_host = host.downgrade();
      host.hooks.add_action(phase, DEFAULT_PRIORITY, move |_| {
        let Some(host) = phase_host.upgrade() else {
          return;
        };
        if let Err(e) = assets.register_assets(&host) {
          tracing::error!(phase, error = %e, "asset registration failed");
        }
      });
    }
  }

  /// Resolve and register each configured container, bind its enqueue actions,
  /// and enqueue the eager ones that match the request phase.
  pub fn register_assets(&self, host: &Host) -> Result<(), AssetsError> {
    for entry in &self.config.assets {
      self.register_entry(host, entry)?;
      self.bind_actions(host, &entry.name);

      if entry.enqueues_for(host.is_admin()) {
        self.container.enqueue(host, &entry.name, None)?;
      }
    }
    Ok(())
  }

  fn register_entry(&self, host: &Host, entry: &AssetEntry) -> Result<(), AssetsError> {
    let options = ResolutionOptions::new(entry.handle())
      .base_url(self.config.base_url.as_str())
      .dependencies(entry.dependencies.clone());
    match self.registrar.register_asset(host, &self.config.manifest_dir, &entry.src, options)? {
      Some(assets) => self.container.register(entry.name.as_str(), assets),
      None => {
        tracing::warn!(name = %entry.name, src = %entry.src, "asset container left unregistered");
      }
    }
    Ok(())
  }

  fn bind_actions(&self, host: &Host, name: &str) {
    self.bind(host, enqueue_action(name), name, |container, host, name| {
      container.enqueue(host, name, None)
    });
    self.bind(host, frontend_action(name), name, |container, host, name| {
      container.frontend_enqueue(host, name, None)
    });
    self.bind(host, admin_action(name), name, |container, host, name| {
      container.admin_enqueue(host, name, None)
    });
  }

  fn bind(&self, host: &Host, action: String, name: &str, run: EnqueueFn) {
    let container = Arc::clone(&self.container);
    let action_host = host.downgrade();
    let name = name.to_string();
    host.hooks.add_action(action, DEFAULT_PRIORITY, move |_| {
      let Some(host) = action_host.upgrade() else {
        return;
      };
      if let Err(e) = run(&container, &host, &name) {
        tracing::error!(name = %name, error = %e, "enqueue action failed");
      }
    });
  }
}
