/* src/host/rust/src/context.rs */

use std::sync::{Arc, Mutex, PoisonError};

use crate::hooks::{Hooks, WeakHooks};
use crate::registry::AssetRegistry;
use crate::{ADMIN_ENQUEUE, FRONTEND_ENQUEUE};

/// Sink for HTML printed directly into the response.
#[derive(Clone, Default)]
pub struct Output {
  buf: Arc<Mutex<String>>,
}

impl Output {
  pub fn print(&self, html: &str) {
    self.buf.lock().unwrap_or_else(PoisonError::into_inner).push_str(html);
  }

  pub fn contents(&self) -> String {
    self.buf.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn take(&self) -> String {
    std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner))
  }
}

/// Everything the asset pipeline consumes from the host for one request.
#[derive(Clone)]
pub struct Host {
  pub hooks: Hooks,
  pub registry: Arc<dyn AssetRegistry>,
  pub output: Output,
  is_admin: bool,
  debug: bool,
}

impl Host {
  pub fn new(registry: Arc<dyn AssetRegistry>) -> Self {
    Self { hooks: Hooks::new(), registry, output: Output::default(), is_admin: false, debug: false }
  }

  pub fn admin(mut self, is_admin: bool) -> Self {
    self.is_admin = is_admin;
    self
  }

  /// In debug mode asset-pipeline faults surface as errors instead of degrading silently.
  pub fn debug(mut self, debug: bool) -> Self {
    self.debug = debug;
    self
  }

  pub fn hooks(mut self, hooks: Hooks) -> Self {
    self.hooks = hooks;
    self
  }

  pub fn is_admin(&self) -> bool {
    self.is_admin
  }

  pub fn is_debug(&self) -> bool {
    self.debug
  }

  /// The enqueue lifecycle hook matching this request's phase.
  pub fn enqueue_hook(&self) -> &'static str {
    if self.is_admin { ADMIN_ENQUEUE } else { FRONTEND_ENQUEUE }
  }

  /// Whether either enqueue phase has already begun in this request.
  pub fn enqueue_phase_started(&self) -> bool {
    self.hooks.did_action(FRONTEND_ENQUEUE) > 0 || self.hooks.did_action(ADMIN_ENQUEUE) > 0
  }

  pub fn fire_enqueue_phase(&self) {
    self.hooks.do_action(self.enqueue_hook(), &[]);
  }

  /// Host handle for callbacks stored in the host's own hook table.
  pub fn downgrade(&self) -> WeakHost {
    WeakHost {
      hooks: self.hooks.downgrade(),
      registry: Arc::clone(&self.registry),
      output: self.output.clone(),
      is_admin: self.is_admin,
      debug: self.debug,
    }
  }
}

/// A [`Host`] that does not keep its hook table alive.
#[derive(Clone)]
pub struct WeakHost {
  hooks: WeakHooks,
  registry: Arc<dyn AssetRegistry>,
  output: Output,
  is_admin: bool,
  debug: bool,
}

impl WeakHost {
  pub fn upgrade(&self) -> Option<Host> {
    Some(Host {
      hooks: self.hooks.upgrade()?,
      registry: Arc::clone(&self.registry),
      output: self.output.clone(),
      is_admin: self.is_admin,
      debug: self.debug,
    })
  }
}
