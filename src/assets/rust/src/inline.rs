/* src/assets/rust/src/inline.rs */

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use wp_vite_host::{Hooks, Host, InlinePosition};

use crate::INLINE_SCRIPT_FILTER;

/// Where inline data lands in the page's global scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InlineTarget {
  /// `const <name> = <data>`
  Var(String),
  /// `window.<namespace>[ '<key>' ] = <data>`, creating the namespace object if needed.
  Namespaced { namespace: String, key: String },
}

impl InlineTarget {
  pub fn var(name: impl Into<String>) -> Self {
    Self::Var(name.into())
  }

  pub fn namespaced(namespace: impl Into<String>, key: impl Into<String>) -> Self {
    Self::Namespaced { namespace: namespace.into(), key: key.into() }
  }

  /// Filter argument form: a string for a variable, `[namespace, key]` otherwise.
  fn to_value(&self) -> Value {
    match self {
      Self::Var(name) => json!(name),
      Self::Namespaced { namespace, key } => json!([namespace, key]),
    }
  }

  fn statements(&self, data: &str) -> Vec<String> {
    match self {
      Self::Var(name) => vec![format!("const {name} = {data}")],
      Self::Namespaced { namespace, key } => vec![
        format!("window.{namespace} = window.{namespace} || {{}}"),
        format!("window.{namespace}[ '{key}' ] = {data}"),
      ],
    }
  }
}

/// Payload of an inline script: a value, or a producer evaluated at injection time.
#[derive(Clone)]
pub enum InlineData {
  Value(Value),
  Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl InlineData {
  pub fn producer<F>(produce: F) -> Self
  where
    F: Fn() -> Value + Send + Sync + 'static,
  {
    Self::Producer(Arc::new(produce))
  }

  fn evaluate(&self) -> Value {
    match self {
      Self::Value(value) => value.clone(),
      Self::Producer(produce) => produce(),
    }
  }
}

impl From<Value> for InlineData {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

impl fmt::Debug for InlineData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
      Self::Producer(_) => f.write_str("Producer(..)"),
    }
  }
}

/// Data exposed to a script as a global, injected before the script runs.
#[derive(Debug, Clone)]
pub struct InlineScript {
  pub target: InlineTarget,
  pub data: InlineData,
}

impl InlineScript {
  pub fn new(target: InlineTarget, data: impl Into<InlineData>) -> Self {
    Self { target, data: data.into() }
  }

  /// Statements for `handle`, after the generic and per-handle inline filters.
  pub fn render(&self, hooks: &Hooks, handle: &str) -> Vec<String> {
    let target = self.target.to_value();
    let data = self.data.evaluate();
    let data = hooks.apply_filters(INLINE_SCRIPT_FILTER, data, &[target.clone(), json!(handle)]);
    let data = hooks.apply_filters(&format!("{INLINE_SCRIPT_FILTER}/{handle}"), data, &[target]);
    self.target.statements(&data.to_string())
  }

  /// Attach the rendered statements before `handle`. Returns `false` when the
  /// host refused them, i.e. `handle` is not a registered script.
  pub fn attach(&self, host: &Host, handle: &str) -> bool {
    let mut attached = true;
    for statement in self.render(&host.hooks, handle) {
      attached &= host.registry.add_inline_script(handle, &statement, InlinePosition::Before);
    }
    if !attached {
      tracing::warn!(handle, "inline data attached to an unregistered script");
    }
    attached
  }
}
