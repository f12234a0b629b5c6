/* src/host/rust/src/hooks.rs */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Priority used when a caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

pub type ActionFn = Arc<dyn Fn(&[Value]) + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(Value, &[Value]) -> Value + Send + Sync>;

struct Registered<F> {
  priority: i32,
  seq: u64,
  callback: F,
}

#[derive(Default)]
struct HookTable {
  actions: HashMap<String, Vec<Registered<ActionFn>>>,
  filters: HashMap<String, Vec<Registered<FilterFn>>>,
  fired: HashMap<String, usize>,
  // (filter, key) pairs registered through `add_filter_once`.
  keyed: HashSet<(String, String)>,
  seq: u64,
}

impl HookTable {
  fn next_seq(&mut self) -> u64 {
    self.seq += 1;
    self.seq
  }
}

fn insert_sorted<F>(list: &mut Vec<Registered<F>>, entry: Registered<F>) {
  let at = list
    .iter()
    .position(|r| (r.priority, r.seq) > (entry.priority, entry.seq))
    .unwrap_or(list.len());
  list.insert(at, entry);
}

/// Named lifecycle hooks: actions fire callbacks, filters thread a value through them.
///
/// Callbacks run by ascending priority, then in registration order. The table lock
/// is released before any callback runs, so callbacks may register new callbacks;
/// those take effect on the next firing.
#[derive(Clone, Default)]
pub struct Hooks {
  table: Arc<Mutex<HookTable>>,
}

impl Hooks {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, HookTable> {
    self.table.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn add_action<F>(&self, name: impl Into<String>, priority: i32, callback: F)
  where
    F: Fn(&[Value]) + Send + Sync + 'static,
  {
    let mut table = self.lock();
    let seq = table.next_seq();
    let list = table.actions.entry(name.into()).or_default();
    insert_sorted(list, Registered { priority, seq, callback: Arc::new(callback) });
  }

  /// Fire `name`. The fired counter is bumped before the callbacks run.
  pub fn do_action(&self, name: &str, args: &[Value]) {
    let callbacks: Vec<ActionFn> = {
      let mut table = self.lock();
      *table.fired.entry(name.to_string()).or_default() += 1;
      table
        .actions
        .get(name)
        .map(|list| list.iter().map(|r| Arc::clone(&r.callback)).collect())
        .unwrap_or_default()
    };
    tracing::debug!(hook = name, callbacks = callbacks.len(), "firing action");
    for callback in callbacks {
      callback(args);
    }
  }

  /// How many times `name` has fired so far.
  pub fn did_action(&self, name: &str) -> usize {
    self.lock().fired.get(name).copied().unwrap_or(0)
  }

  pub fn has_action(&self, name: &str) -> bool {
    self.lock().actions.get(name).is_some_and(|list| !list.is_empty())
  }

  pub fn add_filter<F>(&self, name: impl Into<String>, priority: i32, callback: F)
  where
    F: Fn(Value, &[Value]) -> Value + Send + Sync + 'static,
  {
    let mut table = self.lock();
    let seq = table.next_seq();
    let list = table.filters.entry(name.into()).or_default();
    insert_sorted(list, Registered { priority, seq, callback: Arc::new(callback) });
  }

  /// Register `callback` on `name` unless a callback was already registered there
  /// under `key`. Returns whether it was added.
  pub fn add_filter_once<F>(
    &self,
    name: impl Into<String>,
    key: impl Into<String>,
    priority: i32,
    callback: F,
  ) -> bool
  where
    F: Fn(Value, &[Value]) -> Value + Send + Sync + 'static,
  {
    let name = name.into();
    let mut table = self.lock();
    if !table.keyed.insert((name.clone(), key.into())) {
      return false;
    }
    let seq = table.next_seq();
    let list = table.filters.entry(name).or_default();
    insert_sorted(list, Registered { priority, seq, callback: Arc::new(callback) });
    true
  }

  pub fn filter_count(&self, name: &str) -> usize {
    self.lock().filters.get(name).map_or(0, Vec::len)
  }

  /// Non-owning handle for callbacks stored in this same table.
  pub fn downgrade(&self) -> WeakHooks {
    WeakHooks { table: Arc::downgrade(&self.table) }
  }

  pub fn has_filter(&self, name: &str) -> bool {
    self.lock().filters.get(name).is_some_and(|list| !list.is_empty())
  }

  pub fn apply_filters(&self, name: &str, value: Value, args: &[Value]) -> Value {
    let callbacks: Vec<FilterFn> = {
      let table = self.lock();
      match table.filters.get(name) {
        Some(list) => list.iter().map(|r| Arc::clone(&r.callback)).collect(),
        None => return value,
      }
    };
    callbacks.into_iter().fold(value, |acc, callback| callback(acc, args))
  }

  /// Typed wrapper over [`Hooks::apply_filters`]. A filter result that no longer
  /// decodes as `T` is discarded and the input value is kept.
  pub fn apply_filters_as<T>(&self, name: &str, value: T, args: &[Value]) -> T
  where
    T: Serialize + DeserializeOwned,
  {
    if !self.has_filter(name) {
      return value;
    }
    let raw = match serde_json::to_value(&value) {
      Ok(raw) => raw,
      Err(e) => {
        tracing::warn!(hook = name, error = %e, "filter payload is not serializable");
        return value;
      }
    };
    match serde_json::from_value(self.apply_filters(name, raw, args)) {
      Ok(filtered) => filtered,
      Err(e) => {
        tracing::warn!(hook = name, error = %e, "discarding filter result of the wrong shape");
        value
      }
    }
  }
}

/// A [`Hooks`] reference that does not keep the hook table alive.
#[derive(Clone)]
pub struct WeakHooks {
  table: Weak<Mutex<HookTable>>,
}

impl WeakHooks {
  pub fn upgrade(&self) -> Option<Hooks> {
    self.table.upgrade().map(|table| Hooks { table })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use serde_json::json;

  use super::*;

  #[test]
  fn actions_run_by_priority_then_registration_order() {
    let hooks = Hooks::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    for (label, priority) in [("late", 20), ("first", 10), ("second", 10), ("early", 5)] {
      let log = Arc::clone(&log);
      hooks.add_action("init", priority, move |_| log.lock().unwrap().push(label));
    }
    hooks.do_action("init", &[]);
    assert_eq!(*log.lock().unwrap(), vec!["early", "first", "second", "late"]);
  }

  #[test]
  fn did_action_counts_firings() {
    let hooks = Hooks::new();
    assert_eq!(hooks.did_action("wp_enqueue_scripts"), 0);
    hooks.do_action("wp_enqueue_scripts", &[]);
    hooks.do_action("wp_enqueue_scripts", &[]);
    assert_eq!(hooks.did_action("wp_enqueue_scripts"), 2);
  }

  #[test]
  fn callback_sees_its_own_phase_as_fired() {
    let hooks = Hooks::new();
    let seen = Arc::new(Mutex::new(0));
    let observer = hooks.clone();
    let sink = Arc::clone(&seen);
    hooks.add_action("phase", DEFAULT_PRIORITY, move |_| {
      *sink.lock().unwrap() = observer.did_action("phase");
    });
    hooks.do_action("phase", &[]);
    assert_eq!(*seen.lock().unwrap(), 1);
  }

  #[test]
  fn callbacks_added_while_firing_run_next_time() {
    let hooks = Hooks::new();
    let count = Arc::new(Mutex::new(0));
    let inner = hooks.clone();
    let counter = Arc::clone(&count);
    hooks.add_action("tick", DEFAULT_PRIORITY, move |_| {
      let counter = Arc::clone(&counter);
      inner.add_action("tick", DEFAULT_PRIORITY, move |_| *counter.lock().unwrap() += 1);
    });
    hooks.do_action("tick", &[]);
    assert_eq!(*count.lock().unwrap(), 0);
    hooks.do_action("tick", &[]);
    assert_eq!(*count.lock().unwrap(), 1);
  }

  #[test]
  fn action_receives_arguments() {
    let hooks = Hooks::new();
    let got = Arc::new(Mutex::new(Value::Null));
    let sink = Arc::clone(&got);
    hooks.add_action("named", DEFAULT_PRIORITY, move |args| {
      *sink.lock().unwrap() = args[0].clone();
    });
    hooks.do_action("named", &[json!("main")]);
    assert_eq!(*got.lock().unwrap(), json!("main"));
  }

  #[test]
  fn filters_chain_values() {
    let hooks = Hooks::new();
    hooks.add_filter("title", DEFAULT_PRIORITY, |v, _| json!(format!("{}!", v.as_str().unwrap())));
    hooks.add_filter("title", 1, |v, _| json!(v.as_str().unwrap().to_uppercase()));
    assert_eq!(hooks.apply_filters("title", json!("hi"), &[]), json!("HI!"));
    assert_eq!(hooks.apply_filters("other", json!("hi"), &[]), json!("hi"));
  }

  #[test]
  fn typed_filter_keeps_input_on_wrong_shape() {
    let hooks = Hooks::new();
    hooks.add_filter("port", DEFAULT_PRIORITY, |_, _| json!("not a number"));
    assert_eq!(hooks.apply_filters_as::<u16>("port", 3000, &[]), 3000);
  }

  #[test]
  fn typed_filter_applies_args() {
    let hooks = Hooks::new();
    hooks.add_filter("list", DEFAULT_PRIORITY, |v, args| {
      let mut items: Vec<String> = serde_json::from_value(v).unwrap();
      items.push(args[0].as_str().unwrap().to_string());
      json!(items)
    });
    let out = hooks.apply_filters_as("list", vec!["a".to_string()], &[json!("b")]);
    assert_eq!(out, vec!["a", "b"]);
  }

  #[test]
  fn keyed_filter_registers_once() {
    let hooks = Hooks::new();
    for _ in 0..3 {
      hooks.add_filter_once("tag", "app", DEFAULT_PRIORITY, |v, _| {
        json!(format!("{}+", v.as_str().unwrap()))
      });
    }
    assert!(hooks.add_filter_once("tag", "other", DEFAULT_PRIORITY, |v, _| v));
    assert_eq!(hooks.filter_count("tag"), 2);
    assert_eq!(hooks.apply_filters("tag", json!("x"), &[]), json!("x+"));
  }

  #[test]
  fn weak_hooks_do_not_keep_the_table_alive() {
    let hooks = Hooks::new();
    let weak = hooks.downgrade();
    hooks.add_action("init", DEFAULT_PRIORITY, {
      let weak = weak.clone();
      move |_| assert!(weak.upgrade().is_some())
    });
    hooks.do_action("init", &[]);
    drop(hooks);
    assert!(weak.upgrade().is_none());
  }
}
