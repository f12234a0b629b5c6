/* src/assets/rust/src/container/tests.rs */

use std::sync::Mutex;

use serde_json::Value;
use wp_vite_host::{
  AssetRegistry, InlinePosition, MemoryRegistry, ScriptRegistration, StyleRegistration,
};

use super::*;
use crate::inline::InlineTarget;

fn registry() -> Arc<MemoryRegistry> {
  let registry = Arc::new(MemoryRegistry::new());
  for handle in ["app", "app_0"] {
    registry.register_script(ScriptRegistration {
      handle: handle.to_string(),
      src: format!("/dist/{handle}.js"),
      deps: Vec::new(),
      version: None,
      in_footer: true,
    });
  }
  for handle in ["app_0-0", "app-0"] {
    registry.register_style(StyleRegistration {
      handle: handle.to_string(),
      src: format!("/dist/{handle}.css"),
      deps: Vec::new(),
      version: None,
      media: "all".to_string(),
    });
  }
  registry
}

fn app_assets() -> ResolvedAssetSet {
  ResolvedAssetSet {
    scripts: vec!["app".into(), "app_0".into()],
    styles: vec!["app_0-0".into(), "app-0".into()],
  }
}

fn setup() -> (Arc<AssetContainer>, Host, Arc<MemoryRegistry>) {
  let registry = registry();
  let container = Arc::new(AssetContainer::new());
  container.register("app", app_assets());
  (container, Host::new(registry.clone()), registry)
}

#[test]
fn register_replaces_previous_set() {
  let container = AssetContainer::new();
  container.register("app", app_assets());
  container.register("app", ResolvedAssetSet { scripts: vec!["other".into()], styles: vec![] });
  assert_eq!(container.get("app").unwrap().scripts, vec!["other"]);
  assert!(container.get("app").unwrap().styles.is_empty());
}

#[test]
fn enqueue_outside_phase_queues_with_host() {
  let (container, host, registry) = setup();
  container.enqueue(&host, "app", None).unwrap();
  assert_eq!(registry.enqueued_scripts(), vec!["app", "app_0"]);
  assert_eq!(registry.enqueued_styles(), vec!["app_0-0", "app-0"]);
  assert!(host.output.contents().is_empty());
}

#[test]
fn enqueue_inside_phase_prints_links() {
  let (container, host, registry) = setup();
  host.fire_enqueue_phase();
  container.enqueue(&host, "app", None).unwrap();
  assert_eq!(registry.enqueued_scripts(), vec!["app", "app_0"]);
  assert!(registry.enqueued_styles().is_empty());
  assert_eq!(
    host.output.contents(),
    concat!(
      "<link rel='stylesheet' href='/dist/app_0-0.css' type='text/css' media='all' />",
      "<link rel='stylesheet' href='/dist/app-0.css' type='text/css' media='all' />",
    )
  );
}

#[test]
fn style_link_is_printed_once_per_response() {
  let (container, host, _) = setup();
  host.fire_enqueue_phase();
  container.enqueue(&host, "app", None).unwrap();
  let first = host.output.take();
  container.enqueue(&host, "app", None).unwrap();
  assert_eq!(first.matches("<link").count(), 2);
  assert!(host.output.contents().is_empty());
}

#[test]
fn unregistered_style_handles_are_skipped_when_printing() {
  let (container, host, _) = setup();
  container.register("extra", ResolvedAssetSet { scripts: vec![], styles: vec!["ghost".into()] });
  host.fire_enqueue_phase();
  container.enqueue(&host, "extra", None).unwrap();
  assert!(host.output.contents().is_empty());
}

#[test]
fn unknown_name_is_an_error_in_debug_mode() {
  let (container, host, _) = setup();
  let err = container.enqueue(&host.debug(true), "missing", None).unwrap_err();
  assert!(matches!(err, AssetsError::UnknownAsset(ref name) if name == "missing"));
}

#[test]
fn unknown_name_prints_nothing_outside_debug_mode() {
  let (container, host, registry) = setup();
  host.fire_enqueue_phase();
  container.enqueue(&host, "missing", None).unwrap();
  assert!(host.output.contents().is_empty());
  assert!(registry.enqueued_scripts().is_empty());
}

#[test]
fn register_action_can_supply_the_set_lazily() {
  let (container, host, registry) = setup();
  let lazy = Arc::clone(&container);
  host.hooks.add_action(REGISTER_ACTION, DEFAULT_PRIORITY, move |args| {
    if args.first().and_then(Value::as_str) == Some("late") {
      lazy.register("late", ResolvedAssetSet { scripts: vec!["app".into()], styles: vec![] });
    }
  });
  container.enqueue(&host.clone().debug(true), "late", None).unwrap();
  assert_eq!(registry.enqueued_scripts(), vec!["app"]);
}

#[test]
fn per_script_actions_fire_with_container_name() {
  let (container, host, _) = setup();
  let fired = Arc::new(Mutex::new(Vec::new()));
  for handle in ["app", "app_0"] {
    let log = Arc::clone(&fired);
    host.hooks.add_action(format!("{REGISTER_ACTION}/{handle}"), DEFAULT_PRIORITY, move |args| {
      log.lock().unwrap().push(format!("{handle}:{}", args[0].as_str().unwrap()));
    });
  }
  container.enqueue(&host, "app", None).unwrap();
  assert_eq!(*fired.lock().unwrap(), vec!["app:app", "app_0:app"]);
}

#[test]
fn to_enqueue_filter_rewrites_the_set() {
  let (container, host, registry) = setup();
  host.hooks.add_filter(TO_ENQUEUE_FILTER, DEFAULT_PRIORITY, |mut set, args| {
    assert_eq!(args[0], json!("app"));
    set["scripts"] = json!(["app_0"]);
    set
  });
  container.enqueue(&host, "app", None).unwrap();
  assert_eq!(registry.enqueued_scripts(), vec!["app_0"]);
}

#[test]
fn inline_data_is_attached_to_every_script() {
  let (container, host, registry) = setup();
  let inline = InlineScript::new(InlineTarget::var("cfg"), json!({ "a": 1 }));
  container.enqueue(&host, "app", Some(&inline)).unwrap();
  for handle in ["app", "app_0"] {
    let before = registry.inline_scripts(handle, InlinePosition::Before);
    assert_eq!(before, vec![r#"const cfg = {"a":1}"#]);
  }
}

#[test]
fn repeated_enqueue_attaches_inline_data_once() {
  let (container, host, registry) = setup();
  let inline = InlineScript::new(InlineTarget::var("cfg"), json!({}));
  container.enqueue(&host, "app", Some(&inline)).unwrap();
  container.enqueue(&host, "app", Some(&inline)).unwrap();
  for handle in ["app", "app_0"] {
    assert_eq!(registry.inline_scripts(handle, InlinePosition::Before), vec!["const cfg = {}"]);
  }
}

#[test]
fn distinct_inline_targets_are_both_attached() {
  let (container, host, registry) = setup();
  let first = InlineScript::new(InlineTarget::var("a"), json!(1));
  let second = InlineScript::new(InlineTarget::var("b"), json!(2));
  container.enqueue(&host, "app", Some(&first)).unwrap();
  container.enqueue(&host, "app", Some(&second)).unwrap();
  assert_eq!(
    registry.inline_scripts("app", InlinePosition::Before),
    vec!["const a = 1", "const b = 2"]
  );
}

#[test]
fn frontend_enqueue_defers_until_phase_fires() {
  let (container, host, registry) = setup();
  container.frontend_enqueue(&host, "app", None).unwrap();
  assert!(registry.enqueued_scripts().is_empty());

  host.fire_enqueue_phase();
  assert_eq!(registry.enqueued_scripts(), vec!["app", "app_0"]);
  assert_eq!(host.output.contents().matches("<link").count(), 2);
}

#[test]
fn frontend_enqueue_runs_immediately_once_phase_started() {
  let (container, host, registry) = setup();
  host.fire_enqueue_phase();
  container.frontend_enqueue(&host, "app", None).unwrap();
  assert_eq!(registry.enqueued_scripts(), vec!["app", "app_0"]);
}

#[test]
fn deferred_enqueue_runs_at_most_once() {
  let (container, host, _) = setup();
  let runs = Arc::new(Mutex::new(0));
  let counter = Arc::clone(&runs);
  host.hooks.add_action(REGISTER_ACTION, DEFAULT_PRIORITY, move |_| {
    *counter.lock().unwrap() += 1;
  });
  container.frontend_enqueue(&host, "app", None).unwrap();
  host.fire_enqueue_phase();
  host.fire_enqueue_phase();
  assert_eq!(*runs.lock().unwrap(), 1);
}

#[test]
fn admin_enqueue_waits_for_the_admin_phase() {
  let (container, host, registry) = setup();
  container.admin_enqueue(&host, "app", None).unwrap();
  host.fire_enqueue_phase();
  assert!(registry.enqueued_scripts().is_empty());

  host.clone().admin(true).fire_enqueue_phase();
  assert_eq!(registry.enqueued_scripts(), vec!["app", "app_0"]);
}

#[test]
fn deferred_enqueue_keeps_inline_data() {
  let (container, host, registry) = setup();
  let inline = InlineScript::new(InlineTarget::namespaced("site", "app"), json!(true));
  container.frontend_enqueue(&host, "app", Some(inline)).unwrap();
  host.fire_enqueue_phase();
  assert_eq!(
    registry.inline_scripts("app", InlinePosition::Before),
    vec!["window.site = window.site || {}", "window.site[ 'app' ] = true"]
  );
}

#[test]
fn deferred_enqueue_does_not_keep_the_host_alive() {
  let (container, host, _) = setup();
  container.frontend_enqueue(&host, "app", None).unwrap();
  let hooks = host.hooks.downgrade();
  drop(host);
  assert!(hooks.upgrade().is_none());
}
