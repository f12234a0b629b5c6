/* src/host/rust/src/lib.rs */

pub mod context;
pub mod hooks;
pub mod registry;

pub use context::{Host, Output, WeakHost};
pub use hooks::{ActionFn, DEFAULT_PRIORITY, FilterFn, Hooks, WeakHooks};
pub use registry::{
  AssetRegistry, InlinePosition, MemoryRegistry, ScriptRegistration, StyleRegistration,
};

// -- Lifecycle hooks fired by the host --

/// Fired once per frontend request when assets should be enqueued.
pub const FRONTEND_ENQUEUE: &str = "wp_enqueue_scripts";
/// Fired once per admin request when assets should be enqueued.
pub const ADMIN_ENQUEUE: &str = "admin_enqueue_scripts";
/// Filter applied to every printed `<script>` tag, with the handle as argument.
pub const SCRIPT_LOADER_TAG: &str = "script_loader_tag";
