/* src/assets/rust/src/lib.rs */

pub mod binder;
pub mod config;
pub mod container;
pub mod errors;
pub mod inline;

pub use binder::{Assets, admin_action, enqueue_action, frontend_action};
pub use config::{AssetEntry, AssetsConfig, load_assets_config};
pub use container::AssetContainer;
pub use errors::AssetsError;
pub use inline::{InlineData, InlineScript, InlineTarget};

// -- Hooks fired by the asset container --

/// Fired at the start of every enqueue, with the container name.
pub const REGISTER_ACTION: &str = "wp-vite-manifest/assets/register";
/// Asset set about to be enqueued, with the container name as argument.
pub const TO_ENQUEUE_FILTER: &str = "wp-vite-manifest/assets/to-enqueue";
/// Inline payload, with the target and script handle as arguments.
/// A per-handle variant `<INLINE_SCRIPT_FILTER>/<handle>` runs afterwards.
pub const INLINE_SCRIPT_FILTER: &str = "wp-vite-manifest/inline-script";
