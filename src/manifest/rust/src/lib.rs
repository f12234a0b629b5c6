/* src/manifest/rust/src/lib.rs */

pub mod asset_set;
pub mod errors;
pub mod handle;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod registrar;
pub mod resolve;
pub mod script_tag;
pub mod styles;

// Re-exports for ergonomic use
pub use asset_set::ResolvedAssetSet;
pub use errors::ManifestError;
pub use handle::{child_suffix, style_handle};
pub use loader::{DevEnv, DevServerConfig, MANIFEST_FILE_NAMES, ManifestLoader};
pub use manifest::{DevServer, Manifest, ManifestEntry};
pub use options::ResolutionOptions;
pub use registrar::AssetRegistrar;
pub use resolve::development_asset_src;
pub use script_tag::{filter_script_tag, set_script_type_attribute};
pub use styles::collect_styles;

/// Handle of the dev-server client bootstrap script.
pub const VITE_CLIENT_SCRIPT_HANDLE: &str = "vite-client";

/// Dev-server plugin name that enables the fast-refresh preamble.
pub const REACT_REFRESH_PLUGIN: &str = "vite:react-refresh";

// -- Filters applied by this crate --

/// Resolution options, after defaults are applied.
pub const OPTIONS_FILTER: &str = "wp-vite-manifest/options";
/// Dev-server descriptor, before the origin is composed with the port.
pub const DEV_MANIFEST_FILTER: &str = "wp-vite-manifest/vite-manifest-dev";
/// Asset set produced by a development-mode resolution.
pub const DEVELOPMENT_ASSETS_FILTER: &str = "wp-vite-manifest/development-assets";
