/* src/manifest/rust/src/resolve/mod.rs */

mod development;
mod production;


pub use development::{development_asset_src, react_refresh_preamble};
pub(crate) use development::resolve_development;
pub(crate) use production::ProductionResolver;

/// URL of a production build artifact under `base_url`.
pub(crate) fn asset_url(base_url: &str, path: &str) -> String {
  format!("{}/{path}", base_url.trim_end_matches('/'))
}
