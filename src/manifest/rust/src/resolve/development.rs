/* src/manifest/rust/src/resolve/development.rs */

use std::sync::OnceLock;

use regex::Regex;
use wp_vite_host::{Host, InlinePosition, ScriptRegistration};

use crate::asset_set::ResolvedAssetSet;
use crate::manifest::DevServer;
use crate::options::ResolutionOptions;
use crate::script_tag::filter_script_tag;
use crate::{DEVELOPMENT_ASSETS_FILTER, REACT_REFRESH_PLUGIN, VITE_CLIENT_SCRIPT_HANDLE};

fn slash_run_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"/{2,}").unwrap())
}

/// URL of `entry` as served by the dev server.
pub fn development_asset_src(server: &DevServer, entry: &str) -> String {
  let path = format!("{}/{entry}", server.base);
  let path = slash_run_re().replace_all(&path, "/");
  format!("{}/{}", server.origin.trim_end_matches('/'), path.trim_matches('/'))
}

pub fn react_refresh_preamble(src: &str) -> String {
  format!(
    concat!(
      "import RefreshRuntime from \"{src}\";\n",
      "RefreshRuntime.injectIntoGlobalHook(window);\n",
      "window.__VITE_IS_MODERN__ = true;\n",
      "window.$RefreshReg$ = () => {{}};\n",
      "window.$RefreshSig$ = () => (type) => type;\n",
      "window.__vite_plugin_react_preamble_installed__ = true;",
    ),
    src = src,
  )
}

/// Register the dev-server client once per registry, with the fast-refresh
/// preamble attached when the server advertises it.
fn register_vite_client(host: &Host, server: &DevServer) {
  if host.registry.is_script_registered(VITE_CLIENT_SCRIPT_HANDLE) {
    return;
  }

  let registered = host.registry.register_script(ScriptRegistration {
    handle: VITE_CLIENT_SCRIPT_HANDLE.to_string(),
    src: development_asset_src(server, "@vite/client"),
    deps: vec![],
    version: None,
    in_footer: false,
  });
  if !registered {
    tracing::warn!(handle = VITE_CLIENT_SCRIPT_HANDLE, "dev client registration refused");
    return;
  }
  filter_script_tag(&host.hooks, VITE_CLIENT_SCRIPT_HANDLE);

  if server.has_plugin(REACT_REFRESH_PLUGIN) {
    let preamble = react_refresh_preamble(&development_asset_src(server, "@react-refresh"));
    host.registry.add_inline_script(VITE_CLIENT_SCRIPT_HANDLE, &preamble, InlinePosition::After);
  }
}

/// Dev mode never walks the manifest graph: the server resolves imports and
/// injects styles itself, so only the entry script is registered.
pub(crate) fn resolve_development(
  host: &Host,
  server: &DevServer,
  entry: &str,
  options: &ResolutionOptions,
) -> Option<ResolvedAssetSet> {
  register_vite_client(host, server);

  let mut deps = vec![VITE_CLIENT_SCRIPT_HANDLE.to_string()];
  deps.extend(options.dependencies.iter().cloned());

  filter_script_tag(&host.hooks, &options.handle);
  let registered = host.registry.register_script(ScriptRegistration {
    handle: options.handle.clone(),
    src: development_asset_src(server, entry),
    deps,
    version: None,
    in_footer: options.in_footer,
  });
  if !registered {
    tracing::warn!(handle = %options.handle, entry, "dev script registration refused");
    return None;
  }

  let assets = ResolvedAssetSet {
    scripts: vec![options.handle.clone()],
    styles: options.css_dependencies.clone(),
  };
  let args = [serde_json::json!(entry), serde_json::to_value(options).unwrap_or_default()];
  Some(host.hooks.apply_filters_as(DEVELOPMENT_ASSETS_FILTER, assets, &args))
}
