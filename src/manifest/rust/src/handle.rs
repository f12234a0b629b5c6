/* src/manifest/rust/src/handle.rs */

// Generated handles are positional: the same manifest always yields the same
// names, reordering `imports` renames them.

/// Suffix for the `index`-th import of a node whose own suffix is `parent_suffix`.
pub fn child_suffix(parent_suffix: &str, index: usize) -> String {
  format!("_{parent_suffix}{index}")
}

/// Handle for the `index`-th stylesheet emitted by the script registered as `script_handle`.
pub fn style_handle(script_handle: &str, index: usize) -> String {
  format!("{script_handle}-{index}")
}
