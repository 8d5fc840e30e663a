use crate::error::Result;
use std::{
  env::{current_dir, current_exe},
  path::PathBuf,
};

/// The directory containing the running executable.
///
/// Companion packages shipped alongside an application are expected here.
pub fn sidecar_dir() -> Result<PathBuf> {
  Ok(
    current_exe()?
      .parent()
      .ok_or("Can't get parent of current_exe")?
      .to_path_buf(),
  )
}

/// Default roots searched for the companion package, in order: the
/// executable's directory, then the working directory.
///
/// Roots that cannot be determined are skipped, and a root equal to an
/// earlier one is only listed once.
pub fn default_search_roots() -> Vec<PathBuf> {
  let mut roots: Vec<PathBuf> = Vec::new();
  for root in [sidecar_dir().ok(), current_dir().ok()].into_iter().flatten() {
    if !roots.contains(&root) {
      roots.push(root);
    }
  }
  roots
}
