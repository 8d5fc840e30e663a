//! The companion package that bundles or fetches FFmpeg on the host's behalf.
//!
//! Every probe returns an `Option`: a package that is not installed is an
//! ordinary outcome, not an error.

use std::path::{Path, PathBuf};

use crate::{
  config::{ResolverConfig, DEFAULT_ENTRY},
  platform::Platform,
};

pub trait Companion {
  /// Binary path advertised up front by the package, if any.
  fn binary_path(&self) -> Option<PathBuf>;

  /// Location of the package's entry file. Its parent directory is where
  /// bundled binaries are searched.
  fn module_path(&self) -> Option<PathBuf>;

  /// Location of the installer script shipped with the package.
  fn installer_path(&self) -> Option<PathBuf>;

  /// Directory of the resolved package, if it is installed.
  fn module_dir(&self) -> Option<PathBuf> {
    self
      .module_path()
      .and_then(|entry| entry.parent().map(Path::to_path_buf))
  }
}

/// A companion package installed as `<root>/<name>` under one of a list of
/// search roots.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionPackage {
  name: String,
  entry: String,
  installer: String,
  search_roots: Vec<PathBuf>,
  binary: Option<PathBuf>,
}

impl CompanionPackage {
  /// A package named `name` with the default entry file and `platform`'s
  /// installer script name.
  pub fn new<S: Into<String>>(name: S, platform: Platform) -> Self {
    Self {
      name: name.into(),
      entry: DEFAULT_ENTRY.to_string(),
      installer: platform.installer_script().to_string(),
      search_roots: Vec::new(),
      binary: None,
    }
  }

  pub fn from_config(config: &ResolverConfig) -> Self {
    Self {
      name: config.package.clone(),
      entry: config.entry.clone(),
      installer: config.installer.clone(),
      search_roots: config.search_roots.clone(),
      binary: config.static_binary.clone(),
    }
  }

  pub fn installer<S: Into<String>>(mut self, installer: S) -> Self {
    self.installer = installer.into();
    self
  }

  pub fn search_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
    self.search_roots.push(root.into());
    self
  }

  /// Set the pre-resolved binary path. An empty path is treated as unset.
  pub fn binary<P: Into<PathBuf>>(mut self, binary: P) -> Self {
    self.binary = Some(binary.into());
    self
  }

  /// First `<root>/<name>/<relative>` that exists as a file.
  fn find_in_roots(&self, relative: &str) -> Option<PathBuf> {
    self
      .search_roots
      .iter()
      .map(|root| root.join(&self.name).join(relative))
      .find(|candidate| candidate.is_file())
  }
}

impl Companion for CompanionPackage {
  fn binary_path(&self) -> Option<PathBuf> {
    self
      .binary
      .clone()
      .filter(|path| !path.as_os_str().is_empty())
  }

  fn module_path(&self) -> Option<PathBuf> {
    self.find_in_roots(&self.entry)
  }

  fn installer_path(&self) -> Option<PathBuf> {
    self.find_in_roots(&self.installer)
  }
}
