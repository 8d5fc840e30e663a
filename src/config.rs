//! Resolver configuration: where the companion package lives, how its
//! installer is launched, and how strictly candidates are checked.

use std::{env, ffi::OsString, path::PathBuf, time::Duration};

use crate::{locate::CandidateCheck, paths::default_search_roots, platform::Platform};

pub const DEFAULT_PACKAGE: &str = "ffmpeg-bundle";
pub const DEFAULT_ENTRY: &str = "package.toml";

pub const ENV_BINARY: &str = "FFMPEG_RESOLVER_BINARY";
pub const ENV_PACKAGE: &str = "FFMPEG_RESOLVER_PACKAGE";
pub const ENV_SEARCH_PATH: &str = "FFMPEG_RESOLVER_SEARCH_PATH";
pub const ENV_RUNTIME: &str = "FFMPEG_RESOLVER_RUNTIME";
pub const ENV_TIMEOUT_SECS: &str = "FFMPEG_RESOLVER_TIMEOUT_SECS";
pub const ENV_VERIFY: &str = "FFMPEG_RESOLVER_VERIFY";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
  /// Pre-resolved binary path advertised by the companion package. Returned
  /// as-is, without touching the filesystem.
  pub static_binary: Option<PathBuf>,
  /// Directory name of the companion package under each search root.
  pub package: String,
  /// File whose presence marks the package as installed.
  pub entry: String,
  /// Installer script, relative to the package directory.
  pub installer: String,
  /// Roots searched for `<root>/<package>`, first match wins.
  pub search_roots: Vec<PathBuf>,
  /// Program used to run the installer script. `None` runs it with the
  /// current executable.
  pub runtime: Option<PathBuf>,
  /// Kill the installer after this long. `None` waits indefinitely.
  pub installer_timeout: Option<Duration>,
  pub candidate_check: CandidateCheck,
}

impl ResolverConfig {
  /// Defaults for the given platform, searching next to the executable and in
  /// the working directory.
  pub fn for_platform(platform: Platform) -> Self {
    Self {
      static_binary: None,
      package: DEFAULT_PACKAGE.to_string(),
      entry: DEFAULT_ENTRY.to_string(),
      installer: platform.installer_script().to_string(),
      search_roots: default_search_roots(),
      runtime: None,
      installer_timeout: None,
      candidate_check: CandidateCheck::Exists,
    }
  }

  /// Defaults for the current platform with `FFMPEG_RESOLVER_*` environment
  /// overrides applied.
  pub fn from_env() -> Self {
    let mut config = Self::for_platform(Platform::current());
    config.apply_overrides(|key| env::var_os(key));
    config
  }

  /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<OsString>,
  {
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(binary) = get(ENV_BINARY) {
      self.static_binary = Some(PathBuf::from(binary));
    }

    if let Some(package) = get(ENV_PACKAGE) {
      self.package = package.to_string_lossy().into_owned();
    }

    if let Some(search_path) = get(ENV_SEARCH_PATH) {
      let mut roots: Vec<PathBuf> = env::split_paths(&search_path)
        .filter(|root| !root.as_os_str().is_empty())
        .collect();
      roots.append(&mut self.search_roots);
      let mut deduped: Vec<PathBuf> = Vec::with_capacity(roots.len());
      for root in roots {
        if !deduped.contains(&root) {
          deduped.push(root);
        }
      }
      self.search_roots = deduped;
    }

    if let Some(runtime) = get(ENV_RUNTIME) {
      self.runtime = Some(PathBuf::from(runtime));
    }

    if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
      let raw = timeout.to_string_lossy();
      match raw.trim().parse::<u64>() {
        Ok(0) => self.installer_timeout = None,
        Ok(secs) => self.installer_timeout = Some(Duration::from_secs(secs)),
        Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
      }
    }

    if let Some(verify) = get(ENV_VERIFY) {
      self.candidate_check = match verify.to_string_lossy().trim() {
        "1" | "true" | "yes" => CandidateCheck::Executable,
        _ => CandidateCheck::Exists,
      };
    }
  }
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self::for_platform(Platform::current())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_with(vars: &[(&str, &str)]) -> ResolverConfig {
    let vars: HashMap<String, OsString> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), OsString::from(v)))
      .collect();
    let mut config = ResolverConfig::for_platform(Platform::Linux);
    config.search_roots = vec![PathBuf::from("/opt/app")];
    config.apply_overrides(|key| vars.get(key).cloned());
    config
  }

  #[test]
  fn test_defaults() {
    let config = ResolverConfig::for_platform(Platform::Windows);
    assert_eq!(config.package, "ffmpeg-bundle");
    assert_eq!(config.entry, "package.toml");
    assert_eq!(config.installer, "install.cmd");
    assert_eq!(config.static_binary, None);
    assert_eq!(config.installer_timeout, None);
    assert_eq!(config.candidate_check, CandidateCheck::Exists);
  }

  #[test]
  fn test_empty_values_are_ignored() {
    let config = config_with(&[(ENV_BINARY, ""), (ENV_PACKAGE, ""), (ENV_RUNTIME, "")]);
    assert_eq!(config.static_binary, None);
    assert_eq!(config.package, DEFAULT_PACKAGE);
    assert_eq!(config.runtime, None);
  }

  #[test]
  fn test_overrides() {
    let config = config_with(&[
      (ENV_BINARY, "/usr/bin/ffmpeg"),
      (ENV_PACKAGE, "ffmpeg-static"),
      (ENV_RUNTIME, "/bin/sh"),
      (ENV_TIMEOUT_SECS, "90"),
      (ENV_VERIFY, "true"),
    ]);
    assert_eq!(config.static_binary, Some(PathBuf::from("/usr/bin/ffmpeg")));
    assert_eq!(config.package, "ffmpeg-static");
    assert_eq!(config.runtime, Some(PathBuf::from("/bin/sh")));
    assert_eq!(config.installer_timeout, Some(Duration::from_secs(90)));
    assert_eq!(config.candidate_check, CandidateCheck::Executable);
  }

  #[test]
  fn test_invalid_timeout_is_ignored() {
    let config = config_with(&[(ENV_TIMEOUT_SECS, "soon")]);
    assert_eq!(config.installer_timeout, None);
  }

  #[cfg(unix)]
  #[test]
  fn test_search_path_is_prepended() {
    let config = config_with(&[(ENV_SEARCH_PATH, "/srv/a:/opt/app:/srv/b")]);
    assert_eq!(
      config.search_roots,
      vec![
        PathBuf::from("/srv/a"),
        PathBuf::from("/opt/app"),
        PathBuf::from("/srv/b"),
      ]
    );
  }
}
