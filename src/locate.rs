use std::path::{Path, PathBuf};

use crate::{companion::Companion, platform::Platform};

/// How a candidate path is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateCheck {
  /// Anything that exists on disk.
  #[default]
  Exists,
  /// A regular file that the current user may execute. On non-Unix platforms
  /// this only requires a regular file.
  Executable,
}

impl CandidateCheck {
  pub fn accepts(self, path: &Path) -> bool {
    match self {
      CandidateCheck::Exists => path.exists(),
      CandidateCheck::Executable => is_executable(path),
    }
  }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;

  path
    .metadata()
    .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
    .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file()
}

/// Every location searched inside `module_dir`, in precedence order.
///
/// Binary names form the outer loop, so on Windows `ffmpeg.exe` in `bin/`
/// still beats a bare `ffmpeg` in the package root.
pub fn candidate_paths(module_dir: &Path, platform: Platform) -> Vec<PathBuf> {
  platform
    .binary_names()
    .iter()
    .flat_map(|name| [module_dir.join(name), module_dir.join("bin").join(name)])
    .collect()
}

/// Look for an FFmpeg binary bundled inside the companion package.
///
/// Returns `None` silently when the package is not installed or none of the
/// candidates pass `check`.
pub fn locate_bundled(
  companion: &dyn Companion,
  platform: Platform,
  check: CandidateCheck,
) -> Option<PathBuf> {
  let module_dir = companion.module_dir()?;
  candidate_paths(&module_dir, platform)
    .into_iter()
    .find(|candidate| check.accepts(candidate))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::companion::CompanionPackage;
  use std::fs;

  fn package_in(root: &Path) -> CompanionPackage {
    let dir = root.join("ffmpeg-bundle");
    fs::create_dir_all(dir.join("bin")).unwrap();
    fs::write(dir.join("package.toml"), "").unwrap();
    CompanionPackage::new("ffmpeg-bundle", Platform::Linux).search_root(root)
  }

  #[test]
  fn test_candidate_order() {
    let dir = Path::new("pkg");
    assert_eq!(
      candidate_paths(dir, Platform::Windows),
      vec![
        dir.join("ffmpeg.exe"),
        dir.join("bin").join("ffmpeg.exe"),
        dir.join("ffmpeg"),
        dir.join("bin").join("ffmpeg"),
      ]
    );
    assert_eq!(
      candidate_paths(dir, Platform::Linux),
      vec![dir.join("ffmpeg"), dir.join("bin").join("ffmpeg")]
    );
  }

  #[test]
  fn test_root_before_bin() {
    let root = tempfile::tempdir().unwrap();
    let package = package_in(root.path());
    let dir = root.path().join("ffmpeg-bundle");
    fs::write(dir.join("ffmpeg"), "").unwrap();
    fs::write(dir.join("bin/ffmpeg"), "").unwrap();

    let found = locate_bundled(&package, Platform::Linux, CandidateCheck::Exists);
    assert_eq!(found, Some(dir.join("ffmpeg")));
  }

  #[test]
  fn test_bin_fallback() {
    let root = tempfile::tempdir().unwrap();
    let package = package_in(root.path());
    let dir = root.path().join("ffmpeg-bundle");
    fs::write(dir.join("bin/ffmpeg"), "").unwrap();

    let found = locate_bundled(&package, Platform::Linux, CandidateCheck::Exists);
    assert_eq!(found, Some(dir.join("bin").join("ffmpeg")));
  }

  #[test]
  fn test_windows_prefers_exe_at_same_location() {
    let root = tempfile::tempdir().unwrap();
    let package = package_in(root.path());
    let dir = root.path().join("ffmpeg-bundle");
    fs::write(dir.join("ffmpeg"), "").unwrap();
    fs::write(dir.join("ffmpeg.exe"), "").unwrap();

    let found = locate_bundled(&package, Platform::Windows, CandidateCheck::Exists);
    assert_eq!(found, Some(dir.join("ffmpeg.exe")));
  }

  #[test]
  fn test_nothing_bundled() {
    let root = tempfile::tempdir().unwrap();
    let package = package_in(root.path());
    assert_eq!(
      locate_bundled(&package, Platform::Linux, CandidateCheck::Exists),
      None
    );
  }

  #[cfg(unix)]
  #[test]
  fn test_executable_check_skips_plain_files() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let package = package_in(root.path());
    let dir = root.path().join("ffmpeg-bundle");
    fs::write(dir.join("ffmpeg"), "").unwrap();
    fs::write(dir.join("bin/ffmpeg"), "").unwrap();
    fs::set_permissions(dir.join("bin/ffmpeg"), fs::Permissions::from_mode(0o755)).unwrap();

    let found = locate_bundled(&package, Platform::Linux, CandidateCheck::Executable);
    assert_eq!(found, Some(dir.join("bin").join("ffmpeg")));
    let found = locate_bundled(&package, Platform::Linux, CandidateCheck::Exists);
    assert_eq!(found, Some(dir.join("ffmpeg")));
  }
}
