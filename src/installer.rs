//! Provisioning FFmpeg when the companion package does not bundle it yet.

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
};

use crate::{
  companion::Companion,
  config::ResolverConfig,
  logger::Logger,
  platform::Platform,
  process::{InheritedRunner, ProcessRunner},
};

/// Something that can put an FFmpeg binary into the companion package.
///
/// Returns `true` when the installer reports success. Failures are logged
/// through `log` and reported as `false`; callers re-run the bundled lookup
/// to find out whether a binary actually appeared.
pub trait Installer {
  fn install(&self, companion: &dyn Companion, log: &dyn Logger) -> bool;
}

/// Runs the installer script shipped with the companion package.
///
/// With an explicit `runtime` the script is passed as its only argument.
/// Otherwise the platform's shell runs it (`/bin/sh <script>`, or
/// `cmd /C <script>` on Windows). The call blocks until the script exits, or
/// until the runner's timeout elapses if one was configured.
#[derive(Debug, Clone)]
pub struct ScriptInstaller<R = InheritedRunner> {
  platform: Platform,
  runtime: Option<PathBuf>,
  runner: R,
}

impl ScriptInstaller<InheritedRunner> {
  pub fn new(platform: Platform) -> Self {
    Self::with_runner(InheritedRunner::new(), platform)
  }

  pub fn from_config(config: &ResolverConfig, platform: Platform) -> Self {
    Self {
      platform,
      runtime: config.runtime.clone(),
      runner: InheritedRunner::with_timeout(config.installer_timeout),
    }
  }
}

impl<R: ProcessRunner> ScriptInstaller<R> {
  pub fn with_runner(runner: R, platform: Platform) -> Self {
    Self {
      platform,
      runtime: None,
      runner,
    }
  }

  /// Run the script with this program instead of the platform shell, e.g.
  /// `node` or `std::env::current_exe()`.
  pub fn runtime<P: Into<PathBuf>>(mut self, runtime: P) -> Self {
    self.runtime = Some(runtime.into());
    self
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  fn launch(&self, script: &Path) -> std::io::Result<crate::process::ExitOutcome> {
    match &self.runtime {
      Some(runtime) => self.runner.run(runtime, &[script.as_os_str()]),
      None => {
        let (shell, shell_args) = self.platform.script_shell();
        let mut args: Vec<&OsStr> = shell_args.iter().map(OsStr::new).collect();
        args.push(script.as_os_str());
        self.runner.run(Path::new(shell), &args)
      }
    }
  }
}

impl<R: ProcessRunner> Installer for ScriptInstaller<R> {
  fn install(&self, companion: &dyn Companion, log: &dyn Logger) -> bool {
    let Some(installer_path) = companion.installer_path() else {
      log.warn(format_args!(
        "Unable to locate the FFmpeg installer. Please reinstall the dependency or install FFmpeg manually."
      ));
      return false;
    };

    log.info(format_args!(
      "Attempting to download the bundled FFmpeg binary. This may take a moment."
    ));

    match self.launch(&installer_path) {
      Err(e) => {
        log.error(format_args!("FFmpeg download failed: {}", e));
        false
      }
      Ok(outcome) if !outcome.success() => {
        let code = outcome
          .code
          .map(|code| code.to_string())
          .unwrap_or_else(|| "unknown".to_string());
        log.error(format_args!("FFmpeg download failed with exit code {}.", code));
        false
      }
      Ok(_) => true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    companion::CompanionPackage,
    test::{FakeRunner, Level, RecordingLogger},
  };
  use std::{ffi::OsString, fs, io};

  fn package_with_installer(root: &Path) -> CompanionPackage {
    let dir = root.join("ffmpeg-bundle");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("install.sh"), "").unwrap();
    CompanionPackage::new("ffmpeg-bundle", Platform::Linux).search_root(root)
  }

  fn linux_installer(runner: FakeRunner) -> ScriptInstaller<FakeRunner> {
    ScriptInstaller::with_runner(runner, Platform::Linux)
  }

  #[test]
  fn test_missing_installer_warns_once() {
    let root = tempfile::tempdir().unwrap();
    let package = CompanionPackage::new("ffmpeg-bundle", Platform::Linux).search_root(root.path());
    let installer = linux_installer(FakeRunner::exit(Some(0)));
    let log = RecordingLogger::default();

    assert!(!installer.install(&package, &log));
    assert_eq!(log.count(Level::Warn), 1);
    assert_eq!(log.count(Level::Info), 0);
    assert_eq!(installer.runner().calls(), 0);
  }

  #[test]
  fn test_passes_script_to_runtime() {
    let root = tempfile::tempdir().unwrap();
    let package = package_with_installer(root.path());
    let installer = linux_installer(FakeRunner::exit(Some(0))).runtime("/usr/bin/node");
    let log = RecordingLogger::default();

    assert!(installer.install(&package, &log));
    let (program, args) = installer.runner().last_call().unwrap();
    assert_eq!(program, PathBuf::from("/usr/bin/node"));
    assert_eq!(args, vec![root.path().join("ffmpeg-bundle/install.sh").into_os_string()]);
    assert_eq!(log.count(Level::Info), 1);
    assert_eq!(log.count(Level::Error), 0);
  }

  #[test]
  fn test_default_runtime_is_platform_shell() {
    let root = tempfile::tempdir().unwrap();
    let package = package_with_installer(root.path());
    let script = root.path().join("ffmpeg-bundle/install.sh").into_os_string();

    let installer = linux_installer(FakeRunner::exit(Some(0)));
    assert!(installer.install(&package, &RecordingLogger::default()));
    let (program, args) = installer.runner().last_call().unwrap();
    assert_eq!(program, PathBuf::from("/bin/sh"));
    assert_eq!(args, vec![script.clone()]);

    let installer = ScriptInstaller::with_runner(FakeRunner::exit(Some(0)), Platform::Windows);
    assert!(installer.install(&package, &RecordingLogger::default()));
    let (program, args) = installer.runner().last_call().unwrap();
    assert_eq!(program, PathBuf::from("cmd"));
    assert_eq!(args, vec![OsString::from("/C"), script]);
  }

  #[test]
  fn test_nonzero_exit_is_logged() {
    let root = tempfile::tempdir().unwrap();
    let package = package_with_installer(root.path());
    let installer = linux_installer(FakeRunner::exit(Some(7)));
    let log = RecordingLogger::default();

    assert!(!installer.install(&package, &log));
    assert_eq!(log.count(Level::Error), 1);
    assert!(log.messages(Level::Error)[0].contains('7'));
  }

  #[test]
  fn test_missing_exit_code_uses_placeholder() {
    let root = tempfile::tempdir().unwrap();
    let package = package_with_installer(root.path());
    let installer = linux_installer(FakeRunner::exit(None));
    let log = RecordingLogger::default();

    assert!(!installer.install(&package, &log));
    assert!(log.messages(Level::Error)[0].contains("unknown"));
  }

  #[test]
  fn test_launch_failure_is_logged() {
    let root = tempfile::tempdir().unwrap();
    let package = package_with_installer(root.path());
    let installer = linux_installer(FakeRunner::fail(io::ErrorKind::NotFound, "no such runtime"));
    let log = RecordingLogger::default();

    assert!(!installer.install(&package, &log));
    assert_eq!(log.count(Level::Error), 1);
    assert!(log.messages(Level::Error)[0].contains("no such runtime"));
  }
}
