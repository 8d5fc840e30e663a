//! Platform identifier used to pick binary filename candidates.

use std::{env::consts::OS, fmt};

const WINDOWS_BINARY_NAMES: &[&str] = &["ffmpeg.exe", "ffmpeg"];
const UNIX_BINARY_NAMES: &[&str] = &["ffmpeg"];
const WINDOWS_SHELL_ARGS: &[&str] = &["/C"];
const UNIX_SHELL_ARGS: &[&str] = &[];

/// The operating system the resolver searches for.
///
/// Passed into the resolver explicitly so lookups can be exercised for a
/// platform other than the one running the tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
  Windows,
  Linux,
  MacOs,
  Other,
}

impl Platform {
  /// The platform of the running process.
  pub fn current() -> Self {
    Self::from_os(OS)
  }

  /// Map an `std::env::consts::OS` style identifier.
  pub fn from_os(os: &str) -> Self {
    match os {
      "windows" => Platform::Windows,
      "linux" => Platform::Linux,
      "macos" => Platform::MacOs,
      _ => Platform::Other,
    }
  }

  /// Binary filenames to try, in order of preference.
  ///
  /// On Windows `ffmpeg.exe` is preferred, with the bare name as a fallback
  /// for packages that ship an extensionless build.
  pub fn binary_names(self) -> &'static [&'static str] {
    match self {
      Platform::Windows => WINDOWS_BINARY_NAMES,
      _ => UNIX_BINARY_NAMES,
    }
  }

  /// Shell that runs an installer script when no runtime is configured, with
  /// the arguments placed before the script path.
  pub fn script_shell(self) -> (&'static str, &'static [&'static str]) {
    match self {
      Platform::Windows => ("cmd", WINDOWS_SHELL_ARGS),
      _ => ("/bin/sh", UNIX_SHELL_ARGS),
    }
  }

  /// Default filename of the installer script shipped by the companion package.
  pub fn installer_script(self) -> &'static str {
    match self {
      Platform::Windows => "install.cmd",
      _ => "install.sh",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Platform::Windows => "windows",
      Platform::Linux => "linux",
      Platform::MacOs => "macos",
      Platform::Other => "other",
    };
    f.write_str(name)
  }
}
