use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::process::{Command, Stdio};

/// Run `<path> -version` and return the parsed version string.
///
/// Used to confirm that a resolved binary actually runs. The version itself is
/// not compared against anything.
pub fn ffmpeg_version_with_path<S: AsRef<OsStr>>(path: S) -> Result<String> {
  let output = Command::new(&path)
    .arg("-version")
    .stdin(Stdio::null())
    .stderr(Stdio::null())
    .output() // version info goes to stdout
    .map_err(|e| Error::from(e).context("Failed to run ffmpeg -version"))?;

  if !output.status.success() {
    return Err(Error::msg("ffmpeg -version exited with non-zero status"));
  }

  let stdout = String::from_utf8_lossy(&output.stdout);
  stdout
    .lines()
    .find_map(try_parse_version)
    .ok_or_else(|| Error::msg("Failed to parse ffmpeg version"))
}

/// Parses the version out of the banner line `ffmpeg version <version> ...`.
///
/// ```rust
/// use ffmpeg_resolver::version::try_parse_version;
///
/// let line = "ffmpeg version 7.0.2-static https://johnvansickle.com/ffmpeg/  Copyright (c) 2000-2024 the FFmpeg developers";
/// assert_eq!(try_parse_version(line).as_deref(), Some("7.0.2-static"));
/// ```
pub fn try_parse_version(line: &str) -> Option<String> {
  line
    .trim()
    .strip_prefix("ffmpeg version ")?
    .split_whitespace()
    .next()
    .map(|s| s.to_string())
}
