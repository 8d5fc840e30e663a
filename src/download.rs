//! Built-in installer that fetches a static FFmpeg release instead of
//! running a script.

use std::{
  env::consts::ARCH,
  fs::{self, File},
  path::{Path, PathBuf},
  time::Duration,
};

use crate::{
  companion::Companion,
  error::{Error, Result},
  installer::Installer,
  logger::Logger,
  platform::Platform,
};

pub const LINUX_DOWNLOAD: &str =
  "https://johnvansickle.com/ffmpeg/releases/ffmpeg-release-amd64-static.tar.xz";
pub const LINUX_ARM64_DOWNLOAD: &str =
  "https://johnvansickle.com/ffmpeg/releases/ffmpeg-release-arm64-static.tar.xz";
pub const WINDOWS_DOWNLOAD: &str =
  "https://www.gyan.dev/ffmpeg/builds/ffmpeg-release-essentials.zip";
pub const MACOS_DOWNLOAD: &str = "https://evermeet.cx/ffmpeg/getrelease/zip";

#[cfg(target_os = "linux")]
const ARCHIVE_NAME: &str = "ffmpeg-release.tar.xz";
#[cfg(not(target_os = "linux"))]
const ARCHIVE_NAME: &str = "ffmpeg-release.zip";

/// Release archive URL for a platform and CPU architecture.
pub fn ffmpeg_download_url(platform: Platform, arch: &str) -> Result<&'static str> {
  match (platform, arch) {
    (Platform::Linux, "x86_64") => Ok(LINUX_DOWNLOAD),
    (Platform::Linux, "aarch64") => Ok(LINUX_ARM64_DOWNLOAD),
    (Platform::Windows, "x86_64") => Ok(WINDOWS_DOWNLOAD),
    (Platform::MacOs, _) => Ok(MACOS_DOWNLOAD),
    _ => Err(Error::msg(format!(
      "No FFmpeg download available for {platform} ({arch})"
    ))),
  }
}

/// Download `url` into `destination`, returning the archive path.
///
/// `timeout` bounds the whole request; `None` lets it run as long as it takes.
pub fn download_archive(url: &str, destination: &Path, timeout: Option<Duration>) -> Result<PathBuf> {
  let client = reqwest::blocking::Client::builder()
    .timeout(timeout)
    .build()
    .map_err(Error::from_std)?;

  let mut response = client
    .get(url)
    .send()
    .and_then(|response| response.error_for_status())
    .map_err(Error::from_std)?;

  let archive_path = destination.join(ARCHIVE_NAME);
  let mut file = File::create(&archive_path)?;
  response.copy_to(&mut file).map_err(Error::from_std)?;
  Ok(archive_path)
}

/// Extract the `ffmpeg` binary from a release archive into `destination`,
/// wherever it sits inside the archive.
#[cfg(target_os = "linux")]
pub fn unpack_ffmpeg(archive_path: &Path, destination: &Path, platform: Platform) -> Result<PathBuf> {
  let binary = platform.binary_names()[0];
  let file = File::open(archive_path)?;
  let mut archive = tar::Archive::new(xz2::read::XzDecoder::new(file));

  for entry in archive.entries()? {
    let mut entry = entry?;
    let is_ffmpeg = entry.header().entry_type().is_file()
      && entry.path()?.file_name().is_some_and(|name| name == binary);
    if is_ffmpeg {
      let target = destination.join(binary);
      entry.unpack(&target)?;
      return Ok(target);
    }
  }

  Err(Error::msg("No ffmpeg binary found in the release archive"))
}

/// Extract the `ffmpeg` binary from a release archive into `destination`,
/// wherever it sits inside the archive.
#[cfg(not(target_os = "linux"))]
pub fn unpack_ffmpeg(archive_path: &Path, destination: &Path, platform: Platform) -> Result<PathBuf> {
  let binary = platform.binary_names()[0];
  let file = File::open(archive_path)?;
  let mut archive = zip::ZipArchive::new(file).map_err(Error::from_std)?;

  for index in 0..archive.len() {
    let mut entry = archive.by_index(index).map_err(Error::from_std)?;
    let is_ffmpeg = !entry.is_dir()
      && Path::new(entry.name())
        .file_name()
        .is_some_and(|name| name == binary);
    if is_ffmpeg {
      let target = destination.join(binary);
      let mut out = File::create(&target)?;
      std::io::copy(&mut entry, &mut out)?;
      return Ok(target);
    }
  }

  Err(Error::msg("No ffmpeg binary found in the release archive"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let mut permissions = fs::metadata(path)?.permissions();
  permissions.set_mode(0o755);
  fs::set_permissions(path, permissions)?;
  Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
  Ok(())
}

/// Downloads the platform's static FFmpeg release into the companion
/// package's `bin` directory.
#[derive(Debug, Clone)]
pub struct DownloadInstaller {
  platform: Platform,
  url: Option<String>,
  timeout: Option<Duration>,
}

impl DownloadInstaller {
  pub fn new(platform: Platform) -> Self {
    Self {
      platform,
      url: None,
      timeout: None,
    }
  }

  /// Fetch the archive from `url` instead of the platform's release URL.
  /// The archive must use the format `unpack_ffmpeg` expects on this target.
  pub fn url<S: Into<String>>(mut self, url: S) -> Self {
    self.url = Some(url.into());
    self
  }

  pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  fn try_install(&self, companion: &dyn Companion, log: &dyn Logger) -> Result<PathBuf> {
    let destination = companion
      .module_dir()
      .map(|dir| dir.join("bin"))
      .ok_or("the companion package is not installed")?;
    let url = match &self.url {
      Some(url) => url.as_str(),
      None => ffmpeg_download_url(self.platform, ARCH)?,
    };

    log.info(format_args!("Downloading FFmpeg from {}", url));
    fs::create_dir_all(&destination)?;
    let archive_path = download_archive(url, &destination, self.timeout)?;
    let unpacked = unpack_ffmpeg(&archive_path, &destination, self.platform);
    let _ = fs::remove_file(&archive_path);

    let binary = unpacked?;
    make_executable(&binary)?;
    Ok(binary)
  }
}

impl Installer for DownloadInstaller {
  fn install(&self, companion: &dyn Companion, log: &dyn Logger) -> bool {
    match self.try_install(companion, log) {
      Ok(binary) => {
        log.info(format_args!("FFmpeg installed at {}", binary.display()));
        true
      }
      Err(e) => {
        log.error(format_args!("FFmpeg download failed: {}", e));
        false
      }
    }
  }
}
