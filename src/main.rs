use std::process::ExitCode;

use ffmpeg_resolver::{
  config::ResolverConfig,
  logger::{init_tracing, TracingLogger},
  platform::Platform,
  resolver::VideoProcessorResolver,
  version::ffmpeg_version_with_path,
};

const USAGE: &str = "Usage: ffmpeg-resolver [--download] [--version]

Print the path of a usable FFmpeg binary, installing it if necessary.

  --download   fetch a static release instead of running the package installer
  --version    also run the binary and print its version";

fn main() -> anyhow::Result<ExitCode> {
  let mut download = false;
  let mut probe_version = false;
  for arg in std::env::args().skip(1) {
    match arg.as_str() {
      "--download" => download = true,
      "--version" => probe_version = true,
      "-h" | "--help" => {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
      }
      other => anyhow::bail!("unknown argument `{other}`\n\n{USAGE}"),
    }
  }

  init_tracing("info");

  let config = ResolverConfig::from_env();
  let platform = Platform::current();
  let resolver = VideoProcessorResolver::from_config(&config, platform);
  let log = TracingLogger;

  let resolved = if download {
    resolve_with_download(resolver, &config, platform, &log)?
  } else {
    resolver.resolve(&log)
  };

  let Some(path) = resolved else {
    eprintln!("FFmpeg could not be resolved. Install it manually or set FFMPEG_RESOLVER_BINARY.");
    return Ok(ExitCode::FAILURE);
  };

  println!("{}", path.display());
  if probe_version {
    let version = ffmpeg_version_with_path(&path)?;
    println!("FFmpeg version: {version}");
  }
  Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "download_ffmpeg")]
fn resolve_with_download(
  resolver: VideoProcessorResolver,
  config: &ResolverConfig,
  platform: Platform,
  log: &TracingLogger,
) -> anyhow::Result<Option<std::path::PathBuf>> {
  use ffmpeg_resolver::download::DownloadInstaller;

  let installer = DownloadInstaller::new(platform).timeout(config.installer_timeout);
  Ok(resolver.with_installer(installer).resolve(log))
}

#[cfg(not(feature = "download_ffmpeg"))]
fn resolve_with_download(
  _resolver: VideoProcessorResolver,
  _config: &ResolverConfig,
  _platform: Platform,
  _log: &TracingLogger,
) -> anyhow::Result<Option<std::path::PathBuf>> {
  anyhow::bail!(r#"--download requires the "download_ffmpeg" feature"#)
}
