//! The public entry point: find a usable FFmpeg binary or report that none
//! could be found.

use std::path::PathBuf;

use crate::{
  companion::{Companion, CompanionPackage},
  config::ResolverConfig,
  installer::{Installer, ScriptInstaller},
  locate::{locate_bundled, CandidateCheck},
  logger::Logger,
  platform::Platform,
};

/// Resolves the FFmpeg binary in three steps, stopping at the first hit:
///
/// 1. the path the companion package advertises up front,
/// 2. a binary bundled inside the companion package,
/// 3. running the installer, then searching the package again.
///
/// Resolution blocks while the installer runs. There is no timeout unless the
/// installer was built with one.
pub struct VideoProcessorResolver<C = CompanionPackage, I = ScriptInstaller> {
  companion: C,
  installer: I,
  platform: Platform,
  candidate_check: CandidateCheck,
}

impl VideoProcessorResolver {
  /// Build a resolver wired from `config`, running the installer script.
  pub fn from_config(config: &ResolverConfig, platform: Platform) -> Self {
    Self {
      companion: CompanionPackage::from_config(config),
      installer: ScriptInstaller::from_config(config, platform),
      platform,
      candidate_check: config.candidate_check,
    }
  }
}

impl<C: Companion, I: Installer> VideoProcessorResolver<C, I> {
  pub fn new(companion: C, installer: I, platform: Platform) -> Self {
    Self {
      companion,
      installer,
      platform,
      candidate_check: CandidateCheck::default(),
    }
  }

  pub fn candidate_check(mut self, check: CandidateCheck) -> Self {
    self.candidate_check = check;
    self
  }

  /// Swap the installer, keeping everything else.
  pub fn with_installer<J: Installer>(self, installer: J) -> VideoProcessorResolver<C, J> {
    VideoProcessorResolver {
      companion: self.companion,
      installer,
      platform: self.platform,
      candidate_check: self.candidate_check,
    }
  }

  pub fn companion(&self) -> &C {
    &self.companion
  }

  pub fn installer(&self) -> &I {
    &self.installer
  }

  /// Search the companion package without installing anything.
  pub fn locate(&self) -> Option<PathBuf> {
    locate_bundled(&self.companion, self.platform, self.candidate_check)
  }

  /// Resolve the binary path, installing FFmpeg if necessary.
  ///
  /// `None` is a normal outcome; every failure along the way has already been
  /// reported through `log`.
  pub fn resolve(&self, log: &dyn Logger) -> Option<PathBuf> {
    if let Some(binary) = self.companion.binary_path() {
      return Some(binary);
    }

    if let Some(bundled) = self.locate() {
      return Some(bundled);
    }

    if !self.installer.install(&self.companion, log) {
      return None;
    }
    self.locate()
  }
}

/// Resolve FFmpeg with configuration taken from the environment.
pub fn resolve_default_video_processor(log: &dyn Logger) -> Option<PathBuf> {
  VideoProcessorResolver::from_config(&ResolverConfig::from_env(), Platform::current()).resolve(log)
}
