//! The logging capability handed to the resolver by the host application.

use std::fmt;

/// Receives status output from the resolver on three severity channels.
///
/// Messages arrive pre-formatted as [`fmt::Arguments`], so call sites use
/// `format_args!` the same way they would use `println!`.
pub trait Logger {
  fn info(&self, args: fmt::Arguments<'_>);
  fn warn(&self, args: fmt::Arguments<'_>);
  fn error(&self, args: fmt::Arguments<'_>);
}

/// Forwards every channel to the matching `tracing` macro.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
  fn info(&self, args: fmt::Arguments<'_>) {
    tracing::info!("{}", args);
  }

  fn warn(&self, args: fmt::Arguments<'_>) {
    tracing::warn!("{}", args);
  }

  fn error(&self, args: fmt::Arguments<'_>) {
    tracing::error!("{}", args);
  }
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// Respects `RUST_LOG`, falling back to `default_filter` (e.g. `"info"`).
/// Calling it twice is harmless; the second subscriber is discarded.
pub fn init_tracing(default_filter: &str) {
  use tracing_subscriber::EnvFilter;

  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}
