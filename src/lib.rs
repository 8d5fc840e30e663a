//! Locate a bundled FFmpeg binary, provisioning it with an installer when it
//! is missing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ffmpeg_resolver::{logger::TracingLogger, resolver::resolve_default_video_processor};
//!
//! match resolve_default_video_processor(&TracingLogger) {
//!   Some(path) => println!("using ffmpeg at {}", path.display()),
//!   None => eprintln!("ffmpeg is unavailable, video features are disabled"),
//! }
//! ```
//!
//! Resolution checks, in order, the path advertised by the companion package,
//! the `ffmpeg` (or `ffmpeg.exe`) binaries bundled inside it, and finally runs
//! the package's installer and searches again. An unresolved binary is
//! reported as `None`, never as an error.


pub mod companion;
pub mod config;
#[cfg(feature = "download_ffmpeg")]
pub mod download;
pub mod error;
pub mod installer;
pub mod locate;
pub mod logger;
pub mod paths;
pub mod platform;
pub mod process;
pub mod resolver;
pub mod version;

pub use resolver::{resolve_default_video_processor, VideoProcessorResolver};
