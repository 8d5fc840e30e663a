use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::io;
use std::result::Result as StdResult;

/// Shorthand alias for `Result<T, Error>` using the `ffmpeg_resolver` error type.
pub type Result<T> = StdResult<T, Error>;

/// Error raised by the fallible helpers behind the resolver.
///
/// The resolver itself never returns one of these; it logs the message and
/// reports the binary as unresolved instead.
#[derive(Debug)]
pub struct Error {
  pub message: String,
  pub source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl StdError for Error {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    self
      .source
      .as_deref()
      .map(|e| e as &(dyn StdError + 'static))
  }
}

impl Error {
  /// Wrap any standard error, keeping it as the source.
  pub fn from_std<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    Error {
      message: e.to_string(),
      source: Some(Box::new(e)),
    }
  }

  /// Wrap any Display without a source.
  pub fn from_display<E>(e: E) -> Self
  where
    E: Display,
  {
    Error {
      message: e.to_string(),
      source: None,
    }
  }

  /// Create an error message from a string.
  pub fn msg<S: AsRef<str>>(message: S) -> Self {
    Error {
      message: message.as_ref().to_string(),
      source: None,
    }
  }

  /// Prefix the message with what was being attempted, keeping the source.
  pub fn context<S: Display>(self, context: S) -> Self {
    Error {
      message: format!("{context}: {}", self.message),
      source: self.source,
    }
  }
}

impl From<io::Error> for Error {
  fn from(e: io::Error) -> Self {
    Error::from_std(e)
  }
}

impl From<&str> for Error {
  fn from(e: &str) -> Self {
    Error::from_display(e)
  }
}
