//! Blocking subprocess execution for installer scripts.

use std::{
  ffi::OsStr,
  io,
  path::Path,
  process::{Child, Command, ExitStatus, Stdio},
  thread::sleep,
  time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Exit state of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
  /// `None` when the process was terminated by a signal.
  pub code: Option<i32>,
}

impl ExitOutcome {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

impl From<ExitStatus> for ExitOutcome {
  fn from(status: ExitStatus) -> Self {
    Self {
      code: status.code(),
    }
  }
}

/// Runs a program to completion, blocking the calling thread.
pub trait ProcessRunner {
  fn run(&self, program: &Path, args: &[&OsStr]) -> io::Result<ExitOutcome>;
}

/// Runs the program with stdin, stdout and stderr inherited from the parent,
/// so installer output reaches the user as it is produced.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedRunner {
  timeout: Option<Duration>,
}

impl InheritedRunner {
  /// Wait for the program no matter how long it runs.
  pub fn new() -> Self {
    Self { timeout: None }
  }

  /// Kill the program once `timeout` has elapsed. `None` disables the limit.
  pub fn with_timeout(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<ExitStatus> {
    // a deadline past the end of `Instant` is no limit at all
    let Some(deadline) = Instant::now().checked_add(timeout) else {
      return child.wait();
    };
    loop {
      if let Some(status) = child.try_wait()? {
        return Ok(status);
      }
      if Instant::now() >= deadline {
        child.kill()?;
        child.wait()?;
        return Err(io::Error::new(
          io::ErrorKind::TimedOut,
          format!("process did not exit within {}s", timeout.as_secs_f32()),
        ));
      }
      sleep(POLL_INTERVAL);
    }
  }
}

impl ProcessRunner for InheritedRunner {
  fn run(&self, program: &Path, args: &[&OsStr]) -> io::Result<ExitOutcome> {
    let mut command = Command::new(program);
    command
      .args(args)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit());

    let status = match self.timeout {
      None => command.status()?,
      Some(timeout) => {
        let mut child = command.spawn()?;
        Self::wait_with_deadline(&mut child, timeout)?
      }
    };
    Ok(status.into())
  }
}
