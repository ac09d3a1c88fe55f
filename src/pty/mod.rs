//! Pseudo-terminal process spawning.
//!
//! The runner reads a pty-attached child until end-of-file, may type one
//! line into it, then collects its exit status. That surface sits behind
//! [`PtySpawner`] and [`PtySession`] so the platform mechanism can be
//! swapped (and faked in tests).
//!
//! - `native`: implementation on top of `portable-pty`

mod native;
#[cfg(test)]
pub(crate) mod fake;

pub use native::{terminal_size, NativePtySpawner, DEFAULT_COLS, DEFAULT_ROWS};

use std::io;

use anyhow::Result;

/// Starts programs attached to a pseudo-terminal.
pub trait PtySpawner {
    /// Spawns `command[0]` with `command[1..]` as arguments.
    fn spawn(&self, command: &[String]) -> Result<Box<dyn PtySession>>;
}

/// A running child seen through the master side of its pty.
pub trait PtySession {
    /// Blocks until output is available. `Ok(0)` means end-of-output: the
    /// child has exited and its terminal is closed.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Types `line` followed by a newline, as a user pressing enter would.
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Waits for the child to exit. `None` when no exit code is available
    /// (e.g. the child was killed by a signal).
    fn wait(&mut self) -> Result<Option<i32>>;
}
