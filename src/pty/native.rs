//! `portable-pty` backed spawner.
//!
//! This module opens a native pty pair, spawns the command on the slave
//! side and hands the master side to the runner as a [`PtySession`].

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tracing::{debug, info};

use super::{PtySession, PtySpawner};

/// Size used when the runner itself is not attached to a terminal.
pub const DEFAULT_ROWS: u16 = 24;
pub const DEFAULT_COLS: u16 = 80;

const DEFAULT_TERM: &str = "xterm-256color";

/// Returns `(cols, rows)` of the invoking terminal, or the 80x24 default.
pub fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
        _ => (DEFAULT_COLS, DEFAULT_ROWS),
    }
}

/// Spawns commands on the platform's native pty implementation.
#[derive(Clone, Copy, Debug)]
pub struct NativePtySpawner {
    pub cols: u16,
    pub rows: u16,
}

impl NativePtySpawner {
    /// A spawner sized like the terminal the runner was started from.
    pub fn from_terminal() -> Self {
        let (cols, rows) = terminal_size();
        Self { cols, rows }
    }
}

impl Default for NativePtySpawner {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl PtySpawner for NativePtySpawner {
    fn spawn(&self, command: &[String]) -> Result<Box<dyn PtySession>> {
        let (program, args) = command
            .split_first()
            .context("Cannot spawn an empty command")?;

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: self.rows,
                cols: self.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open pseudo-terminal")?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);

        // CommandBuilder defaults to $HOME otherwise
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }
        if cmd.get_env("TERM").is_none() {
            cmd.env("TERM", DEFAULT_TERM);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn '{}'", program))?;

        // Parent must not hold the slave, or EOF never arrives
        drop(pair.slave);

        info!(
            "Spawned '{}' (pid {:?}) on a {}x{} pty",
            program,
            child.process_id(),
            self.cols,
            self.rows
        );

        let reader = pair
            .master
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        let writer = pair
            .master
            .take_writer()
            .context("Failed to take PTY writer")?;

        Ok(Box::new(NativePtySession {
            child,
            reader,
            writer,
            _master: pair.master,
        }))
    }
}

/// Master side of a spawned child.
///
/// The writer is held for the whole session: dropping it signals EOF on the
/// child's stdin.
struct NativePtySession {
    child: Box<dyn Child + Send + Sync>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    _master: Box<dyn MasterPty + Send>,
}

impl PtySession for NativePtySession {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.read(buf) {
            Err(e) if is_hangup(&e) => {
                debug!("PTY hangup treated as end of output: {}", e);
                Ok(0)
            }
            other => other,
        }
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .context("Failed to write line to PTY")?;
        self.writer
            .write_all(b"\n")
            .context("Failed to write newline to PTY")?;
        self.writer.flush().context("Failed to flush PTY writer")?;
        Ok(())
    }

    fn wait(&mut self) -> Result<Option<i32>> {
        let status = self.child.wait().context("Failed to wait for child")?;
        if let Some(signal) = status.signal() {
            info!("Child terminated by signal {}", signal);
            return Ok(None);
        }
        Ok(Some(status.exit_code() as i32))
    }
}

/// A Unix pty master reports `EIO` once the last slave descriptor closes.
#[cfg(unix)]
fn is_hangup(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EIO)
}

#[cfg(not(unix))]
fn is_hangup(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::BrokenPipe
}
