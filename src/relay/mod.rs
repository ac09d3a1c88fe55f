//! Output relay from the child's terminal to the user (and capture file).
//!
//! - `tee`: fan-out writer that flushes every sink on every write
//! - `capture`: the optional text capture file

mod capture;
mod tee;

pub use capture::{CaptureFile, LossyUtf8};
pub use tee::Tee;

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::pty::PtySession;

/// Bytes requested per read from the pty.
pub const PTY_READ_BUFFER: usize = 16384;

/// Copies the session's output into `sink` until end-of-output.
///
/// Returns the number of bytes relayed.
pub fn pump(session: &mut dyn PtySession, sink: &mut dyn Write) -> Result<u64> {
    let mut buf = vec![0u8; PTY_READ_BUFFER];
    let mut total: u64 = 0;

    loop {
        match session.read_chunk(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                sink.write_all(&buf[..n]).context("Failed to relay output")?;
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read from PTY"),
        }
    }

    sink.flush().context("Failed to flush relayed output")?;
    debug!("Relay reached end of output after {} bytes", total);
    Ok(total)
}
