//! Capture file sink.
//!
//! Output is stored as text. Bytes are decoded incrementally so a UTF-8
//! character split across two reads survives intact, and anything that is
//! not valid UTF-8 is replaced with U+FFFD instead of failing the relay.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Streaming lossy UTF-8 decoder.
#[derive(Debug, Default)]
pub struct LossyUtf8 {
    /// Start of a multi-byte sequence cut off by the previous chunk.
    pending: Vec<u8>,
}

impl LossyUtf8 {
    /// Decodes `bytes` into `out`, holding back an incomplete trailing sequence.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(bytes);

        let mut rest = buf.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Flushes a dangling partial sequence as a single replacement character.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    #[cfg(test)]
    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Truncate-on-open text file receiving a copy of the relayed output.
///
/// Closed exactly once: either by an explicit [`CaptureFile::close`] or,
/// failing that, on drop.
pub struct CaptureFile {
    path: PathBuf,
    file: Option<File>,
    decoder: LossyUtf8,
    text: String,
}

impl CaptureFile {
    /// Creates `path`, replacing any previous content.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to open capture file {}", path.display()))?;
        debug!("Capturing output to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            decoder: LossyUtf8::default(),
            text: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Writes out any held-back partial character and releases the file.
    /// Calling it again is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        let mut tail = String::new();
        self.decoder.finish(&mut tail);
        file.write_all(tail.as_bytes())?;
        file.flush()?;
        debug!("Closed capture file {}", self.path.display());
        Ok(())
    }
}

impl Write for CaptureFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("capture file already closed"))?;

        self.text.clear();
        self.decoder.decode(buf, &mut self.text);
        file.write_all(self.text.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for CaptureFile {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close capture file {}: {}", self.path.display(), e);
        }
    }
}
