//! Fan-out writer.

use std::io::{self, Write};

/// Writes every buffer to each sink in order, flushing each one before
/// moving on, so partial lines show up immediately everywhere.
pub struct Tee<'a> {
    sinks: Vec<&'a mut dyn Write>,
}

impl<'a> Tee<'a> {
    pub fn new(sinks: Vec<&'a mut dyn Write>) -> Self {
        Self { sinks }
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl Write for Tee<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in self.sinks.iter_mut() {
            sink.write_all(buf)?;
            sink.flush()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what was written and how many flushes happened.
    #[derive(Default)]
    struct Recorder {
        data: Vec<u8>,
        flushes: usize,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_every_sink_receives_every_chunk() {
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        {
            let mut tee = Tee::new(vec![&mut a as &mut dyn Write, &mut b]);
            tee.write_all(b"partial ").unwrap();
            tee.write_all(b"line\n").unwrap();
        }

        assert_eq!(a.data, b"partial line\n");
        assert_eq!(b.data, b"partial line\n");
    }

    #[test]
    fn test_each_write_is_flushed() {
        let mut a = Recorder::default();
        {
            let mut tee = Tee::new(vec![&mut a as &mut dyn Write]);
            tee.write_all(b"no newline").unwrap();
            tee.write_all(b"still none").unwrap();
        }

        assert_eq!(a.flushes, 2);
    }

    #[test]
    fn test_error_stops_fan_out() {
        let mut after = Recorder::default();
        let mut broken = Broken;
        let mut tee = Tee::new(vec![&mut broken as &mut dyn Write, &mut after]);

        assert!(tee.write(b"x").is_err());
        drop(tee);
        assert!(after.data.is_empty());
    }

    #[test]
    fn test_empty_tee_swallows_writes() {
        let mut tee = Tee::new(Vec::new());
        assert_eq!(tee.len(), 0);
        assert_eq!(tee.write(b"abc").unwrap(), 3);
    }
}
