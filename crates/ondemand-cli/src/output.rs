//! Line-flushed record output.

use std::io::{ErrorKind, Write};

use anyhow::{Context, Result};
use ondemand_api::nhk::{FlatRecord, format_record};

/// Raised when the reading end of the output pipe has gone away.
#[derive(Debug)]
pub struct OutputClosed;

impl std::fmt::Display for OutputClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "output closed by reader")
    }
}

impl std::error::Error for OutputClosed {}

impl OutputClosed {
    /// Returns true if `err` was caused by a closed output pipe.
    pub fn is_cause_of(err: &anyhow::Error) -> bool {
        err.chain().any(|e| e.is::<Self>())
    }
}

/// Writes one record per line and flushes after each, so a downstream
/// pipe sees records as soon as they are produced.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Wraps `out`.
    pub const fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Number of records written so far.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Writes `record` as one formatted line and flushes.
    ///
    /// # Errors
    ///
    /// Returns `OutputClosed` on a broken pipe, or the I/O error otherwise.
    pub fn write(&mut self, record: &FlatRecord) -> Result<()> {
        let line = format_record(record);
        let result = self
            .out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush());
        match result {
            Ok(()) => {
                self.written = self.written.saturating_add(1);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(OutputClosed.into()),
            Err(e) => Err(e).context("failed to write record"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use ondemand_api::nhk::IndexEntry;

    use super::*;

    /// Writer that fails every write with a fixed error kind.
    struct FailingWriter(ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(self.0))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn record() -> FlatRecord {
        let entry = IndexEntry {
            site_id: Some(String::from("0164")),
            corner_id: Some(String::from("01")),
            ..IndexEntry::default()
        };
        FlatRecord::new(Some(&entry), None, None)
    }

    #[test]
    fn test_write_appends_newline() {
        // Arrange
        let mut writer = RecordWriter::new(Vec::new());

        // Act
        writer.write(&record()).unwrap();
        writer.write(&record()).unwrap();

        // Assert
        assert_eq!(writer.written(), 2);
        let text = String::from_utf8(writer.out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0164\t01\t"));
        assert_eq!(lines[0].split('\t').count(), 13);
    }

    #[test]
    fn test_broken_pipe_is_output_closed() {
        // Arrange
        let mut writer = RecordWriter::new(FailingWriter(ErrorKind::BrokenPipe));

        // Act
        let err = writer.write(&record()).unwrap_err();

        // Assert
        assert!(OutputClosed::is_cause_of(&err));
        assert_eq!(writer.written(), 0);
    }

    #[test]
    fn test_other_io_error_is_not_output_closed() {
        // Arrange
        let mut writer = RecordWriter::new(FailingWriter(ErrorKind::Other));

        // Act
        let err = writer.write(&record()).unwrap_err();

        // Assert
        assert!(!OutputClosed::is_cause_of(&err));
        assert!(err.to_string().contains("failed to write record"));
    }
}
