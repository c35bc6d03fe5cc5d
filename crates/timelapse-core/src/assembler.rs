//! Intermediate stream assembly.
//!
//! Concatenates fetched JPEG payloads, in timeline order, into one
//! motion-JPEG stream for the encoder.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use camlapse_camera_model::FetchResult;
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// What the assembler wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Destination file, when writing to disk.
    pub path: Option<PathBuf>,

    /// Total payload bytes written.
    pub bytes_written: u64,

    /// Number of payloads appended.
    pub payloads_written: usize,

    /// Number of not-ok results skipped.
    pub skipped: usize,
}

/// Appends fetch results to a destination it exclusively owns.
///
/// The destination is flushed when the assembler is dropped, so an early
/// return or a panic mid-loop still leaves every appended payload on disk.
/// Call [`finish`](Self::finish) to observe flush errors.
pub struct StreamAssembler<W: Write> {
    writer: Option<BufWriter<W>>,
    path: Option<PathBuf>,
    bytes_written: u64,
    payloads_written: usize,
    skipped: usize,
}

impl StreamAssembler<File> {
    /// Create (or truncate) the intermediate file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> CamlapseResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        tracing::debug!(path = %path.display(), "Opened intermediate stream");
        let mut assembler = Self::new(file);
        assembler.path = Some(path);
        Ok(assembler)
    }
}

impl<W: Write> StreamAssembler<W> {
    /// Assemble into any writer (e.g. an in-memory buffer).
    pub fn new(inner: W) -> Self {
        Self {
            writer: Some(BufWriter::new(inner)),
            path: None,
            bytes_written: 0,
            payloads_written: 0,
            skipped: 0,
        }
    }

    /// Append one result. Not-ok results are counted and skipped.
    pub fn append(&mut self, result: &FetchResult) -> CamlapseResult<()> {
        let payload = match (&result.payload, result.ok) {
            (Some(payload), true) => payload,
            _ => {
                self.skipped += 1;
                return Ok(());
            }
        };

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| CamlapseError::Other(anyhow::anyhow!("stream already finished")))?;
        writer.write_all(payload)?;

        tracing::debug!("Writing {} Bytes", payload.len());
        self.bytes_written += payload.len() as u64;
        self.payloads_written += 1;
        Ok(())
    }

    /// Append every result in iteration order.
    pub fn append_all<'r, I>(&mut self, results: I) -> CamlapseResult<()>
    where
        I: IntoIterator<Item = &'r FetchResult>,
    {
        for result in results {
            self.append(result)?;
        }
        Ok(())
    }

    /// Destination path, when writing to disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of the counters so far.
    pub fn report(&self) -> AssemblyReport {
        AssemblyReport {
            path: self.path.clone(),
            bytes_written: self.bytes_written,
            payloads_written: self.payloads_written,
            skipped: self.skipped,
        }
    }

    /// Flush and release the destination.
    pub fn finish(self) -> CamlapseResult<AssemblyReport> {
        self.into_inner().map(|(_, report)| report)
    }

    /// Flush and hand back the destination.
    pub fn into_inner(mut self) -> CamlapseResult<(W, AssemblyReport)> {
        let report = self.report();
        let writer = self
            .writer
            .take()
            .ok_or_else(|| CamlapseError::Other(anyhow::anyhow!("stream already finished")))?;
        let inner = writer.into_inner().map_err(|e| e.into_error())?;
        tracing::debug!(
            bytes = report.bytes_written,
            payloads = report.payloads_written,
            skipped = report.skipped,
            "Closed intermediate stream"
        );
        Ok((inner, report))
    }
}

impl<W: Write> Drop for StreamAssembler<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camlapse_camera_model::Directive;

    fn still(time: f64, payload: &[u8]) -> FetchResult {
        FetchResult::fetched(Directive::StillFrame { time }, payload.to_vec())
    }

    fn missing(time: f64) -> FetchResult {
        FetchResult::missing(Directive::StillFrame { time })
    }

    #[test]
    fn test_concatenates_ok_payloads_in_order() {
        let results = vec![
            still(1.0, b"AAA"),
            missing(2.0),
            still(3.0, b"BB"),
            still(4.0, b"C"),
        ];

        let mut assembler = StreamAssembler::new(Vec::new());
        assembler.append_all(&results).unwrap();
        let (buffer, report) = assembler.into_inner().unwrap();

        assert_eq!(buffer, b"AAABBC");
        assert_eq!(report.bytes_written, 6);
        assert_eq!(report.payloads_written, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.bytes_written,
            results.iter().filter(|r| r.ok).map(|r| r.payload_len() as u64).sum::<u64>()
        );
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("timelapse.mjpeg");

        let mut assembler = StreamAssembler::create(&path).unwrap();
        assembler.append(&still(1.0, b"\xFF\xD8jpeg")).unwrap();
        let report = assembler.finish().unwrap();

        assert_eq!(report.path.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"\xFF\xD8jpeg");
    }

    #[test]
    fn test_drop_flushes_on_early_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.mjpeg");

        let outcome: CamlapseResult<()> = (|| {
            let mut assembler = StreamAssembler::create(&path)?;
            assembler.append(&still(1.0, b"first"))?;
            Err(CamlapseError::service("aborted mid-loop"))
        })();

        assert!(outcome.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_write_errors_propagate() {
        let mut assembler = StreamAssembler::new(BrokenPipe);
        // Buffered: the first small write succeeds, the flush surfaces the error.
        assembler.append(&still(1.0, b"x")).unwrap();
        assert!(matches!(assembler.finish(), Err(CamlapseError::Io(_))));
    }
}
