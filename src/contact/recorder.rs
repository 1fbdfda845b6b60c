//! Submission recorder: appends one line per accepted submission.
//!
//! The log is append-only and best-effort. A sink failure is logged and
//! dropped; it never reaches the caller.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::model::{LogRecord, Submission};
use crate::error::RecorderError;

/// Append-only destination for log lines.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Append one complete line. Must be a single write.
    async fn append(&self, line: &str) -> Result<(), RecorderError>;
}

/// File-backed sink. Opens the file in append mode for every record.
///
/// Writes go through `std::fs` on a blocking thread: the whole line is
/// handed to one `write_all` on an `O_APPEND` descriptor, so concurrent
/// records do not interleave.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SubmissionSink for FileSink {
    async fn append(&self, line: &str) -> Result<(), RecorderError> {
        let path = self.path.clone();
        let line = line.to_owned();
        tokio::task::spawn_blocking(move || {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(line.as_bytes())
        })
        .await
        .map_err(|e| std::io::Error::other(format!("append task failed: {e}")))??;
        Ok(())
    }
}

/// In-memory sink, for tests and dry runs.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn append(&self, line: &str) -> Result<(), RecorderError> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
        Ok(())
    }
}

/// Writes log records to a sink, swallowing failures.
pub struct Recorder<S: ?Sized> {
    sink: Arc<S>,
}

impl<S: SubmissionSink + ?Sized> Recorder<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Append a timestamped record. Returns whether it was written.
    pub async fn record(&self, submission: &Submission, timestamp: NaiveDateTime) -> bool {
        let record = LogRecord { timestamp, submission };
        let result = match record.to_line() {
            Ok(line) => self.sink.append(&line).await,
            Err(e) => Err(RecorderError::from(e)),
        };
        match result {
            Ok(()) => {
                debug!("Submission recorded");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to record submission");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::contact::model::{ContactForm, RawSubmission};

    struct BrokenSink;

    #[async_trait]
    impl SubmissionSink for BrokenSink {
        async fn append(&self, _line: &str) -> Result<(), RecorderError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn submission(name: &str) -> Submission {
        let raw = RawSubmission {
            name: Some(name.into()),
            email: Some("jane@example.com".into()),
            ..Default::default()
        };
        Submission::parse(ContactForm::sanitized(raw)).unwrap()
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[tokio::test]
    async fn memory_sink_collects_lines() {
        let sink = Arc::new(MemorySink::new());
        let recorder = Recorder::new(Arc::clone(&sink));
        assert!(recorder.record(&submission("Jane Doe"), timestamp()).await);
        assert!(recorder.record(&submission("John Roe"), timestamp()).await);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[2024-01-02 03:04:05] {\"name\":\"Jane Doe\""));
        assert!(lines[1].contains("John Roe"));
    }

    #[tokio::test]
    async fn file_sink_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.log");
        std::fs::write(&path, "existing\n").unwrap();

        let recorder = Recorder::new(Arc::new(FileSink::new(path.clone())));
        assert!(recorder.record(&submission("Jane Doe"), timestamp()).await);
        assert!(recorder.record(&submission("John Roe"), timestamp()).await);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].contains("Jane Doe"));
        assert!(lines[2].contains("John Roe"));
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn file_sink_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.log");
        FileSink::new(path.clone()).append("line\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_large_lines_do_not_interleave() {
        const LINE_LEN: usize = 3 * 1024 * 1024;
        const WRITERS: u8 = 8;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.log");
        let sink = Arc::new(FileSink::new(path.clone()));

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let sink = Arc::clone(&sink);
                let fill = char::from(b'a' + i);
                tokio::spawn(async move {
                    let mut line = fill.to_string().repeat(LINE_LEN);
                    line.push('\n');
                    sink.append(&line).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut fills: Vec<char> = contents
            .lines()
            .map(|line| {
                assert_eq!(line.len(), LINE_LEN);
                let first = line.chars().next().unwrap();
                assert!(line.chars().all(|c| c == first), "line interleaved with another write");
                first
            })
            .collect();
        fills.sort_unstable();
        let expected: Vec<char> = (0..WRITERS).map(|i| char::from(b'a' + i)).collect();
        assert_eq!(fills, expected);
    }

    #[tokio::test]
    async fn unwritable_location_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::new(Arc::new(FileSink::new(
            dir.path().join("missing-dir").join("submissions.log"),
        )));
        assert!(!recorder.record(&submission("Jane Doe"), timestamp()).await);
    }

    #[tokio::test]
    async fn sink_error_is_swallowed() {
        let recorder = Recorder::new(Arc::new(BrokenSink));
        assert!(!recorder.record(&submission("Jane Doe"), timestamp()).await);
    }
}
