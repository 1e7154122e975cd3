//! Report sinks
//!
//! The analyzer emits each report to an externally supplied sink. A sink
//! failure is a local, recoverable condition: the analyzer logs it, skips
//! emission and keeps running.

use crate::analyzer::report::QueueReport;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Report sink unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialise report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output format for file-backed sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Destination for analysis reports
pub trait ReportSink: Send {
    fn write_report(&mut self, report: &QueueReport) -> Result<(), SinkError>;
}

/// Appends reports to a file
///
/// The file is opened once at construction. If the open fails, the sink
/// stays usable but every write reports [`SinkError::Unavailable`] so the
/// analyzer can degrade instead of stalling.
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    format: ReportFormat,
}

impl FileSink {
    pub fn create(path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        let path = path.into();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                log::error!(
                    "Could not open report file {}: {err}; reports will be skipped",
                    path.display()
                );
                None
            }
        };

        Self { path, file, format }
    }

    /// Create a sink with a timestamped file name inside `dir`
    pub fn with_generated_name(dir: &Path, format: ReportFormat) -> Self {
        let filename = format!(
            "notification-queue-analysis-{}.log",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        Self::create(dir.join(filename), format)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn write_report(&mut self, report: &QueueReport) -> Result<(), SinkError> {
        let file = self.file.as_mut().ok_or_else(|| SinkError::Unavailable {
            message: format!("report file {} is not open", self.path.display()),
        })?;

        match self.format {
            ReportFormat::Text => writeln!(file, "{report}")?,
            ReportFormat::Json => writeln!(file, "{}", report.to_json()?)?,
        }
        file.flush()?;

        Ok(())
    }
}

/// Emits reports through the logging facade
pub struct LogSink;

impl ReportSink for LogSink {
    fn write_report(&mut self, report: &QueueReport) -> Result<(), SinkError> {
        log::info!("{report}");
        Ok(())
    }
}

/// Captures reports in memory
///
/// Cloning yields another handle onto the same buffer, so a caller can
/// keep one and inspect what the analyzer emitted. Used by tests and by
/// embedders that post-process reports themselves.
#[derive(Clone, Default)]
pub struct MemorySink {
    reports: std::sync::Arc<std::sync::Mutex<Vec<QueueReport>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<QueueReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ReportSink for MemorySink {
    fn write_report(&mut self, report: &QueueReport) -> Result<(), SinkError> {
        self.reports
            .lock()
            .map_err(|_| SinkError::Unavailable {
                message: "memory sink buffer poisoned".to_string(),
            })?
            .push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{MemoryStats, Notification, WakeReason};

    fn sample_report() -> QueueReport {
        let snapshot: Vec<Notification<u64>> = Vec::new();
        QueueReport::from_snapshot(
            1,
            WakeReason::Periodic,
            &snapshot,
            4,
            MemoryStats {
                occupied_slots: 0,
                capacity: 4,
                slot_bytes: 48,
                total_bytes: 200,
            },
        )
    }

    #[test]
    fn test_file_sink_appends_text_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.log");
        let mut sink = FileSink::create(&path, ReportFormat::Text);

        sink.write_report(&sample_report()).unwrap();
        sink.write_report(&sample_report()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Queue analysis #1").count(), 2);
    }

    #[test]
    fn test_file_sink_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.jsonl");
        let mut sink = FileSink::create(&path, ReportFormat::Json);

        sink.write_report(&sample_report()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"reason\": \"periodic\""));
    }

    #[test]
    fn test_file_sink_with_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::with_generated_name(dir.path(), ReportFormat::Text);

        sink.write_report(&sample_report()).unwrap();

        let name = sink.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("notification-queue-analysis-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_unopenable_file_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("analysis.log");
        let mut sink = FileSink::create(&path, ReportFormat::Text);

        match sink.write_report(&sample_report()) {
            Err(SinkError::Unavailable { message }) => {
                assert!(message.contains("not open"));
            }
            other => panic!("Expected Unavailable, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_memory_sink_shares_buffer_between_clones() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.write_report(&sample_report()).unwrap();

        assert_eq!(sink.reports().len(), 1);
        assert_eq!(sink.reports()[0].launch, 1);
    }
}
