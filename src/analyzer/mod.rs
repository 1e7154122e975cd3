//! Queue Analyzer
//!
//! The analyzer scheduler sleeps on the queue's wake channel and runs a
//! read-only analysis pass whenever the queue becomes full or the fixed
//! periodic interval elapses, whichever occurs first. Each pass produces a
//! [`QueueReport`] delivered to a pluggable [`ReportSink`]; a broken sink
//! degrades to skipped emission, never to a stalled scheduler.

mod report;
mod scheduler;
mod sink;

pub use report::{QueueReport, UrgencyShare, ValiditySpread};
pub use scheduler::QueueAnalyzer;
pub use sink::{FileSink, LogSink, MemorySink, ReportFormat, ReportSink, SinkError};
