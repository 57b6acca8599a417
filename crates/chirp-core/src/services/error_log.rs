use std::path::Path;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::ports::{LogError, LogSink};

/// Minimum gap between two throttled flushes.
const FLUSH_INTERVAL: Duration = Duration::from_millis(1000);

/// Written once, before the first entry of a run.
const LOG_HEADER: &str = "-- Sync --\n";

/// A failure waiting to be flushed to the durable log.
#[derive(Debug, Clone)]
pub struct ErrorLogEntry {
  pub basename: String,
  pub reason: String,
}

/// Buffers failure records and writes them to the sink in throttled batches,
/// each line formatted `<basename> - <reason>`.
///
/// The sink is opened on the first recorded failure, never eagerly: a clean
/// run must not create a log file. The pending buffer drains newest-first;
/// existing ERRORS.TXT consumers rely on that line ordering.
pub struct ErrorLogWriter<S: LogSink> {
  sink: S,
  opened: bool,
  pending: Vec<ErrorLogEntry>,
  last_flush: Option<Instant>,
}

impl<S: LogSink> ErrorLogWriter<S> {
  pub fn new(sink: S) -> Self {
    Self { sink, opened: false, pending: Vec::new(), last_flush: None }
  }

  /// Queues an entry, opening the sink under `dir` and writing the header if
  /// this is the run's first failure.
  pub fn record(&mut self, dir: &Path, entry: ErrorLogEntry) -> Result<(), LogError> {
    if !self.opened {
      self.sink.open_append(dir)?;
      self.sink.append(LOG_HEADER)?;
      self.opened = true;
    }
    self.pending.push(entry);
    Ok(())
  }

  /// Flushes the pending buffer if no flush has happened yet this run, or if
  /// at least a second has passed since the previous one.
  pub fn maybe_flush(&mut self, now: Instant) -> Result<(), LogError> {
    let due = match self.last_flush {
      None => true,
      Some(at) => now.duration_since(at) >= FLUSH_INTERVAL,
    };

    if due {
      self.last_flush = Some(now);
      self.flush_pending()?;
    }

    Ok(())
  }

  /// Flushes any remainder regardless of the throttle and closes the sink.
  pub fn final_flush(&mut self) -> Result<(), LogError> {
    if !self.opened {
      return Ok(());
    }
    self.flush_pending()?;
    self.sink.close()
  }

  /// Releases the sink without writing, after a failed write made the log
  /// unusable for the rest of the run.
  pub fn abandon(&mut self) {
    self.pending.clear();
    if self.opened {
      let _ = self.sink.close();
    }
  }

  fn flush_pending(&mut self) -> Result<(), LogError> {
    if self.pending.is_empty() {
      return Ok(());
    }

    debug!(count = self.pending.len(), "writing buffered sync errors");

    let mut batch = String::new();
    while let Some(entry) = self.pending.pop() {
      batch.push_str(&entry.basename);
      batch.push_str(" - ");
      batch.push_str(&entry.reason);
      batch.push('\n');
    }

    self.sink.append(&batch)
  }
}


#[cfg(test)]
mod tests {
  use super::testing::MemorySink;
  use super::*;
  use std::path::PathBuf;

  fn entry(basename: &str, reason: &str) -> ErrorLogEntry {
    ErrorLogEntry { basename: basename.to_string(), reason: reason.to_string() }
  }

  #[test]
  fn zero_failures_never_open_the_sink() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());

    writer.maybe_flush(Instant::now()).unwrap();
    writer.final_flush().unwrap();

    assert_eq!(sink.opened_dir(), None);
    assert_eq!(sink.write_count(), 0);
    assert!(!sink.is_closed());
  }

  #[test]
  fn first_failure_opens_the_sink_and_writes_one_header() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());
    let start = Instant::now();

    writer.record(Path::new("/dest"), entry("a.wav", "bad header")).unwrap();
    writer.maybe_flush(start).unwrap();
    writer.record(Path::new("/dest"), entry("b.wav", "bad header")).unwrap();
    writer.maybe_flush(start + Duration::from_millis(1500)).unwrap();
    writer.final_flush().unwrap();

    assert_eq!(sink.opened_dir(), Some(PathBuf::from("/dest")));
    let contents = sink.contents();
    assert!(contents.starts_with("-- Sync --\n"));
    assert_eq!(contents.matches("-- Sync --").count(), 1);
  }

  #[test]
  fn pending_entries_drain_newest_first() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());

    writer.record(Path::new("/dest"), entry("A", "x")).unwrap();
    writer.record(Path::new("/dest"), entry("B", "x")).unwrap();
    writer.record(Path::new("/dest"), entry("C", "x")).unwrap();
    writer.final_flush().unwrap();

    assert_eq!(sink.contents(), "-- Sync --\nC - x\nB - x\nA - x\n");
  }

  #[test]
  fn flushes_are_throttled_to_one_per_second() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());
    let start = Instant::now();

    // First ever flush is never gated.
    writer.record(Path::new("/dest"), entry("A", "x")).unwrap();
    writer.maybe_flush(start).unwrap();
    assert_eq!(sink.contents(), "-- Sync --\nA - x\n");

    // Within the window: buffered, not written.
    writer.record(Path::new("/dest"), entry("B", "x")).unwrap();
    writer.maybe_flush(start + Duration::from_millis(500)).unwrap();
    assert_eq!(sink.contents(), "-- Sync --\nA - x\n");

    // Past the window: the batch carries everything still unflushed.
    writer.record(Path::new("/dest"), entry("C", "x")).unwrap();
    writer.maybe_flush(start + Duration::from_millis(1100)).unwrap();
    assert_eq!(sink.contents(), "-- Sync --\nA - x\nC - x\nB - x\n");
  }

  #[test]
  fn final_flush_ignores_the_throttle_and_closes() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());
    let start = Instant::now();

    writer.record(Path::new("/dest"), entry("A", "x")).unwrap();
    writer.maybe_flush(start).unwrap();
    writer.record(Path::new("/dest"), entry("B", "x")).unwrap();

    writer.final_flush().unwrap();

    assert_eq!(sink.contents(), "-- Sync --\nA - x\nB - x\n");
    assert!(sink.is_closed());
  }

  #[test]
  fn open_failure_propagates() {
    let sink = MemorySink::failing_on_open();
    let mut writer = ErrorLogWriter::new(sink.clone());

    let result = writer.record(Path::new("/readonly"), entry("A", "x"));

    assert!(result.is_err());
    assert_eq!(sink.write_count(), 0);
  }

  #[test]
  fn abandon_closes_without_writing() {
    let sink = MemorySink::new();
    let mut writer = ErrorLogWriter::new(sink.clone());

    writer.record(Path::new("/dest"), entry("A", "x")).unwrap();
    writer.abandon();

    assert_eq!(sink.contents(), "-- Sync --\n");
    assert!(sink.is_closed());
  }
}
