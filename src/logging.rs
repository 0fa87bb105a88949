//! Diagnostics for the grid: a `log` facade backend for the binary plus the
//! batched, session-tagged [`EventLog`] used to record user activity.
//!
//! Terminal UIs own stdout and stderr while running, so the binary routes
//! `log` output into a file through [`initialize_file_logger`].

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use simplelog::{ConfigBuilder, WriteLogger};
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LogSinkError {
	#[error("failed to write event log to {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("failed to encode log entry")]
	Encode(#[from] serde_json::Error),
	#[error("log sink is unavailable: {0}")]
	Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LoggerInitError {
	#[error("failed to open log file {}", path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("a global logger is already installed")]
	AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Install a `simplelog` file logger at `path`, creating parent directories.
pub fn initialize_file_logger(path: &Path, level: LevelFilter) -> Result<(), LoggerInitError> {
	let open_error = |source| LoggerInitError::Open {
		path: path.to_path_buf(),
		source,
	};
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).map_err(open_error)?;
	}
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.map_err(open_error)?;

	let config = ConfigBuilder::new()
		.set_time_format_rfc3339()
		.set_target_level(LevelFilter::Error)
		.build();
	WriteLogger::init(level, config, file)?;
	Ok(())
}

/// Parse a level name such as `info` or `WARN` into a filter.
#[must_use]
pub fn parse_level_filter(value: &str) -> Option<LevelFilter> {
	value.trim().parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	/// Warnings and errors bypass batching.
	#[must_use]
	pub fn flushes_immediately(self) -> bool {
		matches!(self, Self::Warn | Self::Error)
	}

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}

impl From<LogLevel> for log::Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Debug => log::Level::Debug,
			LogLevel::Info => log::Level::Info,
			LogLevel::Warn => log::Level::Warn,
			LogLevel::Error => log::Level::Error,
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One structured event, tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	pub level: LogLevel,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	pub timestamp: String,
	pub session_id: String,
}

/// Destination for flushed batches.
pub trait LogSink: Send {
	fn write_batch(&mut self, entries: &[LogEntry]) -> Result<(), LogSinkError>;
}

impl LogSink for Box<dyn LogSink> {
	fn write_batch(&mut self, entries: &[LogEntry]) -> Result<(), LogSinkError> {
		(**self).write_batch(entries)
	}
}

/// Appends each entry as one JSON line to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
	path: PathBuf,
}

impl JsonLinesSink {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn open(&self) -> Result<File, LogSinkError> {
		let io_error = |source| LogSinkError::Io {
			path: self.path.clone(),
			source,
		};
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(io_error)?;
		}
		OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)
			.map_err(io_error)
	}
}

impl LogSink for JsonLinesSink {
	fn write_batch(&mut self, entries: &[LogEntry]) -> Result<(), LogSinkError> {
		let mut writer = BufWriter::new(self.open()?);
		for entry in entries {
			serde_json::to_writer(&mut writer, entry)?;
			writer.write_all(b"\n").map_err(|source| LogSinkError::Io {
				path: self.path.clone(),
				source,
			})?;
		}
		writer.flush().map_err(|source| LogSinkError::Io {
			path: self.path.clone(),
			source,
		})
	}
}

/// In-memory sink whose handle can be cloned and inspected.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	entries: Arc<Mutex<Vec<LogEntry>>>,
	batches: Arc<Mutex<usize>>,
}

impl MemorySink {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn entries(&self) -> Vec<LogEntry> {
		lock(&self.entries).clone()
	}

	/// Number of batches delivered so far.
	#[must_use]
	pub fn batches(&self) -> usize {
		*lock(&self.batches)
	}
}

impl LogSink for MemorySink {
	fn write_batch(&mut self, entries: &[LogEntry]) -> Result<(), LogSinkError> {
		lock(&self.entries).extend_from_slice(entries);
		*lock(&self.batches) += 1;
		Ok(())
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLogOptions {
	pub batch_size: usize,
	pub flush_interval: Duration,
}

impl Default for EventLogOptions {
	fn default() -> Self {
		Self {
			batch_size: DEFAULT_BATCH_SIZE,
			flush_interval: DEFAULT_FLUSH_INTERVAL,
		}
	}
}

/// Batched activity log.
///
/// Debug and info entries queue until the batch is full or the flush
/// interval elapses; warnings and errors flush the queue at once. Every
/// entry is also mirrored to the `log` facade.
pub struct EventLog {
	session_id: String,
	options: EventLogOptions,
	queue: Vec<LogEntry>,
	sink: Box<dyn LogSink>,
	last_flush: Instant,
}

impl fmt::Debug for EventLog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventLog")
			.field("session_id", &self.session_id)
			.field("options", &self.options)
			.field("pending", &self.queue.len())
			.finish_non_exhaustive()
	}
}

impl EventLog {
	pub fn new(
		session_id: impl Into<String>,
		options: EventLogOptions,
		sink: impl LogSink + 'static,
	) -> Self {
		Self {
			session_id: session_id.into(),
			options: EventLogOptions {
				batch_size: options.batch_size.max(1),
				..options
			},
			queue: Vec::new(),
			sink: Box::new(sink),
			last_flush: Instant::now(),
		}
	}

	#[must_use]
	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	#[must_use]
	pub fn pending(&self) -> usize {
		self.queue.len()
	}

	pub fn debug(&mut self, message: impl Into<String>, data: Option<Value>) {
		self.record(LogLevel::Debug, message, data);
	}

	pub fn info(&mut self, message: impl Into<String>, data: Option<Value>) {
		self.record(LogLevel::Info, message, data);
	}

	pub fn warn(&mut self, message: impl Into<String>, data: Option<Value>) {
		self.record(LogLevel::Warn, message, data);
	}

	pub fn error(&mut self, message: impl Into<String>, data: Option<Value>) {
		self.record(LogLevel::Error, message, data);
	}

	/// Record a named user action at info level.
	pub fn track_event(&mut self, name: &str, data: Option<Value>) {
		self.record(LogLevel::Info, format!("Event: {name}"), data);
	}

	pub fn record(&mut self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
		let message = message.into();
		log::log!(level.into(), "[{}] {message}", self.session_id);

		self.queue.push(LogEntry {
			level,
			message,
			data,
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
			session_id: self.session_id.clone(),
		});

		if level.flushes_immediately() || self.queue.len() >= self.options.batch_size {
			self.flush();
		}
	}

	/// Flush when the interval has elapsed since the last flush. Returns the
	/// number of entries delivered.
	pub fn pump(&mut self, now: Instant) -> usize {
		if self.queue.is_empty()
			|| now.saturating_duration_since(self.last_flush) < self.options.flush_interval
		{
			return 0;
		}
		self.flush()
	}

	/// Drain the queue into the sink. A failed batch is dropped.
	pub fn flush(&mut self) -> usize {
		self.last_flush = Instant::now();
		if self.queue.is_empty() {
			return 0;
		}

		let batch = std::mem::take(&mut self.queue);
		match self.sink.write_batch(&batch) {
			Ok(()) => batch.len(),
			Err(err) => {
				log::warn!("dropping {} log entries: {err}", batch.len());
				0
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use tempfile::tempdir;

	struct FailingSink;

	impl LogSink for FailingSink {
		fn write_batch(&mut self, _entries: &[LogEntry]) -> Result<(), LogSinkError> {
			Err(LogSinkError::Unavailable("offline".into()))
		}
	}

	fn event_log(sink: &MemorySink) -> EventLog {
		EventLog::new("session_test", EventLogOptions::default(), sink.clone())
	}

	#[test]
	fn info_entries_wait_for_a_full_batch() {
		let sink = MemorySink::new();
		let mut log = event_log(&sink);

		for index in 0..9 {
			log.info(format!("entry {index}"), None);
		}
		assert_eq!(log.pending(), 9);
		assert!(sink.entries().is_empty());

		log.info("entry 9", None);
		assert_eq!(log.pending(), 0);
		assert_eq!(sink.entries().len(), 10);
		assert_eq!(sink.batches(), 1);
	}

	#[test]
	fn warnings_flush_the_whole_queue() {
		let sink = MemorySink::new();
		let mut log = event_log(&sink);
		log.debug("loading", None);
		log.warn("slow response", Some(json!({ "ms": 1200 })));

		let entries = sink.entries();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[1].level, LogLevel::Warn);
		assert_eq!(entries[1].data, Some(json!({ "ms": 1200 })));
		assert!(entries.iter().all(|entry| entry.session_id == "session_test"));
	}

	#[test]
	fn pump_respects_the_flush_interval() {
		let sink = MemorySink::new();
		let mut log = EventLog::new(
			"s",
			EventLogOptions {
				batch_size: 100,
				flush_interval: Duration::from_secs(30),
			},
			sink.clone(),
		);
		log.track_event("page_change", Some(json!({ "page": 2 })));

		let start = Instant::now();
		assert_eq!(log.pump(start), 0);
		assert_eq!(log.pump(start + Duration::from_secs(31)), 1);
		assert_eq!(sink.entries()[0].message, "Event: page_change");
	}

	#[test]
	fn failed_batches_are_dropped() {
		let mut log = EventLog::new("s", EventLogOptions::default(), FailingSink);
		log.error("boom", None);
		assert_eq!(log.pending(), 0);
		assert_eq!(log.flush(), 0);
	}

	#[test]
	fn json_lines_sink_appends_one_entry_per_line() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("nested").join("events.jsonl");
		let mut log = EventLog::new("s", EventLogOptions::default(), JsonLinesSink::new(&path));

		log.info("first", None);
		log.error("second", Some(json!({ "code": 7 })));
		log.info("third", None);
		log.flush();

		let contents = fs::read_to_string(&path).unwrap();
		let entries: Vec<LogEntry> = contents
			.lines()
			.map(|line| serde_json::from_str(line).unwrap())
			.collect();
		let messages: Vec<&str> = entries.iter().map(|entry| entry.message.as_str()).collect();
		assert_eq!(messages, vec!["first", "second", "third"]);
		assert_eq!(entries[1].level, LogLevel::Error);
	}

	#[test]
	fn level_filters_parse_case_insensitively() {
		assert_eq!(parse_level_filter("WARN"), Some(LevelFilter::Warn));
		assert_eq!(parse_level_filter(" debug "), Some(LevelFilter::Debug));
		assert_eq!(parse_level_filter("loud"), None);
	}
}
