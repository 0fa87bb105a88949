//! Ambient application state passed explicitly to the components that need
//! it: session identity, theme preference, and the activity log.
//!
//! [`AppContext::init`] acquires everything and [`AppContext::teardown`]
//! releases it, so tests can substitute in-memory stores and sinks.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::logging::{EventLog, EventLogOptions, LogSink};
use crate::theme::{Theme, ThemePreference};

const SESSION_SUFFIX_LEN: usize = 9;

#[derive(Debug, Error)]
pub enum PreferenceError {
	#[error("failed to access preferences at {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("preferences at {} are malformed", path.display())]
	Malformed {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("failed to encode preferences")]
	Encode(#[from] serde_json::Error),
}

/// Identifier shared by every log entry of one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
	/// `session_<unix millis>_<9 random characters>`.
	#[must_use]
	pub fn generate() -> Self {
		let millis = Utc::now().timestamp_millis();
		let random: String = Uuid::new_v4()
			.simple()
			.to_string()
			.chars()
			.take(SESSION_SUFFIX_LEN)
			.collect();
		Self(format!("session_{millis}_{random}"))
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Settings that survive between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
	pub theme: ThemePreference,
}

pub trait PreferenceStore {
	fn load(&self) -> Result<Preferences, PreferenceError>;
	fn save(&mut self, preferences: &Preferences) -> Result<(), PreferenceError>;
}

/// JSON file store. A missing file loads as the defaults.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
	path: PathBuf,
}

impl FilePreferenceStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, source: io::Error) -> PreferenceError {
		PreferenceError::Io {
			path: self.path.clone(),
			source,
		}
	}
}

impl PreferenceStore for FilePreferenceStore {
	fn load(&self) -> Result<Preferences, PreferenceError> {
		let contents = match fs::read_to_string(&self.path) {
			Ok(contents) => contents,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Preferences::default()),
			Err(err) => return Err(self.io_error(err)),
		};
		serde_json::from_str(&contents).map_err(|source| PreferenceError::Malformed {
			path: self.path.clone(),
			source,
		})
	}

	fn save(&mut self, preferences: &Preferences) -> Result<(), PreferenceError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
		}
		let contents = serde_json::to_string_pretty(preferences)?;
		fs::write(&self.path, contents).map_err(|err| self.io_error(err))
	}
}

/// Shared in-memory store; clones observe the same preferences.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
	stored: Arc<Mutex<Preferences>>,
}

impl MemoryPreferenceStore {
	#[must_use]
	pub fn new(preferences: Preferences) -> Self {
		Self {
			stored: Arc::new(Mutex::new(preferences)),
		}
	}

	#[must_use]
	pub fn snapshot(&self) -> Preferences {
		self.stored
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}
}

impl PreferenceStore for MemoryPreferenceStore {
	fn load(&self) -> Result<Preferences, PreferenceError> {
		Ok(self.snapshot())
	}

	fn save(&mut self, preferences: &Preferences) -> Result<(), PreferenceError> {
		*self
			.stored
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner()) = preferences.clone();
		Ok(())
	}
}

pub struct ContextOptions {
	/// Theme for this run only; the stored preference is left untouched.
	pub theme_override: Option<ThemePreference>,
	pub log: EventLogOptions,
	pub sink: Box<dyn LogSink>,
}

impl ContextOptions {
	pub fn new(sink: impl LogSink + 'static) -> Self {
		Self {
			theme_override: None,
			log: EventLogOptions::default(),
			sink: Box::new(sink),
		}
	}

	#[must_use]
	pub fn theme_override(mut self, theme: Option<ThemePreference>) -> Self {
		self.theme_override = theme;
		self
	}

	#[must_use]
	pub fn log_options(mut self, log: EventLogOptions) -> Self {
		self.log = log;
		self
	}
}

pub struct AppContext {
	session_id: SessionId,
	preferences: Preferences,
	active_theme: ThemePreference,
	store: Box<dyn PreferenceStore>,
	event_log: EventLog,
	torn_down: bool,
}

impl fmt::Debug for AppContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppContext")
			.field("session_id", &self.session_id)
			.field("preferences", &self.preferences)
			.field("active_theme", &self.active_theme)
			.field("torn_down", &self.torn_down)
			.finish_non_exhaustive()
	}
}

impl AppContext {
	/// Create the session, load stored preferences, and open the event log.
	///
	/// Unreadable preferences are logged and replaced by the defaults.
	pub fn init(options: ContextOptions, store: impl PreferenceStore + 'static) -> Self {
		let session_id = SessionId::generate();
		let preferences = store.load().unwrap_or_else(|err| {
			log::warn!("using default preferences: {err}");
			Preferences::default()
		});
		let active_theme = options
			.theme_override
			.unwrap_or_else(|| preferences.theme.clone());

		let mut event_log = EventLog::new(session_id.as_str(), options.log, options.sink);
		event_log.debug(
			"Session started",
			Some(json!({ "theme": active_theme.as_str() })),
		);

		Self {
			session_id,
			preferences,
			active_theme,
			store: Box::new(store),
			event_log,
			torn_down: false,
		}
	}

	#[must_use]
	pub fn session_id(&self) -> &SessionId {
		&self.session_id
	}

	#[must_use]
	pub fn theme_preference(&self) -> &ThemePreference {
		&self.active_theme
	}

	#[must_use]
	pub fn theme(&self) -> Theme {
		self.active_theme.resolve()
	}

	/// Change the theme for this run and remember it for the next one.
	pub fn set_theme_preference(&mut self, theme: ThemePreference) {
		self.event_log.track_event(
			"theme_change",
			Some(json!({ "from": self.active_theme.as_str(), "to": theme.as_str() })),
		);
		self.preferences.theme = theme.clone();
		self.active_theme = theme;
	}

	pub fn toggle_theme(&mut self) {
		let next = self.active_theme.toggled();
		self.set_theme_preference(next);
	}

	pub fn event_log(&mut self) -> &mut EventLog {
		&mut self.event_log
	}

	#[must_use]
	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	/// Flush pending log entries and persist preferences. Later calls are no-ops.
	pub fn teardown(&mut self) -> Result<(), PreferenceError> {
		if self.torn_down {
			return Ok(());
		}
		self.torn_down = true;
		self.event_log.debug("Session ended", None);
		self.event_log.flush();
		self.store.save(&self.preferences)
	}
}

impl Drop for AppContext {
	fn drop(&mut self) {
		if let Err(err) = self.teardown() {
			log::warn!("context teardown failed: {err}");
		}
	}
}
