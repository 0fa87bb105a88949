use std::path::PathBuf;
use std::time::Duration;

use datagrid::theme::ThemePreference;
use datagrid::{Column, ExportFormat, FieldPath, KeyAccessor, SortSpec};
use log::LevelFilter;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Where the records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
	Stdin,
	File(PathBuf),
}

impl InputSource {
	/// `-` and a missing argument both mean standard input.
	pub(crate) fn from_arg(arg: Option<PathBuf>) -> Self {
		match arg {
			Some(path) if path.as_os_str() != "-" => Self::File(path),
			_ => Self::Stdin,
		}
	}

	pub fn describe(&self) -> String {
		match self {
			Self::Stdin => "standard input".to_string(),
			Self::File(path) => path.display().to_string(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct GridSettings {
	pub title: String,
	pub description: Option<String>,
	pub page_size: usize,
	pub key: KeyAccessor,
	pub search_fields: Vec<FieldPath>,
	pub sort: Option<SortSpec>,
	pub selectable: bool,
	pub query: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
	pub level: LevelFilter,
	pub batch_size: usize,
	pub flush_interval: Duration,
	/// Overrides `<data dir>/events.jsonl`.
	pub events_file: Option<PathBuf>,
}

/// Headless export requested with `--export`.
#[derive(Debug, Clone)]
pub struct ExportRequest {
	pub format: ExportFormat,
	/// File or directory; the current directory when unset.
	pub output: Option<PathBuf>,
}

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug)]
pub struct ResolvedConfig {
	pub input: InputSource,
	pub grid: GridSettings,
	/// Empty when the columns should be inferred from the data.
	pub columns: Vec<Column>,
	/// `None` keeps the stored preference.
	pub theme: Option<ThemePreference>,
	pub logging: LoggingSettings,
	pub export: Option<ExportRequest>,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		summary::print_summary(self);
	}
}
