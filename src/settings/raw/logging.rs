use std::path::PathBuf;
use std::time::Duration;

use datagrid::logging::{DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL, parse_level_filter};
use log::LevelFilter;
use serde::Deserialize;

use super::super::resolved::{ConfigError, ConfigSources, LoggingSettings};
use super::super::util::non_blank;
use crate::cli::CliArgs;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// `[logging]` values prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoggingSection {
	pub(super) level: Option<String>,
	pub(super) batch_size: Option<usize>,
	pub(super) flush_interval_secs: Option<u64>,
	pub(super) events_file: Option<PathBuf>,
}

impl LoggingSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(level) = cli.log_level.clone() {
			self.level = Some(level);
		}
	}

	pub(super) fn resolve(self, sources: &ConfigSources) -> Result<LoggingSettings, ConfigError> {
		let level = match non_blank(self.level) {
			Some(name) => parse_level_filter(&name).ok_or_else(|| {
				ConfigError::invalid(
					"logging.level",
					name.clone(),
					sources.log_level(),
					"expected one of off, error, warn, info, debug, trace",
				)
			})?,
			None => DEFAULT_LEVEL,
		};

		Ok(LoggingSettings {
			level,
			batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
			flush_interval: self
				.flush_interval_secs
				.map_or(DEFAULT_FLUSH_INTERVAL, Duration::from_secs),
			events_file: self.events_file,
		})
	}
}
