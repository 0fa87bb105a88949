use datagrid::theme::{self, ThemePreference};

use super::{ConfigError, ConfigSources, ResolvedConfig};

pub(super) fn validate(
	config: &ResolvedConfig,
	sources: &ConfigSources,
) -> Result<(), ConfigError> {
	if config.grid.page_size == 0 {
		return Err(ConfigError::invalid(
			"grid.page_size",
			"0",
			sources.page_size(),
			"must be greater than zero",
		));
	}

	if config.logging.batch_size == 0 {
		return Err(ConfigError::invalid(
			"logging.batch_size",
			"0",
			sources.batch_size(),
			"must be greater than zero",
		));
	}

	if config.logging.flush_interval.is_zero() {
		return Err(ConfigError::invalid(
			"logging.flush_interval_secs",
			"0",
			sources.flush_interval(),
			"must be at least 1",
		));
	}

	if let Some(ThemePreference::Named(name)) = &config.theme
		&& theme::by_name(name).is_none()
	{
		return Err(ConfigError::invalid(
			"ui.theme",
			name.clone(),
			sources.theme(),
			format!("unknown theme; expected one of {}", theme::names().join(", ")),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use datagrid::KeyAccessor;
	use log::LevelFilter;

	use super::super::{GridSettings, InputSource, LoggingSettings, SettingSource};
	use super::*;

	fn config() -> ResolvedConfig {
		ResolvedConfig {
			input: InputSource::Stdin,
			grid: GridSettings {
				title: "Users".into(),
				description: None,
				page_size: 10,
				key: KeyAccessor::default(),
				search_fields: Vec::new(),
				sort: None,
				selectable: true,
				query: String::new(),
			},
			columns: Vec::new(),
			theme: None,
			logging: LoggingSettings {
				level: LevelFilter::Info,
				batch_size: 10,
				flush_interval: Duration::from_secs(30),
				events_file: None,
			},
			export: None,
		}
	}

	#[test]
	fn validation_accepts_defaults() {
		assert!(validate(&config(), &ConfigSources::default()).is_ok());
	}

	#[test]
	fn validation_rejects_zero_page_size() {
		let mut config = config();
		config.grid.page_size = 0;
		let sources = ConfigSources {
			page_size: Some(SettingSource::CliFlag("--page-size")),
			..ConfigSources::default()
		};

		let err = validate(&config, &sources).unwrap_err();
		assert!(matches!(err.key, "grid.page_size"));
		let message = err.to_string();
		assert!(message.contains("value: 0"));
		assert!(message.contains("CLI flag"));
	}

	#[test]
	fn validation_rejects_zero_batch_size() {
		let mut config = config();
		config.logging.batch_size = 0;
		let sources = ConfigSources {
			batch_size: Some(SettingSource::Environment("DATAGRID__LOGGING__BATCH_SIZE")),
			..ConfigSources::default()
		};

		let err = validate(&config, &sources).unwrap_err();
		assert!(matches!(err.key, "logging.batch_size"));
		assert!(err.to_string().contains("environment variable"));
	}

	#[test]
	fn validation_rejects_unknown_themes() {
		let mut config = config();
		config.theme = Some(ThemePreference::Named("neon".into()));
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert!(matches!(err.key, "ui.theme"));
		assert!(err.to_string().contains("slate"));
	}
}
