use anyhow::{Error, Result};
use serde::Deserialize;
use std::env;

use crate::cli::CliArgs;

use super::resolved::{ConfigSources, ExportRequest, InputSource, ResolvedConfig, SettingSource};

mod columns;
mod grid;
mod logging;
mod ui;

use columns::ColumnSection;
use grid::GridSection;
use logging::LoggingSection;
use ui::UiSection;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	grid: GridSection,
	columns: Vec<ColumnSection>,
	ui: UiSection,
	logging: LoggingSection,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		self.grid.apply_cli_overrides(cli);
		columns::apply_cli_overrides(&mut self.columns, cli);
		self.ui.apply_cli_overrides(cli);
		self.logging.apply_cli_overrides(cli);
	}

	/// Convert the raw configuration into a [`ResolvedConfig`], validating and
	/// filling defaults where required.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let sources = ConfigSources {
			page_size: detect_source(
				cli.page_size.is_some(),
				self.grid.page_size.is_some(),
				"DATAGRID__GRID__PAGE_SIZE",
				"--page-size",
				"grid.page_size",
			),
			sort: detect_source(
				cli.sort.is_some(),
				self.grid.sort.is_some(),
				"DATAGRID__GRID__SORT",
				"--sort",
				"grid.sort",
			),
			key_field: detect_source(
				cli.key.is_some(),
				self.grid.key_field.is_some(),
				"DATAGRID__GRID__KEY_FIELD",
				"--key",
				"grid.key_field",
			),
			search_fields: detect_source(
				cli.search_fields.is_some(),
				self.grid.search_fields.is_some(),
				"DATAGRID__GRID__SEARCH_FIELDS",
				"--search-fields",
				"grid.search_fields",
			),
			theme: detect_source(
				cli.theme.is_some(),
				self.ui.theme.is_some(),
				"DATAGRID__UI__THEME",
				"--theme",
				"ui.theme",
			),
			log_level: detect_source(
				cli.log_level.is_some(),
				self.logging.level.is_some(),
				"DATAGRID__LOGGING__LEVEL",
				"--log-level",
				"logging.level",
			),
			batch_size: detect_source(
				false,
				self.logging.batch_size.is_some(),
				"DATAGRID__LOGGING__BATCH_SIZE",
				"",
				"logging.batch_size",
			),
			flush_interval: detect_source(
				false,
				self.logging.flush_interval_secs.is_some(),
				"DATAGRID__LOGGING__FLUSH_INTERVAL_SECS",
				"",
				"logging.flush_interval_secs",
			),
		};

		let grid = self.grid.resolve(&sources).map_err(Error::new)?;
		let columns = columns::resolve(self.columns).map_err(Error::new)?;
		let logging = self.logging.resolve(&sources).map_err(Error::new)?;

		let config = ResolvedConfig {
			input: InputSource::from_arg(cli.input.clone()),
			grid,
			columns,
			theme: self.ui.resolve(),
			logging,
			export: cli.export.map(|format| ExportRequest {
				format: format.into(),
				output: cli.output.clone(),
			}),
		};

		config.validate(&sources).map_err(Error::new)?;

		Ok(config)
	}
}

fn detect_source(
	cli_present: bool,
	value_present: bool,
	env_var: &'static str,
	cli_flag: &'static str,
	key: &'static str,
) -> Option<SettingSource> {
	if !value_present {
		return None;
	}

	if cli_present {
		return Some(SettingSource::CliFlag(cli_flag));
	}

	if env::var_os(env_var).is_some() {
		return Some(SettingSource::Environment(env_var));
	}

	Some(SettingSource::ConfigKey(key))
}
