//! Resolve configuration and data directories for `datagrid`.
//!
//! Environment overrides win; otherwise the platform locations provided by
//! the `directories` crate are used.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "datagrid";
const APPLICATION: &str = "datagrid";

pub const CONFIG_DIR_ENV: &str = "DATAGRID_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "DATAGRID_DATA_DIR";

pub const LOG_FILE_NAME: &str = "datagrid.log";
pub const EVENTS_FILE_NAME: &str = "events.jsonl";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

fn project_dirs() -> Result<ProjectDirs> {
	ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
		.ok_or_else(|| anyhow!("unable to determine project directories for datagrid"))
}

/// An empty value is treated the same as an unset one.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	let value = env::var_os(name)?;
	if value.is_empty() {
		None
	} else {
		Some(PathBuf::from(value))
	}
}

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
		return Ok(dir);
	}
	Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Directory for logs, preferences, and exports written from the UI.
pub fn get_data_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
		return Ok(dir);
	}
	Ok(project_dirs()?.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_overrides_are_ignored() {
		assert_eq!(dir_from_env("DATAGRID_TEST_UNSET_DIRECTORY"), None);
	}
}
