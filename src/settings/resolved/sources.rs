use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Where each validated setting came from, for error messages.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	pub(crate) page_size: Option<SettingSource>,
	pub(crate) sort: Option<SettingSource>,
	pub(crate) key_field: Option<SettingSource>,
	pub(crate) search_fields: Option<SettingSource>,
	pub(crate) theme: Option<SettingSource>,
	pub(crate) log_level: Option<SettingSource>,
	pub(crate) batch_size: Option<SettingSource>,
	pub(crate) flush_interval: Option<SettingSource>,
}

fn or_key(source: &Option<SettingSource>, key: &'static str) -> SettingSource {
	source.clone().unwrap_or(SettingSource::ConfigKey(key))
}

impl ConfigSources {
	pub(crate) fn page_size(&self) -> SettingSource {
		or_key(&self.page_size, "grid.page_size")
	}

	pub(crate) fn sort(&self) -> SettingSource {
		or_key(&self.sort, "grid.sort")
	}

	pub(crate) fn key_field(&self) -> SettingSource {
		or_key(&self.key_field, "grid.key_field")
	}

	pub(crate) fn search_fields(&self) -> SettingSource {
		or_key(&self.search_fields, "grid.search_fields")
	}

	pub(crate) fn theme(&self) -> SettingSource {
		or_key(&self.theme, "ui.theme")
	}

	pub(crate) fn log_level(&self) -> SettingSource {
		or_key(&self.log_level, "logging.level")
	}

	pub(crate) fn batch_size(&self) -> SettingSource {
		or_key(&self.batch_size, "logging.batch_size")
	}

	pub(crate) fn flush_interval(&self) -> SettingSource {
		or_key(&self.flush_interval, "logging.flush_interval_secs")
	}
}
