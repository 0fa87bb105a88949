use datagrid::theme::ThemePreference;
use serde::Deserialize;

use super::super::util::non_blank;
use crate::cli::CliArgs;

/// `[ui]` values prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UiSection {
	pub(super) theme: Option<String>,
}

impl UiSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(theme) = cli.theme.clone() {
			self.theme = Some(theme);
		}
	}

	/// `None` keeps the stored preference.
	pub(super) fn resolve(self) -> Option<ThemePreference> {
		non_blank(self.theme).map(|name| ThemePreference::parse(&name))
	}
}
