use std::fmt;

use serde::{Deserialize, Serialize};

use super::builtins::{DARK, LIGHT};
use super::registry::by_name;
use super::types::Theme;

const COLORFGBG_ENV: &str = "COLORFGBG";

/// The user's persisted theme choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThemePreference {
	Light,
	Dark,
	/// Follow the terminal background.
	#[default]
	System,
	Named(String),
}

impl ThemePreference {
	#[must_use]
	pub fn parse(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"light" => Self::Light,
			"dark" => Self::Dark,
			"system" | "auto" | "" => Self::System,
			_ => Self::Named(value.trim().to_string()),
		}
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
			Self::System => "system",
			Self::Named(name) => name,
		}
	}

	/// Light and dark swap; system and named themes toggle away from the
	/// currently resolved appearance.
	#[must_use]
	pub fn toggled(&self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
			Self::System | Self::Named(_) => {
				if self.resolve() == DARK {
					Self::Light
				} else {
					Self::Dark
				}
			}
		}
	}

	/// Resolve against the registry and the `COLORFGBG` environment variable.
	#[must_use]
	pub fn resolve(&self) -> Theme {
		self.resolve_with(std::env::var(COLORFGBG_ENV).ok().as_deref())
	}

	/// Resolve using an explicit `COLORFGBG` value. Unknown names fall back
	/// to the light theme.
	#[must_use]
	pub fn resolve_with(&self, colorfgbg: Option<&str>) -> Theme {
		match self {
			Self::Light => LIGHT,
			Self::Dark => DARK,
			Self::System => {
				if colorfgbg.is_some_and(is_dark_background) {
					DARK
				} else {
					LIGHT
				}
			}
			Self::Named(name) => by_name(name).unwrap_or_else(|| {
				log::warn!("unknown theme '{name}', using light");
				LIGHT
			}),
		}
	}
}

impl From<String> for ThemePreference {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}

impl From<ThemePreference> for String {
	fn from(value: ThemePreference) -> Self {
		value.as_str().to_string()
	}
}

impl fmt::Display for ThemePreference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI backgrounds 0-6
/// and 8 are dark.
fn is_dark_background(value: &str) -> bool {
	value
		.rsplit(';')
		.next()
		.and_then(|bg| bg.trim().parse::<u8>().ok())
		.is_some_and(|bg| bg <= 6 || bg == 8)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::theme::builtins::SLATE;

	#[test]
	fn preferences_parse_and_round_trip_as_strings() {
		assert_eq!(ThemePreference::parse("Dark"), ThemePreference::Dark);
		assert_eq!(ThemePreference::parse(" "), ThemePreference::System);
		assert_eq!(
			ThemePreference::parse("slate"),
			ThemePreference::Named("slate".into())
		);

		let json = serde_json::to_string(&ThemePreference::Light).unwrap();
		assert_eq!(json, "\"light\"");
		let parsed: ThemePreference = serde_json::from_str("\"slate\"").unwrap();
		assert_eq!(parsed.resolve_with(None), SLATE);
	}

	#[test]
	fn system_follows_the_terminal_background() {
		let system = ThemePreference::System;
		assert_eq!(system.resolve_with(Some("15;0")), DARK);
		assert_eq!(system.resolve_with(Some("0;default;15")), LIGHT);
		assert_eq!(system.resolve_with(Some("garbage")), LIGHT);
		assert_eq!(system.resolve_with(None), LIGHT);
	}

	#[test]
	fn toggling_swaps_light_and_dark() {
		assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
		assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
	}

	#[test]
	fn unknown_names_fall_back_to_light() {
		let missing = ThemePreference::Named("no-such-theme".into());
		assert_eq!(missing.resolve_with(None), LIGHT);
	}
}
