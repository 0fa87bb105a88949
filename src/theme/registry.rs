use super::builtins::BUILT_IN_DEFINITIONS;
use super::types::{Theme, ThemeDefinition};

fn find(name: &str) -> Option<&'static ThemeDefinition> {
	let wanted = name.trim();
	BUILT_IN_DEFINITIONS.iter().find(|definition| {
		definition.name.eq_ignore_ascii_case(wanted)
			|| definition
				.aliases
				.iter()
				.any(|alias| alias.eq_ignore_ascii_case(wanted))
	})
}

/// Lookup a bundled theme by case-insensitive name or alias.
#[must_use]
pub fn by_name(name: &str) -> Option<Theme> {
	find(name).map(|definition| definition.theme)
}

/// Canonical theme names, sorted.
#[must_use]
pub fn names() -> Vec<String> {
	let mut names: Vec<String> = BUILT_IN_DEFINITIONS
		.iter()
		.map(|definition| definition.name.to_string())
		.collect();
	names.sort_unstable();
	names
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::theme::builtins::{DARK, LIGHT, SLATE};

	#[test]
	fn builtin_themes_are_listed() {
		assert_eq!(names(), vec!["dark", "light", "slate"]);
	}

	#[test]
	fn lookups_ignore_case_and_follow_aliases() {
		assert_eq!(by_name("SLATE"), Some(SLATE));
		assert_eq!(by_name(" night "), Some(DARK));
		assert_eq!(by_name("Default"), Some(LIGHT));
		assert_eq!(by_name("solarized"), None);
	}
}
