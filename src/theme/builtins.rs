use ratatui::style::{Color, Modifier, Style};

use super::types::{Theme, ThemeDefinition};

pub const LIGHT_NAME: &str = "light";
pub const DARK_NAME: &str = "dark";
pub const SLATE_NAME: &str = "slate";

pub const LIGHT: Theme = Theme {
	title: Style::new()
		.fg(Color::Rgb(15, 23, 42))
		.add_modifier(Modifier::BOLD),
	header: Style::new()
		.fg(Color::Rgb(15, 23, 42))
		.bg(Color::Rgb(226, 232, 240)),
	row_highlight: Style::new()
		.bg(Color::Rgb(203, 213, 225))
		.fg(Color::Rgb(30, 64, 175)),
	selected: Style::new().fg(Color::Rgb(37, 99, 235)),
	prompt: Style::new().fg(Color::Rgb(0, 102, 153)),
	empty: Style::new().fg(Color::Rgb(100, 116, 139)),
	highlight: Style::new()
		.fg(Color::Rgb(120, 120, 0))
		.add_modifier(Modifier::BOLD),
};

pub const DARK: Theme = Theme {
	title: Style::new()
		.fg(Color::Rgb(241, 245, 249))
		.add_modifier(Modifier::BOLD),
	header: Style::new()
		.fg(Color::Rgb(241, 245, 249))
		.bg(Color::Rgb(31, 41, 55)),
	row_highlight: Style::new()
		.bg(Color::Rgb(55, 65, 81))
		.fg(Color::Rgb(147, 197, 253)),
	selected: Style::new().fg(Color::Rgb(96, 165, 250)),
	prompt: Style::new().fg(Color::LightBlue),
	empty: Style::new().fg(Color::Gray),
	highlight: Style::new()
		.fg(Color::Rgb(250, 204, 21))
		.add_modifier(Modifier::BOLD),
};

pub const SLATE: Theme = Theme {
	title: Style::new()
		.fg(Color::Rgb(226, 232, 240))
		.add_modifier(Modifier::BOLD),
	header: Style::new()
		.fg(Color::Rgb(226, 232, 240))
		.bg(Color::Rgb(15, 23, 42)),
	row_highlight: Style::new()
		.bg(Color::Rgb(30, 41, 59))
		.fg(Color::Rgb(250, 204, 21)),
	selected: Style::new().fg(Color::LightCyan),
	prompt: Style::new().fg(Color::LightCyan),
	empty: Style::new().fg(Color::DarkGray),
	highlight: Style::new()
		.fg(Color::Yellow)
		.add_modifier(Modifier::BOLD),
};

pub const BUILT_IN_DEFINITIONS: &[ThemeDefinition] = &[
	ThemeDefinition::new(LIGHT_NAME, LIGHT).with_aliases(&["default", "day"]),
	ThemeDefinition::new(DARK_NAME, DARK).with_aliases(&["night"]),
	ThemeDefinition::new(SLATE_NAME, SLATE),
];

#[must_use]
pub fn default_theme() -> Theme {
	LIGHT
}
