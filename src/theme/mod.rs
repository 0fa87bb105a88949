mod builtins;
mod preference;
mod registry;
mod types;

pub use builtins::{DARK, LIGHT, SLATE, default_theme};
pub use preference::ThemePreference;
pub use registry::{by_name, names};
pub use types::{Theme, ThemeDefinition};

impl Default for Theme {
	fn default() -> Self {
		default_theme()
	}
}
