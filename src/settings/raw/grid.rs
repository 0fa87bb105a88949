use datagrid::{FieldPath, KeyAccessor, SortSpec};
use serde::Deserialize;

use super::super::resolved::{ConfigError, ConfigSources, GridSettings};
use super::super::util::{non_blank, sanitize_list};
use crate::cli::CliArgs;

const DEFAULT_TITLE: &str = "Data Grid";
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_KEY_FIELD: &str = "id";

/// `[grid]` values prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct GridSection {
	pub(super) title: Option<String>,
	pub(super) description: Option<String>,
	pub(super) page_size: Option<usize>,
	pub(super) key_field: Option<String>,
	pub(super) search_fields: Option<Vec<String>>,
	pub(super) sort: Option<String>,
	pub(super) selectable: Option<bool>,
	pub(super) query: Option<String>,
}

impl GridSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(title) = cli.title.clone() {
			self.title = Some(title);
		}
		if let Some(description) = cli.description.clone() {
			self.description = Some(description);
		}
		if let Some(page_size) = cli.page_size {
			self.page_size = Some(page_size);
		}
		if let Some(key) = cli.key.clone() {
			self.key_field = Some(key);
		}
		if let Some(fields) = &cli.search_fields {
			self.search_fields = Some(fields.clone());
		}
		if let Some(sort) = cli.sort.clone() {
			self.sort = Some(sort);
		}
		if let Some(selectable) = cli.selectable {
			self.selectable = Some(selectable);
		}
		if let Some(query) = cli.query.clone() {
			self.query = Some(query);
		}
	}

	pub(super) fn resolve(self, sources: &ConfigSources) -> Result<GridSettings, ConfigError> {
		let key_name = non_blank(self.key_field).unwrap_or_else(|| DEFAULT_KEY_FIELD.to_string());
		let key_path = FieldPath::parse(&key_name).map_err(|err| {
			ConfigError::invalid(
				"grid.key_field",
				key_name.clone(),
				sources.key_field(),
				err.to_string(),
			)
		})?;

		let search_fields = sanitize_list(self.search_fields.unwrap_or_default())
			.into_iter()
			.map(|field| {
				FieldPath::parse(&field).map_err(|err| {
					ConfigError::invalid(
						"grid.search_fields",
						field.clone(),
						sources.search_fields(),
						err.to_string(),
					)
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		let sort = match non_blank(self.sort) {
			Some(raw) => Some(SortSpec::parse(&raw).map_err(|err| {
				ConfigError::invalid("grid.sort", raw.clone(), sources.sort(), err.to_string())
			})?),
			None => None,
		};

		Ok(GridSettings {
			title: non_blank(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
			description: non_blank(self.description),
			page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
			key: KeyAccessor::field(key_path),
			search_fields,
			sort,
			selectable: self.selectable.unwrap_or(true),
			query: self.query.unwrap_or_default(),
		})
	}
}
