use datagrid::types::header_label;
use datagrid::{Column, FieldPath, ValueKind};
use serde::Deserialize;

use super::super::resolved::{ConfigError, SettingSource};
use super::super::util::non_blank;
use crate::cli::CliArgs;

/// One `[[columns]]` entry prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(super) struct ColumnSection {
	pub(super) key: String,
	pub(super) header: Option<String>,
	pub(super) sortable: bool,
	pub(super) kind: Option<String>,
	pub(super) width: Option<u16>,
}

impl ColumnSection {
	fn keyed(key: &str) -> Self {
		Self {
			key: key.to_string(),
			sortable: true,
			..Self::default()
		}
	}

	fn resolve(self) -> Result<Column, ConfigError> {
		let origin = SettingSource::ConfigKey("columns");
		let key = FieldPath::parse(&self.key).map_err(|err| {
			ConfigError::invalid("columns.key", self.key.clone(), origin.clone(), err.to_string())
		})?;

		let kind = match non_blank(self.kind) {
			Some(name) => ValueKind::parse(&name).ok_or_else(|| {
				ConfigError::invalid(
					"columns.kind",
					name.clone(),
					origin.clone(),
					"expected one of text, number, date, boolean, json",
				)
			})?,
			None => ValueKind::Text,
		};

		let header = non_blank(self.header).unwrap_or_else(|| header_label(key.leaf()));
		let mut column = Column::new(key, header).kind(kind);
		if self.sortable {
			column = column.sortable();
		}
		if let Some(width) = self.width {
			column = column.width(width);
		}
		Ok(column)
	}
}

/// `--columns` picks which fields to show, keeping matching configured entries.
pub(super) fn apply_cli_overrides(columns: &mut Vec<ColumnSection>, cli: &CliArgs) {
	let Some(keys) = &cli.columns else {
		return;
	};
	let selected = keys
		.iter()
		.map(|key| key.trim())
		.filter(|key| !key.is_empty())
		.map(|key| {
			columns
				.iter()
				.find(|column| column.key == key)
				.cloned()
				.unwrap_or_else(|| ColumnSection::keyed(key))
		})
		.collect();
	*columns = selected;
}

pub(super) fn resolve(columns: Vec<ColumnSection>) -> Result<Vec<Column>, ConfigError> {
	columns.into_iter().map(ColumnSection::resolve).collect()
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[test]
	fn headers_default_to_the_field_label() {
		let column = ColumnSection {
			key: "address.zip_code".into(),
			kind: Some("number".into()),
			sortable: true,
			..ColumnSection::default()
		}
		.resolve()
		.unwrap();
		assert_eq!(column.header, "Zip Code");
		assert_eq!(column.kind, ValueKind::Number);
		assert!(column.sortable);
	}

	#[test]
	fn unknown_kinds_are_rejected() {
		let err = ColumnSection {
			key: "name".into(),
			kind: Some("currency".into()),
			..ColumnSection::default()
		}
		.resolve()
		.unwrap_err();
		assert_eq!(err.key, "columns.kind");
		assert!(err.to_string().contains("configuration key `columns`"));
	}

	#[test]
	fn cli_columns_keep_configured_entries() {
		let mut columns = vec![ColumnSection {
			key: "email".into(),
			header: Some("E-mail".into()),
			..ColumnSection::default()
		}];
		let cli = CliArgs::parse_from(["datagrid", "--columns", "name,email"]);
		apply_cli_overrides(&mut columns, &cli);

		assert_eq!(columns.len(), 2);
		assert_eq!(columns[0], ColumnSection::keyed("name"));
		assert_eq!(columns[1].header.as_deref(), Some("E-mail"));
	}
}
