use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::format::parse_date;
use super::record::{FieldPath, Record};
use crate::grid::GridError;

/// How the values of a column compare when sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
	#[default]
	Text,
	Number,
	Date,
	Boolean,
	/// Structured values with no meaningful order.
	Json,
}

impl ValueKind {
	#[must_use]
	pub fn is_comparable(self) -> bool {
		!matches!(self, Self::Json)
	}

	/// Guess the kind of a sample value when columns are inferred.
	#[must_use]
	pub fn infer(value: &Value) -> Self {
		match value {
			Value::Bool(_) => Self::Boolean,
			Value::Number(_) => Self::Number,
			Value::String(text) if parse_date(text).is_some() => Self::Date,
			Value::Array(_) | Value::Object(_) => Self::Json,
			Value::String(_) | Value::Null => Self::Text,
		}
	}

	#[must_use]
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"text" | "string" => Some(Self::Text),
			"number" | "numeric" => Some(Self::Number),
			"date" | "datetime" => Some(Self::Date),
			"boolean" | "bool" => Some(Self::Boolean),
			"json" => Some(Self::Json),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Number => "number",
			Self::Date => "date",
			Self::Boolean => "boolean",
			Self::Json => "json",
		}
	}
}

type CellFn = dyn Fn(&Record) -> String + Send + Sync;

/// Projection from a record to the text shown in a cell.
#[derive(Clone, Default)]
pub enum CellRenderer {
	/// Stringify the raw value at the column key.
	#[default]
	Default,
	Custom(Arc<CellFn>),
}

impl fmt::Debug for CellRenderer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => f.write_str("Default"),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Describes how to label, sort, and render one field of a record.
#[derive(Debug, Clone)]
pub struct Column {
	pub key: FieldPath,
	pub header: String,
	pub sortable: bool,
	pub kind: ValueKind,
	/// Fixed display width in terminal cells. `None` shares the remaining space.
	pub width: Option<u16>,
	pub cell: CellRenderer,
}

impl Column {
	pub fn new(key: FieldPath, header: impl Into<String>) -> Self {
		Self {
			key,
			header: header.into(),
			sortable: false,
			kind: ValueKind::Text,
			width: None,
			cell: CellRenderer::Default,
		}
	}

	/// Parse `key` and build a column in one step.
	pub fn parse(key: &str, header: impl Into<String>) -> Result<Self, GridError> {
		Ok(Self::new(FieldPath::parse(key)?, header))
	}

	#[must_use]
	pub fn sortable(mut self) -> Self {
		self.sortable = true;
		self
	}

	#[must_use]
	pub fn kind(mut self, kind: ValueKind) -> Self {
		self.kind = kind;
		self
	}

	#[must_use]
	pub fn width(mut self, width: u16) -> Self {
		self.width = Some(width);
		self
	}

	#[must_use]
	pub fn render_with<F>(mut self, render: F) -> Self
	where
		F: Fn(&Record) -> String + Send + Sync + 'static,
	{
		self.cell = CellRenderer::Custom(Arc::new(render));
		self
	}

	/// Derive one sortable column per top-level field of `sample`.
	///
	/// Structured fields become unsortable JSON columns.
	#[must_use]
	pub fn infer_from(sample: &Record) -> Vec<Column> {
		sample
			.fields()
			.map(|(name, value)| {
				let kind = ValueKind::infer(value);
				let column = Column::new(FieldPath::literal(name), header_label(name)).kind(kind);
				if kind.is_comparable() {
					column.sortable()
				} else {
					column
				}
			})
			.collect()
	}
}

/// Turn a field name such as `created_at` or `firstName` into `Created At` / `First Name`.
#[must_use]
pub fn header_label(field: &str) -> String {
	let mut words: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut previous_lower = false;
	for ch in field.chars() {
		if ch == '_' || ch == '-' || ch.is_whitespace() {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			previous_lower = false;
			continue;
		}
		if ch.is_uppercase() && previous_lower && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}
		previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
		current.push(ch);
	}
	if !current.is_empty() {
		words.push(current);
	}

	words
		.into_iter()
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn header_labels_split_snake_and_camel_case() {
		assert_eq!(header_label("created_at"), "Created At");
		assert_eq!(header_label("firstName"), "First Name");
		assert_eq!(header_label("id"), "Id");
		assert_eq!(header_label("ID"), "ID");
	}

	#[test]
	fn inferred_columns_follow_field_order_and_kinds() {
		let sample = Record::from_value(json!({
			"id": 1,
			"name": "Alice",
			"joined": "2024-03-01",
			"active": true,
			"meta": { "source": "import" },
		}))
		.unwrap();

		let columns = Column::infer_from(&sample);
		let summary: Vec<(&str, ValueKind, bool)> = columns
			.iter()
			.map(|column| (column.key.as_str(), column.kind, column.sortable))
			.collect();
		assert_eq!(
			summary,
			vec![
				("id", ValueKind::Number, true),
				("name", ValueKind::Text, true),
				("joined", ValueKind::Date, true),
				("active", ValueKind::Boolean, true),
				("meta", ValueKind::Json, false),
			]
		);
	}

	#[test]
	fn inferred_columns_address_top_level_keys_verbatim() {
		let sample = Record::from_value(json!({
			"id": 1,
			"user.name": "Ann",
			" padded": "x",
		}))
		.unwrap();

		let columns = Column::infer_from(&sample);
		let keys: Vec<&str> = columns.iter().map(|column| column.key.as_str()).collect();
		assert_eq!(keys, vec!["id", "user.name", " padded"]);
		assert_eq!(columns[1].header, "User.name");
		assert_eq!(sample.get(&columns[1].key), Some(&json!("Ann")));
		assert_eq!(sample.get(&columns[2].key), Some(&json!("x")));

		let records = vec![sample];
		let rows: Vec<&Record> = records.iter().collect();
		let csv = crate::grid::to_csv(&rows, &columns).unwrap();
		assert_eq!(csv, "Id,User.name,Padded\n1,Ann,x\n");
		let matched = crate::grid::view(&records, &columns, "ann", None, 0, 10).unwrap();
		assert_eq!(matched.filtered_count(), 1);
	}

	#[test]
	fn value_kinds_parse_aliases() {
		assert_eq!(ValueKind::parse("Numeric"), Some(ValueKind::Number));
		assert_eq!(ValueKind::parse("bool"), Some(ValueKind::Boolean));
		assert_eq!(ValueKind::parse("blob"), None);
	}
}
