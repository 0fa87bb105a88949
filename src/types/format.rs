use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::column::{CellRenderer, Column};
use super::record::{FieldPath, Record};

/// Stringify a JSON value the way cells, search, and exports display it.
#[must_use]
pub fn stringify_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(text) => text.clone(),
		Value::Bool(flag) => flag.to_string(),
		Value::Number(number) => number.to_string(),
		structured => structured.to_string(),
	}
}

/// Text of the raw value at `path`; missing fields render as an empty string.
#[must_use]
pub fn field_text(record: &Record, path: &FieldPath) -> String {
	record.get(path).map(stringify_value).unwrap_or_default()
}

/// Project `record` through `column` into displayable text.
#[must_use]
pub fn format_cell(record: &Record, column: &Column) -> String {
	match &column.cell {
		CellRenderer::Default => field_text(record, &column.key),
		CellRenderer::Custom(render) => render(record),
	}
}

/// Parse RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`, or bare `YYYY-MM-DD` dates.
#[must_use]
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
	let text = text.trim();
	if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
		return Some(parsed.with_timezone(&Utc));
	}
	if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
		return Some(parsed.and_utc());
	}
	NaiveDate::parse_from_str(text, "%Y-%m-%d")
		.ok()
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn scalars_stringify_without_quotes() {
		assert_eq!(stringify_value(&json!(null)), "");
		assert_eq!(stringify_value(&json!("plain")), "plain");
		assert_eq!(stringify_value(&json!(12.5)), "12.5");
		assert_eq!(stringify_value(&json!(false)), "false");
		assert_eq!(stringify_value(&json!(["a", 1])), r#"["a",1]"#);
	}

	#[test]
	fn missing_fields_format_as_empty_cells() {
		let record = Record::new().with("name", "Alice");
		let column = Column::parse("email", "Email").unwrap();
		assert_eq!(format_cell(&record, &column), "");
	}

	#[test]
	fn custom_renderers_take_precedence() {
		let record = Record::new().with("first", "Ada").with("last", "Lovelace");
		let column = Column::parse("first", "Name").unwrap().render_with(|record| {
			let first = record.as_map().get("first").and_then(Value::as_str);
			let last = record.as_map().get("last").and_then(Value::as_str);
			format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default())
		});
		assert_eq!(format_cell(&record, &column), "Ada Lovelace");
	}

	#[test]
	fn dates_parse_in_common_shapes() {
		assert!(parse_date("2024-01-31").is_some());
		assert!(parse_date("2024-01-31 08:15:00").is_some());
		assert!(parse_date("2024-01-31T08:15:00+02:00").is_some());
		assert!(parse_date("31/01/2024").is_none());
		assert!(
			parse_date("2024-01-31T08:15:00+02:00").unwrap()
				< parse_date("2024-01-31 08:15:00").unwrap()
		);
	}
}
