use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::{Map, Value};

use super::GridError;
use crate::types::{Column, Record, format_cell};

/// Serialization formats supported by [`DataGrid::export`](super::DataGrid::export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
	#[default]
	Csv,
	Json,
}

impl ExportFormat {
	#[must_use]
	pub fn extension(self) -> &'static str {
		match self {
			Self::Csv => "csv",
			Self::Json => "json",
		}
	}

	#[must_use]
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"csv" => Some(Self::Csv),
			"json" => Some(Self::Json),
			_ => None,
		}
	}
}

/// A rendered export ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
	pub file_name: String,
	pub format: ExportFormat,
	pub content: String,
	pub row_count: usize,
}

/// Serialize `rows` as CSV: a header of column labels followed by one line per record.
///
/// Fields containing a comma, a double quote, or a line break are quoted and
/// embedded quotes are doubled.
pub fn to_csv(rows: &[&Record], columns: &[Column]) -> Result<String, GridError> {
	let mut writer = WriterBuilder::new()
		.quote_style(QuoteStyle::Necessary)
		.terminator(Terminator::Any(b'\n'))
		.from_writer(Vec::new());

	writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
	for record in rows {
		writer.write_record(columns.iter().map(|column| format_cell(record, column)))?;
	}

	let bytes = writer
		.into_inner()
		.map_err(|err| GridError::Io(err.into_error()))?;
	Ok(String::from_utf8(bytes)?)
}

/// Serialize `rows` as a pretty JSON array of objects keyed by column header.
pub fn to_json(rows: &[&Record], columns: &[Column]) -> Result<String, GridError> {
	let objects: Vec<Value> = rows
		.iter()
		.map(|record| {
			let object: Map<String, Value> = columns
				.iter()
				.map(|column| (column.header.clone(), Value::String(format_cell(record, column))))
				.collect();
			Value::Object(object)
		})
		.collect();
	Ok(serde_json::to_string_pretty(&objects)?)
}

/// Download name for an export of the grid titled `title`.
///
/// Runs of whitespace become a single underscore, e.g. `User Management`
/// exports to `User_Management_data.csv`.
#[must_use]
pub fn export_file_name(title: &str, format: ExportFormat) -> String {
	let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
	let stem = if stem.is_empty() { "export" } else { &stem };
	format!("{stem}_data.{}", format.extension())
}

pub(super) fn render(
	title: &str,
	rows: &[&Record],
	columns: &[Column],
	format: ExportFormat,
) -> Result<Export, GridError> {
	let content = match format {
		ExportFormat::Csv => to_csv(rows, columns)?,
		ExportFormat::Json => to_json(rows, columns)?,
	};
	Ok(Export {
		file_name: export_file_name(title, format),
		format,
		content,
		row_count: rows.len(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn columns() -> Vec<Column> {
		vec![
			Column::parse("id", "ID").unwrap(),
			Column::parse("name", "Name").unwrap(),
			Column::parse("note", "Note").unwrap(),
		]
	}

	#[test]
	fn csv_has_header_and_one_line_per_record() {
		let records = vec![
			Record::new().with("id", 1).with("name", "Alice").with("note", "ok"),
			Record::new().with("id", 2).with("name", "Bob"),
		];
		let rows: Vec<&Record> = records.iter().collect();
		let csv = to_csv(&rows, &columns()).unwrap();
		assert_eq!(csv, "ID,Name,Note\n1,Alice,ok\n2,Bob,\n");
	}

	#[test]
	fn csv_escapes_commas_quotes_and_newlines() {
		let records = vec![Record::new()
			.with("id", 1)
			.with("name", "Smith, \"Jo\"")
			.with("note", "line one\nline two")];
		let rows: Vec<&Record> = records.iter().collect();
		let csv = to_csv(&rows, &columns()).unwrap();
		assert_eq!(
			csv,
			"ID,Name,Note\n1,\"Smith, \"\"Jo\"\"\",\"line one\nline two\"\n"
		);
	}

	#[test]
	fn csv_round_trips_through_a_standard_reader() {
		let tricky = "He said \"hi\", then left";
		let records = vec![Record::new().with("id", 9).with("name", tricky).with("note", "a\nb")];
		let rows: Vec<&Record> = records.iter().collect();
		let csv = to_csv(&rows, &columns()).unwrap();

		let mut reader = csv::Reader::from_reader(csv.as_bytes());
		let headers = reader.headers().unwrap().clone();
		assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["ID", "Name", "Note"]);
		let parsed: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
		assert_eq!(parsed.len(), 1);
		assert_eq!(&parsed[0][1], tricky);
		assert_eq!(&parsed[0][2], "a\nb");
	}

	#[test]
	fn json_export_uses_headers_as_keys() {
		let records = vec![Record::new().with("id", 1).with("name", "Alice")];
		let rows: Vec<&Record> = records.iter().collect();
		let json = to_json(&rows, &columns()).unwrap();
		let value: Value = serde_json::from_str(&json).unwrap();
		assert_eq!(value, json!([{ "ID": "1", "Name": "Alice", "Note": "" }]));
	}

	#[test]
	fn formats_parse_case_insensitively() {
		assert_eq!(ExportFormat::parse(" JSON "), Some(ExportFormat::Json));
		assert_eq!(ExportFormat::parse("csv").map(ExportFormat::extension), Some("csv"));
		assert_eq!(ExportFormat::parse("xlsx"), None);
	}

	#[test]
	fn file_names_replace_whitespace_runs() {
		assert_eq!(
			export_file_name("User  Management", ExportFormat::Csv),
			"User_Management_data.csv"
		);
		assert_eq!(export_file_name("Leads", ExportFormat::Json), "Leads_data.json");
		assert_eq!(export_file_name("   ", ExportFormat::Csv), "export_data.csv");
	}
}
