use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::format::stringify_value;
use crate::grid::GridError;

const DEFAULT_KEY_FIELD: &str = "id";

/// Dotted path addressing a field of a [`Record`], e.g. `address.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
	raw: String,
	segments: Vec<String>,
}

impl FieldPath {
	/// Parse a dotted path. Empty paths and empty segments are rejected.
	pub fn parse(raw: &str) -> Result<Self, GridError> {
		let trimmed = raw.trim();
		let segments: Vec<String> = trimmed
			.split('.')
			.map(|segment| segment.trim().to_string())
			.collect();
		if trimmed.is_empty() || segments.iter().any(String::is_empty) {
			return Err(GridError::InvalidFieldPath {
				path: raw.to_string(),
			});
		}
		Ok(Self {
			raw: segments.join("."),
			segments,
		})
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().map(String::as_str)
	}

	/// Last segment of the path, used when deriving header labels.
	#[must_use]
	pub fn leaf(&self) -> &str {
		self.segments.last().map(String::as_str).unwrap_or(&self.raw)
	}

	/// Path naming one top-level field verbatim, dots and whitespace included.
	#[must_use]
	pub fn literal(name: &str) -> Self {
		Self {
			raw: name.to_string(),
			segments: vec![name.to_string()],
		}
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl FromStr for FieldPath {
	type Err = GridError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// One row of caller-supplied data.
///
/// Records wrap an order-preserving JSON object so that inferred columns follow
/// the field order of the source document. The grid only ever reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn from_map(map: Map<String, Value>) -> Self {
		Self(map)
	}

	/// Wrap a JSON value, which must be an object.
	pub fn from_value(value: Value) -> Result<Self, GridError> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			other => Err(GridError::InvalidRecord {
				reason: format!("expected a JSON object, found {}", value_type_name(&other)),
			}),
		}
	}

	/// Convert any serializable value into a record.
	pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, GridError> {
		let value = serde_json::to_value(value).map_err(|err| GridError::InvalidRecord {
			reason: err.to_string(),
		})?;
		Self::from_value(value)
	}

	/// Builder-style helper used by tests and embedders assembling records by hand.
	#[must_use]
	pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(field.into(), value.into());
		self
	}

	/// Resolve a possibly nested field. Missing segments resolve to `None`.
	#[must_use]
	pub fn get(&self, path: &FieldPath) -> Option<&Value> {
		let mut segments = path.segments();
		let first = segments.next()?;
		let mut current = self.0.get(first)?;
		for segment in segments {
			current = current.as_object()?.get(segment)?;
		}
		Some(current)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	#[must_use]
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	#[must_use]
	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}
}

fn value_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Stable identity of a record, used by the selection tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RecordKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RecordKey {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for RecordKey {
	fn from(value: String) -> Self {
		Self(value)
	}
}

type KeyFn = dyn Fn(&Record) -> Option<RecordKey> + Send + Sync;

/// Strategy used to derive a [`RecordKey`] from a record.
#[derive(Clone)]
pub enum KeyAccessor {
	/// Stringify the value found at the given field.
	Field(FieldPath),
	/// Caller-supplied projection.
	Custom(Arc<KeyFn>),
}

impl KeyAccessor {
	#[must_use]
	pub fn field(path: FieldPath) -> Self {
		Self::Field(path)
	}

	pub fn custom<F>(accessor: F) -> Self
	where
		F: Fn(&Record) -> Option<RecordKey> + Send + Sync + 'static,
	{
		Self::Custom(Arc::new(accessor))
	}

	/// Resolve the key of `record`. Null, empty, and missing keys yield `None`.
	#[must_use]
	pub fn key_of(&self, record: &Record) -> Option<RecordKey> {
		match self {
			Self::Field(path) => {
				let text = stringify_value(record.get(path)?);
				(!text.is_empty()).then(|| RecordKey(text))
			}
			Self::Custom(accessor) => accessor(record),
		}
	}
}

impl Default for KeyAccessor {
	fn default() -> Self {
		Self::Field(FieldPath::literal(DEFAULT_KEY_FIELD))
	}
}

impl fmt::Debug for KeyAccessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(path) => f.debug_tuple("Field").field(path).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Envelope fields searched when the document is an object rather than an array.
const COLLECTION_FIELDS: [&str; 2] = ["records", "data"];

/// Parse a JSON document holding records.
///
/// Accepts a top-level array of objects, or an object whose `records` or
/// `data` field holds that array.
pub fn parse_records(text: &str) -> Result<Vec<Record>, GridError> {
	let document: Value = serde_json::from_str(text)?;
	let items = match document {
		Value::Array(items) => items,
		Value::Object(mut map) => COLLECTION_FIELDS
			.iter()
			.find_map(|field| match map.remove(*field) {
				Some(Value::Array(items)) => Some(items),
				_ => None,
			})
			.ok_or_else(|| GridError::InvalidRecord {
				reason: "expected an array of records or an object with a `records` or `data` array"
					.into(),
			})?,
		other => {
			return Err(GridError::InvalidRecord {
				reason: format!("expected an array of records, found {}", value_type_name(&other)),
			});
		}
	};
	items.into_iter().map(Record::from_value).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn field_path_rejects_empty_segments() {
		assert!(FieldPath::parse("").is_err());
		assert!(FieldPath::parse("a..b").is_err());
		assert!(FieldPath::parse(" . ").is_err());
		let path = FieldPath::parse(" address . city ").unwrap();
		assert_eq!(path.as_str(), "address.city");
		assert_eq!(path.leaf(), "city");
	}

	#[test]
	fn nested_fields_resolve_through_objects() {
		let record = Record::from_value(json!({
			"id": 7,
			"address": { "city": "Lyon", "zip": null },
			"tags": ["a", "b"],
		}))
		.unwrap();

		let city = FieldPath::parse("address.city").unwrap();
		assert_eq!(record.get(&city), Some(&json!("Lyon")));

		let through_array = FieldPath::parse("tags.first").unwrap();
		assert_eq!(record.get(&through_array), None);

		let missing = FieldPath::parse("address.country").unwrap();
		assert_eq!(record.get(&missing), None);
	}

	#[test]
	fn non_object_values_are_rejected() {
		let err = Record::from_value(json!([1, 2])).unwrap_err();
		assert!(matches!(err, GridError::InvalidRecord { .. }));
		assert!(err.to_string().contains("an array"));
	}

	#[test]
	fn from_serialize_accepts_structs() {
		#[derive(Serialize)]
		struct Lead {
			id: u32,
			email: &'static str,
		}

		let record = Record::from_serialize(&Lead {
			id: 3,
			email: "lead@example.com",
		})
		.unwrap();
		let keys: Vec<&str> = record.fields().map(|(key, _)| key).collect();
		assert_eq!(keys, vec!["id", "email"]);
	}

	#[test]
	fn default_key_accessor_reads_id_field() {
		let accessor = KeyAccessor::default();
		let record = Record::new().with("id", 42);
		assert_eq!(accessor.key_of(&record), Some(RecordKey::from("42")));

		let without_id = Record::new().with("name", "anon");
		assert_eq!(accessor.key_of(&without_id), None);

		let null_id = Record::new().with("id", Value::Null);
		assert_eq!(accessor.key_of(&null_id), None);
	}

	#[test]
	fn custom_key_accessor_is_used_verbatim() {
		let accessor = KeyAccessor::custom(|record| {
			let email = record.as_map().get("email")?.as_str()?;
			Some(RecordKey::new(email.to_ascii_lowercase()))
		});
		let record = Record::new().with("email", "Ann@Example.com");
		assert_eq!(
			accessor.key_of(&record),
			Some(RecordKey::from("ann@example.com"))
		);
	}

	#[test]
	fn record_collections_accept_arrays_and_envelopes() {
		let records = parse_records(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
		assert_eq!(records.len(), 2);

		let records = parse_records(r#"{"total": 1, "data": [{"id": 1}]}"#).unwrap();
		assert_eq!(records.len(), 1);

		let err = parse_records(r#"{"items": []}"#).unwrap_err();
		assert!(matches!(err, GridError::InvalidRecord { .. }));

		let err = parse_records("[1]").unwrap_err();
		assert!(err.to_string().contains("a number"));

		assert!(matches!(parse_records("not json"), Err(GridError::Json(_))));
	}
}
