//! In-memory filter, sort, and paginate pipeline.
//!
//! Every recompute starts from the caller's record slice and produces a
//! [`GridView`] of indices into it, so the source data is never reordered or
//! mutated. The pipeline is a pure function of its inputs.

use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::GridError;
use crate::types::{
	Column, FieldPath, Record, ValueKind, field_text, parse_date, stringify_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}

impl SortDirection {
	#[must_use]
	pub fn reversed(self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	#[must_use]
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"asc" | "ascending" | "up" => Some(Self::Asc),
			"desc" | "descending" | "down" => Some(Self::Desc),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}

	/// Arrow drawn next to a sorted header.
	#[must_use]
	pub fn indicator(self) -> &'static str {
		match self {
			Self::Asc => "▲",
			Self::Desc => "▼",
		}
	}
}

/// The single active sort of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
	pub column: FieldPath,
	pub direction: SortDirection,
}

impl SortSpec {
	#[must_use]
	pub fn new(column: FieldPath, direction: SortDirection) -> Self {
		Self { column, direction }
	}

	#[must_use]
	pub fn asc(column: FieldPath) -> Self {
		Self::new(column, SortDirection::Asc)
	}

	#[must_use]
	pub fn desc(column: FieldPath) -> Self {
		Self::new(column, SortDirection::Desc)
	}

	/// Parse `column` or `column:asc|desc`.
	pub fn parse(value: &str) -> Result<Self, GridError> {
		let (column, direction) = match value.rsplit_once(':') {
			Some((column, direction)) => {
				let direction = SortDirection::parse(direction).ok_or_else(|| {
					GridError::invalid_configuration(format!(
						"unknown sort direction '{}' (expected asc or desc)",
						direction.trim()
					))
				})?;
				(column, direction)
			}
			None => (value, SortDirection::Asc),
		};
		Ok(Self::new(FieldPath::parse(column)?, direction))
	}
}

impl fmt::Display for SortSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.column, self.direction.as_str())
	}
}

/// Requested page of a view. The page size can never be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub index: usize,
	pub size: NonZeroUsize,
}

impl PageRequest {
	pub fn new(index: usize, size: usize) -> Result<Self, GridError> {
		let size = NonZeroUsize::new(size)
			.ok_or_else(|| GridError::invalid_configuration("page size must be greater than zero"))?;
		Ok(Self { index, size })
	}
}

/// Number of pages needed for `filtered_count` rows. Zero rows means zero pages.
#[must_use]
pub fn page_count(filtered_count: usize, page_size: NonZeroUsize) -> usize {
	filtered_count.div_ceil(page_size.get())
}

/// Clamp `index` into `[0, total_pages - 1]`, or `0` when there are no pages.
#[must_use]
pub fn clamp_page(index: usize, total_pages: usize) -> usize {
	index.min(total_pages.saturating_sub(1))
}

/// Filter, sort, and paginate `records` in one call.
///
/// Fails when `page_size` is zero or when `sort` names a column that is
/// unknown or not comparable.
pub fn view<'a>(
	records: &'a [Record],
	columns: &[Column],
	filter: &str,
	sort: Option<&SortSpec>,
	page_index: usize,
	page_size: usize,
) -> Result<GridView<'a>, GridError> {
	let page = PageRequest::new(page_index, page_size)?;
	let pipeline = Pipeline::new(columns);
	if let Some(spec) = sort {
		pipeline.validate_sort(spec)?;
	}
	Ok(pipeline.view(records, filter, sort, page))
}

/// Column metadata consulted by each stage of the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'c> {
	columns: &'c [Column],
	search_fields: &'c [FieldPath],
}

impl<'c> Pipeline<'c> {
	#[must_use]
	pub fn new(columns: &'c [Column]) -> Self {
		Self {
			columns,
			search_fields: &[],
		}
	}

	/// Restrict search to `fields`. An empty slice searches every column.
	#[must_use]
	pub fn search_fields(mut self, fields: &'c [FieldPath]) -> Self {
		self.search_fields = fields;
		self
	}

	/// Check that `spec` targets a known, sortable, comparable column.
	pub fn validate_sort(&self, spec: &SortSpec) -> Result<ValueKind, GridError> {
		let column = self
			.columns
			.iter()
			.find(|column| column.key == spec.column)
			.ok_or_else(|| {
				GridError::invalid_configuration(format!("unknown sort column '{}'", spec.column))
			})?;
		if !column.sortable {
			return Err(GridError::invalid_configuration(format!(
				"column '{}' is not sortable",
				column.key
			)));
		}
		if !column.kind.is_comparable() {
			return Err(GridError::invalid_configuration(format!(
				"column '{}' holds {} values which cannot be sorted",
				column.key,
				column.kind.as_str()
			)));
		}
		Ok(column.kind)
	}

	/// Indices of the records whose searched fields contain `text`, ignoring case.
	#[must_use]
	pub fn filter_indices(&self, records: &[Record], text: &str) -> Vec<usize> {
		let needle = text.trim().to_lowercase();
		if needle.is_empty() {
			return (0..records.len()).collect();
		}

		let fields = self.searched_fields();
		records
			.iter()
			.enumerate()
			.filter(|(_, record)| {
				fields
					.iter()
					.any(|path| field_text(record, path).to_lowercase().contains(&needle))
			})
			.map(|(index, _)| index)
			.collect()
	}

	#[must_use]
	pub fn filter<'a>(&self, records: &'a [Record], text: &str) -> Vec<&'a Record> {
		self.filter_indices(records, text)
			.into_iter()
			.map(|index| &records[index])
			.collect()
	}

	/// Stable sort of `rows` by `spec`. Invalid specs leave the order untouched.
	pub fn sort(&self, rows: &mut [&Record], spec: &SortSpec) {
		self.sort_keyed(rows, spec, |record| *record);
	}

	#[must_use]
	pub fn view<'a>(
		&self,
		records: &'a [Record],
		filter: &str,
		sort: Option<&SortSpec>,
		page: PageRequest,
	) -> GridView<'a> {
		let mut order = self.filter_indices(records, filter);
		if let Some(spec) = sort {
			self.sort_keyed(&mut order, spec, |&index| &records[index]);
		}

		let total_pages = page_count(order.len(), page.size);
		GridView {
			records,
			order,
			page_index: clamp_page(page.index, total_pages),
			page_size: page.size.get(),
			total_pages,
		}
	}

	fn searched_fields(&self) -> Vec<&'c FieldPath> {
		if self.search_fields.is_empty() {
			self.columns.iter().map(|column| &column.key).collect()
		} else {
			self.search_fields.iter().collect()
		}
	}

	fn sort_keyed<'r, T>(
		&self,
		items: &mut [T],
		spec: &SortSpec,
		record: impl Fn(&T) -> &'r Record,
	) {
		let kind = match self.validate_sort(spec) {
			Ok(kind) => kind,
			Err(err) => {
				log::warn!("ignoring sort on '{}': {err}", spec.column);
				return;
			}
		};

		let key = |item: &T| SortKey::extract(kind, record(item).get(&spec.column));
		// `sort_by_cached_key` is stable, so tied rows keep their source order
		// in both directions.
		match spec.direction {
			SortDirection::Asc => items.sort_by_cached_key(key),
			SortDirection::Desc => items.sort_by_cached_key(|item| Reverse(key(item))),
		}
	}
}

/// Comparable projection of a field value for a given [`ValueKind`].
#[derive(Debug, Clone)]
enum SortKey {
	Missing,
	Flag(bool),
	Number(f64),
	Instant(DateTime<Utc>),
	Text(String),
	/// Values that do not parse as the column kind; ordered after parsed values.
	Unparsed(String),
}

impl SortKey {
	fn extract(kind: ValueKind, value: Option<&Value>) -> Self {
		let Some(value) = value.filter(|value| !value.is_null()) else {
			return Self::Missing;
		};

		match kind {
			ValueKind::Text | ValueKind::Json => Self::Text(stringify_value(value).to_lowercase()),
			ValueKind::Number => match value {
				Value::Number(number) => number.as_f64().map_or(Self::Missing, Self::Number),
				Value::String(text) => text
					.trim()
					.parse::<f64>()
					.ok()
					.filter(|number| number.is_finite())
					.map_or(Self::Missing, Self::Number),
				_ => Self::Missing,
			},
			ValueKind::Date => match value {
				Value::String(text) => {
					parse_date(text).map_or_else(|| Self::Unparsed(text.clone()), Self::Instant)
				}
				Value::Number(number) => number
					.as_i64()
					.and_then(DateTime::from_timestamp_millis)
					.map_or(Self::Missing, Self::Instant),
				other => Self::Unparsed(stringify_value(other)),
			},
			ValueKind::Boolean => match value {
				Value::Bool(flag) => Self::Flag(*flag),
				Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
					"true" | "yes" | "1" => Self::Flag(true),
					"false" | "no" | "0" => Self::Flag(false),
					_ => Self::Missing,
				},
				_ => Self::Missing,
			},
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Self::Missing => 0,
			Self::Flag(_) | Self::Number(_) | Self::Instant(_) | Self::Text(_) => 1,
			Self::Unparsed(_) => 2,
		}
	}
}

impl Ord for SortKey {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Flag(a), Self::Flag(b)) => a.cmp(b),
			(Self::Number(a), Self::Number(b)) => a.total_cmp(b),
			(Self::Instant(a), Self::Instant(b)) => a.cmp(b),
			(Self::Text(a), Self::Text(b)) | (Self::Unparsed(a), Self::Unparsed(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}
}

impl PartialOrd for SortKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for SortKey {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for SortKey {}

/// Result of one pipeline run: the filtered and sorted order plus the current page.
#[derive(Debug, Clone)]
pub struct GridView<'a> {
	records: &'a [Record],
	order: Vec<usize>,
	page_index: usize,
	page_size: usize,
	total_pages: usize,
}

impl<'a> GridView<'a> {
	/// Records on the current page, in display order.
	#[must_use]
	pub fn page_rows(&self) -> Vec<&'a Record> {
		self.page_indices()
			.iter()
			.map(|&index| &self.records[index])
			.collect()
	}

	/// Source indices of the records on the current page.
	#[must_use]
	pub fn page_indices(&self) -> &[usize] {
		&self.order[self.page_bounds()]
	}

	/// Every filtered record in display order, ignoring pagination.
	#[must_use]
	pub fn filtered_rows(&self) -> Vec<&'a Record> {
		self.order.iter().map(|&index| &self.records[index]).collect()
	}

	#[must_use]
	pub fn filtered_indices(&self) -> &[usize] {
		&self.order
	}

	#[must_use]
	pub fn filtered_count(&self) -> usize {
		self.order.len()
	}

	#[must_use]
	pub fn total_pages(&self) -> usize {
		self.total_pages
	}

	/// Effective page index after clamping.
	#[must_use]
	pub fn page_index(&self) -> usize {
		self.page_index
	}

	#[must_use]
	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// One-based inclusive range of rows shown, or `None` for an empty view.
	#[must_use]
	pub fn range(&self) -> Option<(usize, usize)> {
		let bounds = self.page_bounds();
		(!bounds.is_empty()).then(|| (bounds.start + 1, bounds.end))
	}

	#[must_use]
	pub fn has_previous_page(&self) -> bool {
		self.page_index > 0
	}

	#[must_use]
	pub fn has_next_page(&self) -> bool {
		self.page_index + 1 < self.total_pages
	}

	fn page_bounds(&self) -> Range<usize> {
		let len = self.order.len();
		let start = self.page_index.saturating_mul(self.page_size).min(len);
		let end = start.saturating_add(self.page_size).min(len);
		start..end
	}
}
