//! Renderer-agnostic description of what a grid should draw.
//!
//! [`DataGrid::render_model`](super::DataGrid::render_model) produces these
//! values; the terminal UI and the JSON output both consume them.

use serde::Serialize;

use super::engine::SortDirection;
use super::selection::SelectAllState;
use super::shell::RowAction;
use crate::types::{FieldPath, RecordKey};

/// Placeholder rows drawn while the grid is loading.
pub const SKELETON_ROWS: usize = 5;

pub const EMPTY_MESSAGE: &str = "No data available";

/// Toolbar affordances offered above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
	AddNew,
	Refresh,
	Export,
}

impl ToolbarAction {
	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Self::AddNew => "Add New",
			Self::Refresh => "Refresh",
			Self::Export => "Export",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridModel {
	Loading(LoadingModel),
	Ready(TableModel),
}

impl GridModel {
	#[must_use]
	pub fn title(&self) -> &str {
		match self {
			Self::Loading(model) => &model.title,
			Self::Ready(model) => &model.title,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingModel {
	pub title: String,
	pub description: Option<String>,
	pub skeleton_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
	pub title: String,
	pub description: Option<String>,
	pub filter: String,
	pub searchable: bool,
	pub toolbar: Vec<ToolbarAction>,
	pub selectable: bool,
	pub select_all: SelectAllState,
	pub headers: Vec<HeaderCell>,
	pub rows: Vec<RowModel>,
	/// True when the current page has no rows to show.
	pub empty: bool,
	pub row_actions: Vec<RowAction>,
	pub footer: Option<FooterModel>,
}

impl TableModel {
	#[must_use]
	pub fn empty_message(&self) -> Option<&'static str> {
		self.empty.then_some(EMPTY_MESSAGE)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
	pub key: FieldPath,
	pub label: String,
	pub sortable: bool,
	pub sort: Option<SortDirection>,
	pub width: Option<u16>,
}

impl HeaderCell {
	/// Header text with the sort arrow appended when this column is sorted.
	#[must_use]
	pub fn display_label(&self) -> String {
		match self.sort {
			Some(direction) => format!("{} {}", self.label, direction.indicator()),
			None => self.label.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
	pub key: Option<RecordKey>,
	pub cells: Vec<String>,
	pub selected: bool,
	pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterModel {
	pub range_label: String,
	pub page_label: String,
	pub summary: String,
	pub filtered_count: usize,
	pub total_count: usize,
	pub page_index: usize,
	pub total_pages: usize,
	pub selected_count: usize,
	pub has_previous: bool,
	pub has_next: bool,
}

impl FooterModel {
	#[must_use]
	pub fn new(
		range: Option<(usize, usize)>,
		filtered_count: usize,
		total_count: usize,
		page_index: usize,
		total_pages: usize,
		selected_count: usize,
	) -> Self {
		let range_label = match range {
			Some((start, end)) => format!("Showing {start} to {end} of {filtered_count} results"),
			None => format!("Showing 0 of {filtered_count} results"),
		};
		let page_label = if total_pages == 0 {
			"No pages".to_string()
		} else {
			format!("Page {} of {total_pages}", page_index + 1)
		};
		let summary = if selected_count > 0 {
			format!("{} selected", rows(selected_count))
		} else {
			format!("{} found", rows(filtered_count))
		};

		Self {
			range_label,
			page_label,
			summary,
			filtered_count,
			total_count,
			page_index,
			total_pages,
			selected_count,
			has_previous: page_index > 0,
			has_next: page_index + 1 < total_pages,
		}
	}
}

fn rows(count: usize) -> String {
	if count == 1 {
		"1 row".to_string()
	} else {
		format!("{count} rows")
	}
}
