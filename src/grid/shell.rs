//! Stateful data grid that composes the pipeline, the selection tracker, and
//! the exporters behind a single event-driven surface.
//!
//! The shell never performs I/O. Records arrive through [`DataGrid::replace_records`]
//! or [`DataGrid::refresh_records`], user intent arrives as [`GridEvent`]s, and
//! every requested mutation is handed back to the caller through the
//! callbacks registered in [`GridHandlers`].

use std::collections::HashSet;
use std::num::NonZeroUsize;

use super::engine::{GridView, PageRequest, Pipeline, SortDirection, SortSpec, clamp_page};
use super::export::{self, Export, ExportFormat};
use super::model::{
	FooterModel, GridModel, HeaderCell, LoadingModel, RowModel, TableModel, ToolbarAction,
};
use super::selection::Selection;
use super::GridError;
use crate::types::{Column, FieldPath, KeyAccessor, Record, RecordKey, format_cell};

const DEFAULT_TITLE: &str = "Data Grid";
const DEFAULT_PAGE_SIZE: usize = 10;

pub type RecordHandler = Box<dyn FnMut(&Record)>;
pub type ActionHandler = Box<dyn FnMut()>;
pub type SearchHandler = Box<dyn FnMut(&str)>;
pub type SelectionHandler = Box<dyn FnMut(&[&Record])>;

/// Per-row affordances, derived from the registered handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
	View,
	Edit,
	Delete,
}

impl RowAction {
	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Self::View => "View",
			Self::Edit => "Edit",
			Self::Delete => "Delete",
		}
	}
}

/// Optional callbacks through which the grid reports user intent.
#[derive(Default)]
pub struct GridHandlers {
	pub on_row_click: Option<RecordHandler>,
	pub on_view: Option<RecordHandler>,
	pub on_edit: Option<RecordHandler>,
	pub on_delete: Option<RecordHandler>,
	pub on_add_new: Option<ActionHandler>,
	pub on_refresh: Option<ActionHandler>,
	pub on_search: Option<SearchHandler>,
	pub on_selection_change: Option<SelectionHandler>,
}

impl GridHandlers {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn on_row_click(mut self, handler: impl FnMut(&Record) + 'static) -> Self {
		self.on_row_click = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_view(mut self, handler: impl FnMut(&Record) + 'static) -> Self {
		self.on_view = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_edit(mut self, handler: impl FnMut(&Record) + 'static) -> Self {
		self.on_edit = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_delete(mut self, handler: impl FnMut(&Record) + 'static) -> Self {
		self.on_delete = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_add_new(mut self, handler: impl FnMut() + 'static) -> Self {
		self.on_add_new = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_refresh(mut self, handler: impl FnMut() + 'static) -> Self {
		self.on_refresh = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_search(mut self, handler: impl FnMut(&str) + 'static) -> Self {
		self.on_search = Some(Box::new(handler));
		self
	}

	#[must_use]
	pub fn on_selection_change(mut self, handler: impl FnMut(&[&Record]) + 'static) -> Self {
		self.on_selection_change = Some(Box::new(handler));
		self
	}

	/// Row actions offered for every row, in display order.
	#[must_use]
	pub fn row_actions(&self) -> Vec<RowAction> {
		[
			(RowAction::View, self.on_view.is_some()),
			(RowAction::Edit, self.on_edit.is_some()),
			(RowAction::Delete, self.on_delete.is_some()),
		]
		.into_iter()
		.filter_map(|(action, present)| present.then_some(action))
		.collect()
	}

	fn record_handler(&mut self, action: RowAction) -> Option<&mut RecordHandler> {
		match action {
			RowAction::View => self.on_view.as_mut(),
			RowAction::Edit => self.on_edit.as_mut(),
			RowAction::Delete => self.on_delete.as_mut(),
		}
	}
}

/// Static configuration of a grid instance.
#[derive(Debug, Clone)]
pub struct GridConfig {
	pub title: String,
	pub description: Option<String>,
	pub page_size: usize,
	pub key: KeyAccessor,
	/// Fields consulted by the search box. Empty means every column.
	pub search_fields: Vec<FieldPath>,
	pub selectable: bool,
	pub searchable: bool,
	pub exportable: bool,
	pub show_footer: bool,
}

impl Default for GridConfig {
	fn default() -> Self {
		Self {
			title: DEFAULT_TITLE.to_string(),
			description: None,
			page_size: DEFAULT_PAGE_SIZE,
			key: KeyAccessor::default(),
			search_fields: Vec::new(),
			selectable: true,
			searchable: true,
			exportable: true,
			show_footer: true,
		}
	}
}

impl GridConfig {
	#[must_use]
	pub fn titled(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	fn validate(&self, columns: &[Column]) -> Result<NonZeroUsize, GridError> {
		let page_size = NonZeroUsize::new(self.page_size)
			.ok_or_else(|| GridError::invalid_configuration("page size must be greater than zero"))?;
		if columns.is_empty() {
			return Err(GridError::invalid_configuration(
				"a grid needs at least one column",
			));
		}

		let mut seen = HashSet::new();
		for column in columns {
			if !seen.insert(&column.key) {
				return Err(GridError::invalid_configuration(format!(
					"column '{}' is declared twice",
					column.key
				)));
			}
			if column.sortable && !column.kind.is_comparable() {
				return Err(GridError::invalid_configuration(format!(
					"column '{}' is marked sortable but holds {} values",
					column.key,
					column.kind.as_str()
				)));
			}
		}
		Ok(page_size)
	}
}

/// User interactions understood by [`DataGrid::dispatch`].
///
/// Row positions are relative to the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
	SetFilter(String),
	/// Header click: ascending, then descending, then unsorted.
	ToggleSort(FieldPath),
	FirstPage,
	PreviousPage,
	NextPage,
	LastPage,
	GotoPage(usize),
	ToggleRow(usize),
	ToggleAll,
	ClearSelection,
	ClickRow(usize),
	Action(RowAction, usize),
	AddNew,
	Refresh,
}

/// Interactive grid over an in-memory record set.
pub struct DataGrid {
	records: Vec<Record>,
	columns: Vec<Column>,
	config: GridConfig,
	page_size: NonZeroUsize,
	handlers: GridHandlers,
	filter: String,
	sort: Option<SortSpec>,
	page_index: usize,
	selection: Selection,
	loading: bool,
}

impl DataGrid {
	/// Validate `columns` against `config` and build an empty grid.
	pub fn new(columns: Vec<Column>, config: GridConfig) -> Result<Self, GridError> {
		let page_size = config.validate(&columns)?;
		Ok(Self {
			records: Vec::new(),
			columns,
			config,
			page_size,
			handlers: GridHandlers::default(),
			filter: String::new(),
			sort: None,
			page_index: 0,
			selection: Selection::new(),
			loading: false,
		})
	}

	#[must_use]
	pub fn with_records(mut self, records: Vec<Record>) -> Self {
		self.records = records;
		self
	}

	#[must_use]
	pub fn with_handlers(mut self, handlers: GridHandlers) -> Self {
		self.handlers = handlers;
		self
	}

	/// Apply an initial sort, validated against the columns.
	pub fn with_sort(mut self, sort: SortSpec) -> Result<Self, GridError> {
		self.set_sort(Some(sort))?;
		Ok(self)
	}

	/// Apply an initial search without notifying the search handler.
	#[must_use]
	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self.reclamp_page();
		self
	}

	pub fn set_handlers(&mut self, handlers: GridHandlers) {
		self.handlers = handlers;
	}

	#[must_use]
	pub fn records(&self) -> &[Record] {
		&self.records
	}

	#[must_use]
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	#[must_use]
	pub fn config(&self) -> &GridConfig {
		&self.config
	}

	#[must_use]
	pub fn filter(&self) -> &str {
		&self.filter
	}

	#[must_use]
	pub fn sort(&self) -> Option<&SortSpec> {
		self.sort.as_ref()
	}

	#[must_use]
	pub fn page_index(&self) -> usize {
		self.page_index
	}

	#[must_use]
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// While loading, the grid renders a skeleton and ignores every event.
	pub fn set_loading(&mut self, loading: bool) {
		self.loading = loading;
	}

	pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<(), GridError> {
		if let Some(spec) = &sort {
			self.pipeline().validate_sort(spec)?;
		}
		self.sort = sort;
		self.reclamp_page();
		Ok(())
	}

	/// Row actions offered for every row.
	#[must_use]
	pub fn row_actions(&self) -> Vec<RowAction> {
		self.handlers.row_actions()
	}

	/// Toolbar affordances, derived from the handlers and the configuration.
	#[must_use]
	pub fn toolbar_actions(&self) -> Vec<ToolbarAction> {
		let mut actions = Vec::new();
		if self.handlers.on_add_new.is_some() {
			actions.push(ToolbarAction::AddNew);
		}
		if self.handlers.on_refresh.is_some() {
			actions.push(ToolbarAction::Refresh);
		}
		if self.config.exportable {
			actions.push(ToolbarAction::Export);
		}
		actions
	}

	/// Recompute the filtered, sorted, and paged view from the source records.
	#[must_use]
	pub fn view(&self) -> GridView<'_> {
		self.pipeline().view(
			&self.records,
			&self.filter,
			self.sort.as_ref(),
			PageRequest {
				index: self.page_index,
				size: self.page_size,
			},
		)
	}

	/// Records currently selected, in source order.
	#[must_use]
	pub fn selected_records(&self) -> Vec<&Record> {
		self.selection
			.selected_records(&self.records, &self.config.key)
	}

	/// Key of the record at `position` on the current page.
	#[must_use]
	pub fn key_at(&self, position: usize) -> Option<RecordKey> {
		let index = self.source_index(position)?;
		self.config.key.key_of(&self.records[index])
	}

	/// Apply one user interaction. Returns whether the event was handled.
	pub fn dispatch(&mut self, event: GridEvent) -> bool {
		if self.loading {
			log::debug!("grid '{}' is loading; ignoring {event:?}", self.config.title);
			return false;
		}

		match event {
			GridEvent::SetFilter(text) => self.set_filter(text),
			GridEvent::ToggleSort(column) => self.toggle_sort(&column),
			GridEvent::FirstPage => self.goto_page(0),
			GridEvent::PreviousPage => match self.page_index.checked_sub(1) {
				Some(previous) => self.goto_page(previous),
				None => false,
			},
			GridEvent::NextPage => self.goto_page(self.page_index + 1),
			GridEvent::LastPage => {
				let last = self.view().total_pages().saturating_sub(1);
				self.goto_page(last)
			}
			GridEvent::GotoPage(page) => self.goto_page(page),
			GridEvent::ToggleRow(position) => self.toggle_row(position),
			GridEvent::ToggleAll => self.toggle_all(),
			GridEvent::ClearSelection => self.clear_selection(),
			GridEvent::ClickRow(position) => self.click_row(position),
			GridEvent::Action(action, position) => self.row_action(action, position),
			GridEvent::AddNew => invoke(self.handlers.on_add_new.as_mut()),
			GridEvent::Refresh => invoke(self.handlers.on_refresh.as_mut()),
		}
	}

	/// Replace the record set wholesale, e.g. after a bulk action completed.
	///
	/// The selection is cleared and the page index re-clamped.
	pub fn replace_records(&mut self, records: Vec<Record>) {
		self.records = records;
		self.reclamp_page();
		if self.selection.clear() {
			self.notify_selection();
		}
	}

	/// Swap in a refreshed copy of the record set.
	///
	/// Selected keys that no longer exist are dropped; the rest stay selected.
	pub fn refresh_records(&mut self, records: Vec<Record>) {
		self.records = records;
		self.reclamp_page();
		let available: HashSet<RecordKey> = self
			.records
			.iter()
			.filter_map(|record| self.config.key.key_of(record))
			.collect();
		if self.selection.retain_available(&available) {
			self.notify_selection();
		}
	}

	/// Toggle the selection of a record by key, wherever it is displayed.
	/// Keys that match no loaded record are ignored.
	pub fn toggle_key(&mut self, key: RecordKey) -> bool {
		if self.loading || !self.config.selectable {
			return false;
		}
		let known = self
			.records
			.iter()
			.any(|record| self.config.key.key_of(record).as_ref() == Some(&key));
		if !known {
			return false;
		}
		self.selection.toggle(key);
		self.notify_selection();
		true
	}

	/// Export the filtered and sorted rows, ignoring pagination.
	pub fn export(&self, format: ExportFormat) -> Result<Export, GridError> {
		let view = self.view();
		export::render(
			&self.config.title,
			&view.filtered_rows(),
			&self.columns,
			format,
		)
	}

	/// Describe what a renderer should draw for the current state.
	#[must_use]
	pub fn render_model(&self) -> GridModel {
		if self.loading {
			return GridModel::Loading(LoadingModel {
				title: self.config.title.clone(),
				description: self.config.description.clone(),
				skeleton_rows: super::model::SKELETON_ROWS,
			});
		}

		let view = self.view();
		let filtered_keys = self.keys_for(view.filtered_indices());
		let select_all = self.selection.state_for(filtered_keys.iter().flatten());

		let headers = self
			.columns
			.iter()
			.map(|column| HeaderCell {
				key: column.key.clone(),
				label: column.header.clone(),
				sortable: column.sortable,
				sort: self
					.sort
					.as_ref()
					.filter(|spec| spec.column == column.key)
					.map(|spec| spec.direction),
				width: column.width,
			})
			.collect();

		let rows: Vec<RowModel> = view
			.page_indices()
			.iter()
			.map(|&index| {
				let record = &self.records[index];
				let key = self.config.key.key_of(record);
				RowModel {
					selected: key
						.as_ref()
						.is_some_and(|key| self.selection.is_selected(key)),
					selectable: self.config.selectable && key.is_some(),
					cells: self
						.columns
						.iter()
						.map(|column| format_cell(record, column))
						.collect(),
					key,
				}
			})
			.collect();

		let footer = FooterModel::new(
			view.range(),
			view.filtered_count(),
			self.records.len(),
			view.page_index(),
			view.total_pages(),
			self.selection.len(),
		);

		GridModel::Ready(TableModel {
			title: self.config.title.clone(),
			description: self.config.description.clone(),
			filter: self.filter.clone(),
			searchable: self.config.searchable,
			toolbar: self.toolbar_actions(),
			selectable: self.config.selectable,
			select_all,
			headers,
			empty: rows.is_empty(),
			rows,
			row_actions: self.row_actions(),
			footer: self.config.show_footer.then_some(footer),
		})
	}

	fn pipeline(&self) -> Pipeline<'_> {
		Pipeline::new(&self.columns).search_fields(&self.config.search_fields)
	}

	fn keys_for(&self, indices: &[usize]) -> Vec<Option<RecordKey>> {
		indices
			.iter()
			.map(|&index| self.config.key.key_of(&self.records[index]))
			.collect()
	}

	fn source_index(&self, position: usize) -> Option<usize> {
		self.view().page_indices().get(position).copied()
	}

	fn reclamp_page(&mut self) {
		self.page_index = self.view().page_index();
	}

	fn set_filter(&mut self, text: String) -> bool {
		if !self.config.searchable {
			return false;
		}
		if let Some(handler) = self.handlers.on_search.as_mut() {
			handler(&text);
		}
		self.filter = text;
		self.reclamp_page();
		true
	}

	fn toggle_sort(&mut self, column: &FieldPath) -> bool {
		let next = match &self.sort {
			Some(spec) if &spec.column == column => match spec.direction {
				SortDirection::Asc => Some(SortSpec::desc(column.clone())),
				SortDirection::Desc => None,
			},
			_ => Some(SortSpec::asc(column.clone())),
		};

		match self.set_sort(next) {
			Ok(()) => true,
			Err(err) => {
				log::debug!("header click ignored: {err}");
				false
			}
		}
	}

	fn goto_page(&mut self, page: usize) -> bool {
		let total_pages = self.view().total_pages();
		let target = clamp_page(page, total_pages);
		if target == self.page_index {
			return false;
		}
		self.page_index = target;
		true
	}

	fn toggle_row(&mut self, position: usize) -> bool {
		match self.key_at(position) {
			Some(key) => self.toggle_key(key),
			None => false,
		}
	}

	fn toggle_all(&mut self) -> bool {
		if !self.config.selectable {
			return false;
		}
		let view = self.view();
		let keys: Vec<RecordKey> = self
			.keys_for(view.filtered_indices())
			.into_iter()
			.flatten()
			.collect();
		if !self.selection.select_all(&keys) {
			return false;
		}
		self.notify_selection();
		true
	}

	fn clear_selection(&mut self) -> bool {
		if !self.selection.clear() {
			return false;
		}
		self.notify_selection();
		true
	}

	fn click_row(&mut self, position: usize) -> bool {
		let Some(index) = self.source_index(position) else {
			return false;
		};
		match self.handlers.on_row_click.as_mut() {
			Some(handler) => {
				handler(&self.records[index]);
				true
			}
			None => false,
		}
	}

	/// Row actions fire only their own handler, never the row-click handler.
	fn row_action(&mut self, action: RowAction, position: usize) -> bool {
		let Some(index) = self.source_index(position) else {
			return false;
		};
		match self.handlers.record_handler(action) {
			Some(handler) => {
				handler(&self.records[index]);
				true
			}
			None => false,
		}
	}

	fn notify_selection(&mut self) {
		let Some(handler) = self.handlers.on_selection_change.as_mut() else {
			return;
		};
		let selected = self
			.selection
			.selected_records(&self.records, &self.config.key);
		handler(&selected);
	}
}

fn invoke(handler: Option<&mut ActionHandler>) -> bool {
	match handler {
		Some(handler) => {
			handler();
			true
		}
		None => false,
	}
}
