//! State container for the terminal front-end.
//!
//! [`App`] owns a [`DataGrid`], wires its callbacks to a request queue, and
//! applies the queued requests (open a record, delete it, refresh, accept)
//! after every dispatched event.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use ratatui::widgets::TableState;
use serde_json::json;
use throbber_widgets_tui::ThrobberState;

use super::input::SearchInput;
use crate::context::AppContext;
use crate::grid::{DataGrid, ExportFormat, GridError, GridEvent, GridHandlers};
use crate::theme::Theme;
use crate::types::Record;

/// Produces the record set, on a background thread.
pub type Loader = Arc<dyn Fn() -> Result<Vec<Record>, GridError> + Send + Sync>;

/// How the interactive session ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOutcome {
	pub accepted: bool,
	pub query: String,
	/// The row that was clicked to accept, if any.
	pub row: Option<Record>,
	pub selected: Vec<Record>,
}

#[derive(Debug)]
pub(crate) enum UiRequest {
	Accept(Record),
	View(Record),
	Delete(Record),
	Refresh,
	Searched(String),
	SelectionChanged(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
	Initial,
	Refresh,
}

type RequestQueue = Rc<RefCell<VecDeque<UiRequest>>>;

pub struct App<'ctx> {
	pub(crate) grid: DataGrid,
	pub(crate) search_input: SearchInput<'ctx>,
	pub(crate) table_state: TableState,
	pub(crate) context: &'ctx mut AppContext,
	pub(crate) theme: Theme,
	pub(crate) throbber_state: ThrobberState,
	pub(crate) focused_column: usize,
	pub(crate) detail: Option<Record>,
	pub(crate) status: Option<String>,
	requests: RequestQueue,
	loader: Option<Loader>,
	pending_load: Option<(LoadKind, Receiver<Result<Vec<Record>, GridError>>)>,
	export_dir: Option<PathBuf>,
}

impl<'ctx> App<'ctx> {
	/// Wrap `grid` for interactive use. The grid's callbacks are replaced by
	/// the UI's own handlers.
	pub fn new(grid: DataGrid, context: &'ctx mut AppContext) -> Self {
		let mut table_state = TableState::default();
		table_state.select(Some(0));
		let theme = context.theme();
		let mut search_input = SearchInput::new(grid.filter());
		search_input.set_style(theme.prompt_style());

		let mut app = Self {
			grid,
			search_input,
			table_state,
			context,
			theme,
			throbber_state: ThrobberState::default(),
			focused_column: 0,
			detail: None,
			status: None,
			requests: Rc::new(RefCell::new(VecDeque::new())),
			loader: None,
			pending_load: None,
			export_dir: None,
		};
		app.install_handlers();
		app
	}

	/// Enable background loading and the refresh action.
	#[must_use]
	pub fn with_loader(mut self, loader: Loader) -> Self {
		self.loader = Some(loader);
		self.install_handlers();
		self
	}

	/// Directory that receives exports triggered from the UI.
	#[must_use]
	pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.export_dir = Some(dir.into());
		self
	}

	#[must_use]
	pub fn grid(&self) -> &DataGrid {
		&self.grid
	}

	#[must_use]
	pub fn status(&self) -> Option<&str> {
		self.status.as_deref()
	}

	#[must_use]
	pub fn detail(&self) -> Option<&Record> {
		self.detail.as_ref()
	}

	/// Row under the cursor, relative to the current page.
	#[must_use]
	pub fn cursor(&self) -> usize {
		self.table_state.selected().unwrap_or(0)
	}

	/// Start the first load, showing the loading skeleton until it arrives.
	pub fn start_initial_load(&mut self) {
		self.spawn_load(LoadKind::Initial);
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.pending_load.is_some()
	}

	fn install_handlers(&mut self) {
		let handlers = GridHandlers::new()
			.on_row_click(enqueue(&self.requests, |record| {
				UiRequest::Accept(record.clone())
			}))
			.on_view(enqueue(&self.requests, |record| UiRequest::View(record.clone())))
			.on_delete(enqueue(&self.requests, |record| {
				UiRequest::Delete(record.clone())
			}))
			.on_search({
				let requests = Rc::clone(&self.requests);
				move |text: &str| {
					requests
						.borrow_mut()
						.push_back(UiRequest::Searched(text.to_string()));
				}
			})
			.on_selection_change({
				let requests = Rc::clone(&self.requests);
				move |records: &[&Record]| {
					requests
						.borrow_mut()
						.push_back(UiRequest::SelectionChanged(records.len()));
				}
			});

		let handlers = if self.loader.is_some() {
			let requests = Rc::clone(&self.requests);
			handlers.on_refresh(move || requests.borrow_mut().push_back(UiRequest::Refresh))
		} else {
			handlers
		};
		self.grid.set_handlers(handlers);
	}

	/// Forward an event to the grid and record the interaction.
	pub(crate) fn dispatch(&mut self, event: GridEvent) -> bool {
		let label = match &event {
			GridEvent::ToggleSort(_) => Some("sort_change"),
			GridEvent::FirstPage
			| GridEvent::PreviousPage
			| GridEvent::NextPage
			| GridEvent::LastPage
			| GridEvent::GotoPage(_) => Some("page_change"),
			_ => None,
		};

		let handled = self.grid.dispatch(event);
		if handled && let Some(label) = label {
			let data = json!({
				"page": self.grid.page_index() + 1,
				"sort": self.grid.sort().map(ToString::to_string),
			});
			self.context.event_log().track_event(label, Some(data));
		}
		handled
	}

	/// Apply queued callback requests. Returns an outcome when a row was accepted.
	pub(crate) fn process_requests(&mut self) -> Option<GridOutcome> {
		let mut outcome = None;
		loop {
			let Some(request) = self.requests.borrow_mut().pop_front() else {
				break;
			};
			match request {
				UiRequest::Accept(record) => {
					self.context.event_log().track_event("row_click", None);
					outcome = Some(self.outcome(true, Some(record)));
				}
				UiRequest::View(record) => {
					self.context.event_log().track_event("view_record", None);
					self.detail = Some(record);
				}
				UiRequest::Delete(record) => self.delete_record(&record),
				UiRequest::Refresh => self.spawn_load(LoadKind::Refresh),
				UiRequest::Searched(text) => {
					self.context
						.event_log()
						.debug("Search changed", Some(json!({ "query": text })));
				}
				UiRequest::SelectionChanged(count) => {
					self.context
						.event_log()
						.track_event("selection_change", Some(json!({ "selected": count })));
				}
			}
		}
		self.ensure_cursor();
		outcome
	}

	pub(crate) fn outcome(&self, accepted: bool, row: Option<Record>) -> GridOutcome {
		GridOutcome {
			accepted,
			query: self.search_input.text().to_string(),
			row,
			selected: self
				.grid
				.selected_records()
				.into_iter()
				.cloned()
				.collect(),
		}
	}

	/// Keep the cursor on a row of the current page.
	pub(crate) fn ensure_cursor(&mut self) {
		let rows = self.grid.view().page_indices().len();
		if rows == 0 {
			self.table_state.select(None);
		} else {
			let cursor = self.table_state.selected().unwrap_or(0).min(rows - 1);
			self.table_state.select(Some(cursor));
		}
	}

	pub(crate) fn set_status(&mut self, message: impl Into<String>) {
		self.status = Some(message.into());
	}

	pub(crate) fn toggle_theme(&mut self) {
		self.context.toggle_theme();
		self.theme = self.context.theme();
		self.search_input.set_style(self.theme.prompt_style());
		let name = self.context.theme_preference().to_string();
		self.set_status(format!("Theme: {name}"));
	}

	/// Export the filtered rows as CSV into the export directory.
	pub(crate) fn export_csv(&mut self) {
		let Some(dir) = self.export_dir.clone() else {
			self.set_status("Export is unavailable: no export directory configured");
			return;
		};
		match write_export(&self.grid, &dir) {
			Ok((path, rows)) => {
				self.context.event_log().track_event(
					"export",
					Some(json!({ "rows": rows, "path": path.display().to_string() })),
				);
				self.set_status(format!("Exported {rows} rows to {}", path.display()));
			}
			Err(err) => {
				self.context
					.event_log()
					.error("Export failed", Some(json!({ "error": err.to_string() })));
				self.set_status(format!("Export failed: {err}"));
			}
		}
	}

	/// Drain a finished background load into the grid.
	pub fn pump_loads(&mut self) {
		let Some((kind, receiver)) = &self.pending_load else {
			return;
		};
		let kind = *kind;
		let result = match receiver.try_recv() {
			Ok(result) => result,
			Err(TryRecvError::Empty) => return,
			Err(TryRecvError::Disconnected) => Err(GridError::InvalidRecord {
				reason: "the loader stopped before producing records".into(),
			}),
		};

		self.pending_load = None;
		self.grid.set_loading(false);
		match result {
			Ok(records) => {
				let count = records.len();
				match kind {
					LoadKind::Initial => self.grid.replace_records(records),
					LoadKind::Refresh => self.grid.refresh_records(records),
				}
				self.context
					.event_log()
					.info("Records loaded", Some(json!({ "count": count })));
				if kind == LoadKind::Refresh {
					self.set_status(format!("Refreshed {count} records"));
				}
			}
			Err(err) => {
				self.context
					.event_log()
					.error("Loading records failed", Some(json!({ "error": err.to_string() })));
				self.set_status(format!("Loading failed: {err}"));
			}
		}
		self.process_requests();
	}

	fn spawn_load(&mut self, kind: LoadKind) {
		let Some(loader) = self.loader.clone() else {
			return;
		};
		if self.pending_load.is_some() {
			return;
		}

		let (sender, receiver) = mpsc::channel();
		let spawned = thread::Builder::new()
			.name("datagrid-loader".into())
			.spawn(move || {
				let _ = sender.send(loader());
			});
		match spawned {
			Ok(_) => {
				self.pending_load = Some((kind, receiver));
				self.grid.set_loading(true);
			}
			Err(err) => {
				log::error!("failed to spawn loader thread: {err}");
				self.set_status(format!("Loading failed: {err}"));
			}
		}
	}

	fn delete_record(&mut self, record: &Record) {
		let key = self.grid.config().key.key_of(record);
		let remaining: Vec<Record> = self
			.grid
			.records()
			.iter()
			.filter(|candidate| match &key {
				Some(key) => self.grid.config().key.key_of(candidate).as_ref() != Some(key),
				None => *candidate != record,
			})
			.cloned()
			.collect();

		self.context.event_log().track_event(
			"delete_record",
			Some(json!({ "key": key.as_ref().map(ToString::to_string) })),
		);
		self.grid.refresh_records(remaining);
		self.set_status(match key {
			Some(key) => format!("Deleted record {key}"),
			None => "Deleted record".to_string(),
		});
	}
}

fn enqueue(
	requests: &RequestQueue,
	request: impl Fn(&Record) -> UiRequest + 'static,
) -> impl FnMut(&Record) + 'static {
	let requests = Rc::clone(requests);
	move |record| requests.borrow_mut().push_back(request(record))
}

fn write_export(grid: &DataGrid, dir: &Path) -> Result<(PathBuf, usize), GridError> {
	let export = grid.export(ExportFormat::Csv)?;
	fs::create_dir_all(dir)?;
	let path = dir.join(&export.file_name);
	fs::write(&path, export.content)?;
	Ok((path, export.row_count))
}
