use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use datagrid::app_dirs::{self, EVENTS_FILE_NAME, PREFERENCES_FILE_NAME};
use datagrid::context::{AppContext, ContextOptions, FilePreferenceStore};
use datagrid::logging::{EventLogOptions, JsonLinesSink};
use datagrid::types::parse_records;
use datagrid::ui::{App, Loader};
use datagrid::{Column, DataGrid, ExportFormat, GridConfig, GridError, GridOutcome, Record};

use crate::settings::{ExportRequest, GridSettings, InputSource, LoggingSettings, ResolvedConfig};

const EXPORTS_DIR: &str = "exports";

/// What the binary produced.
#[derive(Debug)]
pub(crate) enum WorkflowOutput {
	Interactive(GridOutcome),
	Exported(ExportReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportReport {
	pub(crate) path: PathBuf,
	pub(crate) format: ExportFormat,
	pub(crate) rows: usize,
}

/// Where records come from. Standard input is read once and replayed on refresh.
#[derive(Debug, Clone)]
enum RecordSource {
	File(PathBuf),
	Buffered(Arc<str>),
}

impl RecordSource {
	fn open(input: &InputSource) -> Result<Self> {
		match input {
			InputSource::File(path) => Ok(Self::File(path.clone())),
			InputSource::Stdin => {
				let mut text = String::new();
				io::stdin()
					.read_to_string(&mut text)
					.context("failed to read records from standard input")?;
				Ok(Self::Buffered(text.into()))
			}
		}
	}

	fn load(&self) -> Result<Vec<Record>, GridError> {
		match self {
			Self::File(path) => parse_records(&fs::read_to_string(path)?),
			Self::Buffered(text) => parse_records(text),
		}
	}

	fn loader(self) -> Loader {
		Arc::new(move || self.load())
	}
}

/// Coordinates loading records and running the grid, headless or interactive.
pub(crate) struct GridWorkflow {
	config: ResolvedConfig,
}

impl GridWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Self {
		Self { config }
	}

	pub(crate) fn run(self) -> Result<WorkflowOutput> {
		let source = RecordSource::open(&self.config.input)?;
		match self.config.export.clone() {
			Some(request) => self.export(&source, &request).map(WorkflowOutput::Exported),
			None => self.interactive(source).map(WorkflowOutput::Interactive),
		}
	}

	fn export(&self, source: &RecordSource, request: &ExportRequest) -> Result<ExportReport> {
		let records = load_from(source, &self.config.input)?;
		let columns = self.columns_for(&records)?;
		let grid = build_grid(&self.config.grid, columns)?.with_records(records);
		let export = grid.export(request.format)?;

		let path = export_path(request.output.as_deref(), &export.file_name)?;
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)
				.with_context(|| format!("failed to create {}", parent.display()))?;
		}
		fs::write(&path, &export.content)
			.with_context(|| format!("failed to write {}", path.display()))?;
		log::info!("exported {} rows to {}", export.row_count, path.display());

		Ok(ExportReport {
			path,
			format: export.format,
			rows: export.row_count,
		})
	}

	fn interactive(&self, source: RecordSource) -> Result<GridOutcome> {
		let data_dir = app_dirs::get_data_dir()?;
		let mut context = self.context(&data_dir);

		// Inferring columns needs the data up front; configured columns let the
		// grid open immediately and load in the background.
		let (grid, load_in_background) = if self.config.columns.is_empty() {
			let records = load_from(&source, &self.config.input)?;
			let columns = self.columns_for(&records)?;
			(build_grid(&self.config.grid, columns)?.with_records(records), false)
		} else {
			(build_grid(&self.config.grid, self.config.columns.clone())?, true)
		};

		let outcome = {
			let mut app = App::new(grid, &mut context)
				.with_loader(source.loader())
				.with_export_dir(data_dir.join(EXPORTS_DIR));
			if load_in_background {
				app.start_initial_load();
			}
			app.run()?
		};

		context
			.teardown()
			.context("failed to save preferences")?;
		Ok(outcome)
	}

	fn context(&self, data_dir: &Path) -> AppContext {
		let logging = &self.config.logging;
		let options = ContextOptions::new(JsonLinesSink::new(events_path(logging, data_dir)))
			.theme_override(self.config.theme.clone())
			.log_options(EventLogOptions {
				batch_size: logging.batch_size,
				flush_interval: logging.flush_interval,
			});
		AppContext::init(
			options,
			FilePreferenceStore::new(data_dir.join(PREFERENCES_FILE_NAME)),
		)
	}

	fn columns_for(&self, records: &[Record]) -> Result<Vec<Column>> {
		if !self.config.columns.is_empty() {
			return Ok(self.config.columns.clone());
		}
		let Some(first) = records.first() else {
			bail!("cannot infer columns from an empty record set; configure [[columns]] instead");
		};
		let columns = Column::infer_from(first);
		if columns.is_empty() {
			bail!("the first record has no fields to show as columns");
		}
		Ok(columns)
	}
}

/// Event log destination: the configured file, else `events.jsonl` in the data directory.
fn events_path(logging: &LoggingSettings, data_dir: &Path) -> PathBuf {
	logging
		.events_file
		.clone()
		.unwrap_or_else(|| data_dir.join(EVENTS_FILE_NAME))
}

fn load_from(source: &RecordSource, input: &InputSource) -> Result<Vec<Record>> {
	source
		.load()
		.with_context(|| format!("failed to load records from {}", input.describe()))
}

fn build_grid(settings: &GridSettings, columns: Vec<Column>) -> Result<DataGrid> {
	let config = GridConfig {
		title: settings.title.clone(),
		description: settings.description.clone(),
		page_size: settings.page_size,
		key: settings.key.clone(),
		search_fields: settings.search_fields.clone(),
		selectable: settings.selectable,
		..GridConfig::default()
	};
	let grid = DataGrid::new(columns, config)?.with_filter(settings.query.clone());
	match settings.sort.clone() {
		Some(sort) => Ok(grid.with_sort(sort)?),
		None => Ok(grid),
	}
}

/// `output` may name a file or an existing directory; unset means the current directory.
fn export_path(output: Option<&Path>, file_name: &str) -> Result<PathBuf> {
	match output {
		Some(path) if path.is_dir() => Ok(path.join(file_name)),
		Some(path) => Ok(path.to_path_buf()),
		None => Ok(std::env::current_dir()
			.context("failed to resolve the current directory")?
			.join(file_name)),
	}
}
