//! The grid core: pipeline, selection, shell, render model, and exporters.

pub mod engine;
mod error;
pub mod export;
pub mod model;
pub mod selection;
pub mod shell;

pub use engine::{
	GridView, PageRequest, Pipeline, SortDirection, SortSpec, clamp_page, page_count, view,
};
pub use error::GridError;
pub use export::{Export, ExportFormat, export_file_name, to_csv, to_json};
pub use model::{
	EMPTY_MESSAGE, FooterModel, GridModel, HeaderCell, LoadingModel, RowModel, SKELETON_ROWS,
	TableModel, ToolbarAction,
};
pub use selection::{SelectAllState, Selection};
pub use shell::{
	ActionHandler, DataGrid, GridConfig, GridEvent, GridHandlers, RecordHandler, RowAction,
	SearchHandler, SelectionHandler,
};
