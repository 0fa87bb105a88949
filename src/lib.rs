//! Core crate exports for building and running `datagrid` tables.
//!
//! The [`grid`] module holds the filter/sort/paginate engine, the selection
//! tracker, CSV export and the [`DataGrid`] shell. The [`context`] module
//! carries the session, theme preference and activity log that the
//! interactive front-end in [`ui`] draws on.

pub mod app_dirs;
pub mod context;
pub mod grid;
pub mod logging;
pub mod theme;
pub mod types;
pub mod ui;

pub use context::{AppContext, ContextOptions, FilePreferenceStore, MemoryPreferenceStore};
pub use grid::{
	DataGrid, ExportFormat, GridConfig, GridError, GridEvent, GridHandlers, GridModel, SortSpec,
};
pub use theme::{Theme, default_theme};
pub use types::{Column, FieldPath, KeyAccessor, Record, RecordKey, ValueKind};
pub use ui::{GridOutcome, run};
