//! Configuration loading and resolution utilities.
//!
//! Values are layered from the default config files, `--config` files,
//! `DATAGRID__SECTION__KEY` environment variables and finally CLI flags.
//! `load` is the primary entry point and returns a [`ResolvedConfig`] that is
//! used by the workflow.

mod loader;
mod raw;
mod resolved;
mod sources;
mod util;

pub use loader::load;
pub use resolved::{ExportRequest, GridSettings, InputSource, LoggingSettings, ResolvedConfig};
