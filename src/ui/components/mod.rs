//! UI building blocks shared across rendering and state modules.

/// Record detail overlay.
pub mod detail;
/// Placeholder shown while records load.
pub mod loading;
/// Grid table rendering.
pub mod table;

pub use detail::render_detail;
pub use loading::render_loading;
pub use table::{TableRenderContext, render_grid_table};
