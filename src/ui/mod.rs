//! Interactive terminal front-end for a [`DataGrid`](crate::grid::DataGrid).
//!
//! [`App`] adapts the grid's callbacks to terminal interactions, the
//! [`components`] module draws the table, the loading skeleton and the
//! detail overlay, and [`run`] drives the crossterm event loop.

mod actions;
pub mod components;
pub mod input;
mod render;
mod runtime;
mod state;

pub use runtime::run;
pub use state::{App, GridOutcome, Loader};
