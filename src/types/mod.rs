//! Record and column types shared by the grid engine and its renderers.

mod column;
mod format;
mod record;

pub use column::{CellRenderer, Column, ValueKind, header_label};
pub use format::{field_text, format_cell, parse_date, stringify_value};
pub use record::{FieldPath, KeyAccessor, Record, RecordKey, parse_records};
