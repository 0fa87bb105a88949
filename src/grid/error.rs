use thiserror::Error;

/// Errors raised by the grid engine, shell, and exporters.
#[derive(Debug, Error)]
pub enum GridError {
	/// The grid was configured in a way that cannot render correctly.
	#[error("invalid grid configuration: {reason}")]
	InvalidConfiguration { reason: String },

	#[error("invalid field path '{path}'")]
	InvalidFieldPath { path: String },

	/// Source data did not have the shape of a record.
	#[error("invalid record: {reason}")]
	InvalidRecord { reason: String },

	#[error("failed to write CSV export")]
	Csv(#[from] csv::Error),

	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("export produced invalid UTF-8")]
	Utf8(#[from] std::string::FromUtf8Error),
}

impl GridError {
	pub fn invalid_configuration(reason: impl Into<String>) -> Self {
		Self::InvalidConfiguration {
			reason: reason.into(),
		}
	}
}
