use clap::ValueEnum;
use datagrid::ExportFormat;

/// Output formats supported by the CLI utility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
	Plain,
	Json,
}

/// File formats accepted by `--export`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportArg {
	Csv,
	Json,
}

impl From<ExportArg> for ExportFormat {
	fn from(value: ExportArg) -> Self {
		match value {
			ExportArg::Csv => ExportFormat::Csv,
			ExportArg::Json => ExportFormat::Json,
		}
	}
}
