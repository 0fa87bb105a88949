use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, ColorChoice, Parser};

use super::options::{ExportArg, OutputFormat};
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `datagrid` binary.
#[derive(Parser, Debug)]
#[command(
	name = "datagrid",
	version,
	long_version = long_version(),
	about = "Search, sort, page and export JSON records in the terminal",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		value_name = "FILE",
		help = "JSON file holding an array of records, or `-` for stdin (default: stdin)"
	)]
	pub(crate) input: Option<PathBuf>,
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "DATAGRID_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 't',
		long,
		value_name = "TITLE",
		help = "Set the grid title, also used to name exports (default: Data Grid)"
	)]
	pub(crate) title: Option<String>,
	#[arg(
		long,
		value_name = "TEXT",
		help = "Set the description shown under the title (default: none)"
	)]
	pub(crate) description: Option<String>,
	#[arg(
		short = 'q',
		long,
		value_name = "QUERY",
		help = "Provide an initial filter (default: empty)"
	)]
	pub(crate) query: Option<String>,
	#[arg(
		short = 's',
		long,
		value_name = "COLUMN[:asc|desc]",
		help = "Sort by a column (default: source order)"
	)]
	pub(crate) sort: Option<String>,
	#[arg(
		long = "page-size",
		value_name = "NUM",
		help = "Rows per page (default: 10)"
	)]
	pub(crate) page_size: Option<usize>,
	#[arg(
		short = 'k',
		long,
		value_name = "FIELD",
		help = "Field that uniquely identifies a record (default: id)"
	)]
	pub(crate) key: Option<String>,
	#[arg(
		long = "search-fields",
		value_delimiter = ',',
		value_name = "FIELD",
		help = "Comma-separated fields matched by the filter (default: every column)"
	)]
	pub(crate) search_fields: Option<Vec<String>>,
	#[arg(
		long = "columns",
		value_delimiter = ',',
		value_name = "FIELD",
		help = "Comma-separated fields to show as columns (default: configured or inferred)"
	)]
	pub(crate) columns: Option<Vec<String>>,
	#[arg(
		long = "selectable",
		value_parser = BoolishValueParser::new(),
		help = "Allow selecting rows (default: enabled)"
	)]
	pub(crate) selectable: Option<bool>,
	#[arg(
		long,
		value_name = "THEME",
		help = "Select a theme by name for this run (default: stored preference)"
	)]
	pub(crate) theme: Option<String>,
	#[arg(
		short = 'e',
		long,
		value_enum,
		help = "Export the filtered rows instead of opening the grid (default: disabled)"
	)]
	pub(crate) export: Option<ExportArg>,
	#[arg(
		long = "output",
		value_name = "PATH",
		help = "File or directory receiving the export (default: current directory)"
	)]
	pub(crate) output: Option<PathBuf>,
	#[arg(
		short = 'o',
		long = "output-format",
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Choose how to print the result"
	)]
	pub(crate) output_format: OutputFormat,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'l',
		long = "list-themes",
		help = "List supported themes and exit (default: disabled)"
	)]
	pub(crate) list_themes: bool,
	#[arg(
		long = "log-level",
		value_name = "LEVEL",
		help = "Diagnostic log level: off, error, warn, info, debug, trace (default: info)"
	)]
	pub(crate) log_level: Option<String>,
}
