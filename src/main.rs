mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use datagrid::app_dirs::{self, LOG_FILE_NAME};
use datagrid::logging::initialize_file_logger;
use settings::ResolvedConfig;
use workflow::GridWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();

	if cli.list_themes {
		for name in datagrid::theme::names() {
			println!("{name}");
		}
		return Ok(());
	}

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	init_logging(&resolved);
	run_grid(cli.output_format, resolved)
}

/// Diagnostics go to a file because the terminal belongs to the UI.
fn init_logging(settings: &ResolvedConfig) {
	let path = match app_dirs::get_data_dir() {
		Ok(dir) => dir.join(LOG_FILE_NAME),
		Err(err) => {
			eprintln!("logging disabled: {err}");
			return;
		}
	};
	if let Err(err) = initialize_file_logger(&path, settings.logging.level) {
		eprintln!("logging disabled: {err}");
	}
}

/// Execute the grid workflow and print output in the chosen format.
fn run_grid(format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
	let workflow = GridWorkflow::from_config(settings);
	let output = workflow.run()?;

	match format {
		OutputFormat::Plain => print_plain(&output)?,
		OutputFormat::Json => print_json(&output)?,
	}

	Ok(())
}
