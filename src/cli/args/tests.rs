use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};

use super::options::ExportArg;
use super::{CliArgs, OutputFormat};

fn parse(args: &[&str]) -> CliArgs {
	let mut matches = CliArgs::command()
		.try_get_matches_from(args)
		.expect("arguments parse");
	CliArgs::from_arg_matches_mut(&mut matches).expect("parses")
}

#[test]
fn command_supports_custom_styles() {
	let command = CliArgs::command();
	assert!(command.get_about().is_some());
	command.debug_assert();
}

#[test]
fn parse_cli_accepts_default_arguments() {
	let parsed = parse(&["datagrid"]);
	assert_eq!(parsed.output_format, OutputFormat::Plain);
	assert!(parsed.input.is_none());
	assert!(parsed.export.is_none());
}

#[test]
fn export_flags_and_lists_are_parsed() {
	let parsed = parse(&[
		"datagrid",
		"users.json",
		"--export",
		"csv",
		"--output",
		"out",
		"--search-fields",
		"name,email",
		"--sort",
		"name:desc",
		"--page-size",
		"25",
	]);
	assert_eq!(parsed.input, Some(PathBuf::from("users.json")));
	assert_eq!(parsed.export, Some(ExportArg::Csv));
	assert_eq!(parsed.output, Some(PathBuf::from("out")));
	assert_eq!(
		parsed.search_fields,
		Some(vec!["name".to_string(), "email".to_string()])
	);
	assert_eq!(parsed.sort.as_deref(), Some("name:desc"));
	assert_eq!(parsed.page_size, Some(25));
}

#[test]
fn selectable_accepts_boolish_values() {
	let parsed = parse(&["datagrid", "--selectable", "no"]);
	assert_eq!(parsed.selectable, Some(false));
}
