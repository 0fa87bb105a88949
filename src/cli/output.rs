use anyhow::Result;
use datagrid::{GridOutcome, Record};
use serde_json::{Value, json};

use crate::workflow::{ExportReport, WorkflowOutput};

/// Print a plain-text representation of the workflow result.
pub(crate) fn print_plain(output: &WorkflowOutput) -> Result<()> {
	match output {
		WorkflowOutput::Exported(report) => println!("{}", report.path.display()),
		WorkflowOutput::Interactive(outcome) => print_outcome_plain(outcome)?,
	}
	Ok(())
}

fn print_outcome_plain(outcome: &GridOutcome) -> Result<()> {
	if !outcome.accepted && outcome.selected.is_empty() {
		println!("Cancelled (query: '{}')", outcome.query);
		return Ok(());
	}

	match &outcome.row {
		Some(row) => println!("{}", serde_json::to_string(row)?),
		None => println!("No row accepted"),
	}
	for record in &outcome.selected {
		println!("selected: {}", serde_json::to_string(record)?);
	}
	Ok(())
}

/// Format the workflow result as a JSON string.
pub(crate) fn format_output_json(output: &WorkflowOutput) -> Result<String> {
	let payload = match output {
		WorkflowOutput::Exported(report) => format_export(report),
		WorkflowOutput::Interactive(outcome) => json!({
			"accepted": outcome.accepted,
			"query": outcome.query,
			"row": outcome.row.clone().map(Record::into_value),
			"selected": outcome
				.selected
				.iter()
				.cloned()
				.map(Record::into_value)
				.collect::<Vec<Value>>(),
		}),
	};
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn format_export(report: &ExportReport) -> Value {
	json!({
		"path": report.path.display().to_string(),
		"format": report.format.extension(),
		"rows": report.rows,
	})
}

/// Print the JSON representation of the workflow result.
pub(crate) fn print_json(output: &WorkflowOutput) -> Result<()> {
	println!("{}", format_output_json(output)?);
	Ok(())
}
