use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
	for line in summary_lines(config) {
		println!("{line}");
	}
}

fn summary_lines(config: &ResolvedConfig) -> Vec<String> {
	let grid = &config.grid;
	let mut lines = vec![
		"Effective configuration:".to_string(),
		format!("  Input: {}", config.input.describe()),
		format!("  Title: {}", grid.title),
	];
	if let Some(description) = &grid.description {
		lines.push(format!("  Description: {description}"));
	}
	lines.push(format!("  Page size: {}", grid.page_size));
	lines.push(format!("  Selectable: {}", bool_to_word(grid.selectable)));
	if grid.search_fields.is_empty() {
		lines.push("  Search fields: (all columns)".to_string());
	} else {
		let fields: Vec<&str> = grid.search_fields.iter().map(|field| field.as_str()).collect();
		lines.push(format!("  Search fields: {}", fields.join(", ")));
	}
	lines.push(format!(
		"  Sort: {}",
		grid.sort
			.as_ref()
			.map_or_else(|| "(source order)".to_string(), ToString::to_string)
	));
	if !grid.query.is_empty() {
		lines.push(format!("  Initial query: {}", grid.query));
	}
	if config.columns.is_empty() {
		lines.push("  Columns: (inferred from the first record)".to_string());
	} else {
		let columns: Vec<String> = config
			.columns
			.iter()
			.map(|column| {
				let sortable = if column.sortable { ", sortable" } else { "" };
				format!("{} ({}{sortable})", column.key.as_str(), column.kind.as_str())
			})
			.collect();
		lines.push(format!("  Columns: {}", columns.join(", ")));
	}
	lines.push(format!(
		"  UI theme: {}",
		config
			.theme
			.as_ref()
			.map_or("(stored preference)", |theme| theme.as_str())
	));
	lines.push(format!("  Log level: {}", config.logging.level));
	lines.push(format!(
		"  Event batch: {} entries or {}s",
		config.logging.batch_size,
		config.logging.flush_interval.as_secs()
	));
	if let Some(export) = &config.export {
		lines.push(format!("  Export: {}", export.format.extension()));
	}
	lines
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
