use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::types::{Column, Record, format_cell, stringify_value};

/// Draw a centred overlay listing every field of `record`.
///
/// Configured columns come first, using their headers and renderers; any
/// remaining fields follow under their raw names.
pub fn render_detail(
	frame: &mut Frame,
	area: Rect,
	record: &Record,
	columns: &[Column],
	theme: &Theme,
) {
	let popup = centered(area, 70, 60);
	if popup.width < 3 || popup.height < 3 {
		return;
	}

	let block = Block::default()
		.title(" Record details (Esc to close) ")
		.title_style(theme.title_style())
		.borders(Borders::ALL)
		.border_style(theme.header_style());

	let lines: Vec<Line> = detail_fields(record, columns)
		.into_iter()
		.map(|(label, value)| {
			Line::from(vec![
				Span::styled(format!("{label}: "), theme.header_style()),
				Span::raw(value),
			])
		})
		.collect();

	frame.render_widget(Clear, popup);
	frame.render_widget(
		Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
		popup,
	);
}

pub(crate) fn detail_fields(record: &Record, columns: &[Column]) -> Vec<(String, String)> {
	let mut fields: Vec<(String, String)> = columns
		.iter()
		.map(|column| (column.header.clone(), format_cell(record, column)))
		.collect();

	for (name, value) in record.fields() {
		let shown = columns
			.iter()
			.any(|column| column.key.segments().next() == Some(name));
		if !shown {
			fields.push((name.to_string(), stringify_value(value)));
		}
	}
	fields
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
	let [_, middle, _] = Layout::vertical([
		Constraint::Percentage((100 - percent_y) / 2),
		Constraint::Percentage(percent_y),
		Constraint::Percentage((100 - percent_y) / 2),
	])
	.areas(area);
	let [_, center, _] = Layout::horizontal([
		Constraint::Percentage((100 - percent_x) / 2),
		Constraint::Percentage(percent_x),
		Constraint::Percentage((100 - percent_x) / 2),
	])
	.areas(middle);
	center
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn configured_columns_lead_and_extra_fields_follow() {
		let record = Record::new()
			.with("id", 7)
			.with("name", "Alice")
			.with("team", "Core");
		let columns = vec![Column::parse("name", "Name").unwrap()];
		assert_eq!(
			detail_fields(&record, &columns),
			vec![
				("Name".to_string(), "Alice".to_string()),
				("id".to_string(), "7".to_string()),
				("team".to_string(), "Core".to_string()),
			]
		);
	}
}
