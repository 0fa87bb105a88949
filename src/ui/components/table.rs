use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Clear, HighlightSpacing, Paragraph, Row, Table, TableState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::grid::TableModel;
use crate::theme::Theme;

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const TABLE_COLUMN_SPACING: u16 = 1;
const CHECKBOX_WIDTH: u16 = 3;
const ELLIPSIS: &str = "…";
/// Header row plus the separator drawn beneath it.
const HEADER_HEIGHT: u16 = 2;

/// Everything needed to draw the table part of a ready grid.
pub struct TableRenderContext<'a> {
	pub model: &'a TableModel,
	/// Data column whose header has keyboard focus.
	pub focused_column: Option<usize>,
	pub theme: &'a Theme,
}

pub fn render_grid_table(
	frame: &mut Frame,
	area: Rect,
	table_state: &mut TableState,
	context: TableRenderContext<'_>,
) {
	let highlight_spacing = HighlightSpacing::Always;
	let selection_width = selection_column_width(&highlight_spacing);
	let params = TableParameters::from_model(&context, area, selection_width);
	render_configured_table(
		frame,
		area,
		table_state,
		highlight_spacing,
		context.theme,
		params,
	);

	if let Some(message) = context.model.empty_message() {
		render_empty_state(frame, area, context.theme, message);
	}
}

struct TableParameters<'a> {
	widths: Vec<Constraint>,
	headers: Vec<Cell<'a>>,
	rows: Vec<Row<'a>>,
}

impl<'a> TableParameters<'a> {
	fn from_model(context: &TableRenderContext<'a>, area: Rect, selection_width: u16) -> Self {
		let model = context.model;
		let theme = context.theme;

		let mut widths = Vec::with_capacity(model.headers.len() + 1);
		let mut headers = Vec::with_capacity(model.headers.len() + 1);
		if model.selectable {
			widths.push(Constraint::Length(CHECKBOX_WIDTH));
			headers.push(Cell::from(model.select_all.checkbox()));
		}
		for (index, header) in model.headers.iter().enumerate() {
			widths.push(match header.width {
				Some(width) => Constraint::Length(width),
				None => Constraint::Fill(1),
			});
			let cell = Cell::from(header.display_label());
			headers.push(if context.focused_column == Some(index) {
				cell.style(theme.header_focus_style())
			} else {
				cell
			});
		}

		let column_widths =
			resolve_column_widths(area, &widths, selection_width, TABLE_COLUMN_SPACING);
		let offset = usize::from(model.selectable);
		let needle = model.filter.trim();

		let rows = model
			.rows
			.iter()
			.map(|row| {
				let mut cells = Vec::with_capacity(row.cells.len() + offset);
				if model.selectable {
					let checkbox = match (row.selectable, row.selected) {
						(false, _) => "   ",
						(true, true) => "[x]",
						(true, false) => "[ ]",
					};
					cells.push(Cell::from(checkbox));
				}
				for (index, text) in row.cells.iter().enumerate() {
					let width = column_widths.get(index + offset).copied();
					cells.push(highlight_cell(text, needle, width, theme.highlight_style()));
				}
				let row_widget = Row::new(cells);
				if row.selected {
					row_widget.style(theme.selected_style())
				} else {
					row_widget
				}
			})
			.collect();

		Self {
			widths,
			headers,
			rows,
		}
	}
}

fn render_configured_table(
	frame: &mut Frame,
	area: Rect,
	table_state: &mut TableState,
	highlight_spacing: HighlightSpacing,
	theme: &Theme,
	params: TableParameters<'_>,
) {
	let header = Row::new(params.headers)
		.style(theme.header_style())
		.height(1)
		.bottom_margin(1);

	let table = Table::new(params.rows, params.widths)
		.header(header)
		.column_spacing(TABLE_COLUMN_SPACING)
		.highlight_spacing(highlight_spacing)
		.row_highlight_style(theme.row_highlight_style())
		.highlight_symbol(HIGHLIGHT_SYMBOL);
	frame.render_stateful_widget(table, area, table_state);

	render_header_separator(frame, area, theme, 1);
}

fn render_header_separator(frame: &mut Frame, area: Rect, theme: &Theme, header_height: u16) {
	if header_height >= area.height {
		return;
	}
	let width = area.width as usize;
	if width == 0 {
		return;
	}

	let sep_rect = Rect {
		x: area.x,
		y: area.y + header_height,
		width: area.width,
		height: 1,
	};
	let base_style = Style::new().bg(theme.header_bg());
	if width <= 2 {
		frame.render_widget(Paragraph::new(" ".repeat(width)).style(base_style), sep_rect);
		return;
	}

	let middle_style = base_style.fg(theme.header_fg());
	let spans = vec![
		Span::styled(" ", base_style),
		Span::styled("─".repeat(width - 2), middle_style),
		Span::styled(" ", base_style),
	];
	frame.render_widget(Paragraph::new(Text::from(Line::from(spans))), sep_rect);
}

fn render_empty_state(frame: &mut Frame, area: Rect, theme: &Theme, message: &str) {
	if area.height <= HEADER_HEIGHT {
		return;
	}
	let body = Rect {
		y: area.y + HEADER_HEIGHT,
		height: area.height - HEADER_HEIGHT,
		..area
	};
	let message_area = Rect { height: 1, ..body };
	frame.render_widget(Clear, body);
	frame.render_widget(
		Paragraph::new(message)
			.alignment(Alignment::Center)
			.style(theme.empty_style()),
		message_area,
	);
}

fn selection_column_width(spacing: &HighlightSpacing) -> u16 {
	match spacing {
		HighlightSpacing::Never => 0,
		_ => UnicodeWidthStr::width(HIGHLIGHT_SYMBOL) as u16,
	}
}

fn resolve_column_widths(
	area: Rect,
	constraints: &[Constraint],
	selection_width: u16,
	column_spacing: u16,
) -> Vec<u16> {
	if constraints.is_empty() {
		return Vec::new();
	}

	let layout_area = Rect {
		x: 0,
		y: 0,
		width: area.width,
		height: 1,
	};
	let [_, columns_area] =
		Layout::horizontal([Constraint::Length(selection_width), Constraint::Fill(0)])
			.areas(layout_area);

	Layout::horizontal(constraints.to_vec())
		.spacing(column_spacing)
		.split(columns_area)
		.iter()
		.map(|rect| rect.width)
		.collect()
}

/// Build a cell that emphasises the first case-insensitive match of `needle`
/// and is truncated with an ellipsis to `max_width`.
fn highlight_cell<'a>(
	text: &str,
	needle: &str,
	max_width: Option<u16>,
	highlight: Style,
) -> Cell<'a> {
	let text = match max_width {
		Some(width) => truncate(text, usize::from(width)),
		None => text.to_string(),
	};

	let Some((start, end)) = find_match(&text, needle) else {
		return Cell::from(text);
	};
	let spans = vec![
		Span::raw(text[..start].to_string()),
		Span::styled(text[start..end].to_string(), highlight),
		Span::raw(text[end..].to_string()),
	];
	Cell::from(Line::from(spans))
}

fn find_match(text: &str, needle: &str) -> Option<(usize, usize)> {
	if needle.is_empty() {
		return None;
	}
	let haystack = text.to_lowercase();
	// Byte offsets only line up when lowercasing kept the length.
	if haystack.len() != text.len() {
		return None;
	}
	let needle = needle.to_lowercase();
	let start = haystack.find(&needle)?;
	let end = start + needle.len();
	(text.is_char_boundary(start) && text.is_char_boundary(end)).then_some((start, end))
}

fn truncate(text: &str, max_width: usize) -> String {
	if text.width() <= max_width {
		return text.to_string();
	}
	if max_width <= ELLIPSIS.width() {
		return ELLIPSIS.chars().take(max_width).collect();
	}

	let available = max_width - ELLIPSIS.width();
	let mut used = 0;
	let mut truncated = String::new();
	for ch in text.chars() {
		let width = ch.width().unwrap_or(0);
		if used + width > available {
			break;
		}
		used += width;
		truncated.push(ch);
	}
	truncated.push_str(ELLIPSIS);
	truncated
}
