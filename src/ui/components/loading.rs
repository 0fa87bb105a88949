use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::grid::LoadingModel;
use crate::theme::Theme;

const LOADING_LABEL: &str = "Loading records…";
const SKELETON_SYMBOL: &str = "░";
/// Relative bar lengths, cycled over the placeholder rows.
const SKELETON_WIDTHS: [u16; 4] = [90, 70, 80, 60];

/// Draw the throbber line and the placeholder rows shown while loading.
pub fn render_loading(
	frame: &mut Frame,
	area: Rect,
	model: &LoadingModel,
	theme: &Theme,
	throbber_state: &ThrobberState,
) {
	if area.width == 0 || area.height == 0 {
		return;
	}

	let muted = theme.empty_style();
	let spinner = Throbber::default()
		.style(muted)
		.throbber_style(muted)
		.to_symbol_span(throbber_state);
	let mut lines = vec![
		Line::from(vec![spinner, Span::styled(LOADING_LABEL, muted)]),
		Line::default(),
	];
	lines.extend(skeleton_lines(area.width, model.skeleton_rows, theme));
	frame.render_widget(Paragraph::new(lines), area);
}

fn skeleton_lines(width: u16, rows: usize, theme: &Theme) -> Vec<Line<'static>> {
	SKELETON_WIDTHS
		.iter()
		.cycle()
		.take(rows)
		.map(|percent| {
			let length = usize::from(width) * usize::from(*percent) / 100;
			Line::from(Span::styled(SKELETON_SYMBOL.repeat(length), theme.empty_style()))
		})
		.collect()
}
