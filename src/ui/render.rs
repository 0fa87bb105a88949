use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::App;
use super::components::{TableRenderContext, render_detail, render_grid_table, render_loading};
use crate::grid::{FooterModel, GridModel, RowAction, TableModel, ToolbarAction};

const PROMPT: &str = "Search > ";
const SEPARATOR: &str = " · ";

impl<'a> App<'a> {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});
		let model = self.grid.render_model();

		let [title_area, prompt_area, body_area, footer_area, hints_area] = Layout::vertical([
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Min(1),
			Constraint::Length(1),
			Constraint::Length(1),
		])
		.areas(area);

		self.render_title(frame, title_area, &model);
		match &model {
			GridModel::Loading(loading) => {
				render_loading(frame, body_area, loading, &self.theme, &self.throbber_state);
			}
			GridModel::Ready(table) => {
				self.render_prompt(frame, prompt_area, table);
				let focused = Some(self.focused_column);
				render_grid_table(
					frame,
					body_area,
					&mut self.table_state,
					TableRenderContext {
						model: table,
						focused_column: focused,
						theme: &self.theme,
					},
				);
				if let Some(footer) = &table.footer {
					self.render_footer(frame, footer_area, footer);
				}
				self.render_hints(frame, hints_area, table);
			}
		}

		if let Some(record) = &self.detail {
			render_detail(frame, area, record, self.grid.columns(), &self.theme);
		}
	}

	fn render_title(&self, frame: &mut Frame, area: Rect, model: &GridModel) {
		let description = match model {
			GridModel::Loading(loading) => loading.description.as_deref(),
			GridModel::Ready(table) => table.description.as_deref(),
		};
		let mut spans = vec![Span::styled(model.title().to_string(), self.theme.title_style())];
		if let Some(description) = description {
			spans.push(Span::styled(
				format!("  {description}"),
				self.theme.empty_style(),
			));
		}
		frame.render_widget(Paragraph::new(Line::from(spans)), area);
	}

	fn render_prompt(&self, frame: &mut Frame, area: Rect, table: &TableModel) {
		let toolbar = toolbar_label(&table.toolbar);
		let toolbar_width = toolbar.width() as u16;
		let [input_area, toolbar_area] = Layout::horizontal([
			Constraint::Min(1),
			Constraint::Length(toolbar_width),
		])
		.areas(area);

		if table.searchable {
			let prompt_width = PROMPT.width() as u16;
			let [prompt_area, text_area] =
				Layout::horizontal([Constraint::Length(prompt_width), Constraint::Min(1)])
					.areas(input_area);
			frame.render_widget(
				Paragraph::new(PROMPT).style(self.theme.prompt_style()),
				prompt_area,
			);
			if self.detail.is_none() {
				self.search_input.render(frame, text_area);
			}
		}
		frame.render_widget(
			Paragraph::new(toolbar)
				.alignment(Alignment::Right)
				.style(self.theme.header_style()),
			toolbar_area,
		);
	}

	fn render_footer(&self, frame: &mut Frame, area: Rect, footer: &FooterModel) {
		let muted = self.theme.empty_style();
		let line = Line::from(vec![
			Span::styled(footer.range_label.clone(), muted),
			Span::styled(SEPARATOR, muted),
			Span::styled(footer.page_label.clone(), muted),
			Span::styled(SEPARATOR, muted),
			Span::styled(footer.summary.clone(), self.theme.prompt_style()),
		]);
		frame.render_widget(Paragraph::new(line), area);
	}

	fn render_hints(&self, frame: &mut Frame, area: Rect, table: &TableModel) {
		let text = match &self.status {
			Some(status) => status.clone(),
			None => key_hints(table),
		};
		frame.render_widget(
			Paragraph::new(text).style(self.theme.empty_style()),
			area,
		);
	}
}

fn toolbar_label(actions: &[ToolbarAction]) -> String {
	actions
		.iter()
		.map(|action| format!("[{}]", action.label()))
		.collect::<Vec<_>>()
		.join(" ")
}

fn key_hints(table: &TableModel) -> String {
	let mut hints = vec!["Enter open"];
	if table.selectable {
		hints.push("Space select");
		hints.push("Ctrl-A all");
	}
	hints.push("Tab/Ctrl-S sort");
	for action in &table.row_actions {
		match action {
			RowAction::View => hints.push("Ctrl-V view"),
			RowAction::Delete => hints.push("Ctrl-D delete"),
			RowAction::Edit => {}
		}
	}
	for action in &table.toolbar {
		match action {
			ToolbarAction::Refresh => hints.push("Ctrl-R refresh"),
			ToolbarAction::Export => hints.push("Ctrl-X export"),
			ToolbarAction::AddNew => {}
		}
	}
	hints.push("Esc quit");
	hints.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use ratatui::Terminal;
	use ratatui::backend::TestBackend;
	use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

	use super::super::state::tests::{context, grid, users};
	use super::*;
	use crate::ui::Loader;

	fn screen(app: &mut App<'_>) -> String {
		let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
		terminal.draw(|frame| app.draw(frame)).unwrap();
		let buffer = terminal.backend().buffer();
		let width = buffer.area.width as usize;
		buffer
			.content()
			.chunks(width)
			.map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
			.collect::<Vec<_>>()
			.join("\n")
	}

	#[test]
	fn ready_grid_shows_title_rows_and_footer() {
		let mut context = context();
		let mut app = App::new(grid(users()), &mut context);
		let view = screen(&mut app);

		assert!(view.contains("Users"));
		assert!(view.contains("Search >"));
		assert!(view.contains("[Export]"));
		assert!(view.contains("alice@example.com"));
		assert!(view.contains("Showing 1 to 3 of 3 results"));
		assert!(view.contains("Page 1 of 1"));
		assert!(view.contains("3 rows found"));
		assert!(view.contains("Ctrl-V view"));
	}

	#[test]
	fn loading_grid_shows_the_skeleton() {
		let mut context = context();
		let loader: Loader = Arc::new(|| {
			std::thread::sleep(std::time::Duration::from_millis(200));
			Ok(Vec::new())
		});
		let mut app = App::new(grid(Vec::new()), &mut context).with_loader(loader);
		app.start_initial_load();
		let view = screen(&mut app);

		assert!(view.contains("Loading records"));
		assert!(view.contains("░░░"));
		assert!(!view.contains("Showing"));
	}

	#[test]
	fn selection_and_sort_are_visible() {
		let mut context = context();
		let mut app = App::new(grid(users()), &mut context);
		app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
		app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
		app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
		let view = screen(&mut app);

		assert!(view.contains("[x]"));
		assert!(view.contains("[-]"));
		assert!(view.contains("Name ▲"));
		assert!(view.contains("1 row selected"));
	}

	#[test]
	fn detail_overlay_lists_the_record() {
		let mut context = context();
		let mut app = App::new(grid(users()), &mut context);
		app.handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));
		let view = screen(&mut app);

		assert!(view.contains("Record details"));
		assert!(view.contains("Email: alice@example.com"));
	}

	#[test]
	fn status_messages_replace_the_key_hints() {
		let mut context = context();
		let mut app = App::new(grid(users()), &mut context);
		app.set_status("Deleted record 1");
		let view = screen(&mut app);
		assert!(view.contains("Deleted record 1"));
		assert!(!view.contains("Esc quit"));
	}
}
