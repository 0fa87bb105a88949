use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use tui_textarea::{CursorMove, TextArea};

/// Single-line text input backing the grid's search box.
#[derive(Debug, Clone)]
pub struct SearchInput<'a> {
	textarea: TextArea<'a>,
}

impl<'a> SearchInput<'a> {
	pub fn new(initial: impl Into<String>) -> Self {
		let mut textarea = TextArea::new(vec![initial.into()]);
		textarea.set_cursor_line_style(Style::default());
		textarea.move_cursor(CursorMove::End);
		Self { textarea }
	}

	#[must_use]
	pub fn text(&self) -> &str {
		self.textarea
			.lines()
			.first()
			.map_or("", String::as_str)
	}

	/// Cursor position in characters.
	#[must_use]
	pub fn cursor(&self) -> usize {
		self.textarea.cursor().1
	}

	pub fn set_style(&mut self, style: Style) {
		self.textarea.set_style(style);
		self.textarea
			.set_cursor_style(style.add_modifier(Modifier::REVERSED));
	}

	/// Apply an editing key. Returns whether the text changed.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Char('u') if ctrl => self.clear(),
			KeyCode::Enter | KeyCode::Char('\n' | '\r') => false,
			KeyCode::Char('m') if ctrl => false,
			_ => self.textarea.input(key),
		}
	}

	pub fn clear(&mut self) -> bool {
		self.textarea.move_cursor(CursorMove::Head);
		self.textarea.delete_line_by_end()
	}

	pub fn render(&self, frame: &mut Frame, area: Rect) {
		if area.width == 0 || area.height == 0 {
			return;
		}
		frame.render_widget(&self.textarea, area);
	}
}
