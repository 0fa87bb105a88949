use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use super::state::GridOutcome;
use crate::grid::{GridEvent, RowAction};

impl<'a> App<'a> {
	pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<GridOutcome> {
		if self.detail.is_some() {
			if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
				self.detail = None;
			}
			return None;
		}

		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Esc => return Some(self.outcome(false, None)),
			KeyCode::Char('c') if ctrl => return Some(self.outcome(false, None)),
			KeyCode::Enter => {
				let cursor = self.cursor();
				self.dispatch(GridEvent::ClickRow(cursor));
			}
			KeyCode::Up => self.move_selection_up(),
			KeyCode::Down => self.move_selection_down(),
			KeyCode::PageUp => self.change_page(GridEvent::PreviousPage),
			KeyCode::PageDown => self.change_page(GridEvent::NextPage),
			KeyCode::Home => self.change_page(GridEvent::FirstPage),
			KeyCode::End => self.change_page(GridEvent::LastPage),
			KeyCode::Tab => self.focus_column(1),
			KeyCode::BackTab => self.focus_column(-1),
			KeyCode::Char(' ') if ctrl || self.search_input.text().is_empty() => {
				let cursor = self.cursor();
				self.dispatch(GridEvent::ToggleRow(cursor));
			}
			KeyCode::Char('a') if ctrl => {
				self.dispatch(GridEvent::ToggleAll);
			}
			KeyCode::Char('s') if ctrl => self.sort_focused_column(),
			KeyCode::Char('v') if ctrl => self.row_action(RowAction::View),
			KeyCode::Char('d') if ctrl => self.row_action(RowAction::Delete),
			KeyCode::Char('r') if ctrl => {
				self.dispatch(GridEvent::Refresh);
			}
			KeyCode::Char('x') if ctrl => self.export_csv(),
			KeyCode::Char('t') if ctrl => self.toggle_theme(),
			_ => {
				if self.search_input.input(key) {
					let text = self.search_input.text().to_string();
					self.dispatch(GridEvent::SetFilter(text));
				}
			}
		}
		self.process_requests()
	}

	fn row_action(&mut self, action: RowAction) {
		if !self.grid.row_actions().contains(&action) {
			return;
		}
		let cursor = self.cursor();
		self.dispatch(GridEvent::Action(action, cursor));
	}

	fn change_page(&mut self, event: GridEvent) {
		if self.dispatch(event) {
			self.table_state.select(Some(0));
		}
	}

	fn focus_column(&mut self, step: isize) {
		let count = self.grid.columns().len();
		if count == 0 {
			return;
		}
		let next = (self.focused_column as isize + step).rem_euclid(count as isize);
		self.focused_column = next as usize;
	}

	fn sort_focused_column(&mut self) {
		let Some(column) = self.grid.columns().get(self.focused_column) else {
			return;
		};
		let key = column.key.clone();
		self.dispatch(GridEvent::ToggleSort(key));
	}

	fn move_selection_up(&mut self) {
		match self.table_state.selected() {
			Some(selected) if selected > 0 => self.table_state.select(Some(selected - 1)),
			_ => {
				if self.dispatch(GridEvent::PreviousPage) {
					let rows = self.grid.view().page_indices().len();
					self.table_state.select(rows.checked_sub(1));
				}
			}
		}
	}

	fn move_selection_down(&mut self) {
		let rows = self.grid.view().page_indices().len();
		match self.table_state.selected() {
			Some(selected) if selected + 1 < rows => self.table_state.select(Some(selected + 1)),
			_ => {
				if self.dispatch(GridEvent::NextPage) {
					self.table_state.select(Some(0));
				}
			}
		}
	}
}
