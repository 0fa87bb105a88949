use std::collections::{BTreeSet, HashSet};

use crate::types::{KeyAccessor, Record, RecordKey};

/// Tri-state of the "select all" checkbox for a set of visible keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
	None,
	Some,
	All,
}

impl SelectAllState {
	#[must_use]
	pub fn checkbox(self) -> &'static str {
		match self {
			Self::None => "[ ]",
			Self::Some => "[-]",
			Self::All => "[x]",
		}
	}
}

/// Set of record keys the user has marked.
///
/// The selection is independent of filtering, sorting, and paging: keys stay
/// selected while their records are hidden so a user can act across pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	keys: BTreeSet<RecordKey>,
}

impl Selection {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	#[must_use]
	pub fn is_selected(&self, key: &RecordKey) -> bool {
		self.keys.contains(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
		self.keys.iter()
	}

	/// Flip the state of `key`. Returns whether the key is now selected.
	pub fn toggle(&mut self, key: RecordKey) -> bool {
		if self.keys.remove(&key) {
			false
		} else {
			self.keys.insert(key);
			true
		}
	}

	/// Select every visible key, or clear the whole selection when all of
	/// them are already selected. Returns whether anything changed.
	pub fn select_all<'k, I>(&mut self, visible: I) -> bool
	where
		I: IntoIterator<Item = &'k RecordKey>,
	{
		let visible: Vec<&RecordKey> = visible.into_iter().collect();
		if visible.is_empty() {
			return false;
		}

		if visible.iter().all(|key| self.keys.contains(*key)) {
			return self.clear();
		}

		let before = self.keys.len();
		self.keys.extend(visible.into_iter().cloned());
		self.keys.len() != before
	}

	/// Drop every key. Returns whether anything was selected.
	pub fn clear(&mut self) -> bool {
		let changed = !self.keys.is_empty();
		self.keys.clear();
		changed
	}

	/// Keep only keys present in `available`. Returns whether any key was dropped.
	pub fn retain_available(&mut self, available: &HashSet<RecordKey>) -> bool {
		let before = self.keys.len();
		self.keys.retain(|key| available.contains(key));
		self.keys.len() != before
	}

	#[must_use]
	pub fn state_for<'k, I>(&self, visible: I) -> SelectAllState
	where
		I: IntoIterator<Item = &'k RecordKey>,
	{
		let mut total = 0usize;
		let mut selected = 0usize;
		for key in visible {
			total += 1;
			if self.keys.contains(key) {
				selected += 1;
			}
		}

		match (selected, total) {
			(0, _) => SelectAllState::None,
			(selected, total) if selected == total => SelectAllState::All,
			_ => SelectAllState::Some,
		}
	}

	/// Materialize the selected records in source order.
	#[must_use]
	pub fn selected_records<'a>(&self, records: &'a [Record], key: &KeyAccessor) -> Vec<&'a Record> {
		if self.keys.is_empty() {
			return Vec::new();
		}
		records
			.iter()
			.filter(|record| {
				key.key_of(record)
					.is_some_and(|record_key| self.keys.contains(&record_key))
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn keys(values: &[&str]) -> Vec<RecordKey> {
		values.iter().copied().map(RecordKey::from).collect()
	}

	#[test]
	fn toggle_flips_membership() {
		let mut selection = Selection::new();
		assert!(selection.toggle("a".into()));
		assert!(selection.is_selected(&"a".into()));
		assert!(!selection.toggle("a".into()));
		assert!(selection.is_empty());
	}

	#[test]
	fn select_all_twice_returns_to_empty() {
		let visible = keys(&["1", "2", "3"]);
		let mut selection = Selection::new();

		assert!(selection.select_all(&visible));
		assert_eq!(selection.len(), 3);
		assert_eq!(selection.state_for(&visible), SelectAllState::All);

		assert!(selection.select_all(&visible));
		assert!(selection.is_empty());
		assert_eq!(selection.state_for(&visible), SelectAllState::None);
	}

	#[test]
	fn partial_selection_is_completed_before_clearing() {
		let visible = keys(&["1", "2", "3"]);
		let mut selection = Selection::new();
		selection.toggle("2".into());
		assert_eq!(selection.state_for(&visible), SelectAllState::Some);

		selection.select_all(&visible);
		assert_eq!(selection.len(), 3);
	}

	#[test]
	fn select_all_with_nothing_visible_is_a_no_op() {
		let mut selection = Selection::new();
		selection.toggle("hidden".into());
		assert!(!selection.select_all(&Vec::<RecordKey>::new()));
		assert_eq!(selection.len(), 1);
	}

	#[test]
	fn retain_drops_keys_missing_from_the_new_set() {
		let mut selection = Selection::new();
		selection.select_all(&keys(&["1", "2", "3"]));
		let available: HashSet<RecordKey> = keys(&["2", "3", "4"]).into_iter().collect();
		assert!(selection.retain_available(&available));
		assert_eq!(
			selection.keys().cloned().collect::<Vec<_>>(),
			keys(&["2", "3"])
		);
		assert!(!selection.retain_available(&available));
	}

	#[test]
	fn selected_records_follow_source_order() {
		let records: Vec<Record> = (1..=4)
			.map(|id| Record::new().with("id", id).with("name", format!("user {id}")))
			.collect();
		let mut selection = Selection::new();
		selection.toggle("4".into());
		selection.toggle("2".into());

		let selected = selection.selected_records(&records, &KeyAccessor::default());
		assert_eq!(selected, vec![&records[1], &records[3]]);
	}
}
