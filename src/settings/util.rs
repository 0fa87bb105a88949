use std::collections::HashSet;

/// Trim entries, drop empty ones and remove duplicates while keeping order.
pub(super) fn sanitize_list(values: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	values
		.into_iter()
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty() && seen.insert(value.clone()))
		.collect()
}

/// Treat blank strings the same as unset values.
pub(super) fn non_blank(value: Option<String>) -> Option<String> {
	value
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lists_are_trimmed_and_deduplicated() {
		let cleaned = sanitize_list(vec![
			" name ".into(),
			"".into(),
			"email".into(),
			"name".into(),
		]);
		assert_eq!(cleaned, vec!["name", "email"]);
	}

	#[test]
	fn blank_values_are_unset() {
		assert_eq!(non_blank(Some("  ".into())), None);
		assert_eq!(non_blank(Some(" Users ".into())), Some("Users".into()));
		assert_eq!(non_blank(None), None);
	}
}
