use std::time::Duration;

use datagrid::context::{
	AppContext, ContextOptions, FilePreferenceStore, MemoryPreferenceStore, Preferences,
};
use datagrid::logging::{EventLogOptions, LogLevel, MemorySink};
use datagrid::theme::ThemePreference;
use serde_json::json;
use tempfile::tempdir;

fn batched(sink: &MemorySink, batch_size: usize) -> ContextOptions {
	ContextOptions::new(sink.clone()).log_options(EventLogOptions {
		batch_size,
		flush_interval: Duration::from_secs(3600),
	})
}

#[test]
fn teardown_flushes_the_log_and_persists_the_theme() {
	let sink = MemorySink::new();
	let store = MemoryPreferenceStore::new(Preferences {
		theme: ThemePreference::Light,
	});

	let mut context = AppContext::init(batched(&sink, 50), store.clone());
	assert_eq!(context.theme_preference(), &ThemePreference::Light);

	context.toggle_theme();
	context
		.event_log()
		.track_event("page_change", Some(json!({ "page": 2 })));
	assert!(sink.entries().is_empty());

	context.teardown().unwrap();
	assert!(context.is_torn_down());
	assert_eq!(store.snapshot().theme, ThemePreference::Dark);

	let entries = sink.entries();
	let messages: Vec<&str> = entries.iter().map(|entry| entry.message.as_str()).collect();
	assert_eq!(
		messages,
		vec![
			"Session started",
			"Event: theme_change",
			"Event: page_change",
			"Session ended"
		]
	);
	let session = context.session_id().as_str();
	assert!(entries.iter().all(|entry| entry.session_id == session));
	assert_eq!(sink.batches(), 1);

	context.teardown().unwrap();
	assert_eq!(sink.batches(), 1);
}

#[test]
fn warnings_bypass_batching() {
	let sink = MemorySink::new();
	let mut context = AppContext::init(batched(&sink, 50), MemoryPreferenceStore::default());

	context.event_log().info("queued", None);
	assert!(sink.entries().is_empty());

	context.event_log().warn("export failed", Some(json!({ "rows": 0 })));
	let entries = sink.entries();
	assert_eq!(entries.len(), 3);
	assert_eq!(entries[2].level, LogLevel::Warn);
	assert_eq!(entries[2].data, Some(json!({ "rows": 0 })));
}

#[test]
fn theme_overrides_apply_to_one_run_only() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("prefs").join("preferences.json");

	let mut first = AppContext::init(
		ContextOptions::new(MemorySink::new()),
		FilePreferenceStore::new(&path),
	);
	first.toggle_theme();
	let chosen = first.theme_preference().clone();
	first.teardown().unwrap();
	assert!(path.exists());

	let mut overridden = AppContext::init(
		ContextOptions::new(MemorySink::new())
			.theme_override(Some(ThemePreference::Named("slate".into()))),
		FilePreferenceStore::new(&path),
	);
	assert_eq!(overridden.theme_preference().as_str(), "slate");
	overridden.teardown().unwrap();

	let reopened = AppContext::init(
		ContextOptions::new(MemorySink::new()),
		FilePreferenceStore::new(&path),
	);
	assert_eq!(reopened.theme_preference(), &chosen);
}

#[test]
fn malformed_preferences_fall_back_to_defaults() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("preferences.json");
	std::fs::write(&path, "{ not json").unwrap();

	let context = AppContext::init(
		ContextOptions::new(MemorySink::new()),
		FilePreferenceStore::new(&path),
	);
	assert_eq!(context.theme_preference(), &ThemePreference::System);
}
