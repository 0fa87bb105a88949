//! End-to-end behaviour of the public grid API.

use std::cell::RefCell;
use std::rc::Rc;

use datagrid::grid::{
	self, EMPTY_MESSAGE, GridView, RowAction, SelectAllState, SortDirection, ToolbarAction, to_csv,
};
use datagrid::types::parse_records;
use datagrid::{
	Column, DataGrid, ExportFormat, GridConfig, GridError, GridEvent, GridHandlers, GridModel,
	Record, SortSpec, ValueKind,
};

fn people() -> Vec<Record> {
	parse_records(
		r#"[
			{"id": 1, "name": "Carol", "age": 41, "city": "Lyon", "joined": "2021-06-01"},
			{"id": 2, "name": "alice", "age": 29, "city": "Paris", "joined": "2023-01-15"},
			{"id": 3, "name": "Bob", "age": 35, "city": "Lyon, FR", "joined": "2019-11-30"},
			{"id": 4, "name": "Dave", "age": null, "city": "Berlin", "joined": "not a date"},
			{"id": 5, "name": "Eve \"E\" Smith", "age": 29, "city": "Oslo", "joined": "2020-02-29"}
		]"#,
	)
	.expect("fixture parses")
}

fn columns() -> Vec<Column> {
	vec![
		Column::parse("name", "Name").unwrap().sortable(),
		Column::parse("age", "Age").unwrap().sortable().kind(ValueKind::Number),
		Column::parse("city", "City").unwrap(),
		Column::parse("joined", "Joined")
			.unwrap()
			.sortable()
			.kind(ValueKind::Date),
	]
}

fn names(rows: &[&Record]) -> Vec<String> {
	rows.iter()
		.map(|record| record.as_map()["name"].as_str().unwrap_or_default().to_string())
		.collect()
}

fn page_names(view: &GridView<'_>) -> Vec<String> {
	names(&view.page_rows())
}

#[test]
fn pages_partition_the_filtered_rows() {
	let records = people();
	let columns = columns();
	let all = grid::view(&records, &columns, "", None, 0, 2).unwrap();
	assert_eq!(all.total_pages(), 3);

	let mut seen = Vec::new();
	for page in 0..all.total_pages() {
		let view = grid::view(&records, &columns, "", None, page, 2).unwrap();
		assert!(view.page_rows().len() <= 2);
		seen.extend(page_names(&view));
	}
	assert_eq!(seen, names(&all.filtered_rows()));
}

#[test]
fn out_of_range_pages_are_clamped() {
	let records = people();
	let view = grid::view(&records, &columns(), "", None, 99, 2).unwrap();
	assert_eq!(view.page_index(), 2);
	assert_eq!(page_names(&view), vec!["Eve \"E\" Smith"]);
	assert_eq!(view.range(), Some((5, 5)));

	let empty = grid::view(&records, &columns(), "zzz", None, 3, 2).unwrap();
	assert_eq!(empty.total_pages(), 0);
	assert_eq!(empty.page_index(), 0);
	assert!(empty.page_rows().is_empty());
}

#[test]
fn zero_page_size_is_a_configuration_error() {
	let records = people();
	let err = grid::view(&records, &columns(), "", None, 0, 0).unwrap_err();
	assert!(matches!(err, GridError::InvalidConfiguration { .. }));
}

#[test]
fn filtering_is_case_insensitive_and_ignores_surrounding_whitespace() {
	let records = people();
	let view = grid::view(&records, &columns(), "  LYON ", None, 0, 10).unwrap();
	assert_eq!(page_names(&view), vec!["Carol", "Bob"]);

	let blank = grid::view(&records, &columns(), "   ", None, 0, 10).unwrap();
	assert_eq!(blank.filtered_count(), 5);
}

#[test]
fn numeric_sort_puts_missing_values_first_and_keeps_ties_stable() {
	let records = people();
	let asc = SortSpec::asc("age".parse().unwrap());
	let view = grid::view(&records, &columns(), "", Some(&asc), 0, 10).unwrap();
	assert_eq!(
		page_names(&view),
		vec!["Dave", "alice", "Eve \"E\" Smith", "Bob", "Carol"]
	);

	let desc = SortSpec::desc("age".parse().unwrap());
	let view = grid::view(&records, &columns(), "", Some(&desc), 0, 10).unwrap();
	assert_eq!(
		page_names(&view),
		vec!["Carol", "Bob", "alice", "Eve \"E\" Smith", "Dave"]
	);
}

#[test]
fn text_and_date_sorts_follow_their_kind() {
	let records = people();
	let by_name = SortSpec::asc("name".parse().unwrap());
	let view = grid::view(&records, &columns(), "", Some(&by_name), 0, 10).unwrap();
	assert_eq!(
		page_names(&view),
		vec!["alice", "Bob", "Carol", "Dave", "Eve \"E\" Smith"]
	);

	let by_date = SortSpec::asc("joined".parse().unwrap());
	let view = grid::view(&records, &columns(), "", Some(&by_date), 0, 10).unwrap();
	assert_eq!(
		page_names(&view),
		vec!["Bob", "Eve \"E\" Smith", "Carol", "alice", "Dave"]
	);
}

#[test]
fn sorting_by_an_unsortable_column_is_rejected() {
	let records = people();
	let by_city = SortSpec::asc("city".parse().unwrap());
	let err = grid::view(&records, &columns(), "", Some(&by_city), 0, 10).unwrap_err();
	assert!(matches!(err, GridError::InvalidConfiguration { .. }));
}

#[test]
fn csv_export_round_trips_through_a_reader() {
	let records = people();
	let rows: Vec<&Record> = records.iter().collect();
	let csv_text = to_csv(&rows, &columns()).unwrap();

	let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
	let headers: Vec<String> = reader
		.headers()
		.unwrap()
		.iter()
		.map(str::to_string)
		.collect();
	assert_eq!(headers, vec!["Name", "Age", "City", "Joined"]);

	let parsed: Vec<Vec<String>> = reader
		.records()
		.map(|row| row.unwrap().iter().map(str::to_string).collect())
		.collect();
	assert_eq!(parsed.len(), records.len());
	assert_eq!(parsed[2], vec!["Bob", "35", "Lyon, FR", "2019-11-30"]);
	assert_eq!(parsed[3][1], "");
	assert_eq!(parsed[4][0], "Eve \"E\" Smith");
}

#[test]
fn shell_export_ignores_pagination_but_honours_filter_and_sort() {
	let grid = DataGrid::new(columns(), GridConfig {
		page_size: 1,
		..GridConfig::titled("Team  Roster")
	})
	.unwrap()
	.with_records(people())
	.with_filter("lyon")
	.with_sort(SortSpec::desc("name".parse().unwrap()))
	.unwrap();

	let export = grid.export(ExportFormat::Csv).unwrap();
	assert_eq!(export.file_name, "Team_Roster_data.csv");
	assert_eq!(export.row_count, 2);
	assert_eq!(
		export.content,
		"Name,Age,City,Joined\nCarol,41,Lyon,2021-06-01\nBob,35,\"Lyon, FR\",2019-11-30\n"
	);
}

#[test]
fn selection_survives_paging_and_filtering() {
	let selected = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&selected);
	let mut grid = DataGrid::new(columns(), GridConfig {
		page_size: 2,
		..GridConfig::default()
	})
	.unwrap()
	.with_records(people())
	.with_handlers(GridHandlers::new().on_selection_change(move |records: &[&Record]| {
		*sink.borrow_mut() = names(records);
	}));

	assert!(grid.dispatch(GridEvent::ToggleRow(0)));
	assert!(grid.dispatch(GridEvent::NextPage));
	assert!(grid.dispatch(GridEvent::ToggleRow(1)));
	assert_eq!(*selected.borrow(), vec!["Carol", "Dave"]);

	assert!(grid.dispatch(GridEvent::SetFilter("lyon".into())));
	assert_eq!(grid.page_index(), 0);
	assert_eq!(grid.selection().len(), 2);

	let GridModel::Ready(model) = grid.render_model() else {
		panic!("grid should be ready");
	};
	assert_eq!(model.select_all, SelectAllState::Some);
	let footer = model.footer.expect("footer is shown by default");
	assert_eq!(footer.summary, "2 rows selected");
	assert_eq!(footer.range_label, "Showing 1 to 2 of 2 results");
}

#[test]
fn row_actions_and_toolbar_follow_the_handlers() {
	let clicks = Rc::new(RefCell::new(0));
	let views = Rc::new(RefCell::new(Vec::new()));
	let click_counter = Rc::clone(&clicks);
	let viewed = Rc::clone(&views);

	let mut grid = DataGrid::new(columns(), GridConfig::default())
		.unwrap()
		.with_records(people())
		.with_handlers(
			GridHandlers::new()
				.on_row_click(move |_: &Record| *click_counter.borrow_mut() += 1)
				.on_view(move |record: &Record| viewed.borrow_mut().push(names(&[record])))
				.on_add_new(|| {}),
		);

	assert_eq!(grid.row_actions(), vec![RowAction::View]);
	assert_eq!(
		grid.toolbar_actions(),
		vec![ToolbarAction::AddNew, ToolbarAction::Export]
	);

	assert!(grid.dispatch(GridEvent::Action(RowAction::View, 1)));
	assert!(!grid.dispatch(GridEvent::Action(RowAction::Delete, 1)));
	assert_eq!(*clicks.borrow(), 0);
	assert!(grid.dispatch(GridEvent::ClickRow(0)));
	assert_eq!(*clicks.borrow(), 1);
	assert_eq!(*views.borrow(), vec![vec!["alice".to_string()]]);
}

#[test]
fn sort_headers_cycle_and_loading_blocks_events() {
	let mut grid = DataGrid::new(columns(), GridConfig::default())
		.unwrap()
		.with_records(people());
	let name = "name".parse().unwrap();

	assert!(grid.dispatch(GridEvent::ToggleSort(name)));
	let GridModel::Ready(model) = grid.render_model() else {
		panic!("grid should be ready");
	};
	assert_eq!(model.headers[0].sort, Some(SortDirection::Asc));
	assert_eq!(model.headers[0].display_label(), "Name ▲");

	grid.set_loading(true);
	assert!(!grid.dispatch(GridEvent::ToggleRow(0)));
	let GridModel::Loading(loading) = grid.render_model() else {
		panic!("grid should be loading");
	};
	assert_eq!(loading.skeleton_rows, 5);
	assert!(grid.selection().is_empty());
}

#[test]
fn refreshed_records_reconcile_the_selection() {
	let mut grid = DataGrid::new(columns(), GridConfig::default())
		.unwrap()
		.with_records(people());
	grid.dispatch(GridEvent::ToggleAll);
	assert_eq!(grid.selection().len(), 5);

	let remaining: Vec<Record> = people().into_iter().take(2).collect();
	grid.refresh_records(remaining);
	assert_eq!(grid.selection().len(), 2);

	grid.replace_records(Vec::new());
	assert!(grid.selection().is_empty());
	let GridModel::Ready(model) = grid.render_model() else {
		panic!("grid should be ready");
	};
	assert_eq!(model.empty_message(), Some(EMPTY_MESSAGE));
	assert_eq!(model.footer.unwrap().page_label, "No pages");
}
