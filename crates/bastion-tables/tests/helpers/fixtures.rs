//! Records and presenters shared by the scenarios

use super::service::InMemoryService;
use bastion_tables::{ActionBindings, CollectingNotifier, ResourceTablePresenter};
use bastion_types::{ColumnSpec, FieldSpec, FilterOption, FormSchema, JsonRecord};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn record(value: Value) -> JsonRecord {
	match value {
		Value::Object(map) => map,
		_ => JsonRecord::new(),
	}
}

/// `count` blacklist entries with ids starting at 1
pub fn records(count: u64) -> Vec<JsonRecord> {
	(1..=count)
		.map(|id| {
			record(json!({
				"id": id,
				"name": format!("host-{id:02}"),
				"ip": format!("10.0.0.{id}"),
				"type": if id % 2 == 0 { "server" } else { "workstation" },
				"is_active": id % 3 != 0,
			}))
		})
		.collect()
}

pub fn blacklist_columns() -> Vec<ColumnSpec<JsonRecord>> {
	vec![
		ColumnSpec::new("name", "Name").text_filter(),
		ColumnSpec::new("ip", "IP Address"),
		ColumnSpec::new("type", "Type").select_filter(vec![
			FilterOption::new("all", "All"),
			FilterOption::new("server", "Server"),
			FilterOption::new("workstation", "Workstation"),
		]),
		ColumnSpec::new("is_active", "Status").render(|value, _| {
			if value.as_bool().unwrap_or(false) {
				"Active".to_string()
			} else {
				"Inactive".to_string()
			}
		}),
	]
}

pub fn blacklist_schema() -> FormSchema {
	FormSchema::new(vec![
		FieldSpec::text("name", "Name").required(),
		FieldSpec::ip_address("ip", "IP Address").required(),
		FieldSpec::select(
			"type",
			"Type",
			vec![
				FilterOption::new("server", "Server"),
				FilterOption::new("workstation", "Workstation"),
			],
		),
		FieldSpec::boolean("is_active", "Active"),
	])
}

/// Presenter over `service` with every action bound
pub fn blacklist_presenter(
	service: &Arc<InMemoryService>,
	notifier: &Arc<CollectingNotifier>,
) -> ResourceTablePresenter<JsonRecord> {
	ResourceTablePresenter::<JsonRecord>::builder(service.clone())
		.resource_name("Blacklist IP")
		.columns(blacklist_columns())
		.form_schema(blacklist_schema())
		.bindings(ActionBindings::all())
		.notifier(notifier.clone())
		.build()
		.expect("valid columns")
}
