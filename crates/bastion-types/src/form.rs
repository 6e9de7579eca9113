//! Typed form schemas and drafts
//!
//! A [`FormSchema`] lists the fields a create/edit dialog renders. A [`Draft`] holds the
//! in-progress values for those fields. Seeding a draft from an existing record copies
//! exactly the declared fields, so unknown fields on the record never reach the payload.

use crate::column::{ColumnSpec, FilterKind, FilterOption};
use crate::record::{JsonRecord, TableRecord};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Kind of input a form field uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	/// Free text
	Text,
	/// Choice from a fixed option list
	Select(Vec<FilterOption>),
	/// Checkbox / toggle
	Boolean,
	/// Numeric input
	Number,
	/// IPv4 or IPv6 address
	IpAddress,
	/// Calendar date (`YYYY-MM-DD`)
	Date,
}

impl FieldKind {
	/// Whether values of this kind are edited as text
	pub fn is_textual(&self) -> bool {
		matches!(
			self,
			FieldKind::Text | FieldKind::Select(_) | FieldKind::IpAddress | FieldKind::Date
		)
	}
}

/// One field of a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
	/// Record field key
	pub key: String,
	/// Label shown next to the input and in validation messages
	pub label: String,
	/// Input kind
	pub kind: FieldKind,
	/// Whether a value must be provided before submission
	pub required: bool,
}

impl FieldSpec {
	/// Create an optional field
	pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
			kind,
			required: false,
		}
	}

	/// Optional text field
	pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(key, label, FieldKind::Text)
	}

	/// Optional boolean field
	pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(key, label, FieldKind::Boolean)
	}

	/// Optional numeric field
	pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(key, label, FieldKind::Number)
	}

	/// Optional IP address field
	pub fn ip_address(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(key, label, FieldKind::IpAddress)
	}

	/// Optional date field
	pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(key, label, FieldKind::Date)
	}

	/// Optional select field
	pub fn select(
		key: impl Into<String>,
		label: impl Into<String>,
		options: Vec<FilterOption>,
	) -> Self {
		Self::new(key, label, FieldKind::Select(options))
	}

	/// Mark the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

/// Ordered list of fields rendered by a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
	fields: Vec<FieldSpec>,
}

impl FormSchema {
	/// Create a schema from fields in display order
	pub fn new(fields: Vec<FieldSpec>) -> Self {
		Self { fields }
	}

	/// Derive a schema from a table's columns
	///
	/// Select filters become select fields, date filters become date fields and
	/// everything else is text. The `id` column is skipped.
	pub fn from_columns<T>(columns: &[ColumnSpec<T>]) -> Self {
		let fields = columns
			.iter()
			.filter(|column| column.key != "id")
			.map(|column| {
				let kind = match column.filter_kind {
					FilterKind::Select if column.filterable => {
						FieldKind::Select(column.filter_options.clone())
					}
					FilterKind::Date if column.filterable => FieldKind::Date,
					_ => FieldKind::Text,
				};
				FieldSpec::new(column.key.clone(), column.label.clone(), kind)
			})
			.collect();
		Self { fields }
	}

	/// Fields in display order
	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	/// Look up a field by key
	pub fn field(&self, key: &str) -> Option<&FieldSpec> {
		self.fields.iter().find(|field| field.key == key)
	}

	/// Whether the schema declares `key`
	pub fn contains(&self, key: &str) -> bool {
		self.field(key).is_some()
	}

	/// Whether the schema has no fields
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Value held by one draft field
#[derive(Debug, Clone, PartialEq)]
pub enum DraftValue {
	/// Text-like value (text, select, IP address, date)
	Text(String),
	/// Boolean value
	Bool(bool),
	/// Numeric value, `None` when left empty
	Number(Option<f64>),
}

impl DraftValue {
	/// Empty value for a field kind
	///
	/// Booleans default to `true`, matching the console's "enabled" convention.
	pub fn default_for(kind: &FieldKind) -> Self {
		match kind {
			FieldKind::Boolean => DraftValue::Bool(true),
			FieldKind::Number => DraftValue::Number(None),
			_ => DraftValue::Text(String::new()),
		}
	}

	/// Convert a record value into a draft value for `kind`
	///
	/// Returns `None` when the value cannot represent the kind (e.g. an object for a
	/// text field), in which case the caller substitutes the default.
	pub fn from_json(kind: &FieldKind, value: &Value) -> Option<Self> {
		match kind {
			FieldKind::Boolean => match value {
				Value::Bool(flag) => Some(DraftValue::Bool(*flag)),
				Value::String(text) if text.eq_ignore_ascii_case("true") => {
					Some(DraftValue::Bool(true))
				}
				Value::String(text) if text.eq_ignore_ascii_case("false") => {
					Some(DraftValue::Bool(false))
				}
				_ => None,
			},
			FieldKind::Number => match value {
				Value::Number(number) => Some(DraftValue::Number(number.as_f64())),
				Value::String(text) => Some(DraftValue::Number(text.trim().parse().ok())),
				Value::Null => Some(DraftValue::Number(None)),
				_ => None,
			},
			_ => match value {
				Value::String(text) => Some(DraftValue::Text(text.clone())),
				Value::Number(number) => Some(DraftValue::Text(number.to_string())),
				Value::Bool(flag) => Some(DraftValue::Text(flag.to_string())),
				Value::Null => Some(DraftValue::Text(String::new())),
				_ => None,
			},
		}
	}

	/// Text content, if this is a text value
	pub fn as_text(&self) -> Option<&str> {
		match self {
			DraftValue::Text(text) => Some(text),
			_ => None,
		}
	}

	/// JSON representation sent to the server
	pub fn to_json(&self) -> Value {
		match self {
			DraftValue::Text(text) => Value::String(text.clone()),
			DraftValue::Bool(flag) => Value::Bool(*flag),
			DraftValue::Number(None) => Value::Null,
			DraftValue::Number(Some(number)) => {
				if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
					Value::Number(Number::from(*number as i64))
				} else {
					Number::from_f64(*number).map_or(Value::Null, Value::Number)
				}
			}
		}
	}
}

impl From<&str> for DraftValue {
	fn from(value: &str) -> Self {
		DraftValue::Text(value.to_string())
	}
}

impl From<String> for DraftValue {
	fn from(value: String) -> Self {
		DraftValue::Text(value)
	}
}

impl From<bool> for DraftValue {
	fn from(value: bool) -> Self {
		DraftValue::Bool(value)
	}
}

impl From<f64> for DraftValue {
	fn from(value: f64) -> Self {
		DraftValue::Number(Some(value))
	}
}

/// In-progress values of a create or edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
	values: BTreeMap<String, DraftValue>,
}

impl Draft {
	/// An empty draft (create mode)
	pub fn new() -> Self {
		Self::default()
	}

	/// A draft holding the default value for every schema field
	pub fn blank(schema: &FormSchema) -> Self {
		let values = schema
			.fields()
			.iter()
			.map(|field| (field.key.clone(), DraftValue::default_for(&field.kind)))
			.collect();
		Self { values }
	}

	/// A draft copied from `record`, limited to the schema's fields
	///
	/// Fields absent on the record (or holding unusable values) get the kind's default.
	pub fn seeded<T: TableRecord>(schema: &FormSchema, record: &T) -> Self {
		let values = schema
			.fields()
			.iter()
			.map(|field| {
				let value = record
					.field(&field.key)
					.and_then(|value| DraftValue::from_json(&field.kind, &value))
					.unwrap_or_else(|| DraftValue::default_for(&field.kind));
				(field.key.clone(), value)
			})
			.collect();
		Self { values }
	}

	/// Value of a field
	pub fn get(&self, key: &str) -> Option<&DraftValue> {
		self.values.get(key)
	}

	/// Set a field value
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<DraftValue>) {
		self.values.insert(key.into(), value.into());
	}

	/// Remove a field value
	pub fn remove(&mut self, key: &str) -> Option<DraftValue> {
		self.values.remove(key)
	}

	/// Drop every value
	pub fn clear(&mut self) {
		self.values.clear();
	}

	/// Whether the draft holds no values
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Number of values held
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Iterate over `(key, value)` pairs in key order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &DraftValue)> {
		self.values.iter()
	}

	/// JSON object sent to create/update calls
	pub fn to_payload(&self) -> JsonRecord {
		self.values
			.iter()
			.map(|(key, value)| (key.clone(), value.to_json()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn ip_schema() -> FormSchema {
		FormSchema::new(vec![
			FieldSpec::ip_address("ip_public", "Public IP").required(),
			FieldSpec::ip_address("ip_local", "Local IP"),
			FieldSpec::select(
				"type",
				"Type",
				vec![FilterOption::new("server", "Server")],
			),
		])
	}

	fn row(value: Value) -> JsonRecord {
		value.as_object().cloned().unwrap()
	}

	#[rstest]
	fn seeded_draft_fills_absent_fields_with_empty_text() {
		// Arrange
		let record = row(json!({"id": "x", "ip_public": "1.2.3.4"}));

		// Act
		let draft = Draft::seeded(&ip_schema(), &record);

		// Assert
		assert_eq!(draft.len(), 3);
		assert_eq!(draft.get("ip_public"), Some(&DraftValue::from("1.2.3.4")));
		assert_eq!(draft.get("ip_local"), Some(&DraftValue::from("")));
		assert_eq!(draft.get("type"), Some(&DraftValue::from("")));
	}

	#[rstest]
	fn seeded_draft_drops_unknown_fields() {
		// Arrange
		let record = row(json!({"id": 1, "ip_public": "1.2.3.4", "owner": "ops"}));

		// Act
		let draft = Draft::seeded(&ip_schema(), &record);

		// Assert
		assert!(draft.get("owner").is_none());
		assert!(draft.get("id").is_none());
	}

	#[rstest]
	#[case(json!({}), true)]
	#[case(json!({"is_active": false}), false)]
	#[case(json!({"is_active": "false"}), false)]
	#[case(json!({"is_active": "TRUE"}), true)]
	#[case(json!({"is_active": null}), true)]
	fn boolean_fields_default_to_true(#[case] record: Value, #[case] expected: bool) {
		// Arrange
		let schema = FormSchema::new(vec![FieldSpec::boolean("is_active", "Active")]);

		// Act
		let draft = Draft::seeded(&schema, &row(record));

		// Assert
		assert_eq!(draft.get("is_active"), Some(&DraftValue::Bool(expected)));
	}

	#[rstest]
	fn number_fields_parse_strings_and_numbers() {
		// Arrange
		let schema = FormSchema::new(vec![
			FieldSpec::number("port", "Port"),
			FieldSpec::number("priority", "Priority"),
			FieldSpec::number("weight", "Weight"),
		]);
		let record = row(json!({"port": 443, "priority": "5"}));

		// Act
		let draft = Draft::seeded(&schema, &record);

		// Assert
		assert_eq!(draft.get("port"), Some(&DraftValue::Number(Some(443.0))));
		assert_eq!(draft.get("priority"), Some(&DraftValue::Number(Some(5.0))));
		assert_eq!(draft.get("weight"), Some(&DraftValue::Number(None)));
	}

	#[rstest]
	fn payload_serializes_typed_values() {
		// Arrange
		let mut draft = Draft::new();
		draft.set("name", "block-list");
		draft.set("is_active", false);
		draft.set("port", 8080.0);
		draft.set("ratio", 0.5);
		draft.set("limit", DraftValue::Number(None));

		// Act
		let payload = Value::Object(draft.to_payload());

		// Assert
		assert_eq!(
			payload,
			json!({
				"name": "block-list",
				"is_active": false,
				"port": 8080,
				"ratio": 0.5,
				"limit": null
			})
		);
	}

	#[rstest]
	fn schema_from_columns_maps_filter_kinds() {
		// Arrange
		let columns = vec![
			ColumnSpec::<JsonRecord>::new("id", "ID"),
			ColumnSpec::<JsonRecord>::new("name", "Name").text_filter(),
			ColumnSpec::<JsonRecord>::new("level", "Level")
				.select_filter(vec![FilterOption::new("high", "High")]),
			ColumnSpec::<JsonRecord>::new("seen_at", "Seen").date_filter(),
		];

		// Act
		let schema = FormSchema::from_columns(&columns);

		// Assert
		assert!(!schema.contains("id"));
		assert_eq!(schema.field("name").map(|f| &f.kind), Some(&FieldKind::Text));
		assert!(matches!(
			schema.field("level").map(|f| &f.kind),
			Some(FieldKind::Select(options)) if options.len() == 1
		));
		assert_eq!(schema.field("seen_at").map(|f| &f.kind), Some(&FieldKind::Date));
	}

	#[rstest]
	fn blank_draft_has_every_field() {
		// Act
		let draft = Draft::blank(&ip_schema());

		// Assert
		assert_eq!(draft.len(), 3);
		assert!(draft.iter().all(|(_, value)| value == &DraftValue::from("")));
	}
}
