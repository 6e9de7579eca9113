//! Column schema for resource tables
//!
//! A table is described by an ordered list of [`ColumnSpec`]s. Each column names the
//! record field it displays, an optional renderer, and an optional filter descriptor
//! used by the advanced filter panel.

use crate::record::TableRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Renders a cell from the field value and the whole record
pub type CellRenderer<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// Kind of filter control a column offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
	/// Free text input
	#[default]
	Text,
	/// Choice from a fixed option list
	Select,
	/// Date picker (`YYYY-MM-DD`)
	Date,
}

/// One choice offered by a select filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
	/// Value sent to the server
	pub value: String,
	/// Label shown to the user
	pub label: String,
}

impl FilterOption {
	/// Create a filter option
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Errors in a column schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	/// Two columns share a key
	#[error("Duplicate column key '{0}'")]
	DuplicateKey(String),

	/// A select filter has no options
	#[error("Select filter on column '{0}' has no options")]
	EmptySelectOptions(String),
}

/// Column definition
pub struct ColumnSpec<T> {
	/// Field key (unique within a table)
	pub key: String,
	/// Header label
	pub label: String,
	/// Optional cell renderer
	pub render: Option<CellRenderer<T>>,
	/// Whether the column offers a filter control
	pub filterable: bool,
	/// Kind of filter control
	pub filter_kind: FilterKind,
	/// Options for select filters
	pub filter_options: Vec<FilterOption>,
}

impl<T> ColumnSpec<T> {
	/// Create a plain, non-filterable column
	pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
			render: None,
			filterable: false,
			filter_kind: FilterKind::Text,
			filter_options: Vec::new(),
		}
	}

	/// Set a cell renderer
	pub fn render<F>(mut self, render: F) -> Self
	where
		F: Fn(&Value, &T) -> String + Send + Sync + 'static,
	{
		self.render = Some(Arc::new(render));
		self
	}

	/// Offer a free-text filter
	pub fn text_filter(mut self) -> Self {
		self.filterable = true;
		self.filter_kind = FilterKind::Text;
		self
	}

	/// Offer a select filter with the given options
	pub fn select_filter(mut self, options: Vec<FilterOption>) -> Self {
		self.filterable = true;
		self.filter_kind = FilterKind::Select;
		self.filter_options = options;
		self
	}

	/// Offer a date filter
	pub fn date_filter(mut self) -> Self {
		self.filterable = true;
		self.filter_kind = FilterKind::Date;
		self
	}

	/// Check the column's own invariants
	pub fn validate(&self) -> Result<(), SchemaError> {
		if self.filterable
			&& self.filter_kind == FilterKind::Select
			&& self.filter_options.is_empty()
		{
			return Err(SchemaError::EmptySelectOptions(self.key.clone()));
		}
		Ok(())
	}
}

impl<T: TableRecord> ColumnSpec<T> {
	/// Display text for this column's cell in `record`
	pub fn display(&self, record: &T) -> String {
		let value = record.field(&self.key).unwrap_or(Value::Null);
		match &self.render {
			Some(render) => render(&value, record),
			None => display_value(&value),
		}
	}
}

impl<T> Clone for ColumnSpec<T> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			label: self.label.clone(),
			render: self.render.clone(),
			filterable: self.filterable,
			filter_kind: self.filter_kind,
			filter_options: self.filter_options.clone(),
		}
	}
}

impl<T> fmt::Debug for ColumnSpec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnSpec")
			.field("key", &self.key)
			.field("label", &self.label)
			.field("render", &self.render.is_some())
			.field("filterable", &self.filterable)
			.field("filter_kind", &self.filter_kind)
			.field("filter_options", &self.filter_options)
			.finish()
	}
}

/// Validate a whole column list: unique keys and per-column invariants
pub fn validate_columns<T>(columns: &[ColumnSpec<T>]) -> Result<(), SchemaError> {
	let mut seen = HashSet::new();
	for column in columns {
		if !seen.insert(column.key.as_str()) {
			return Err(SchemaError::DuplicateKey(column.key.clone()));
		}
		column.validate()?;
	}
	Ok(())
}

fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record::JsonRecord;
	use rstest::rstest;
	use serde_json::json;

	fn row(value: Value) -> JsonRecord {
		value.as_object().cloned().unwrap()
	}

	#[rstest]
	fn display_uses_renderer_when_present() {
		// Arrange
		let column = ColumnSpec::<JsonRecord>::new("is_active", "Active").render(|value, _| {
			if value.as_bool().unwrap_or(false) {
				"Yes".to_string()
			} else {
				"No".to_string()
			}
		});
		let record = row(json!({"is_active": true}));

		// Act & Assert
		assert_eq!(column.display(&record), "Yes");
	}

	#[rstest]
	#[case(json!({"ip": "10.0.0.1"}), "10.0.0.1")]
	#[case(json!({"ip": 17}), "17")]
	#[case(json!({"ip": null}), "")]
	#[case(json!({}), "")]
	fn display_without_renderer(#[case] value: Value, #[case] expected: &str) {
		// Arrange
		let column = ColumnSpec::<JsonRecord>::new("ip", "IP");

		// Act & Assert
		assert_eq!(column.display(&row(value)), expected);
	}

	#[rstest]
	fn select_filter_requires_options() {
		// Arrange
		let column = ColumnSpec::<JsonRecord>::new("status", "Status").select_filter(vec![]);

		// Act & Assert
		assert_eq!(
			column.validate(),
			Err(SchemaError::EmptySelectOptions("status".to_string()))
		);
	}

	#[rstest]
	fn duplicate_keys_are_rejected() {
		// Arrange
		let columns = vec![
			ColumnSpec::<JsonRecord>::new("name", "Name"),
			ColumnSpec::<JsonRecord>::new("name", "Other"),
		];

		// Act & Assert
		assert_eq!(
			validate_columns(&columns),
			Err(SchemaError::DuplicateKey("name".to_string()))
		);
	}

	#[rstest]
	fn valid_schema_passes() {
		// Arrange
		let columns = vec![
			ColumnSpec::<JsonRecord>::new("name", "Name").text_filter(),
			ColumnSpec::<JsonRecord>::new("type", "Type")
				.select_filter(vec![FilterOption::new("public", "Public")]),
			ColumnSpec::<JsonRecord>::new("created_at", "Created").date_filter(),
		];

		// Act & Assert
		assert!(validate_columns(&columns).is_ok());
	}
}
