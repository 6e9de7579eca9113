//! Record identifiers and field access

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Dynamic record as returned by JSON list endpoints
pub type JsonRecord = serde_json::Map<String, Value>;

/// Identifier of a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	/// Numeric primary key
	Int(i64),
	/// String key (UUIDs, slugs, object ids)
	Text(String),
}

impl RecordId {
	/// Extract an identifier from a JSON value
	///
	/// Integers and non-blank strings are identifiers; everything else is not.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Number(number) => number.as_i64().map(RecordId::Int),
			Value::String(text) if !text.trim().is_empty() => Some(RecordId::Text(text.clone())),
			_ => None,
		}
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RecordId::Int(id) => write!(f, "{id}"),
			RecordId::Text(id) => write!(f, "{id}"),
		}
	}
}

impl From<i64> for RecordId {
	fn from(value: i64) -> Self {
		RecordId::Int(value)
	}
}

impl From<&str> for RecordId {
	fn from(value: &str) -> Self {
		RecordId::Text(value.to_string())
	}
}

impl From<String> for RecordId {
	fn from(value: String) -> Self {
		RecordId::Text(value)
	}
}

/// Field-level access to a record shown in a resource table
///
/// Implemented for [`JsonRecord`]; typed resources implement it to expose
/// their fields by column key.
pub trait TableRecord: Clone + Send + Sync + 'static {
	/// The record's identifier, if it has a resolvable one
	fn id(&self) -> Option<RecordId>;

	/// Value of a field by key, `None` when absent
	fn field(&self, key: &str) -> Option<Value>;

	/// Human-readable name used for duplicates and confirmation prompts
	fn display_name(&self) -> Option<String> {
		match self.field("name") {
			Some(Value::String(name)) if !name.is_empty() => Some(name),
			_ => None,
		}
	}
}

impl TableRecord for JsonRecord {
	fn id(&self) -> Option<RecordId> {
		self.get("id").and_then(RecordId::from_value)
	}

	fn field(&self, key: &str) -> Option<Value> {
		self.get(key).cloned()
	}
}
