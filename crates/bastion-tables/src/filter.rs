//! Search and filter state
//!
//! [`FilterState`] holds the raw search term and filter values as the user entered them.
//! Sentinel values are kept as-is; [`normalize_filters`] strips them when query
//! parameters are built. For tables that filter locally, [`filter_records`] applies the
//! same term and filters to an in-memory page.

use bastion_types::{ALL_SENTINEL, FilterSet, QueryParams, TableRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameter carrying the search term unless a table overrides it
pub const DEFAULT_SEARCH_PARAM: &str = "search";

/// Free-text search term plus per-column filter values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
	/// Search term, empty when no search is active
	pub search_term: String,
	/// Filter values by column key
	pub filters: FilterSet,
}

impl FilterState {
	/// Empty search and no filters
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the search term
	pub fn set_search_term(&mut self, term: impl Into<String>) {
		self.search_term = term.into();
	}

	/// Set one filter, leaving every other key untouched
	pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.filters.insert(key.into(), value.into());
	}

	/// Remove one filter
	pub fn clear_filter(&mut self, key: &str) -> Option<String> {
		self.filters.remove(key)
	}

	/// Clear the search term and every filter in one step
	pub fn reset_all(&mut self) {
		*self = Self::default();
	}

	/// Whether neither a search term nor a constraining filter is set
	pub fn is_empty(&self) -> bool {
		self.search_term.is_empty() && normalize_filters(&self.filters).is_empty()
	}

	/// Value of one filter as entered
	pub fn filter(&self, key: &str) -> Option<&str> {
		self.filters.get(key).map(String::as_str)
	}

	/// Query parameters for a server-side list call
	///
	/// Filters are normalized first; the search term is sent under `search_param` when
	/// it is non-empty.
	pub fn query_params(&self, search_param: &str) -> QueryParams {
		let mut params = normalize_filters(&self.filters);
		if !self.search_term.is_empty() {
			params.insert(search_param.to_string(), self.search_term.clone());
		}
		params
	}
}

/// Whether a filter value means "no constraint"
pub fn is_unconstrained(value: &str) -> bool {
	value.is_empty() || value == ALL_SENTINEL
}

/// Drop filter entries whose value is the sentinel `"all"` or empty
pub fn normalize_filters(filters: &FilterSet) -> FilterSet {
	filters
		.iter()
		.filter(|(_, value)| !is_unconstrained(value))
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect()
}

/// Apply a search term and filters to records in memory
///
/// A record passes the search when its `search_key` field contains the term,
/// ignoring case; records without that field are dropped. An empty term keeps every
/// record. Each constraining filter must then match per [`matches_filter`].
pub fn filter_records<T: TableRecord>(
	records: &[T],
	search_key: &str,
	search_term: &str,
	filters: &FilterSet,
) -> Vec<T> {
	let term = search_term.to_lowercase();
	let active = normalize_filters(filters);
	records
		.iter()
		.filter(|record| term.is_empty() || matches_search(record.field(search_key).as_ref(), &term))
		.filter(|record| {
			active
				.iter()
				.all(|(key, value)| matches_filter(record.field(key).as_ref(), value))
		})
		.cloned()
		.collect()
}

fn matches_search(field: Option<&Value>, lowered_term: &str) -> bool {
	match field {
		Some(Value::String(text)) => text.to_lowercase().contains(lowered_term),
		Some(Value::Number(number)) => number.to_string().contains(lowered_term),
		Some(Value::Bool(flag)) => flag.to_string().contains(lowered_term),
		_ => false,
	}
}

/// Match one field value against a filter value
///
/// - strings: case-insensitive substring
/// - booleans: the filter reads `"true"` or `"false"`, ignoring case
/// - numbers: the filter parses to an equal number
/// - null or absent: never match
/// - arrays and objects: the filter equals their JSON text
pub fn matches_filter(field: Option<&Value>, filter: &str) -> bool {
	match field {
		None | Some(Value::Null) => false,
		Some(Value::String(text)) => text.to_lowercase().contains(&filter.to_lowercase()),
		Some(Value::Bool(flag)) => filter
			.trim()
			.eq_ignore_ascii_case(if *flag { "true" } else { "false" }),
		Some(Value::Number(number)) => match (number.as_f64(), filter.trim().parse::<f64>()) {
			(Some(left), Ok(right)) => left == right,
			_ => false,
		},
		Some(other) => other.to_string() == filter,
	}
}
