//! Page requests and results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter value meaning "no constraint"
pub const ALL_SENTINEL: &str = "all";

/// Raw filter selections keyed by column key
pub type FilterSet = BTreeMap<String, String>;

/// Extra query parameters forwarded to a list call
pub type QueryParams = BTreeMap<String, String>;

/// A single filter constraint sent with a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	/// Text constraint
	Text(String),
	/// Boolean constraint
	Flag(bool),
}

impl FilterValue {
	/// Parse a raw query value; `"true"` and `"false"` become flags
	pub fn parse(raw: &str) -> Self {
		match raw {
			"true" => FilterValue::Flag(true),
			"false" => FilterValue::Flag(false),
			_ => FilterValue::Text(raw.to_string()),
		}
	}

	/// Render the value as a query string value
	pub fn as_query_value(&self) -> String {
		match self {
			FilterValue::Text(text) => text.clone(),
			FilterValue::Flag(flag) => flag.to_string(),
		}
	}
}

/// Parameters for fetching one page of a resource
///
/// Built fresh for every fetch; absent filters are simply not present in `filters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
	/// Page number (1-indexed)
	pub page_number: u64,
	/// Items per page
	pub page_size: u64,
	/// Active filter constraints
	pub filters: BTreeMap<String, FilterValue>,
}

impl PageRequest {
	/// Create a request without filters
	///
	/// A page number of zero is raised to one.
	pub fn new(page_number: u64, page_size: u64) -> Self {
		Self {
			page_number: page_number.max(1),
			page_size,
			filters: BTreeMap::new(),
		}
	}

	/// Add a filter constraint
	pub fn with_filter(mut self, key: impl Into<String>, value: FilterValue) -> Self {
		self.filters.insert(key.into(), value);
		self
	}

	/// Build a request from already-normalized query parameters
	///
	/// Boolean values are carried as [`FilterValue::Flag`].
	pub fn from_params(page_number: u64, page_size: u64, params: &QueryParams) -> Self {
		let filters = params
			.iter()
			.map(|(key, value)| (key.clone(), FilterValue::parse(value)))
			.collect();
		Self {
			page_number: page_number.max(1),
			page_size,
			filters,
		}
	}

	/// Query string pairs, pagination first
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = vec![
			("page".to_string(), self.page_number.to_string()),
			("page_size".to_string(), self.page_size.to_string()),
		];
		pairs.extend(
			self.filters
				.iter()
				.map(|(key, value)| (key.clone(), value.as_query_value())),
		);
		pairs
	}
}

/// One page of results
///
/// `total_count` counts matches across all pages, not just `items`.
/// Deserializes both the `{items, totalCount}` envelope and the
/// `{results, count}` shape used by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
	/// Items on this page
	#[serde(alias = "results")]
	pub items: Vec<T>,
	/// Total count across all pages
	#[serde(alias = "count", alias = "total_count")]
	pub total_count: u64,
}

impl<T> PageResult<T> {
	/// Create a page result
	pub fn new(items: Vec<T>, total_count: u64) -> Self {
		Self { items, total_count }
	}

	/// An empty result with a zero count
	pub fn empty() -> Self {
		Self {
			items: Vec::new(),
			total_count: 0,
		}
	}

	/// Number of pages at the given page size
	pub fn total_pages(&self, page_size: u64) -> u64 {
		total_pages(self.total_count, page_size)
	}
}

impl<T> Default for PageResult<T> {
	fn default() -> Self {
		Self::empty()
	}
}

/// `ceil(total_count / page_size)`; zero when either is zero
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
	if page_size == 0 || total_count == 0 {
		0
	} else {
		total_count.div_ceil(page_size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(0, 10, 0)]
	#[case(1, 10, 1)]
	#[case(10, 10, 1)]
	#[case(11, 10, 2)]
	#[case(23, 10, 3)]
	#[case(5, 0, 0)]
	fn total_pages_rounds_up(#[case] total: u64, #[case] size: u64, #[case] expected: u64) {
		// Act & Assert
		assert_eq!(total_pages(total, size), expected);
	}

	#[rstest]
	fn query_pairs_put_pagination_first() {
		// Arrange
		let request = PageRequest::new(2, 25)
			.with_filter("status", FilterValue::Text("blocked".to_string()))
			.with_filter("is_active", FilterValue::Flag(true));

		// Act
		let pairs = request.query_pairs();

		// Assert
		assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
		assert_eq!(pairs[1], ("page_size".to_string(), "25".to_string()));
		assert!(pairs.contains(&("is_active".to_string(), "true".to_string())));
		assert!(pairs.contains(&("status".to_string(), "blocked".to_string())));
	}

	#[rstest]
	fn boolean_params_become_flags() {
		// Arrange
		let params: QueryParams = [
			("is_active".to_string(), "false".to_string()),
			("search".to_string(), "True".to_string()),
		]
		.into_iter()
		.collect();

		// Act
		let request = PageRequest::from_params(1, 10, &params);

		// Assert
		assert_eq!(request.filters["is_active"], FilterValue::Flag(false));
		assert_eq!(request.filters["search"], FilterValue::Text("True".to_string()));
		assert_eq!(
			serde_json::to_value(&request).unwrap()["filters"],
			json!({"is_active": false, "search": "True"})
		);
		assert!(
			request
				.query_pairs()
				.contains(&("is_active".to_string(), "false".to_string()))
		);
	}

	#[rstest]
	fn page_number_zero_is_raised_to_one() {
		// Act
		let request = PageRequest::new(0, 10);

		// Assert
		assert_eq!(request.page_number, 1);
	}

	#[rstest]
	fn result_accepts_both_envelopes() {
		// Arrange
		let camel = json!({"items": [1, 2], "totalCount": 12});
		let drf = json!({"results": [3], "count": 7});

		// Act
		let camel: PageResult<u32> = serde_json::from_value(camel).unwrap();
		let drf: PageResult<u32> = serde_json::from_value(drf).unwrap();

		// Assert
		assert_eq!(camel, PageResult::new(vec![1, 2], 12));
		assert_eq!(drf, PageResult::new(vec![3], 7));
	}
}
