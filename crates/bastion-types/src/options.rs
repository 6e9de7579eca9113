//! Per-table options

/// Default page size when not specified
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Pagination options for one table instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
	/// Items per page
	pub page_size: u64,
	/// Page loaded first (1-indexed)
	pub initial_page: u64,
}

impl TableOptions {
	/// Options with the default page size, starting at page 1
	pub fn new() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			initial_page: 1,
		}
	}

	/// Set the page size; zero falls back to [`DEFAULT_PAGE_SIZE`]
	pub fn with_page_size(mut self, page_size: u64) -> Self {
		self.page_size = if page_size == 0 {
			DEFAULT_PAGE_SIZE
		} else {
			page_size
		};
		self
	}

	/// Set the first page to load; zero is raised to one
	pub fn with_initial_page(mut self, page: u64) -> Self {
		self.initial_page = page.max(1);
		self
	}
}

impl Default for TableOptions {
	fn default() -> Self {
		Self::new()
	}
}
