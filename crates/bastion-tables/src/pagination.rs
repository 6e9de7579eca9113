//! Server-paginated data source
//!
//! [`PaginatedDataSource`] tracks the current page, page size, loading and error state of
//! one table, and re-fetches whenever the page, the page size or its dependencies change.
//! A dependency change resets the page to 1 before the fetch is issued.
//!
//! Every fetch is stamped with a sequence number. Only the response of the most recently
//! issued fetch is applied; responses that resolve late are discarded, so a slow request
//! can never overwrite the result of a newer one. A fetch whose future is dropped before
//! it resolves leaves the source as it was before that fetch was requested.
//!
//! ## Example
//!
//! ```
//! use bastion_tables::pagination::{FetchFuture, PaginatedDataSource};
//! use bastion_types::{PageResult, TableOptions};
//! use futures::FutureExt;
//!
//! # futures::executor::block_on(async {
//! let source = PaginatedDataSource::new(
//!     |page: u64, _size: u64, _deps: &String| -> FetchFuture<u64> {
//!         async move { Ok(PageResult::new(vec![page], 23)) }.boxed()
//!     },
//!     String::new(),
//!     TableOptions::default(),
//! );
//! source.refresh().await;
//! assert_eq!(source.total_pages(), 3);
//! # });
//! ```

use crate::error::ServiceError;
use bastion_types::{PageResult, TableOptions, total_pages};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Future returned by a page fetcher
pub type FetchFuture<T> = BoxFuture<'static, Result<PageResult<T>, ServiceError>>;

/// Fetches one page given the page number, page size and dependency values
pub trait PageFetcher<T, P>: Send + Sync {
	/// Start fetching a page
	fn fetch(&self, page: u64, page_size: u64, dependencies: &P) -> FetchFuture<T>;
}

impl<T, P, F> PageFetcher<T, P> for F
where
	F: Fn(u64, u64, &P) -> FetchFuture<T> + Send + Sync,
{
	fn fetch(&self, page: u64, page_size: u64, dependencies: &P) -> FetchFuture<T> {
		self(page, page_size, dependencies)
	}
}

/// How a fetch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
	/// The response was applied
	Applied,
	/// The fetch failed; state now holds the error and no items
	Failed(ServiceError),
	/// A newer fetch was issued meanwhile; the response was discarded
	Stale,
}

/// Point-in-time copy of a data source's observable state
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot<T> {
	/// Items of the current page
	pub items: Vec<T>,
	/// Current page (1-indexed)
	pub current_page: u64,
	/// Items per page
	pub page_size: u64,
	/// Count across all pages
	pub total_count: u64,
	/// `ceil(total_count / page_size)`
	pub total_pages: u64,
	/// Whether the latest fetch is still in flight
	pub is_loading: bool,
	/// Failure of the latest completed fetch
	pub error: Option<ServiceError>,
}

struct SourceState<T, P> {
	items: Vec<T>,
	current_page: u64,
	page_size: u64,
	total_count: u64,
	is_loading: bool,
	error: Option<ServiceError>,
	dependencies: P,
	issued: u64,
	loaded: Loaded<P>,
}

/// Page, page size and dependencies the current items were fetched with
#[derive(Clone)]
struct Loaded<P> {
	page: u64,
	page_size: u64,
	dependencies: P,
}

struct FetchTicket<P> {
	seq: u64,
	page: u64,
	page_size: u64,
	dependencies: P,
}

/// Paginated view over a remote collection
pub struct PaginatedDataSource<T, P> {
	fetcher: Arc<dyn PageFetcher<T, P>>,
	state: Mutex<SourceState<T, P>>,
}

impl<T, P> PaginatedDataSource<T, P>
where
	T: Clone + Send + 'static,
	P: Clone + PartialEq + Send + 'static,
{
	/// Create a data source without fetching
	///
	/// Call [`refresh`](Self::refresh) to load the initial page, or use
	/// [`create`](Self::create) to do both.
	pub fn new<F>(fetcher: F, dependencies: P, options: TableOptions) -> Self
	where
		F: PageFetcher<T, P> + 'static,
	{
		Self::with_fetcher(Arc::new(fetcher), dependencies, options)
	}

	/// Create a data source around a shared fetcher
	pub fn with_fetcher(
		fetcher: Arc<dyn PageFetcher<T, P>>,
		dependencies: P,
		options: TableOptions,
	) -> Self {
		let options = options
			.with_page_size(options.page_size)
			.with_initial_page(options.initial_page);
		Self {
			fetcher,
			state: Mutex::new(SourceState {
				items: Vec::new(),
				current_page: options.initial_page,
				page_size: options.page_size,
				total_count: 0,
				is_loading: false,
				error: None,
				loaded: Loaded {
					page: options.initial_page,
					page_size: options.page_size,
					dependencies: dependencies.clone(),
				},
				dependencies,
				issued: 0,
			}),
		}
	}

	/// Create a data source and load its initial page
	pub async fn create<F>(fetcher: F, dependencies: P, options: TableOptions) -> Self
	where
		F: PageFetcher<T, P> + 'static,
	{
		let source = Self::new(fetcher, dependencies, options);
		source.refresh().await;
		source
	}

	/// Fetch the current page with the current dependencies
	pub async fn refresh(&self) -> FetchStatus {
		let ticket = self.begin();
		let in_flight = InFlight {
			state: &self.state,
			seq: ticket.seq,
			settled: false,
		};
		tracing::debug!(
			page = ticket.page,
			page_size = ticket.page_size,
			seq = ticket.seq,
			"Fetching page"
		);
		let result = self
			.fetcher
			.fetch(ticket.page, ticket.page_size, &ticket.dependencies)
			.await;
		in_flight.settle(result)
	}

	/// Move to `page` and fetch it
	///
	/// The page is not clamped; asking for a page past the end fetches whatever the
	/// server returns for it. Setting the page that is already current does nothing.
	pub async fn set_current_page(&self, page: u64) -> Option<FetchStatus> {
		if !self.update(|state| {
			if state.current_page == page {
				return false;
			}
			state.current_page = page;
			true
		}) {
			return None;
		}
		Some(self.refresh().await)
	}

	/// Change the page size, returning to page 1
	pub async fn set_page_size(&self, page_size: u64) -> Option<FetchStatus> {
		let page_size = TableOptions::new().with_page_size(page_size).page_size;
		if !self.update(|state| {
			if state.page_size == page_size {
				return false;
			}
			state.page_size = page_size;
			state.current_page = 1;
			true
		}) {
			return None;
		}
		Some(self.refresh().await)
	}

	/// Replace the dependency values
	///
	/// When they differ from the current ones the page resets to 1 and a single fetch is
	/// issued; equal values cause no fetch.
	pub async fn set_dependencies(&self, dependencies: P) -> Option<FetchStatus> {
		if !self.update(|state| {
			if state.dependencies == dependencies {
				return false;
			}
			state.dependencies = dependencies;
			state.current_page = 1;
			true
		}) {
			return None;
		}
		Some(self.refresh().await)
	}

	/// Items of the current page
	pub fn items(&self) -> Vec<T> {
		self.state.lock().items.clone()
	}

	/// Current page (1-indexed)
	pub fn current_page(&self) -> u64 {
		self.state.lock().current_page
	}

	/// Items per page
	pub fn page_size(&self) -> u64 {
		self.state.lock().page_size
	}

	/// Count across all pages
	pub fn total_count(&self) -> u64 {
		self.state.lock().total_count
	}

	/// Number of pages; 0 for an empty collection
	pub fn total_pages(&self) -> u64 {
		let state = self.state.lock();
		total_pages(state.total_count, state.page_size)
	}

	/// Whether the latest fetch is in flight
	pub fn is_loading(&self) -> bool {
		self.state.lock().is_loading
	}

	/// Failure of the latest completed fetch
	pub fn error(&self) -> Option<ServiceError> {
		self.state.lock().error.clone()
	}

	/// Current dependency values
	pub fn dependencies(&self) -> P {
		self.state.lock().dependencies.clone()
	}

	/// Copy of the observable state
	pub fn snapshot(&self) -> PageSnapshot<T> {
		let state = self.state.lock();
		PageSnapshot {
			items: state.items.clone(),
			current_page: state.current_page,
			page_size: state.page_size,
			total_count: state.total_count,
			total_pages: total_pages(state.total_count, state.page_size),
			is_loading: state.is_loading,
			error: state.error.clone(),
		}
	}

	fn update(&self, change: impl FnOnce(&mut SourceState<T, P>) -> bool) -> bool {
		change(&mut self.state.lock())
	}

	fn begin(&self) -> FetchTicket<P> {
		let mut state = self.state.lock();
		state.issued += 1;
		state.is_loading = true;
		FetchTicket {
			seq: state.issued,
			page: state.current_page,
			page_size: state.page_size,
			dependencies: state.dependencies.clone(),
		}
	}

}

struct InFlight<'a, T, P: Clone> {
	state: &'a Mutex<SourceState<T, P>>,
	seq: u64,
	settled: bool,
}

impl<T, P: Clone> InFlight<'_, T, P> {
	fn settle(mut self, result: Result<PageResult<T>, ServiceError>) -> FetchStatus {
		self.settled = true;
		let seq = self.seq;
		let mut state = self.state.lock();
		if seq != state.issued {
			tracing::debug!(seq, latest = state.issued, "Discarding stale page response");
			return FetchStatus::Stale;
		}
		state.is_loading = false;
		state.loaded = Loaded {
			page: state.current_page,
			page_size: state.page_size,
			dependencies: state.dependencies.clone(),
		};
		match result {
			Ok(page) => {
				state.items = page.items;
				state.total_count = page.total_count;
				state.error = None;
				FetchStatus::Applied
			}
			Err(error) => {
				tracing::warn!(seq, error = %error, "Page fetch failed");
				state.items.clear();
				state.total_count = 0;
				state.error = Some(error.clone());
				FetchStatus::Failed(error)
			}
		}
	}
}

impl<T, P: Clone> Drop for InFlight<'_, T, P> {
	fn drop(&mut self) {
		if self.settled {
			return;
		}
		let mut state = self.state.lock();
		if self.seq != state.issued {
			return;
		}
		tracing::debug!(seq = self.seq, "Page fetch abandoned");
		let loaded = state.loaded.clone();
		state.is_loading = false;
		state.current_page = loaded.page;
		state.page_size = loaded.page_size;
		state.dependencies = loaded.dependencies;
	}
}

impl<T, P> fmt::Debug for PaginatedDataSource<T, P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("PaginatedDataSource")
			.field("current_page", &state.current_page)
			.field("page_size", &state.page_size)
			.field("total_count", &state.total_count)
			.field("is_loading", &state.is_loading)
			.field("issued", &state.issued)
			.finish()
	}
}
