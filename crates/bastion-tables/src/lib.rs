//! # bastion-tables
//!
//! Headless core of bastion's resource tables.
//!
//! A resource page declares its columns and binds a [`ResourceService`]; the
//! [`ResourceTablePresenter`] does the rest:
//!
//! - [`pagination`]: [`PaginatedDataSource`], refetching on page and dependency changes
//!   and discarding stale responses
//! - [`filter`]: [`FilterState`], sentinel normalization and client-side matching
//! - [`form`]: [`RecordFormSession`] for create/edit dialogs with draft validation
//! - [`confirm`]: single-record and delete-all confirmation state machines
//! - [`pager`]: the page navigation controls every table shares
//! - [`presenter`]: composition of the above with action bindings and notifications
//!
//! Operations log through `tracing`; no subscriber is installed here.

pub mod confirm;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod notify;
pub mod pager;
pub mod pagination;
pub mod presenter;
pub mod service;

pub use confirm::{
	BulkDeleteConfirmation, BulkDeletePhase, DEFAULT_CONFIRMATION_PHRASE, DeleteConfirmation,
};
pub use error::{
	FieldError, GENERIC_FAILURE_MESSAGE, ServiceError, TableError, TableResult, ValidationErrors,
};
pub use export::CsvExporter;
pub use filter::{
	DEFAULT_SEARCH_PARAM, FilterState, filter_records, matches_filter, normalize_filters,
};
pub use form::{FormMode, PreparedSubmission, RecordFormSession, Submission, validate_draft};
pub use notify::{CollectingNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use pager::{Pager, PagerItem};
pub use pagination::{FetchFuture, FetchStatus, PageFetcher, PageSnapshot, PaginatedDataSource};
pub use presenter::{
	ActionBindings, ActionOutcome, FilterControl, FilterMode, PresenterBuilder,
	ResourceTablePresenter, RowAction, TableRow, TableUiState, TableView,
};
pub use service::ResourceService;
