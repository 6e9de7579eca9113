//! # Bastion
//!
//! Headless, server-paginated resource tables for security-monitoring admin consoles.
//!
//! A resource table couples a paginated data source, a filter state, add and edit form
//! sessions, delete confirmations and a notification channel into one presenter. The
//! presenter renders a plain [`TableView`](tables::TableView) that any front end can draw.
//!
//! ## Crates
//!
//! - [`types`] - records, columns, form schemas and page envelopes
//! - [`tables`] - pagination, filtering, form sessions, confirmations and the presenter
//! - [`client`] - REST implementation of the resource service (feature `client`)
//!
//! ## Feature Flags
//!
//! - `client` (default) - REST resource client built on `reqwest`
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use bastion::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new(ClientSettings::new("https://console.example.com"))?;
//! let service = RestResource::<JsonRecord>::new(
//!     client,
//!     ResourceEndpoint::new("whitelist", "whitelist-ips"),
//! );
//! let presenter = ResourceTablePresenter::<JsonRecord>::builder(Arc::new(service))
//!     .resource_name("Whitelist IP")
//!     .column(ColumnSpec::new("ip", "IP Address").text_filter())
//!     .bindings(ActionBindings::crud())
//!     .build()?;
//! let _ = presenter.load().await;
//! let view = presenter.view();
//! println!("{} of {} records", view.rows.len(), view.total_count);
//! # Ok(())
//! # }
//! ```

pub use bastion_tables as tables;
pub use bastion_types as types;

#[cfg(feature = "client")]
pub use bastion_client as client;

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::tables::{
		ActionBindings, ActionOutcome, BulkDeletePhase, CollectingNotifier, FetchStatus,
		FilterMode, FilterState, NotificationKind, Notifier, Pager, PagerItem,
		PaginatedDataSource, ResourceService, ResourceTablePresenter, RowAction, ServiceError,
		TableError, TableResult, TableView, TracingNotifier,
	};
	pub use crate::types::{
		ColumnSpec, Draft, DraftValue, FieldKind, FieldSpec, FilterKind, FilterOption,
		FormSchema, JsonRecord, PageResult, QueryParams, RecordId, TableOptions, TableRecord,
	};

	#[cfg(feature = "client")]
	pub use crate::client::{
		ClientError, ClientSettings, ResourceEndpoint, RestClient, RestResource, SessionContext,
	};
}
