//! Service contract consumed by resource tables
//!
//! Each resource page binds its table to one [`ResourceService`]. The REST client crate
//! provides the HTTP implementation; tests provide in-memory ones.
//!
//! # Examples
//!
//! ```
//! use async_trait::async_trait;
//! use bastion_tables::{ResourceService, ServiceError};
//! use bastion_types::{JsonRecord, PageResult, QueryParams, RecordId};
//!
//! struct EmptyService;
//!
//! #[async_trait]
//! impl ResourceService<JsonRecord> for EmptyService {
//!     async fn list(
//!         &self,
//!         _page: u64,
//!         _page_size: u64,
//!         _params: &QueryParams,
//!     ) -> Result<PageResult<JsonRecord>, ServiceError> {
//!         Ok(PageResult::empty())
//!     }
//!
//!     async fn create(&self, payload: JsonRecord) -> Result<JsonRecord, ServiceError> {
//!         Ok(payload)
//!     }
//!
//!     async fn update(&self, _id: &RecordId, payload: JsonRecord) -> Result<JsonRecord, ServiceError> {
//!         Ok(payload)
//!     }
//!
//!     async fn delete(&self, _id: &RecordId) -> Result<(), ServiceError> {
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::ServiceError;
use async_trait::async_trait;
use bastion_types::{JsonRecord, PageResult, QueryParams, RecordId};
use bytes::Bytes;

/// Remote operations for one resource type
///
/// `list` must tolerate unknown query parameters. The optional operations default to
/// an "unsupported" failure.
#[async_trait]
pub trait ResourceService<T>: Send + Sync {
	/// Fetch one page, applying `params` (search term and filters) server-side
	async fn list(
		&self,
		page: u64,
		page_size: u64,
		params: &QueryParams,
	) -> Result<PageResult<T>, ServiceError>;

	/// Create a record
	async fn create(&self, payload: JsonRecord) -> Result<T, ServiceError>;

	/// Update a record
	async fn update(&self, id: &RecordId, payload: JsonRecord) -> Result<T, ServiceError>;

	/// Delete a record
	async fn delete(&self, id: &RecordId) -> Result<(), ServiceError>;

	/// Clone a record server-side under a new name
	async fn duplicate(&self, _id: &RecordId, _new_name: &str) -> Result<T, ServiceError> {
		Err(ServiceError::unsupported("duplicate"))
	}

	/// Delete every record matching `params`, returning how many were removed
	async fn delete_all(&self, _params: &QueryParams) -> Result<u64, ServiceError> {
		Err(ServiceError::unsupported("delete_all"))
	}

	/// Export records matching `params` as CSV
	async fn export_csv(&self, _params: &QueryParams) -> Result<Bytes, ServiceError> {
		Err(ServiceError::unsupported("export_csv"))
	}

	/// Export records of `kind` as a JSON download
	async fn export_json(&self, _kind: &str) -> Result<(), ServiceError> {
		Err(ServiceError::unsupported("export_json"))
	}
}
