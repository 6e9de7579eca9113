//! # bastion-types
//!
//! Shared data model for bastion resource tables.
//!
//! - [`page`]: page requests and the `{items, totalCount}` result envelope
//! - [`column`]: column schema with renderers and filter descriptors
//! - [`record`]: record identifiers and the [`TableRecord`] access trait
//! - [`form`]: typed form schemas and drafts
//! - [`options`]: per-table options

pub mod column;
pub mod form;
pub mod options;
pub mod page;
pub mod record;

pub use column::{CellRenderer, ColumnSpec, FilterKind, FilterOption, SchemaError, validate_columns};
pub use form::{Draft, DraftValue, FieldKind, FieldSpec, FormSchema};
pub use options::{DEFAULT_PAGE_SIZE, TableOptions};
pub use page::{
	ALL_SENTINEL, FilterSet, FilterValue, PageRequest, PageResult, QueryParams, total_pages,
};
pub use record::{JsonRecord, RecordId, TableRecord};
