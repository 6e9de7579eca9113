//! Test helpers for resource table scenarios

pub mod fixtures;
pub mod service;

pub use fixtures::{blacklist_columns, blacklist_presenter, record, records};
pub use service::{Call, InMemoryService};
