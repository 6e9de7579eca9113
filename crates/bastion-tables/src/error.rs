//! Error types for resource tables
//!
//! Three kinds of failure reach the user:
//! - validation failures, detected before any service call
//! - service failures, from a rejected list/create/update/delete call
//! - missing identifiers, when an action targets a record without an id

use bastion_types::SchemaError;
use std::fmt;
use thiserror::Error;

/// Message shown when a service failure carries no usable text
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// A failed service call
///
/// Holds the server-supplied message (from the error body) separately from the
/// transport error text, so the user-facing message can prefer the former.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceError {
	/// Message taken from the server's error body
	pub server_message: Option<String>,
	/// Message of the underlying transport error
	pub transport_message: Option<String>,
	/// HTTP status, when one was received
	pub status: Option<u16>,
}

impl ServiceError {
	/// Failure with a server-supplied message
	pub fn server(message: impl Into<String>) -> Self {
		Self {
			server_message: Some(message.into()),
			..Self::default()
		}
	}

	/// Failure of the transport itself
	pub fn transport(message: impl Into<String>) -> Self {
		Self {
			transport_message: Some(message.into()),
			..Self::default()
		}
	}

	/// Attach an HTTP status
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);
		self
	}

	/// The service does not offer `operation`
	pub fn unsupported(operation: &str) -> Self {
		Self::transport(format!("Operation '{operation}' is not supported by this resource"))
	}

	/// Message suitable for the notification channel
	///
	/// Prefers the server message, then the transport message, then a generic fallback.
	/// Blank messages are skipped.
	pub fn user_message(&self) -> String {
		[&self.server_message, &self.transport_message]
			.into_iter()
			.flatten()
			.map(|message| message.trim())
			.find(|message| !message.is_empty())
			.map_or_else(|| GENERIC_FAILURE_MESSAGE.to_string(), str::to_string)
	}
}

impl fmt::Display for ServiceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.status {
			Some(status) => write!(f, "{} (status {status})", self.user_message()),
			None => f.write_str(&self.user_message()),
		}
	}
}

impl std::error::Error for ServiceError {}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	/// Field key
	pub field: String,
	/// Field label
	pub label: String,
	/// What is wrong with the value
	pub message: String,
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.label, self.message)
	}
}

/// All validation failures of one submission, in schema order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
	errors: Vec<FieldError>,
}

impl ValidationErrors {
	/// No failures
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a failure for a field
	pub fn push(
		&mut self,
		field: impl Into<String>,
		label: impl Into<String>,
		message: impl Into<String>,
	) {
		self.errors.push(FieldError {
			field: field.into(),
			label: label.into(),
			message: message.into(),
		});
	}

	/// Whether no field failed
	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// Number of failed fields
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	/// Failures in schema order
	pub fn errors(&self) -> &[FieldError] {
		&self.errors
	}

	/// Failure for a specific field
	pub fn for_field(&self, field: &str) -> Option<&FieldError> {
		self.errors.iter().find(|error| error.field == field)
	}

	/// `Ok(())` when empty, otherwise `Err(self)`
	pub fn into_result(self) -> Result<(), Self> {
		if self.is_empty() { Ok(()) } else { Err(self) }
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
		f.write_str(&messages.join("; "))
	}
}

impl std::error::Error for ValidationErrors {}

/// Resource table error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
	/// Client-side validation failed; no service call was made
	#[error("Validation error: {0}")]
	Validation(ValidationErrors),

	/// A service call was rejected
	#[error("Service error: {0}")]
	Service(#[from] ServiceError),

	/// The target record has no resolvable identifier
	#[error("Record not found: {0}")]
	NotFound(String),

	/// The action is not bound for this table
	#[error("Action '{0}' is not available")]
	Unsupported(&'static str),

	/// A filter key that is not a filterable column
	#[error("Unknown filter '{0}'")]
	UnknownFilter(String),

	/// A form field that the schema does not declare
	#[error("Unknown field '{0}'")]
	UnknownField(String),

	/// The dialog the action belongs to is not open
	#[error("Dialog is not open: {0}")]
	DialogClosed(&'static str),

	/// The bulk delete confirmation phrase does not match
	#[error("Confirmation text does not match")]
	ConfirmationMismatch,

	/// The column schema is invalid
	#[error("Invalid column schema: {0}")]
	Schema(#[from] SchemaError),

	/// Local export failed
	#[error("Export failed: {0}")]
	Export(String),
}

impl From<ValidationErrors> for TableError {
	fn from(errors: ValidationErrors) -> Self {
		TableError::Validation(errors)
	}
}

impl TableError {
	/// Messages for the notification channel, one per problem
	///
	/// Validation failures yield one message per field.
	pub fn user_messages(&self) -> Vec<String> {
		match self {
			TableError::Validation(errors) => {
				errors.errors().iter().map(ToString::to_string).collect()
			}
			TableError::Service(error) => vec![error.user_message()],
			other => vec![other.to_string()],
		}
	}
}

/// Result type for resource table operations
pub type TableResult<T> = Result<T, TableError>;
