//! Client errors and their mapping onto service failures

use bastion_tables::ServiceError;
use serde_json::Value;
use thiserror::Error;

/// REST client error type
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The server answered with a non-success status
	#[error("Request failed with status {status}")]
	Status {
		status: u16,
		/// Message extracted from the error body
		message: Option<String>,
	},

	#[error("Not authenticated")]
	Unauthenticated,
}

impl ClientError {
	/// Returns true if the error is a timeout error
	pub fn is_timeout(&self) -> bool {
		match self {
			ClientError::Http(e) => e.is_timeout(),
			_ => false,
		}
	}

	/// HTTP status, when one was received
	pub fn status(&self) -> Option<u16> {
		match self {
			ClientError::Status { status, .. } => Some(*status),
			ClientError::Http(e) => e.status().map(|status| status.as_u16()),
			_ => None,
		}
	}
}

impl From<toml::de::Error> for ClientError {
	fn from(error: toml::de::Error) -> Self {
		ClientError::Config(error.to_string())
	}
}

impl From<ClientError> for ServiceError {
	fn from(error: ClientError) -> Self {
		let status = error.status();
		let mapped = match error {
			ClientError::Status { message, .. } => ServiceError {
				server_message: message,
				transport_message: None,
				status: None,
			},
			other => ServiceError::transport(other.to_string()),
		};
		match status {
			Some(status) => mapped.with_status(status),
			None => mapped,
		}
	}
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Pull a human-readable message out of an error body
///
/// Looks for a string `message`, `detail` or `error` field, in that order. Bodies that are
/// not JSON are used verbatim when short and non-empty.
pub fn extract_message(body: &str) -> Option<String> {
	let trimmed = body.trim();
	if trimmed.is_empty() {
		return None;
	}
	match serde_json::from_str::<Value>(trimmed) {
		Ok(Value::Object(map)) => ["message", "detail", "error"]
			.iter()
			.filter_map(|key| map.get(*key).and_then(Value::as_str))
			.map(str::trim)
			.find(|message| !message.is_empty())
			.map(str::to_string),
		Ok(_) => None,
		Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => Some(trimmed.to_string()),
		Err(_) => None,
	}
}
