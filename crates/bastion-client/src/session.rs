//! Authentication context passed to the client

use crate::error::{ClientError, ClientResult};

/// Who the console is acting as
///
/// Owned by the application and handed to [`RestClient`](crate::RestClient) explicitly, so
/// tests can construct any authentication state they need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
	token: Option<String>,
}

impl SessionContext {
	/// No one is logged in
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// Logged in with a bearer token
	pub fn with_token(token: impl Into<String>) -> Self {
		let token = token.into();
		Self {
			token: (!token.trim().is_empty()).then_some(token),
		}
	}

	/// Whether a token is present
	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}

	/// Route guard: fails unless a token is present
	pub fn require_authenticated(&self) -> ClientResult<&str> {
		self.token.as_deref().ok_or(ClientError::Unauthenticated)
	}

	/// `Authorization` header value, when logged in
	pub fn authorization_header(&self) -> Option<String> {
		self.token.as_ref().map(|token| format!("Bearer {token}"))
	}

	/// Drop the token
	pub fn logout(&mut self) {
		self.token = None;
	}
}
