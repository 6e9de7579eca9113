//! HTTP client for the console's REST backend

use crate::error::{ClientError, ClientResult, extract_message};
use crate::session::SessionContext;
use crate::settings::ClientSettings;
use bytes::Bytes;
use reqwest::{Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Builder for creating a [`RestClient`] with custom configuration
///
/// # Example
/// ```rust,no_run
/// use bastion_client::{ClientSettings, RestClient, SessionContext};
///
/// let client = RestClient::builder(ClientSettings::new("https://console.example.com"))
///     .session(SessionContext::with_token("token"))
///     .user_agent("bastion-console/0.1")
///     .build()
///     .expect("valid settings");
/// assert!(client.session().is_authenticated());
/// ```
pub struct RestClientBuilder {
	settings: ClientSettings,
	session: SessionContext,
	user_agent: Option<String>,
}

impl RestClientBuilder {
	/// Create a builder for `settings`, anonymous by default
	pub fn new(settings: ClientSettings) -> Self {
		Self {
			settings,
			session: SessionContext::anonymous(),
			user_agent: None,
		}
	}

	/// Set the session used for authorization
	pub fn session(mut self, session: SessionContext) -> Self {
		self.session = session;
		self
	}

	/// Set the `User-Agent` header
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	/// Validate the settings and build the client
	pub fn build(self) -> ClientResult<RestClient> {
		self.settings.validate()?;
		let mut client_builder = reqwest::Client::builder().timeout(self.settings.timeout());
		if let Some(user_agent) = self.user_agent {
			client_builder = client_builder.user_agent(user_agent);
		}
		let http = client_builder.build()?;
		Ok(RestClient {
			http,
			settings: Arc::new(self.settings),
			session: self.session,
		})
	}
}

/// REST client sharing one connection pool
///
/// Cloning is cheap; clones share the pool and settings.
#[derive(Debug, Clone)]
pub struct RestClient {
	http: reqwest::Client,
	settings: Arc<ClientSettings>,
	session: SessionContext,
}

impl RestClient {
	/// Anonymous client for `settings`
	pub fn new(settings: ClientSettings) -> ClientResult<Self> {
		RestClientBuilder::new(settings).build()
	}

	/// Create a builder for customizing the client
	pub fn builder(settings: ClientSettings) -> RestClientBuilder {
		RestClientBuilder::new(settings)
	}

	/// Settings in use
	pub fn settings(&self) -> &ClientSettings {
		&self.settings
	}

	/// Session in use
	pub fn session(&self) -> &SessionContext {
		&self.session
	}

	/// Same client acting under another session
	pub fn with_session(&self, session: SessionContext) -> Self {
		Self {
			http: self.http.clone(),
			settings: Arc::clone(&self.settings),
			session,
		}
	}

	/// Absolute URL of an API path
	pub fn url(&self, path: &str) -> String {
		self.settings.api_url(path)
	}

	/// Start a request to an API path, authorized when the session has a token
	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let url = self.url(path);
		tracing::debug!(method = %method, url = %url, "Sending request");
		let request = self.http.request(method, url);
		match self.session.authorization_header() {
			Some(value) => request.header(header::AUTHORIZATION, value),
			None => request,
		}
	}

	/// Send a request, turning non-success statuses into [`ClientError::Status`]
	pub async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
		let response = request.send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let body = response.text().await.unwrap_or_default();
		let message = extract_message(&body);
		tracing::warn!(status = status.as_u16(), message = ?message, "Request failed");
		Err(ClientError::Status {
			status: status.as_u16(),
			message,
		})
	}

	/// `GET` an API path with query parameters and decode the JSON body
	pub async fn get_json<R: DeserializeOwned>(
		&self,
		path: &str,
		query: &[(String, String)],
	) -> ClientResult<R> {
		let response = self.send(self.request(Method::GET, path).query(query)).await?;
		decode(response).await
	}

	/// Send a JSON body and decode the JSON response
	pub async fn send_json<B, R>(&self, method: Method, path: &str, body: &B) -> ClientResult<R>
	where
		B: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		let body = serde_json::to_vec(body)?;
		let request = self
			.request(method, path)
			.header(header::CONTENT_TYPE, "application/json")
			.body(body);
		decode(self.send(request).await?).await
	}

	/// `GET` an API path and return the raw body
	pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> ClientResult<Bytes> {
		let response = self.send(self.request(Method::GET, path).query(query)).await?;
		Ok(response.bytes().await?)
	}

	/// Send a request whose response body is ignored
	pub async fn send_empty(&self, request: RequestBuilder) -> ClientResult<Bytes> {
		let response = self.send(request).await?;
		Ok(response.bytes().await?)
	}
}

async fn decode<R: DeserializeOwned>(response: Response) -> ClientResult<R> {
	let body = response.bytes().await?;
	Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn invalid_settings_fail_to_build() {
		// Arrange
		let settings = ClientSettings::new("console.local");

		// Act
		let result = RestClient::new(settings);

		// Assert
		assert!(matches!(result, Err(ClientError::Config(_))));
	}

	#[rstest]
	fn with_session_keeps_settings() {
		// Arrange
		let client = RestClient::new(ClientSettings::new("http://localhost:8000"))
			.expect("valid settings");

		// Act
		let authorized = client.with_session(SessionContext::with_token("t0k3n"));

		// Assert
		assert!(!client.session().is_authenticated());
		assert!(authorized.session().is_authenticated());
		assert_eq!(authorized.url("devices"), "http://localhost:8000/api/devices/");
	}
}
