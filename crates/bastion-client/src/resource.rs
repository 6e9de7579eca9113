//! REST-backed resource service
//!
//! Routes, relative to the API prefix and the endpoint's collection path:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET {path}/?page=&page_size=&...` |
//! | create | `POST {path}/` |
//! | update | `PUT {path}/{id}/` |
//! | delete | `DELETE {path}/{id}/` |
//! | duplicate | `POST {path}/{id}/duplicate/` with `{"name": ...}` |
//! | delete all | `DELETE {path}/?...` answering `{"deleted": n}` |
//! | CSV export | `GET {path}/export/csv/?...` |
//! | JSON export | `GET {path}/export/json/?kind=` |

use crate::client::RestClient;
use crate::error::ClientResult;
use crate::settings::ResourceEndpoint;
use async_trait::async_trait;
use bastion_tables::{ResourceService, ServiceError};
use bastion_types::{JsonRecord, PageRequest, PageResult, QueryParams, RecordId, TableRecord};
use bytes::Bytes;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::marker::PhantomData;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct DeleteAllResponse {
	#[serde(default)]
	deleted: u64,
}

/// One resource collection served over REST
pub struct RestResource<T> {
	client: RestClient,
	endpoint: ResourceEndpoint,
	record: PhantomData<fn() -> T>,
}

impl<T> RestResource<T> {
	/// Resource at `endpoint`
	pub fn new(client: RestClient, endpoint: ResourceEndpoint) -> Self {
		Self {
			client,
			endpoint,
			record: PhantomData,
		}
	}

	/// Endpoint served
	pub fn endpoint(&self) -> &ResourceEndpoint {
		&self.endpoint
	}

	/// Client in use
	pub fn client(&self) -> &RestClient {
		&self.client
	}

	/// Download the JSON export of `kind` into the download directory
	///
	/// Writes `<resource>-<kind>.json` and returns its path.
	pub async fn download_json(&self, kind: &str) -> ClientResult<PathBuf> {
		let query = [("kind".to_string(), kind.to_string())];
		let body = self
			.client
			.get_bytes(&self.endpoint.route("export/json"), &query)
			.await?;
		let dir = self.client.settings().download_dir.clone();
		tokio::fs::create_dir_all(&dir).await?;
		let target = dir.join(format!("{}-{}.json", self.endpoint.name, sanitize(kind)));
		tokio::fs::write(&target, &body).await?;
		tracing::info!(path = %target.display(), bytes = body.len(), "Export downloaded");
		Ok(target)
	}

	fn query(params: &QueryParams) -> Vec<(String, String)> {
		params
			.iter()
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect()
	}
}

fn sanitize(kind: &str) -> String {
	kind.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect()
}

#[async_trait]
impl<T> ResourceService<T> for RestResource<T>
where
	T: TableRecord + DeserializeOwned,
{
	async fn list(
		&self,
		page: u64,
		page_size: u64,
		params: &QueryParams,
	) -> Result<PageResult<T>, ServiceError> {
		let request = PageRequest::from_params(page, page_size, params);
		Ok(self
			.client
			.get_json(&self.endpoint.path, &request.query_pairs())
			.await?)
	}

	async fn create(&self, payload: JsonRecord) -> Result<T, ServiceError> {
		Ok(self
			.client
			.send_json(Method::POST, &self.endpoint.path, &payload)
			.await?)
	}

	async fn update(&self, id: &RecordId, payload: JsonRecord) -> Result<T, ServiceError> {
		Ok(self
			.client
			.send_json(Method::PUT, &self.endpoint.member_path(id), &payload)
			.await?)
	}

	async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
		let request = self
			.client
			.request(Method::DELETE, &self.endpoint.member_path(id));
		self.client.send_empty(request).await?;
		Ok(())
	}

	async fn duplicate(&self, id: &RecordId, new_name: &str) -> Result<T, ServiceError> {
		let path = format!("{}/duplicate", self.endpoint.member_path(id));
		Ok(self
			.client
			.send_json(Method::POST, &path, &json!({ "name": new_name }))
			.await?)
	}

	async fn delete_all(&self, params: &QueryParams) -> Result<u64, ServiceError> {
		let request = self
			.client
			.request(Method::DELETE, &self.endpoint.path)
			.query(&Self::query(params));
		let body = self.client.send_empty(request).await?;
		if body.iter().all(u8::is_ascii_whitespace) {
			return Ok(0);
		}
		let response: DeleteAllResponse = serde_json::from_slice(&body)
			.map_err(|error| ServiceError::transport(error.to_string()))?;
		Ok(response.deleted)
	}

	async fn export_csv(&self, params: &QueryParams) -> Result<Bytes, ServiceError> {
		Ok(self
			.client
			.get_bytes(&self.endpoint.route("export/csv"), &Self::query(params))
			.await?)
	}

	async fn export_json(&self, kind: &str) -> Result<(), ServiceError> {
		self.download_json(kind).await?;
		Ok(())
	}
}
