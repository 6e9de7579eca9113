//! Client settings
//!
//! Settings are read from TOML:
//!
//! ```toml
//! base_url = "https://console.example.com"
//! api_prefix = "/api"
//! timeout_secs = 30
//! download_dir = "downloads"
//! default_page_size = 10
//! ```
//!
//! Every key except `base_url` is optional.

use crate::error::{ClientError, ClientResult};
use bastion_types::{DEFAULT_PAGE_SIZE, TableOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_api_prefix() -> String {
	"/api".to_string()
}

fn default_timeout_secs() -> u64 {
	30
}

fn default_download_dir() -> PathBuf {
	PathBuf::from(".")
}

fn default_page_size() -> u64 {
	DEFAULT_PAGE_SIZE
}

/// Connection settings for the REST backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
	/// Scheme and host of the backend, e.g. `https://console.example.com`
	pub base_url: String,
	/// Path prefix of every API route
	#[serde(default = "default_api_prefix")]
	pub api_prefix: String,
	/// Request timeout in seconds
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
	/// Directory JSON exports are written to
	#[serde(default = "default_download_dir")]
	pub download_dir: PathBuf,
	/// Page size of tables that do not set their own
	#[serde(default = "default_page_size")]
	pub default_page_size: u64,
}

impl ClientSettings {
	/// Settings for `base_url` with every other value defaulted
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			api_prefix: default_api_prefix(),
			timeout_secs: default_timeout_secs(),
			download_dir: default_download_dir(),
			default_page_size: default_page_size(),
		}
	}

	/// Parse and validate settings from TOML text
	pub fn from_toml_str(content: &str) -> ClientResult<Self> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read, parse and validate a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "Loaded client settings");
		Self::from_toml_str(&content)
	}

	/// Set the API prefix
	pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.api_prefix = prefix.into();
		self
	}

	/// Set the request timeout in seconds
	pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
		self.timeout_secs = seconds;
		self
	}

	/// Set the download directory
	pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.download_dir = dir.into();
		self
	}

	/// Set the page size of tables that do not set their own
	pub fn with_default_page_size(mut self, page_size: u64) -> Self {
		self.default_page_size = page_size;
		self
	}

	/// Table options using the configured default page size
	pub fn table_options(&self) -> TableOptions {
		TableOptions::new().with_page_size(self.default_page_size)
	}

	/// Check that the settings are usable
	pub fn validate(&self) -> ClientResult<()> {
		let base_url = self.base_url.trim();
		if base_url.is_empty() {
			return Err(ClientError::Config("base_url must not be empty".to_string()));
		}
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(ClientError::Config(format!(
				"base_url must start with http:// or https://, got '{base_url}'"
			)));
		}
		if self.timeout_secs == 0 {
			return Err(ClientError::Config(
				"timeout_secs must be greater than zero".to_string(),
			));
		}
		if self.default_page_size == 0 {
			return Err(ClientError::Config(
				"default_page_size must be greater than zero".to_string(),
			));
		}
		Ok(())
	}

	/// Request timeout
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}

	/// Absolute URL of an API path
	///
	/// Slashes between the base URL, the prefix and `path` are normalized; the result
	/// always ends with a slash.
	pub fn api_url(&self, path: &str) -> String {
		let base = self.base_url.trim().trim_end_matches('/');
		let prefix = self.api_prefix.trim().trim_matches('/');
		let path = path.trim().trim_matches('/');
		let mut url = base.to_string();
		for segment in [prefix, path] {
			if !segment.is_empty() {
				url.push('/');
				url.push_str(segment);
			}
		}
		url.push('/');
		url
	}
}

/// REST collection backing one resource page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEndpoint {
	/// Resource name, used for download file names
	pub name: String,
	/// Collection path below the API prefix, e.g. `blacklist-ips`
	pub path: String,
}

impl ResourceEndpoint {
	/// Endpoint for `name` at `path`
	pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
		}
	}

	/// Path of one member of the collection
	pub fn member_path(&self, id: &impl std::fmt::Display) -> String {
		format!("{}/{}", self.path.trim_matches('/'), id)
	}

	/// Path of a sub-route of the collection
	pub fn route(&self, suffix: &str) -> String {
		format!(
			"{}/{}",
			self.path.trim_matches('/'),
			suffix.trim_matches('/')
		)
	}
}
