//! # bastion-client
//!
//! REST implementation of [`bastion_tables::ResourceService`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use bastion_client::{ClientSettings, ResourceEndpoint, RestClient, RestResource, SessionContext};
//! use bastion_tables::{ActionBindings, ResourceTablePresenter};
//! use bastion_types::{ColumnSpec, JsonRecord};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::from_file("bastion.toml")?;
//! let options = settings.table_options();
//! let client = RestClient::builder(settings)
//!     .session(SessionContext::with_token("token"))
//!     .build()?;
//! let service = RestResource::<JsonRecord>::new(
//!     client,
//!     ResourceEndpoint::new("blacklist", "blacklist-ips"),
//! );
//! let presenter = ResourceTablePresenter::<JsonRecord>::builder(Arc::new(service))
//!     .column(ColumnSpec::new("ip", "IP Address").text_filter())
//!     .bindings(ActionBindings::crud())
//!     .options(options)
//!     .build()?;
//! let _ = presenter.load().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod resource;
pub mod session;
pub mod settings;

pub use client::{RestClient, RestClientBuilder};
pub use error::{ClientError, ClientResult, extract_message};
pub use resource::RestResource;
pub use session::SessionContext;
pub use settings::{ClientSettings, ResourceEndpoint};
