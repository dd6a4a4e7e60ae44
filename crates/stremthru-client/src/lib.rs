//! Typed async client for the StremThru store proxy.
//!
//! This crate provides a typed client for the StremThru HTTP API: store and
//! magnet management (add / check / get / list / remove), direct link
//! generation, and user info.
//!
//! # Example
//!
//! ```no_run
//! use stremthru_client::{Auth, ListMagnetsParams, StremThruClient};
//!
//! # async fn example() -> stremthru_client::Result<()> {
//! let client = StremThruClient::builder()
//!     .base_url("https://stremthru.example.com")
//!     .auth(Auth::StoreToken {
//!         store: "realdebrid".to_string(),
//!         token: "secret".to_string(),
//!     })
//!     .build()?;
//!
//! // Add a magnet to the store
//! let added = client.store().add_magnet("magnet:?xt=urn:btih:...").await?;
//! println!("added {} ({:?})", added.data.id, added.data.status);
//!
//! // Page through stored magnets
//! let page = client
//!     .store()
//!     .list_magnets(ListMagnetsParams { limit: Some(50), offset: None })
//!     .await?;
//! println!("{} of {} magnets", page.data.items.len(), page.data.total_items);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every non-success response raises [`Error::Api`] carrying the service's
//! error classification, code, message, and the full response metadata
//! (headers, status code, status text). Transport failures propagate
//! unchanged as [`Error::Http`].

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::{HealthApi, ListMagnetsParams, StoreApi};
pub use reqwest::{Method, StatusCode};
pub use client::{Auth, Body, ClientBuilder, RequestOptions, StremThruClient};
pub use error::{ApiError, Error, ErrorCode, ErrorType, Result};
pub use types::*;
