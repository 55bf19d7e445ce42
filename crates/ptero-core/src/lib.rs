//! # ptero-core
//!
//! Shared plumbing for the panel API clients.
//!
//! This crate provides the request construction, response validation,
//! pagination and error handling that every resource operation of the
//! application-scope and client-scope clients is routed through.
//!
//! ## Modules
//!
//! - [`error`] - Error types and the panel's error document
//! - [`config`] - Credentials and HTTP client configuration
//! - [`request`] - Authenticated request construction
//! - [`transport`] - The injectable HTTP transport seam
//! - [`response`] - Status code validation and body decoding
//! - [`pagination`] - Page walking for list endpoints
//! - [`client`] - Generic resource operations
//! - [`types`] - Envelopes, scopes and shared resource shapes
//! - [`uuid`] - Strongly-typed UUID wrappers for panel resources
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod uuid;

// Re-export commonly used types
pub use client::{PanelClient, PanelClientBuilder};
pub use config::{ClientConfig, Credentials};
pub use error::{Error, PanelErrorDetail, PanelErrors, Result};
pub use transport::{HttpTransport, PanelRequest, PanelResponse, Transport};
pub use types::{FieldSubset, Record, RecordList, Scope};
