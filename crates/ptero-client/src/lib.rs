//! Client-scope client for the panel API.
//!
//! Provides typed records and an asynchronous client for the end-user
//! `/api/client` endpoints, authenticated with a client API key. Servers are
//! addressed by their short identifier rather than their numeric id.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{PanelUserClient, PanelUserClientBuilder};
pub use models::{
    Account, ClientServer, CommandRequest, PowerRequest, PowerSignal, ResourceUsage,
    ServerResources, SftpDetails,
};

/// Convenient result alias that reuses the shared panel error type.
pub type Result<T> = ptero_core::Result<T>;
