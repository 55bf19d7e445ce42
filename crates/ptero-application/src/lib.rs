//! Application-scope client for the panel API.
//!
//! Provides typed records and an asynchronous client for the administrative
//! `/api/application` endpoints, authenticated with an application API key.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ApplicationClient, ApplicationClientBuilder};
pub use models::{
    AllocationTarget, Container, CreateServer, CreateUser, DeployTarget, Server, ServerBuild,
    ServerDetails, ServerListParams, ServerStartup, UpdateUser, User, UserListParams,
};

/// Convenient result alias that reuses the shared panel error type.
pub type Result<T> = ptero_core::Result<T>;
