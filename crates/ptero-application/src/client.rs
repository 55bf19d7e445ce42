//! Asynchronous application-scope client implementation.

use crate::models::{
    CreateServer, CreateUser, Server, ServerBuild, ServerDetails, ServerListParams,
    ServerStartup, UpdateUser, User, UserListParams,
};
use crate::Result;
use ptero_core::client::{PanelClient, PanelClientBuilder};
use ptero_core::config::ClientConfig;
use ptero_core::request::path_segment;
use ptero_core::transport::Transport;
use ptero_core::types::Scope;
use reqwest::Method;
use std::sync::Arc;
use tracing::info;

const USER_AGENT: &str = concat!("ptero-application/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ApplicationClient`].
pub struct ApplicationClientBuilder {
    inner: PanelClientBuilder,
}

impl ApplicationClientBuilder {
    /// Create a builder for the given panel URL and application API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either value is empty.
    pub fn new(panel_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let builder = PanelClientBuilder::new(Scope::Application, panel_url, api_key)?
            .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Send requests through the given transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn build(self) -> Result<ApplicationClient> {
        let inner = self.inner.build()?;
        Ok(ApplicationClient { inner })
    }
}

/// Asynchronous client for the administrative API.
#[derive(Clone)]
pub struct ApplicationClient {
    inner: PanelClient,
}

impl ApplicationClient {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or key is empty.
    pub fn new(panel_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        ApplicationClientBuilder::new(panel_url, api_key)?.build()
    }

    /// Start a builder.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or key is empty.
    pub fn builder(
        panel_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<ApplicationClientBuilder> {
        ApplicationClientBuilder::new(panel_url, api_key)
    }

    /// List every server, following pagination.
    pub async fn list_servers(&self, params: &ServerListParams) -> Result<Vec<Server>> {
        self.inner.fetch_list("/servers", &params.to_query()).await
    }

    /// Fetch a server by panel id.
    pub async fn get_server(&self, id: u64) -> Result<Server> {
        self.inner.fetch_one(&format!("/servers/{id}")).await
    }

    /// Fetch a server by external id.
    pub async fn get_server_external(&self, external_id: &str) -> Result<Server> {
        self.inner
            .fetch_one(&format!("/servers/external/{}", path_segment(external_id)?))
            .await
    }

    /// Create a server.
    ///
    /// Fails without a request unless `request.allocation` or
    /// `request.deploy` is set.
    pub async fn create_server(&self, request: &CreateServer) -> Result<Server> {
        self.inner.create("/servers", request).await
    }

    /// Update a server's build configuration.
    pub async fn update_server_build(&self, id: u64, fields: &ServerBuild) -> Result<Server> {
        self.inner
            .update(&format!("/servers/{id}/build"), fields)
            .await
    }

    /// Update a server's details.
    pub async fn update_server_details(&self, id: u64, fields: &ServerDetails) -> Result<Server> {
        self.inner
            .update(&format!("/servers/{id}/details"), fields)
            .await
    }

    /// Update a server's startup configuration.
    pub async fn update_server_startup(&self, id: u64, fields: &ServerStartup) -> Result<Server> {
        self.inner
            .update(&format!("/servers/{id}/startup"), fields)
            .await
    }

    /// Suspend a server.
    pub async fn suspend_server(&self, id: u64) -> Result<()> {
        self.post_action(&format!("/servers/{id}/suspend")).await
    }

    /// Lift a server's suspension.
    pub async fn unsuspend_server(&self, id: u64) -> Result<()> {
        self.post_action(&format!("/servers/{id}/unsuspend")).await
    }

    /// Rerun the egg's install script on a server.
    pub async fn reinstall_server(&self, id: u64) -> Result<()> {
        self.post_action(&format!("/servers/{id}/reinstall")).await
    }

    /// Delete a server. `force` deletes it even if the node cannot be reached.
    pub async fn delete_server(&self, id: u64, force: bool) -> Result<()> {
        info!(id, force, "Deleting server");
        let mut path = format!("/servers/{id}");
        if force {
            path.push_str("/force");
        }
        self.inner.action::<()>(Method::DELETE, &path, None).await
    }

    /// List every user, following pagination.
    pub async fn list_users(&self, params: &UserListParams) -> Result<Vec<User>> {
        self.inner.fetch_list("/users", &params.to_query()).await
    }

    /// Fetch a user by panel id.
    pub async fn get_user(&self, id: u64) -> Result<User> {
        self.inner.fetch_one(&format!("/users/{id}")).await
    }

    /// Fetch a user by external id.
    pub async fn get_user_external(&self, external_id: &str) -> Result<User> {
        self.inner
            .fetch_one(&format!("/users/external/{}", path_segment(external_id)?))
            .await
    }

    /// Create a user.
    pub async fn create_user(&self, request: &CreateUser) -> Result<User> {
        self.inner.create("/users", request).await
    }

    /// Update a user.
    pub async fn update_user(&self, id: u64, fields: &UpdateUser) -> Result<User> {
        self.inner.update(&format!("/users/{id}"), fields).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: u64) -> Result<()> {
        info!(id, "Deleting user");
        self.inner
            .action::<()>(Method::DELETE, &format!("/users/{id}"), None)
            .await
    }

    async fn post_action(&self, path: &str) -> Result<()> {
        self.inner.action::<()>(Method::POST, path, None).await
    }
}
