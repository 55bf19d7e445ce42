//! Asynchronous client-scope client implementation.

use crate::models::{
    Account, ClientServer, CommandRequest, PowerRequest, PowerSignal, ServerResources,
};
use crate::Result;
use ptero_core::client::{PanelClient, PanelClientBuilder};
use ptero_core::config::ClientConfig;
use ptero_core::query::QueryParams;
use ptero_core::request::path_segment;
use ptero_core::transport::Transport;
use ptero_core::types::Scope;
use reqwest::Method;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

const USER_AGENT: &str = concat!("ptero-client/", env!("CARGO_PKG_VERSION"));

/// Builder for [`PanelUserClient`].
pub struct PanelUserClientBuilder {
    inner: PanelClientBuilder,
}

impl PanelUserClientBuilder {
    /// Create a builder for the given panel URL and client API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either value is empty.
    pub fn new(panel_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let builder = PanelClientBuilder::new(Scope::Client, panel_url, api_key)?
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
    pub fn build(self) -> Result<PanelUserClient> {
        let inner = self.inner.build()?;
        Ok(PanelUserClient { inner })
    }
}

/// Asynchronous client for the end-user API.
///
/// Servers are addressed by their short identifier, e.g. `1a7ce997`.
#[derive(Clone)]
pub struct PanelUserClient {
    inner: PanelClient,
}

impl PanelUserClient {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or key is empty.
    pub fn new(panel_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        PanelUserClientBuilder::new(panel_url, api_key)?.build()
    }

    /// Start a builder.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or key is empty.
    pub fn builder(
        panel_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<PanelUserClientBuilder> {
        PanelUserClientBuilder::new(panel_url, api_key)
    }

    /// Fetch the account that owns the API key.
    pub async fn get_account(&self) -> Result<Account> {
        self.inner.fetch_one("/account").await
    }

    /// List every server the account can access, following pagination.
    pub async fn list_servers(&self) -> Result<Vec<ClientServer>> {
        self.inner.fetch_list("", &QueryParams::new()).await
    }

    /// Fetch a server by identifier.
    pub async fn get_server(&self, identifier: &str) -> Result<ClientServer> {
        self.inner.fetch_one(&server_path(identifier, "")?).await
    }

    /// Fetch a server's live state and resource usage.
    pub async fn get_resources(&self, identifier: &str) -> Result<ServerResources> {
        self.inner
            .fetch_one(&server_path(identifier, "/resources")?)
            .await
    }

    /// Send a power signal to a server.
    pub async fn send_power_signal(&self, identifier: &str, signal: PowerSignal) -> Result<()> {
        let path = server_path(identifier, "/power")?;
        info!(identifier, %signal, "Sending power signal");
        let request = PowerRequest { signal };
        self.inner
            .action(Method::POST, &path, Some(&request))
            .await
    }

    /// Send a console command to a running server.
    ///
    /// An empty command fails without a request.
    pub async fn send_command(&self, identifier: &str, command: impl Into<String>) -> Result<()> {
        let request = CommandRequest {
            command: command.into(),
        };
        request.validate()?;
        let path = server_path(identifier, "/command")?;

        self.inner
            .action(Method::POST, &path, Some(&request))
            .await
    }
}

fn server_path(identifier: &str, suffix: &str) -> Result<String> {
    Ok(format!("/servers/{}{suffix}", path_segment(identifier)?))
}
