//! Client-scope records and request payloads.

use ptero_core::types::{FeatureLimits, Limits};
use ptero_core::uuid::ServerUuid;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// The account that owns the client API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Numeric panel id.
    pub id: u64,
    /// Whether the account is a panel administrator.
    #[serde(default)]
    pub admin: bool,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Interface language.
    #[serde(default)]
    pub language: String,
}

/// A server as seen by a user with access to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientServer {
    /// Whether the key's owner owns the server, as opposed to being a subuser.
    #[serde(default)]
    pub server_owner: bool,
    /// Short identifier used in client-scope paths.
    pub identifier: String,
    /// Numeric panel id.
    #[serde(default)]
    pub internal_id: Option<u64>,
    /// Server UUID.
    pub uuid: ServerUuid,
    /// Display name.
    pub name: String,
    /// Node name.
    #[serde(default)]
    pub node: String,
    /// SFTP connection details.
    #[serde(default)]
    pub sftp_details: SftpDetails,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Resource limits.
    pub limits: Limits,
    /// Rendered startup command.
    #[serde(default)]
    pub invocation: String,
    /// Docker image.
    #[serde(default)]
    pub docker_image: String,
    /// Feature limits.
    pub feature_limits: FeatureLimits,
    /// Transitional status such as `installing`, absent when idle.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the server is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Whether the server is installing.
    #[serde(default)]
    pub is_installing: bool,
    /// Whether the server is being transferred between nodes.
    #[serde(default)]
    pub is_transferring: bool,
}

/// SFTP endpoint of a server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SftpDetails {
    /// Host or IP address.
    #[serde(default)]
    pub ip: String,
    /// Port.
    #[serde(default)]
    pub port: u16,
}

/// Live state of a server from `GET /servers/{identifier}/resources`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerResources {
    /// Daemon-reported state: `offline`, `starting`, `running` or `stopping`.
    pub current_state: String,
    /// Whether the server is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Resource usage counters.
    pub resources: ResourceUsage,
}

/// Resource usage counters of a running server.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceUsage {
    /// Memory in bytes.
    #[serde(default)]
    pub memory_bytes: u64,
    /// CPU usage in percent of a single thread.
    #[serde(default)]
    pub cpu_absolute: f64,
    /// Disk usage in bytes.
    #[serde(default)]
    pub disk_bytes: u64,
    /// Bytes received.
    #[serde(default)]
    pub network_rx_bytes: u64,
    /// Bytes sent.
    #[serde(default)]
    pub network_tx_bytes: u64,
    /// Uptime in milliseconds.
    #[serde(default)]
    pub uptime: u64,
}

/// Power action sent to a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSignal {
    /// Start the server
    Start,
    /// Stop the server gracefully
    Stop,
    /// Stop then start the server
    Restart,
    /// Terminate the server process immediately
    Kill,
}

impl PowerSignal {
    /// Returns the signal name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
        }
    }
}

impl fmt::Display for PowerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /servers/{identifier}/power`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PowerRequest {
    /// Power action.
    pub signal: PowerSignal,
}

/// Body of `POST /servers/{identifier}/command`.
#[derive(Debug, Clone, Serialize, Validate, PartialEq, Eq)]
pub struct CommandRequest {
    /// Console command, without a trailing newline.
    #[validate(length(min = 1, message = "a command is required"))]
    pub command: String,
}
