//! Application-scope records and request payloads.

use chrono::{DateTime, Utc};
use ptero_core::query::QueryParams;
use ptero_core::types::{FeatureLimits, FieldSubset, Limits};
use ptero_core::uuid::{ServerUuid, UserUuid};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// Representation of a server as returned by the application API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    /// Numeric panel id.
    pub id: u64,
    /// Identifier assigned by an external system.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Server UUID.
    pub uuid: ServerUuid,
    /// Short identifier used by the client API.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Transitional status such as `installing`, absent when idle.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the server is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// Resource limits.
    pub limits: Limits,
    /// Feature limits.
    pub feature_limits: FeatureLimits,
    /// Owning user id.
    pub user: u64,
    /// Node id.
    pub node: u64,
    /// Primary allocation id.
    pub allocation: u64,
    /// Nest id.
    pub nest: u64,
    /// Egg id.
    pub egg: u64,
    /// Container configuration.
    #[serde(default)]
    pub container: Container,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Container configuration of a server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Container {
    /// Startup command template.
    #[serde(default)]
    pub startup_command: String,
    /// Docker image.
    #[serde(default)]
    pub image: String,
    /// Install state, 1 once installed.
    #[serde(default)]
    pub installed: i64,
    /// Egg variables.
    #[serde(default)]
    pub environment: HashMap<String, Value>,
}

impl Server {
    /// Project the build-related fields, e.g. to tweak limits and send them back.
    #[must_use]
    pub fn to_build(&self) -> ServerBuild {
        ServerBuild {
            allocation: Some(self.allocation),
            oom_disabled: Some(self.limits.oom_disabled),
            limits: Some(self.limits.clone()),
            add_allocations: None,
            remove_allocations: None,
            feature_limits: Some(self.feature_limits),
        }
    }

    /// Project the detail fields.
    #[must_use]
    pub fn to_details(&self) -> ServerDetails {
        ServerDetails {
            external_id: self.external_id.clone(),
            name: Some(self.name.clone()),
            user: Some(self.user),
            description: self.description.clone(),
        }
    }

    /// Project the startup fields.
    #[must_use]
    pub fn to_startup(&self) -> ServerStartup {
        ServerStartup {
            startup: Some(self.container.startup_command.clone()),
            environment: Some(self.container.environment.clone()),
            egg: Some(self.egg),
            image: Some(self.container.image.clone()),
            skip_scripts: None,
        }
    }
}

/// Build fields accepted by `PATCH /servers/{id}/build`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServerBuild {
    /// Primary allocation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<u64>,
    /// Whether the OOM killer is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oom_disabled: Option<bool>,
    /// Resource limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    /// Allocation ids to add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_allocations: Option<Vec<u64>>,
    /// Allocation ids to remove.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_allocations: Option<Vec<u64>>,
    /// Feature limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_limits: Option<FeatureLimits>,
}

impl FieldSubset for ServerBuild {
    const KIND: &'static str = "build";

    fn is_empty(&self) -> bool {
        self.allocation.is_none()
            && self.oom_disabled.is_none()
            && self.limits.is_none()
            && self.add_allocations.is_none()
            && self.remove_allocations.is_none()
            && self.feature_limits.is_none()
    }
}

/// Detail fields accepted by `PATCH /servers/{id}/details`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ServerDetails {
    /// Identifier assigned by an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<u64>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSubset for ServerDetails {
    const KIND: &'static str = "details";

    fn is_empty(&self) -> bool {
        self.external_id.is_none()
            && self.name.is_none()
            && self.user.is_none()
            && self.description.is_none()
    }
}

/// Startup fields accepted by `PATCH /servers/{id}/startup`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServerStartup {
    /// Startup command template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup: Option<String>,
    /// Egg variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, Value>>,
    /// Egg id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg: Option<u64>,
    /// Docker image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Skip the egg's install script when the egg changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_scripts: Option<bool>,
}

impl FieldSubset for ServerStartup {
    const KIND: &'static str = "startup";

    fn is_empty(&self) -> bool {
        self.startup.is_none()
            && self.environment.is_none()
            && self.egg.is_none()
            && self.image.is_none()
            && self.skip_scripts.is_none()
    }
}

/// Explicit allocation for a new server.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AllocationTarget {
    /// Primary allocation id.
    pub default: u64,
    /// Additional allocation ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<u64>,
}

/// Let the panel pick a node and allocation for a new server.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DeployTarget {
    /// Location ids to deploy into.
    pub locations: Vec<u64>,
    /// Require an IP not shared with other servers.
    pub dedicated_ip: bool,
    /// Acceptable ports or port ranges, e.g. `25565-25570`.
    pub port_range: Vec<String>,
}

/// Payload for `POST /servers`.
///
/// Either `allocation` or `deploy` must be set.
#[derive(Debug, Clone, Default, Serialize, Validate, PartialEq)]
#[validate(schema(function = "validate_server_target"))]
pub struct CreateServer {
    /// Identifier assigned by an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    #[validate(length(min = 1, max = 191))]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning user id.
    pub user: u64,
    /// Egg id.
    pub egg: u64,
    /// Docker image.
    pub docker_image: String,
    /// Startup command template.
    pub startup: String,
    /// Egg variables.
    pub environment: HashMap<String, Value>,
    /// Skip the egg's install script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_scripts: Option<bool>,
    /// Whether the OOM killer is disabled.
    pub oom_disabled: bool,
    /// Resource limits.
    pub limits: Limits,
    /// Feature limits.
    pub feature_limits: FeatureLimits,
    /// Explicit allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AllocationTarget>,
    /// Automatic deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployTarget>,
    /// Start the server once installation completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on_completion: Option<bool>,
}

fn validate_server_target(server: &CreateServer) -> Result<(), ValidationError> {
    if server.allocation.is_none() && server.deploy.is_none() {
        let mut err = ValidationError::new("allocation_or_deploy");
        err.message = Some("the allocation object or deploy object must be specified".into());
        return Err(err);
    }
    Ok(())
}

/// Query parameters for listing servers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServerListParams {
    /// Filter by name.
    pub name: Option<String>,
    /// Filter by UUID.
    pub uuid: Option<ServerUuid>,
    /// Filter by external id.
    pub external_id: Option<String>,
    /// Filter by Docker image.
    pub image: Option<String>,
    /// Sort key, prefix with `-` for descending.
    pub sort: Option<String>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ServerListParams {
    /// Convert the parameters into a query.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();

        params.push_opt("filter[name]", self.name.as_deref());
        params.push_opt("filter[uuid]", self.uuid.as_ref());
        params.push_opt("filter[external_id]", self.external_id.as_deref());
        params.push_opt("filter[image]", self.image.as_deref());
        params.push_opt("sort", self.sort.as_deref());
        params.push_opt("per_page", self.per_page);

        params
    }
}

/// Representation of a panel user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Numeric panel id.
    pub id: u64,
    /// Identifier assigned by an external system.
    #[serde(default)]
    pub external_id: Option<String>,
    /// User UUID.
    pub uuid: UserUuid,
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
    /// Whether the user is a panel administrator.
    #[serde(default)]
    pub root_admin: bool,
    /// Whether two-factor authentication is enabled.
    #[serde(rename = "2fa", default)]
    pub two_factor: bool,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /users`.
#[derive(Clone, Default, Serialize, Validate, PartialEq, Eq)]
pub struct CreateUser {
    /// Identifier assigned by an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Login name.
    #[validate(length(min = 1, max = 191))]
    pub username: String,
    /// First name.
    #[validate(length(min = 1, max = 191))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, max = 191))]
    pub last_name: String,
    /// Initial password; the panel emails a reset link when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Grant administrator rights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
    /// Interface language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("external_id", &self.external_id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("root_admin", &self.root_admin)
            .field("language", &self.language)
            .finish()
    }
}

/// Fields accepted by `PATCH /users/{id}`.
#[derive(Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateUser {
    /// Identifier assigned by an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Administrator rights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
    /// Interface language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("external_id", &self.external_id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("root_admin", &self.root_admin)
            .field("language", &self.language)
            .finish()
    }
}

impl FieldSubset for UpdateUser {
    const KIND: &'static str = "user";

    fn is_empty(&self) -> bool {
        self.external_id.is_none()
            && self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
            && self.root_admin.is_none()
            && self.language.is_none()
    }
}

/// Query parameters for listing users.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserListParams {
    /// Filter by email.
    pub email: Option<String>,
    /// Filter by UUID.
    pub uuid: Option<UserUuid>,
    /// Filter by username.
    pub username: Option<String>,
    /// Filter by external id.
    pub external_id: Option<String>,
    /// Sort key, prefix with `-` for descending.
    pub sort: Option<String>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl UserListParams {
    /// Convert the parameters into a query.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();

        params.push_opt("filter[email]", self.email.as_deref());
        params.push_opt("filter[uuid]", self.uuid.as_ref());
        params.push_opt("filter[username]", self.username.as_deref());
        params.push_opt("filter[external_id]", self.external_id.as_deref());
        params.push_opt("sort", self.sort.as_deref());
        params.push_opt("per_page", self.per_page);

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_server() -> CreateServer {
        CreateServer {
            name: "lobby".into(),
            user: 1,
            egg: 5,
            docker_image: "ghcr.io/pterodactyl/yolks:java_17".into(),
            startup: "java -jar {{SERVER_JARFILE}}".into(),
            ..CreateServer::default()
        }
    }

    #[test]
    fn create_server_requires_allocation_or_deploy() {
        assert!(create_server().validate().is_err());

        let with_allocation = CreateServer {
            allocation: Some(AllocationTarget {
                default: 12,
                additional: vec![],
            }),
            ..create_server()
        };
        assert!(with_allocation.validate().is_ok());

        let with_deploy = CreateServer {
            deploy: Some(DeployTarget {
                locations: vec![1],
                dedicated_ip: false,
                port_range: vec!["25565-25570".into()],
            }),
            ..create_server()
        };
        assert!(with_deploy.validate().is_ok());
    }

    #[test]
    fn create_server_omits_unset_optionals() {
        let payload = CreateServer {
            allocation: Some(AllocationTarget {
                default: 12,
                additional: vec![],
            }),
            ..create_server()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["allocation"], json!({"default": 12}));
        assert!(value.get("deploy").is_none());
        assert!(value.get("external_id").is_none());
        assert_eq!(value["limits"]["swap"], json!(0));
    }

    #[test]
    fn descriptors_track_field_presence() {
        assert!(ServerDetails::default().is_empty());
        assert!(ServerBuild::default().is_empty());
        assert!(ServerStartup::default().is_empty());
        assert!(UpdateUser::default().is_empty());

        // Zero values still count as present.
        let details = ServerDetails {
            user: Some(0),
            ..ServerDetails::default()
        };
        assert!(!details.is_empty());
        assert_eq!(serde_json::to_value(&details).unwrap(), json!({"user": 0}));
    }

    #[test]
    fn server_list_params_to_query() {
        let params = ServerListParams {
            name: Some("lobby".into()),
            per_page: Some(25),
            ..ServerListParams::default()
        };

        let pairs = params.to_query().into_pairs();
        assert!(pairs.contains(&("filter[name]", "lobby".into())));
        assert!(pairs.contains(&("per_page", "25".into())));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn user_list_params_to_query() {
        let params = UserListParams {
            email: Some("admin@example.com".into()),
            sort: Some("-id".into()),
            ..UserListParams::default()
        };

        let pairs = params.to_query().into_pairs();
        assert!(pairs.contains(&("filter[email]", "admin@example.com".into())));
        assert!(pairs.contains(&("sort", "-id".into())));
    }

    #[test]
    fn create_user_validates_email() {
        let user = CreateUser {
            email: "not-an-email".into(),
            username: "steve".into(),
            first_name: "Steve".into(),
            last_name: "Builder".into(),
            ..CreateUser::default()
        };
        assert!(user.validate().is_err());
    }

    #[test]
    fn user_debug_redacts_password() {
        let update = UpdateUser {
            password: Some("hunter2".into()),
            ..UpdateUser::default()
        };
        assert!(!format!("{update:?}").contains("hunter2"));
    }
}
