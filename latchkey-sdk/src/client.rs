//! Provisioning client facade.
//!
//! Every operation follows the same path: seal the payload into an
//! encrypted envelope, POST it to the operation's endpoint, open the reply,
//! coerce it into the requested shape. [`ProvisioningClient::send`] exposes
//! that path with every failure kind inspectable; the named operation
//! methods flatten it to the service's fail-closed contract, where any
//! failure observes as `false` or `None` after being logged.

use crate::config::ClientConfig;
use crate::model::User;
use crate::transport::{HttpTransport, Transport};
use latchkey_core::{envelope, KeyPair, Result, RsaCipher, TargetShape};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, warn};

/// One provisioning operation, named by its URL suffix on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddUser,
    EditUser,
    DeleteUser,
    SuspendUser,
    ResendActivationEmail,
    RegisterPublicKey,
    IsUserExists,
    AddGroup,
    DeleteGroup,
    AssignGroupMember,
    UnassignGroupMember,
    PostRole,
    GetRoles,
    DeleteRole,
    AssignToRole,
    GetAssignedToRole,
}

impl Operation {
    /// URL path suffix joined onto the provisioning base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::AddUser => "AddUser",
            Self::EditUser => "EditUser",
            Self::DeleteUser => "DeleteUser",
            Self::SuspendUser => "SuspendUser",
            Self::ResendActivationEmail => "ResendActivationEmail",
            Self::RegisterPublicKey => "PKReg",
            Self::IsUserExists => "IsUserExist",
            Self::AddGroup => "AddGroup",
            Self::DeleteGroup => "DeleteGroup",
            Self::AssignGroupMember => "AssignGroupMember",
            Self::UnassignGroupMember => "UnassignGroupMember",
            Self::PostRole => "PostRole",
            Self::GetRoles => "GetRoles",
            Self::DeleteRole => "DeleteRole",
            Self::AssignToRole => "AssignToRole",
            Self::GetAssignedToRole => "GetAssignedToRole",
        }
    }
}

/// Client for the provisioning API.
///
/// Holds the immutable configuration, the cipher built from the registered
/// key pair, and the transport. All state is read-only after construction,
/// so one client may serve concurrent calls.
pub struct ProvisioningClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    cipher: RsaCipher,
    transport: T,
}

impl ProvisioningClient<HttpTransport> {
    /// Build a client from configuration, loading the key pair from the
    /// configured files.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let keys = KeyPair::from_files(&config.public_key_file, &config.private_key_file)?;
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, keys, transport))
    }
}

impl<T: Transport> ProvisioningClient<T> {
    /// Build a client over an explicit key pair and transport.
    pub fn with_transport(config: ClientConfig, keys: KeyPair, transport: T) -> Self {
        Self {
            config,
            cipher: RsaCipher::new(keys),
            transport,
        }
    }

    /// Seal, send, open, coerce. `Ok(None)` means the reply carried no
    /// payload; every failure kind is inspectable in the `Err`.
    pub async fn send<P, R>(&self, op: Operation, payload: &P) -> Result<Option<R>>
    where
        P: Serialize + ?Sized,
        R: TargetShape,
    {
        let request = envelope::seal(payload, &self.config.api_key, &self.cipher)?;
        let url = self.config.endpoint(op)?;
        let reply = self.transport.post(&url, &request).await?;
        envelope::open_as(&reply, &self.cipher)
    }

    /// Checks whether a user exists.
    pub async fn is_user_exists(&self, email: &str) -> bool {
        self.send_flag(Operation::IsUserExists, email).await
    }

    /// Adds a user.
    pub async fn add_user(&self, user: &User) -> bool {
        self.send_flag(Operation::AddUser, user).await
    }

    /// Edits a user.
    pub async fn edit_user(&self, user: &User) -> bool {
        self.send_flag(Operation::EditUser, user).await
    }

    /// Suspends a user.
    pub async fn suspend_user(&self, email: &str) -> bool {
        self.send_flag(Operation::SuspendUser, email).await
    }

    /// Deletes a user.
    pub async fn delete_user(&self, email: &str) -> bool {
        self.send_flag(Operation::DeleteUser, email).await
    }

    /// Resends the activation email for a user.
    pub async fn resend_activation_email(&self, email: &str) -> bool {
        self.send_flag(Operation::ResendActivationEmail, email).await
    }

    /// Registers the client's public key with the service.
    pub async fn register_public_key(&self, registration: &Map<String, Value>) -> bool {
        self.send_flag(Operation::RegisterPublicKey, registration).await
    }

    /// Adds a group, e.g. `{"Name": "...", "OrganizationalUnit": "..."}`.
    /// Returns the new group's guid.
    pub async fn add_group(&self, group: &Map<String, Value>) -> Option<String> {
        self.send_or_log(Operation::AddGroup, group).await
    }

    /// Deletes a group by name.
    pub async fn delete_group(&self, group: &str) -> bool {
        self.send_flag(Operation::DeleteGroup, group).await
    }

    /// Assigns a member, e.g. `{"GroupName": "...", "MemberName": "..."}`.
    pub async fn assign_group_member(&self, member: &Map<String, Value>) -> bool {
        self.send_flag(Operation::AssignGroupMember, member).await
    }

    /// Removes a member, e.g. `{"GroupName": "...", "MemberName": "..."}`.
    pub async fn unassign_group_member(&self, member: &Map<String, Value>) -> bool {
        self.send_flag(Operation::UnassignGroupMember, member).await
    }

    /// Creates or updates a role, e.g. `{"Id": "...", "Name": "..."}`.
    /// Returns the role's guid.
    pub async fn post_role(&self, role: &Map<String, Value>) -> Option<String> {
        self.send_or_log(Operation::PostRole, role).await
    }

    /// Lists roles for a page request, e.g. `{"Size": 10, "Offset": 0}`.
    pub async fn get_roles(&self, page: &Map<String, Value>) -> Option<Map<String, Value>> {
        self.send_or_log(Operation::GetRoles, page).await
    }

    /// Deletes a role by guid.
    pub async fn delete_role(&self, role_guid: &str) -> bool {
        self.send_flag(Operation::DeleteRole, role_guid).await
    }

    /// Assigns users and groups to a role, e.g.
    /// `{"Code": "...", "Users": [...], "Groups": [...]}`.
    pub async fn assign_to_role(&self, items: &Map<String, Value>) -> bool {
        self.send_flag(Operation::AssignToRole, items).await
    }

    /// Returns the users and groups assigned to a role.
    pub async fn get_assigned_to_role(&self, role_guid: &str) -> Option<Map<String, Value>> {
        self.send_or_log(Operation::GetAssignedToRole, role_guid).await
    }

    /// Fail-closed boolean call: a mapping reply's `Succeeded` flag, with
    /// every failure observing as `false`.
    async fn send_flag<P>(&self, op: Operation, payload: &P) -> bool
    where
        P: Serialize + ?Sized,
    {
        match self.send::<P, Map<String, Value>>(op, payload).await {
            Ok(Some(reply)) => match envelope::succeeded(&reply) {
                Ok(flag) => flag,
                Err(err) => {
                    error!(op = op.path(), %err, "malformed provisioning reply");
                    false
                }
            },
            Ok(None) => {
                warn!(op = op.path(), "provisioning reply carried no payload");
                false
            }
            Err(err) => {
                error!(op = op.path(), %err, "provisioning call failed");
                false
            }
        }
    }

    /// Fail-closed value call: every failure observes as `None`.
    async fn send_or_log<P, R>(&self, op: Operation, payload: &P) -> Option<R>
    where
        P: Serialize + ?Sized,
        R: TargetShape,
    {
        match self.send::<P, R>(op, payload).await {
            Ok(result) => result,
            Err(err) => {
                error!(op = op.path(), %err, "provisioning call failed");
                None
            }
        }
    }
}
