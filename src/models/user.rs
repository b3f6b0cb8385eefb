use serde::{Deserialize, Serialize};

/// Capability flags attached to a connected user. Both start out false and
/// are only ever set, never revoked, for the lifetime of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub send_gateway: bool,
    pub disconnect_users: bool,
}

impl PermissionSet {
    pub fn can_send_gateway(&self) -> bool {
        self.send_gateway
    }

    pub fn can_disconnect_users(&self) -> bool {
        self.disconnect_users
    }

    pub fn grant_all(&mut self) {
        self.send_gateway = true;
        self.disconnect_users = true;
    }
}

/// Wire-visible snapshot of a connected user. The id is assigned by the
/// registry and stays stable for the connection lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: u64,
    pub address: String,
    pub permissions: PermissionSet,
}
