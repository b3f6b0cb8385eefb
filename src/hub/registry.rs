use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::models::user::{PermissionSet, UserPublic};

/// One connected user. The sender is the connection's only write handle;
/// dropping it tells the connection task to shut the socket down.
#[derive(Debug)]
pub struct UserEntry {
    pub id: u64,
    pub address: String,
    pub permissions: PermissionSet,
    pub tx: mpsc::UnboundedSender<String>,
}

impl UserEntry {
    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            address: self.address.clone(),
            permissions: self.permissions,
        }
    }

    /// Fire-and-forget delivery. A closed channel means the connection is
    /// already going away; nothing to do about it here.
    pub fn send(&self, frame: String) {
        let _ = self.tx.send(frame);
    }
}

/// Active-user set. Ids come from a process-lifetime counter and are never
/// reused after a disconnect, so admin targets can't silently alias.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<u64, UserEntry>,
    next_id: u64,
}

impl UserRegistry {
    pub fn register(&mut self, address: String, tx: mpsc::UnboundedSender<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.users.insert(
            id,
            UserEntry {
                id,
                address,
                permissions: PermissionSet::default(),
                tx,
            },
        );
        id
    }

    pub fn lookup(&self, id: u64) -> Option<&UserEntry> {
        self.users.get(&id)
    }

    pub fn lookup_mut(&mut self, id: u64) -> Option<&mut UserEntry> {
        self.users.get_mut(&id)
    }

    pub fn deregister(&mut self, id: u64) -> Option<UserEntry> {
        self.users.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserEntry> {
        self.users.values()
    }

    /// Snapshot of everyone connected, for fan-out and observation.
    pub fn all(&self) -> Vec<UserPublic> {
        self.users.values().map(UserEntry::public).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> mpsc::UnboundedSender<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        // Keep the receiver alive for the duration of the test scope.
        std::mem::forget(rx);
        tx
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut reg = UserRegistry::default();
        let a = reg.register("127.0.0.1:1000".to_string(), channel());
        let b = reg.register("127.0.0.1:1001".to_string(), channel());
        assert_eq!(a, 0);
        assert_eq!(b, 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_deregister() {
        let mut reg = UserRegistry::default();
        let a = reg.register("127.0.0.1:1000".to_string(), channel());
        let _b = reg.register("127.0.0.1:1001".to_string(), channel());
        reg.deregister(a).unwrap();
        let c = reg.register("127.0.0.1:1002".to_string(), channel());
        assert_eq!(c, 2, "a freed id must never be handed out again");
    }

    #[test]
    fn test_lookup_unknown_id_is_none() {
        let reg = UserRegistry::default();
        assert!(reg.lookup(42).is_none());
    }

    #[test]
    fn test_deregister_shrinks_active_set() {
        let mut reg = UserRegistry::default();
        let a = reg.register("127.0.0.1:1000".to_string(), channel());
        let b = reg.register("127.0.0.1:1001".to_string(), channel());
        assert_eq!(reg.len(), 2);
        reg.deregister(a).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.lookup(a).is_none());
        assert!(reg.lookup(b).is_some());
        // Double deregister is a no-op.
        assert!(reg.deregister(a).is_none());
    }

    #[test]
    fn test_all_snapshots_public_view() {
        let mut reg = UserRegistry::default();
        let id = reg.register("10.0.0.1:5".to_string(), channel());
        let all = reg.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].address, "10.0.0.1:5");
    }
}
