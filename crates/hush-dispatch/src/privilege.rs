use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use hush_types::{CommunityId, UserId};

/// Answers whether a member may run administrative commands.
///
/// Backed by the platform's membership/role service in production. Lookup
/// failures should answer `false`.
#[async_trait]
pub trait PrivilegeCheck: Send + Sync {
    async fn is_privileged(&self, community: &CommunityId, user: &UserId) -> bool;
}

/// Fixed privilege table: a per-community owner plus global administrators.
#[derive(Clone, Debug, Default)]
pub struct StaticPrivileges {
    owners: HashMap<CommunityId, UserId>,
    admins: HashSet<UserId>,
}

impl StaticPrivileges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, community: CommunityId, owner: UserId) -> Self {
        self.owners.insert(community, owner);
        self
    }

    pub fn with_admin(mut self, admin: UserId) -> Self {
        self.admins.insert(admin);
        self
    }
}

#[async_trait]
impl PrivilegeCheck for StaticPrivileges {
    async fn is_privileged(&self, community: &CommunityId, user: &UserId) -> bool {
        self.owners.get(community) == Some(user) || self.admins.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn owner_is_privileged_in_own_community_only() {
        let privileges = StaticPrivileges::new().with_owner("g1".into(), "alice".into());
        assert!(privileges.is_privileged(&"g1".into(), &"alice".into()).await);
        assert!(!privileges.is_privileged(&"g2".into(), &"alice".into()).await);
    }

    #[tokio::test]
    async fn admins_are_privileged_everywhere() {
        let privileges = StaticPrivileges::new().with_admin("root".into());
        assert!(privileges.is_privileged(&"g1".into(), &"root".into()).await);
        assert!(!privileges.is_privileged(&"g1".into(), &"bob".into()).await);
    }
}
