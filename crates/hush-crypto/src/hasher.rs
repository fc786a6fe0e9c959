use hush_types::{CommunityId, IdentityKey, UserId};

use crate::salt::ProcessSalt;

/// Derives [`IdentityKey`]s from (community, user) pairs.
///
/// The digest is BLAKE3 over a domain tag, the length-prefixed community
/// and user ids, and the process salt. Same inputs and same salt instance
/// always give the same key.
#[derive(Clone, Debug)]
pub struct IdentityHasher {
    salt: ProcessSalt,
}

impl IdentityHasher {
    const DOMAIN: &'static [u8] = b"hush-identity-v1:";

    pub fn new(salt: ProcessSalt) -> Self {
        Self { salt }
    }

    /// Hasher backed by a freshly generated process salt.
    pub fn with_random_salt() -> Self {
        Self::new(ProcessSalt::generate())
    }

    /// Derive the quota key for `user` in `community`.
    pub fn derive(&self, community: &CommunityId, user: &UserId) -> IdentityKey {
        let mut hasher = blake3::Hasher::new();
        hasher.update(Self::DOMAIN);
        update_prefixed(&mut hasher, community.as_str().as_bytes());
        update_prefixed(&mut hasher, user.as_str().as_bytes());
        hasher.update(self.salt.as_bytes());
        IdentityKey::from_digest(*hasher.finalize().as_bytes())
    }
}

/// Length first, so no id can run into the next one.
fn update_prefixed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
