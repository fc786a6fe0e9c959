use std::fmt;

/// Salted one-way key standing in for a (community, user) pair.
///
/// Quota bookkeeping is keyed by `IdentityKey` so the usage table never holds
/// raw user identifiers. Keys are produced by the identity hasher in
/// `hush-crypto`; this type only carries the 32-byte digest.
///
/// `Debug` and `Display` print a short prefix only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    digest: [u8; 32],
}

impl IdentityKey {
    /// Length of the text token produced by [`Self::to_token`].
    pub const TOKEN_LEN: usize = 64;

    /// Create from a raw digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Fixed-length text token (64 lowercase hex characters).
    pub fn to_token(&self) -> String {
        hex::encode(self.digest)
    }

    /// Short form for logs: `id:` followed by 8 hex characters.
    pub fn short_id(&self) -> String {
        format!("id:{}", hex::encode(&self.digest[..4]))
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({})", self.short_id())
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_id())
    }
}
