//! Identity hashing for the Hush confession relay.
//!
//! Quota counters are keyed by a salted BLAKE3 digest of the
//! (community, user) pair. The salt is drawn once per process and never
//! leaves memory, so keys cannot be recomputed from a user id after a
//! restart (and quotas reset with it).
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod hasher;
pub mod salt;

pub use hasher::IdentityHasher;
pub use salt::ProcessSalt;
