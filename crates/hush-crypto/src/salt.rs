use std::fmt;

use rand::RngCore;

/// Random salt generated once per process.
///
/// Never persisted and never printed. Dropping it (a restart) makes every
/// previously derived identity key unreachable.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcessSalt {
    bytes: [u8; ProcessSalt::LEN],
}

impl ProcessSalt {
    /// Salt length in bytes.
    pub const LEN: usize = 16;

    /// Draw a fresh salt from the OS-seeded thread RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Fixed salt for tests and reproducible simulations.
    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ProcessSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProcessSalt(<redacted>)")
    }
}
