use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    pub bind_addr: SocketAddr,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
        }
    }
}

impl StatusConfig {
    pub fn from_bind(bind: &str) -> ServerResult<Self> {
        let bind_addr = bind
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid bind address {bind:?}: {e}")))?;
        Ok(Self { bind_addr })
    }
}
