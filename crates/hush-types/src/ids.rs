//! Platform identifiers.
//!
//! The relay never interprets these values; they are opaque tokens handed
//! to it by the chat platform (guild, member, channel and message ids).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! platform_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw platform identifier without validation.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse a platform identifier, rejecting blank input.
            pub fn parse(id: &str) -> Result<Self, TypeError> {
                let id = id.trim();
                if id.is_empty() {
                    return Err(TypeError::EmptyId($label));
                }
                Ok(Self(id.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

platform_id!(
    /// The external grouping (server/guild) quotas are scoped to.
    CommunityId,
    "community"
);
platform_id!(
    /// A community member submitting confessions or running admin commands.
    UserId,
    "user"
);
platform_id!(
    /// The channel confessions are published to.
    SurfaceId,
    "surface"
);
platform_id!(
    /// A message published on a surface.
    PostId,
    "post"
);
