//! Foundation types for the Hush confession relay.
//!
//! Every other Hush crate depends on `hush-types` for the shared vocabulary
//! between the relay core and the chat platform it talks to.
//!
//! # Key Types
//!
//! - [`CommunityId`], [`UserId`]: platform identifiers of the submitter
//! - [`SurfaceId`], [`PostId`]: destination channel and published message
//! - [`IdentityKey`]: salted one-way key used for quota bookkeeping
//! - [`PostContent`]: what gets rendered on the shared channel

pub mod error;
pub mod identity;
pub mod ids;
pub mod post;

pub use error::TypeError;
pub use identity::IdentityKey;
pub use ids::{CommunityId, PostId, SurfaceId, UserId};
pub use post::{Affordance, Embed, PostContent, PostEdit};
