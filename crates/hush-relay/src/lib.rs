//! Quota-and-posting core of the Hush confession relay.
//!
//! Users submit confessions through the chat platform; the relay posts them
//! to a shared channel without author identity while enforcing a
//! per-identity quota. Three things have to stay consistent under
//! concurrent submissions:
//!
//! - the quota check and increment for an identity,
//! - the handle to the last published post,
//! - the invitation button, which must move from that post to the new one.
//!
//! All of it lives in one [`BotState`] behind one [`StateGuard`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hush_crypto::IdentityHasher;
//! use hush_relay::{ConfessionRelay, InMemorySurface, RelayConfig};
//! use hush_types::{CommunityId, SurfaceId, UserId};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let config = RelayConfig {
//!         target_surface: Some(SurfaceId::new("confessions")),
//!         ..RelayConfig::default()
//!     };
//!     let surface = Arc::new(InMemorySurface::new());
//!     let hasher = IdentityHasher::with_random_salt();
//!     let relay = ConfessionRelay::new(&config, hasher, surface).unwrap();
//!     let receipt = relay
//!         .submit_confession(&CommunityId::new("guild"), &UserId::new("user"), "I skip tests")
//!         .await
//!         .unwrap();
//!     assert_eq!(receipt.number, 1);
//! });
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod publisher;
pub mod quota;
pub mod relay;
pub mod state;
pub mod surface;

pub use config::{RelayConfig, RenderConfig};
pub use error::{NotReadyReason, RelayError, RelayResult};
pub use memory::{InMemorySurface, StoredPost, SurfaceCall};
pub use publisher::{CleanupOutcome, ConfessionPublisher, PublishReceipt, CONFESS_BUTTON_ID};
pub use quota::{QuotaDecision, QuotaTracker};
pub use relay::{ConfessionRelay, SubmissionOutcome};
pub use state::{BotState, StateGuard, StateLock, StateSnapshot};
pub use surface::{MessagingSurface, SurfaceError, SurfaceResult};
