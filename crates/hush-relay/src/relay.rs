use std::sync::Arc;

use tracing::{debug, info, warn};

use hush_crypto::IdentityHasher;
use hush_types::{CommunityId, SurfaceId, UserId};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::publisher::{ConfessionPublisher, PublishReceipt};
use crate::state::{BotState, StateGuard, StateSnapshot};
use crate::surface::MessagingSurface;

/// Outcome of a submission as seen by the dispatcher.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Posted(PublishReceipt),
    /// Refused by policy: not ready, over quota, or invalid text.
    Denied(RelayError),
    /// The platform failed to take the post.
    Failed(RelayError),
}

impl From<RelayResult<PublishReceipt>> for SubmissionOutcome {
    fn from(result: RelayResult<PublishReceipt>) -> Self {
        match result {
            Ok(receipt) => Self::Posted(receipt),
            Err(e) if e.is_denial() => Self::Denied(e),
            Err(e) => Self::Failed(e),
        }
    }
}

/// The confession relay: quota tracking and anonymous publishing behind a
/// single state guard.
///
/// Administrative operations do not check privileges; the caller is
/// expected to have done so.
pub struct ConfessionRelay {
    state: Arc<StateGuard>,
    hasher: IdentityHasher,
    publisher: ConfessionPublisher,
    max_text_len: usize,
}

impl ConfessionRelay {
    pub fn new(
        config: &RelayConfig,
        hasher: IdentityHasher,
        surface: Arc<dyn MessagingSurface>,
    ) -> RelayResult<Self> {
        config.validate()?;
        let state = BotState::from_config(config)?;
        info!(
            active = config.active,
            max_allowed = config.max_allowed,
            target = ?config.target_surface,
            "relay started"
        );
        Ok(Self {
            state: Arc::new(StateGuard::new(state)),
            hasher,
            publisher: ConfessionPublisher::new(surface, config.render.clone()),
            max_text_len: config.max_text_len,
        })
    }

    /// Shared handle to the guarded state, for read-only status queries.
    pub fn state(&self) -> Arc<StateGuard> {
        Arc::clone(&self.state)
    }

    /// Publish `text` anonymously on behalf of `user` in `community`.
    ///
    /// Slash command, button and modal flows all end here.
    pub async fn submit_confession(
        &self,
        community: &CommunityId,
        user: &UserId,
        text: &str,
    ) -> RelayResult<PublishReceipt> {
        let text = self.validate_text(text)?;
        let key = self.hasher.derive(community, user);

        let mut state = self.state.lock().await;
        let result = self.publisher.publish(&mut state, key, text).await;
        drop(state);

        match &result {
            Ok(receipt) => info!(
                %community,
                post = %receipt.post,
                number = receipt.number,
                clean = receipt.cleanup.is_clean(),
                "confession published"
            ),
            Err(e) if e.is_denial() => debug!(%community, reason = %e, "confession refused"),
            Err(e) => warn!(%community, error = %e, "confession delivery failed"),
        }
        result
    }

    pub async fn set_target_surface(&self, surface: SurfaceId) {
        info!(%surface, "target surface changed");
        self.state.lock().await.set_target_surface(surface);
    }

    pub async fn set_active(&self, active: bool) {
        info!(active, "submissions toggled");
        self.state.lock().await.set_active(active);
    }

    pub async fn set_max_allowed(&self, max_allowed: u32) -> RelayResult<()> {
        self.state.lock().await.quota_mut().set_max(max_allowed)?;
        info!(max_allowed, "confession limit changed");
        Ok(())
    }

    pub async fn reset_quota(&self) {
        self.state.lock().await.quota_mut().reset();
        info!("quota table reset");
    }

    /// Last published snapshot. Never waits behind an in-flight publish.
    pub fn status(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    fn validate_text<'a>(&self, text: &'a str) -> RelayResult<&'a str> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RelayError::InvalidSubmission("the confession is empty".into()));
        }
        if text.chars().count() > self.max_text_len {
            return Err(RelayError::InvalidSubmission(format!(
                "the confession is longer than {} characters",
                self.max_text_len
            )));
        }
        Ok(text)
    }
}
