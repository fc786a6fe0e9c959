use std::sync::Arc;

use tracing::{debug, warn};

use hush_types::{Affordance, Embed, IdentityKey, PostContent, PostEdit, PostId, SurfaceId};

use crate::config::RenderConfig;
use crate::error::{RelayError, RelayResult};
use crate::quota::QuotaDecision;
use crate::state::BotState;
use crate::surface::{MessagingSurface, SurfaceError};

/// `custom_id` of the button inviting the next confession.
pub const CONFESS_BUTTON_ID: &str = "confess_button";

/// What happened to the button on the previously published post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No earlier post was recorded.
    NotNeeded,
    /// The button was removed from `post`.
    Removed { post: PostId },
    /// `post` still shows a stale button.
    Failed { post: PostId, error: SurfaceError },
}

impl CleanupOutcome {
    /// `false` only when a stale button was left behind.
    pub fn is_clean(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Receipt for a published confession.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    pub post: PostId,
    pub surface: SurfaceId,
    /// Display number shown in the embed title.
    pub number: u64,
    /// Confessions the submitter has left before the next reset.
    pub remaining: u32,
    pub cleanup: CleanupOutcome,
}

/// Publishes anonymous confessions and moves the invitation button forward.
pub struct ConfessionPublisher {
    surface: Arc<dyn MessagingSurface>,
    render: RenderConfig,
}

impl ConfessionPublisher {
    pub fn new(surface: Arc<dyn MessagingSurface>, render: RenderConfig) -> Self {
        Self { surface, render }
    }

    /// Build the post for confession number `number`.
    pub fn render(&self, number: u64, text: &str) -> PostContent {
        PostContent {
            content: String::new(),
            embeds: vec![Embed {
                title: format!("{} #{number}", self.render.title_prefix),
                description: text.to_string(),
            }],
            components: vec![Affordance::new(&self.render.button_label, CONFESS_BUTTON_ID)],
        }
    }

    /// Check readiness and quota, then publish `text` for `key`.
    ///
    /// Taking `&mut BotState` means the caller holds the state guard for the
    /// whole sequence. The quota increment is committed before delivery and
    /// is kept if delivery fails.
    pub async fn publish(
        &self,
        state: &mut BotState,
        key: IdentityKey,
        text: &str,
    ) -> RelayResult<PublishReceipt> {
        let target = state.readiness().map_err(RelayError::NotReady)?;

        let remaining = match state.quota_mut().check_and_increment(key) {
            QuotaDecision::Allowed { remaining, .. } => remaining,
            QuotaDecision::Denied { used, max_allowed } => {
                debug!(%key, used, max_allowed, "quota exhausted");
                return Err(RelayError::QuotaExceeded);
            }
        };

        let cleanup = match state.last_published().cloned() {
            Some(previous) => self.retire_button(&target, previous).await,
            None => CleanupOutcome::NotNeeded,
        };

        let number = state.published_count() + 1;
        let post = self
            .surface
            .create_post(&target, self.render(number, text))
            .await?;
        state.record_publish(post.clone());

        Ok(PublishReceipt {
            post,
            surface: target,
            number,
            remaining,
            cleanup,
        })
    }

    /// Remove the button from `post`, keeping its content and embeds.
    async fn retire_button(&self, surface: &SurfaceId, post: PostId) -> CleanupOutcome {
        let result = match self.surface.fetch_post(surface, &post).await {
            Ok(current) => {
                self.surface
                    .edit_post(surface, &post, PostEdit::strip_affordances(&current))
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => CleanupOutcome::Removed { post },
            Err(error) => {
                warn!(%post, %error, "could not remove button from previous confession");
                CleanupOutcome::Failed { post, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use crate::memory::{InMemorySurface, SurfaceCall};

    fn chan() -> SurfaceId {
        SurfaceId::new("chan-1")
    }

    fn setup(max_allowed: u32) -> (Arc<InMemorySurface>, ConfessionPublisher, BotState) {
        let surface = Arc::new(InMemorySurface::new());
        let publisher = ConfessionPublisher::new(surface.clone(), RenderConfig::default());
        let config = RelayConfig {
            max_allowed,
            target_surface: Some(chan()),
            ..RelayConfig::default()
        };
        (surface, publisher, BotState::from_config(&config).unwrap())
    }

    fn key(n: u8) -> IdentityKey {
        IdentityKey::from_digest([n; 32])
    }

    #[test]
    fn render_numbers_title_and_attaches_button() {
        let (_, publisher, _) = setup(2);
        let post = publisher.render(7, "I like tabs");
        assert_eq!(post.embeds[0].title, "Confession #7");
        assert_eq!(post.embeds[0].description, "I like tabs");
        assert!(post.has_affordance(CONFESS_BUTTON_ID));
    }

    #[tokio::test]
    async fn first_publish_needs_no_cleanup() {
        let (surface, publisher, mut state) = setup(2);
        let receipt = publisher.publish(&mut state, key(1), "first").await.unwrap();
        assert_eq!(receipt.cleanup, CleanupOutcome::NotNeeded);
        assert_eq!(receipt.number, 1);
        assert_eq!(receipt.remaining, 1);
        assert_eq!(state.last_published(), Some(&receipt.post));
        assert_eq!(surface.posts(&chan()).len(), 1);
    }

    #[tokio::test]
    async fn second_publish_strips_first_before_creating() {
        let (surface, publisher, mut state) = setup(5);
        let p1 = publisher.publish(&mut state, key(1), "one").await.unwrap().post;
        let r2 = publisher.publish(&mut state, key(2), "two").await.unwrap();
        let p2 = r2.post.clone();

        assert_eq!(r2.cleanup, CleanupOutcome::Removed { post: p1.clone() });
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::Create {
                    surface: chan(),
                    post: Some(p1.clone()),
                },
                SurfaceCall::Fetch {
                    surface: chan(),
                    post: p1.clone(),
                },
                SurfaceCall::Edit {
                    surface: chan(),
                    post: p1.clone(),
                },
                SurfaceCall::Create {
                    surface: chan(),
                    post: Some(p2.clone()),
                },
            ]
        );
        let old = surface.post(&p1).unwrap();
        assert!(old.content.components.is_empty());
        assert_eq!(old.content.embeds[0].description, "one");
        assert!(surface.post(&p2).unwrap().content.has_affordance(CONFESS_BUTTON_ID));
        assert_eq!(state.last_published(), Some(&p2));
    }

    #[tokio::test]
    async fn failed_cleanup_is_reported_but_post_goes_out() {
        let (surface, publisher, mut state) = setup(5);
        let p1 = publisher.publish(&mut state, key(1), "one").await.unwrap().post;
        surface.fail_next_edits(1);
        let r2 = publisher.publish(&mut state, key(1), "two").await.unwrap();
        assert!(!r2.cleanup.is_clean());
        assert!(matches!(r2.cleanup, CleanupOutcome::Failed { ref post, .. } if *post == p1));
        assert!(surface.post(&p1).unwrap().content.has_affordance(CONFESS_BUTTON_ID));
        assert_eq!(state.last_published(), Some(&r2.post));
    }

    #[tokio::test]
    async fn failed_fetch_counts_as_failed_cleanup() {
        let (surface, publisher, mut state) = setup(5);
        publisher.publish(&mut state, key(1), "one").await.unwrap();
        surface.fail_next_fetches(1);
        let r2 = publisher.publish(&mut state, key(1), "two").await.unwrap();
        assert!(matches!(r2.cleanup, CleanupOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn quota_denial_has_no_side_effects() {
        let (surface, publisher, mut state) = setup(1);
        publisher.publish(&mut state, key(1), "one").await.unwrap();
        let calls_before = surface.calls().len();
        let err = publisher.publish(&mut state, key(1), "two").await.unwrap_err();
        assert!(matches!(err, RelayError::QuotaExceeded));
        assert_eq!(surface.calls().len(), calls_before);
        assert_eq!(state.published_count(), 1);
    }

    #[tokio::test]
    async fn not_ready_checked_before_quota() {
        let (surface, publisher, mut state) = setup(1);
        state.set_active(false);
        let err = publisher.publish(&mut state, key(1), "one").await.unwrap_err();
        assert!(matches!(err, RelayError::NotReady(_)));
        assert_eq!(state.quota().usage(&key(1)), 0);
        assert!(surface.calls().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_keeps_quota_and_handle() {
        let (surface, publisher, mut state) = setup(2);
        let p1 = publisher.publish(&mut state, key(1), "one").await.unwrap().post;
        surface.fail_next_creates(1);
        let err = publisher.publish(&mut state, key(1), "two").await.unwrap_err();
        assert!(matches!(err, RelayError::DeliveryFailed(_)));
        assert_eq!(state.quota().usage(&key(1)), 2);
        assert_eq!(state.last_published(), Some(&p1));
        assert_eq!(state.published_count(), 1);
    }
}
