//! In-memory messaging surface for testing and local simulation.
//!
//! [`InMemorySurface`] keeps every post in a `HashMap` behind a `Mutex`,
//! records each call in order, and can be scripted to fail. Data is lost
//! when the surface is dropped.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use hush_types::{PostContent, PostEdit, PostId, SurfaceId};

use crate::surface::{MessagingSurface, SurfaceError, SurfaceResult};

/// One call made against the surface, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCall {
    Fetch { surface: SurfaceId, post: PostId },
    Edit { surface: SurfaceId, post: PostId },
    Create {
        surface: SurfaceId,
        post: Option<PostId>,
    },
}

/// A post as stored by the in-memory surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredPost {
    pub id: PostId,
    pub surface: SurfaceId,
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    posts: HashMap<PostId, StoredPost>,
    order: Vec<PostId>,
    calls: Vec<SurfaceCall>,
    fail_creates: u32,
    fail_fetches: u32,
    fail_edits: u32,
}

/// An in-memory implementation of [`MessagingSurface`].
#[derive(Debug, Default)]
pub struct InMemorySurface {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`, to widen race windows in tests.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Mutex::default(),
            latency: Some(latency),
        }
    }

    /// Make the next `n` post creations fail with a transport error.
    pub fn fail_next_creates(&self, n: u32) {
        self.lock().fail_creates = n;
    }

    /// Make the next `n` fetches fail with a transport error.
    pub fn fail_next_fetches(&self, n: u32) {
        self.lock().fail_fetches = n;
    }

    /// Make the next `n` edits fail with a transport error.
    pub fn fail_next_edits(&self, n: u32) {
        self.lock().fail_edits = n;
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().calls.clone()
    }

    /// Posts on `surface` in creation order.
    pub fn posts(&self, surface: &SurfaceId) -> Vec<StoredPost> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.posts.get(id))
            .filter(|p| &p.surface == surface)
            .cloned()
            .collect()
    }

    pub fn post(&self, id: &PostId) -> Option<StoredPost> {
        self.lock().posts.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn take_failure(budget: &mut u32, what: &str) -> SurfaceResult<()> {
    if *budget > 0 {
        *budget -= 1;
        return Err(SurfaceError::Transport(format!("injected {what} failure")));
    }
    Ok(())
}

#[async_trait]
impl MessagingSurface for InMemorySurface {
    async fn fetch_post(&self, surface: &SurfaceId, post: &PostId) -> SurfaceResult<PostContent> {
        self.delay().await;
        let mut inner = self.lock();
        inner.calls.push(SurfaceCall::Fetch {
            surface: surface.clone(),
            post: post.clone(),
        });
        take_failure(&mut inner.fail_fetches, "fetch")?;
        match inner.posts.get(post) {
            Some(stored) if &stored.surface == surface => Ok(stored.content.clone()),
            _ => Err(SurfaceError::NotFound {
                surface: surface.clone(),
                post: post.clone(),
            }),
        }
    }

    async fn edit_post(
        &self,
        surface: &SurfaceId,
        post: &PostId,
        edit: PostEdit,
    ) -> SurfaceResult<()> {
        self.delay().await;
        let mut inner = self.lock();
        inner.calls.push(SurfaceCall::Edit {
            surface: surface.clone(),
            post: post.clone(),
        });
        take_failure(&mut inner.fail_edits, "edit")?;
        match inner.posts.get_mut(post) {
            Some(stored) if &stored.surface == surface => {
                edit.apply(&mut stored.content);
                Ok(())
            }
            _ => Err(SurfaceError::NotFound {
                surface: surface.clone(),
                post: post.clone(),
            }),
        }
    }

    async fn create_post(
        &self,
        surface: &SurfaceId,
        content: PostContent,
    ) -> SurfaceResult<PostId> {
        self.delay().await;
        let mut inner = self.lock();
        if let Err(e) = take_failure(&mut inner.fail_creates, "create") {
            inner.calls.push(SurfaceCall::Create {
                surface: surface.clone(),
                post: None,
            });
            return Err(e);
        }
        let id = PostId::new(Uuid::now_v7().to_string());
        inner.calls.push(SurfaceCall::Create {
            surface: surface.clone(),
            post: Some(id.clone()),
        });
        inner.order.push(id.clone());
        inner.posts.insert(
            id.clone(),
            StoredPost {
                id: id.clone(),
                surface: surface.clone(),
                content,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_types::{Affordance, Embed};

    fn chan() -> SurfaceId {
        SurfaceId::new("chan-1")
    }

    fn content(text: &str) -> PostContent {
        PostContent {
            content: String::new(),
            embeds: vec![Embed {
                title: "Confession #1".into(),
                description: text.into(),
            }],
            components: vec![Affordance::new("Submit", "confess_button")],
        }
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let surface = InMemorySurface::new();
        let id = surface.create_post(&chan(), content("hello")).await.unwrap();
        let fetched = surface.fetch_post(&chan(), &id).await.unwrap();
        assert_eq!(fetched, content("hello"));
        assert_eq!(surface.posts(&chan()).len(), 1);
    }

    #[tokio::test]
    async fn fetch_from_other_surface_is_not_found() {
        let surface = InMemorySurface::new();
        let id = surface.create_post(&chan(), content("hello")).await.unwrap();
        let err = surface.fetch_post(&SurfaceId::new("chan-2"), &id).await.unwrap_err();
        assert!(matches!(err, SurfaceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn edit_replaces_components() {
        let surface = InMemorySurface::new();
        let id = surface.create_post(&chan(), content("hello")).await.unwrap();
        let edit = PostEdit::strip_affordances(&content("hello"));
        surface.edit_post(&chan(), &id, edit).await.unwrap();
        let stored = surface.post(&id).unwrap();
        assert!(stored.content.components.is_empty());
        assert_eq!(stored.content.embeds[0].description, "hello");
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let surface = InMemorySurface::new();
        surface.fail_next_creates(1);
        assert!(surface.create_post(&chan(), content("a")).await.is_err());
        assert!(surface.create_post(&chan(), content("b")).await.is_ok());
        assert_eq!(surface.posts(&chan()).len(), 1);
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let surface = InMemorySurface::new();
        let id = surface.create_post(&chan(), content("a")).await.unwrap();
        surface.fetch_post(&chan(), &id).await.unwrap();
        let calls = surface.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], SurfaceCall::Create { .. }));
        assert!(matches!(calls[1], SurfaceCall::Fetch { .. }));
    }
}
