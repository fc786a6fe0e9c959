//! The [`MessagingSurface`] trait: the relay's view of the chat platform.
//!
//! The platform adapter implements this over its HTTP/gateway client;
//! [`InMemorySurface`](crate::memory::InMemorySurface) implements it for
//! tests and the console driver.

use async_trait::async_trait;
use thiserror::Error;

use hush_types::{PostContent, PostEdit, PostId, SurfaceId};

/// Errors reported by a messaging surface.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("post {post} not found in {surface}")]
    NotFound { surface: SurfaceId, post: PostId },

    #[error("rejected by platform: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Message operations the publisher needs from the platform.
///
/// Implementations must be thread-safe; calls are not retried by the caller.
#[async_trait]
pub trait MessagingSurface: Send + Sync {
    /// Read a post's current content, embeds and components.
    async fn fetch_post(&self, surface: &SurfaceId, post: &PostId) -> SurfaceResult<PostContent>;

    /// Replace a post's content, embeds and components.
    async fn edit_post(
        &self,
        surface: &SurfaceId,
        post: &PostId,
        edit: PostEdit,
    ) -> SurfaceResult<()>;

    /// Publish a new post and return its id.
    async fn create_post(&self, surface: &SurfaceId, content: PostContent) -> SurfaceResult<PostId>;
}
