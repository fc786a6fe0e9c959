//! Shared relay state and the single lock that guards it.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, MutexGuard};

use hush_types::{PostId, SurfaceId};

use crate::config::RelayConfig;
use crate::error::{NotReadyReason, RelayResult};
use crate::quota::QuotaTracker;

/// Everything the relay mutates at runtime.
///
/// A `BotState` shared between tasks only ever lives inside a
/// [`StateGuard`]; holding `&mut BotState` means holding the lock.
#[derive(Clone, Debug)]
pub struct BotState {
    active: bool,
    target_surface: Option<SurfaceId>,
    last_published: Option<PostId>,
    published_count: u64,
    quota: QuotaTracker,
}

impl BotState {
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        Ok(Self {
            active: config.active,
            target_surface: config.target_surface.clone(),
            last_published: None,
            published_count: 0,
            quota: QuotaTracker::new(config.max_allowed)?,
        })
    }

    /// The target surface if submissions are currently accepted.
    pub fn readiness(&self) -> Result<SurfaceId, NotReadyReason> {
        if let Some(reason) = NotReadyReason::check(self.active, self.target_surface.is_some()) {
            return Err(reason);
        }
        self.target_surface.clone().ok_or(NotReadyReason::NoTarget)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn target_surface(&self) -> Option<&SurfaceId> {
        self.target_surface.as_ref()
    }

    /// Point the relay at a new channel.
    ///
    /// The previous post lives on the old channel, so the handle to it is
    /// dropped and its button is left in place.
    pub fn set_target_surface(&mut self, surface: SurfaceId) {
        self.target_surface = Some(surface);
        self.last_published = None;
    }

    pub fn last_published(&self) -> Option<&PostId> {
        self.last_published.as_ref()
    }

    pub fn published_count(&self) -> u64 {
        self.published_count
    }

    /// Record a successful post: it becomes the one carrying the button.
    pub fn record_publish(&mut self, post: PostId) {
        self.last_published = Some(post);
        self.published_count += 1;
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    pub fn quota_mut(&mut self) -> &mut QuotaTracker {
        &mut self.quota
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            active: self.active,
            max_allowed: self.quota.max_allowed(),
            target_surface: self.target_surface.clone(),
            last_published: self.last_published.clone(),
            published_count: self.published_count,
            tracked_identities: self.quota.tracked_identities(),
        }
    }
}

/// Read-only view of [`BotState`] for operators. Carries no identity keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub active: bool,
    pub max_allowed: u32,
    pub target_surface: Option<SurfaceId>,
    pub last_published: Option<PostId>,
    pub published_count: u64,
    pub tracked_identities: usize,
}

/// The one mutual-exclusion region around [`BotState`].
///
/// An async mutex: the publisher keeps it across surface calls so that no
/// other submission can observe a stale `last_published`. Read-only
/// queries never take it. Each release of the lock publishes a fresh
/// [`StateSnapshot`] on a watch channel, and [`StateGuard::snapshot`]
/// reads the latest one.
#[derive(Debug)]
pub struct StateGuard {
    state: Mutex<BotState>,
    published: watch::Sender<StateSnapshot>,
}

impl StateGuard {
    pub fn new(state: BotState) -> Self {
        let (published, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            published,
        }
    }

    /// Enter the critical section.
    pub async fn lock(&self) -> StateLock<'_> {
        StateLock {
            guard: self.state.lock().await,
            published: &self.published,
        }
    }

    /// State as of the last released lock. Does not wait for writers.
    pub fn snapshot(&self) -> StateSnapshot {
        self.published.borrow().clone()
    }

    /// Receiver notified after every critical section.
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.published.subscribe()
    }
}

/// Exclusive access to [`BotState`]; publishes a snapshot when dropped.
pub struct StateLock<'a> {
    guard: MutexGuard<'a, BotState>,
    published: &'a watch::Sender<StateSnapshot>,
}

impl Deref for StateLock<'_> {
    type Target = BotState;

    fn deref(&self) -> &BotState {
        &self.guard
    }
}

impl DerefMut for StateLock<'_> {
    fn deref_mut(&mut self) -> &mut BotState {
        &mut self.guard
    }
}

impl Drop for StateLock<'_> {
    fn drop(&mut self) {
        self.published.send_replace(self.guard.snapshot());
    }
}
