use std::fmt;

use thiserror::Error;

use crate::surface::SurfaceError;

/// Why the relay is not accepting submissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotReadyReason {
    Inactive,
    NoTarget,
    InactiveAndNoTarget,
}

impl NotReadyReason {
    /// Readiness from the two preconditions; `None` when both hold.
    pub fn check(active: bool, has_target: bool) -> Option<Self> {
        match (active, has_target) {
            (true, true) => None,
            (false, true) => Some(Self::Inactive),
            (true, false) => Some(Self::NoTarget),
            (false, false) => Some(Self::InactiveAndNoTarget),
        }
    }
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => f.write_str("confessions are not open right now"),
            Self::NoTarget => f.write_str("the target channel is not set"),
            Self::InactiveAndNoTarget => f.write_str(
                "confessions are not open right now, and the target channel is not set",
            ),
        }
    }
}

/// Errors returned by relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("not ready: {0}")]
    NotReady(NotReadyReason),

    #[error("quota exceeded: the maximum number of allowed posts has been reached")]
    QuotaExceeded,

    #[error("delivery failed: {0}")]
    DeliveryFailed(#[from] SurfaceError),

    #[error("permission denied: {operation}")]
    PermissionDenied { operation: String },

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Denials are expected outcomes of a policy decision; everything else
    /// is a failure of the relay or its transport.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::NotReady(_)
                | Self::QuotaExceeded
                | Self::PermissionDenied { .. }
                | Self::InvalidSubmission(_)
                | Self::InvalidArgument(_)
        )
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
