//! Handles for best-effort remote writes.

use std::fmt;
use tokio::task::JoinHandle;

use crate::error::CloudError;

/// Why a remote write was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `cloud.enabled` is false.
    CloudDisabled,
    /// No device UUID is stored (or it could not be read).
    NoIdentity,
    /// The local write changed nothing, so there is nothing to mirror.
    NothingWritten,
    /// Called outside a tokio runtime.
    NoRuntime,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::CloudDisabled => "cloud disabled",
            SkipReason::NoIdentity => "no device identity",
            SkipReason::NothingWritten => "nothing written locally",
            SkipReason::NoRuntime => "no async runtime",
        })
    }
}

/// A remote write that may still be in flight.
///
/// Dropping a pending handle detaches the write; it keeps running and logs
/// its own failure.
#[derive(Debug)]
pub enum PushHandle {
    Skipped(SkipReason),
    Pending(JoinHandle<Result<(), CloudError>>),
}

/// Final state of a push after [`PushHandle::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Skipped(SkipReason),
    Pushed,
    Failed(String),
}

impl PushHandle {
    pub fn is_pending(&self) -> bool {
        matches!(self, PushHandle::Pending(_))
    }

    /// Wait for the remote write to finish.
    pub async fn wait(self) -> PushOutcome {
        match self {
            PushHandle::Skipped(reason) => PushOutcome::Skipped(reason),
            PushHandle::Pending(handle) => match handle.await {
                Ok(Ok(())) => PushOutcome::Pushed,
                Ok(Err(e)) => PushOutcome::Failed(e.to_string()),
                Err(e) => PushOutcome::Failed(format!("push task did not complete: {e}")),
            },
        }
    }
}

impl fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushOutcome::Skipped(reason) => write!(f, "not pushed ({reason})"),
            PushOutcome::Pushed => f.write_str("pushed"),
            PushOutcome::Failed(message) => write!(f, "push failed: {message}"),
        }
    }
}

/// Result of a local write plus its remote mirror.
#[derive(Debug)]
#[must_use = "the push handle detaches when dropped; call `push.wait()` to observe it"]
pub struct WriteResult {
    /// Whether the local table changed.
    pub applied: bool,
    pub push: PushHandle,
}
