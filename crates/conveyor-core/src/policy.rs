//! Acknowledgment policy and failure diagnostics.
//!
//! When a delivery fails, the scheduler asks the route's failure hook what
//! to do with the message. The hook is split into two injectable
//! capabilities: a [`DiagnosticsSink`] that records the failure, and an
//! [`AckPolicy`] that makes the pure accept/reject decision. Keeping the
//! decision free of logging lets tests assert on each independently.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::envelope::Envelope;
use crate::error::{PolicyError, PolicyResult, RouteError};

// =============================================================================
// Acknowledgment Policy
// =============================================================================

/// Decides whether a failed delivery should still be acknowledged.
///
/// `Ok(true)` means "treat as processed": the scheduler acknowledges the
/// message and the source will not redeliver it. `Ok(false)` leaves the
/// message unacknowledged, so the source's native redelivery policy applies.
#[async_trait]
pub trait AckPolicy: Send + Sync {
    /// Makes the decision for one failed delivery.
    async fn decide(&self, envelope: &Envelope, error: &RouteError) -> PolicyResult<bool>;
}

/// A boxed policy trait object.
pub type BoxedPolicy = Arc<dyn AckPolicy>;

/// The conservative default policy: never acknowledge a failure.
///
/// Leaving the message unacknowledged lets the source re-present it, so no
/// failure is silently swallowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequeueAlways;

#[async_trait]
impl AckPolicy for RequeueAlways {
    async fn decide(&self, _envelope: &Envelope, _error: &RouteError) -> PolicyResult<bool> {
        Ok(false)
    }
}

// =============================================================================
// Diagnostics Sink
// =============================================================================

/// Records delivery failures and policy breakdowns.
///
/// Injected at route construction; the default emits structured `tracing`
/// events, tests swap in a recording implementation.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one failed delivery.
    fn delivery_failure(&self, route: &str, handler: &str, envelope: &Envelope, error: &RouteError);

    /// Records an acknowledgment policy that itself failed.
    fn policy_failure(&self, route: &str, error: &PolicyError);
}

/// A boxed sink trait object.
pub type BoxedSink = Arc<dyn DiagnosticsSink>;

/// The default sink: structured `tracing` events at error severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn delivery_failure(&self, route: &str, handler: &str, envelope: &Envelope, error: &RouteError) {
        error!(
            route = %route,
            handler = %handler,
            message = %envelope,
            error = %error,
            "Unhandled failure in message handler"
        );
    }

    fn policy_failure(&self, route: &str, error: &PolicyError) {
        error!(
            route = %route,
            error = %error,
            "Acknowledgment policy failed, leaving message unacknowledged"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;

    #[tokio::test]
    async fn requeue_always_declines() {
        let envelope = Envelope::new("{}");
        let error = RouteError::Handler(HandlerError::Failed("bad".into()));

        let decision = RequeueAlways.decide(&envelope, &error).await.unwrap();
        assert!(!decision);
    }
}
