//! Unified error types for the Conveyor core.
//!
//! One enum per concern, following the taxonomy of the delivery path:
//! translation, handler invocation, acknowledgment policy, and job execution.
//! [`RouteError`] is the umbrella the scheduler sees from a failed delivery.

use thiserror::Error;

// =============================================================================
// Translation Errors
// =============================================================================

/// Errors raised while translating a raw envelope into payloads.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The envelope body was not a well-formed document.
    #[error("malformed envelope body: {0}")]
    MalformedBody(String),

    /// The envelope document is missing a required field.
    #[error("envelope document is missing field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBody(err.to_string())
    }
}

// =============================================================================
// Handler Errors
// =============================================================================

/// Errors raised by message handlers.
///
/// Handlers own arbitrary business logic; anything they can fail with is
/// routed through here unmodified so the failure hook sees the original
/// cause.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload did not have the shape the handler expected.
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// Reason for the mismatch.
        reason: String,
    },

    /// Processing failed.
    #[error("{0}")]
    Failed(String),

    /// Any other error from handler internals.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// =============================================================================
// Acknowledgment Policy Errors
// =============================================================================

/// Errors raised by a custom acknowledgment policy.
///
/// A failing policy never propagates past the failure hook; the hook falls
/// back to the conservative decision instead.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The decision could not be made.
    #[error("{0}")]
    Failed(String),

    /// Any other error from policy internals.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// =============================================================================
// Executor Errors
// =============================================================================

/// Errors raised while running a job on a task executor.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    /// The executor is shut down and no longer accepts jobs.
    #[error("executor is shut down")]
    Shutdown,

    /// The job panicked while running.
    #[error("job panicked: {0}")]
    JobPanicked(String),

    /// The executor dropped the job without running it to completion.
    #[error("job was dropped before completion")]
    JobDropped,
}

// =============================================================================
// Route Errors
// =============================================================================

/// Errors surfaced by [`Route::deliver`](crate::Route::deliver).
///
/// Handler failures pass through unmodified; executor failures are
/// infrastructure conditions, not handler outcomes.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The handler failed while processing the payload.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The blocking executor failed to run the handler.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for translation.
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Result type for handler invocations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Result type for acknowledgment policies.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Result type for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Result type for deliveries.
pub type RouteResult<T> = Result<T, RouteError>;
