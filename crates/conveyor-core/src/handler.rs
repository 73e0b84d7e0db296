//! Handler capabilities and their calling conventions.
//!
//! A handler processes one normalized payload and returns a value or fails.
//! There are two calling conventions:
//!
//! - [`Handler`] is *cooperative*: it runs on the calling scheduling context
//!   and may suspend, interleaving with other work on the same context.
//! - [`BlockingHandler`] is *blocking*: synchronous CPU- or IO-bound code
//!   that must be kept off the scheduling context.
//!
//! The convention is declared once, when the handler is wrapped in a
//! [`RouteHandler`], and stored as an immutable tag. Dispatch classifies by
//! that tag; it never probes the handler at call time.
//!
//! Plain functions work as handlers without any wrapper type:
//!
//! ```rust,ignore
//! // Cooperative: an async closure
//! let handler = RouteHandler::cooperative(|payload: Payload| async move {
//!     Ok(payload)
//! });
//!
//! // Blocking: a synchronous closure
//! let handler = RouteHandler::blocking(|payload: Payload| {
//!     Ok(expensive_transform(payload))
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::envelope::Payload;
use crate::error::HandlerResult;

// =============================================================================
// Handler Traits
// =============================================================================

/// A cooperative message handler.
///
/// Runs within the calling scheduling context; implementations may suspend
/// freely but must not block the thread.
#[async_trait]
pub trait Handler: Send + Sync {
    /// The value produced by a successful invocation.
    type Output: Send;

    /// Processes one payload.
    async fn handle(&self, payload: Payload) -> HandlerResult<Self::Output>;
}

/// A blocking message handler.
///
/// Synchronous code that would starve the scheduling context if run on it;
/// dispatch submits it to the worker pool instead.
pub trait BlockingHandler: Send + Sync {
    /// The value produced by a successful invocation.
    type Output: Send;

    /// Processes one payload.
    fn handle(&self, payload: Payload) -> HandlerResult<Self::Output>;
}

/// Async functions and closures over a payload are cooperative handlers.
#[async_trait]
impl<F, Fut, T> Handler for F
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult<T>> + Send + 'static,
    T: Send,
{
    type Output = T;

    async fn handle(&self, payload: Payload) -> HandlerResult<T> {
        (self)(payload).await
    }
}

/// Synchronous functions and closures over a payload are blocking handlers.
impl<F, T> BlockingHandler for F
where
    F: Fn(Payload) -> HandlerResult<T> + Send + Sync,
    T: Send,
{
    type Output = T;

    fn handle(&self, payload: Payload) -> HandlerResult<T> {
        (self)(payload)
    }
}

// =============================================================================
// Registration-Time Classification
// =============================================================================

/// The declared calling convention of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Runs on the calling scheduling context.
    Cooperative,
    /// Runs on the worker pool.
    Blocking,
}

impl HandlerKind {
    /// Returns the convention as a display string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cooperative => "cooperative",
            Self::Blocking => "blocking",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler wrapped together with its declared calling convention.
///
/// Built once at registration time; the tag and the cached type name of the
/// concrete handler never change afterwards.
pub struct RouteHandler<T> {
    dispatch: Dispatch<T>,
    name: &'static str,
}

pub(crate) enum Dispatch<T> {
    Cooperative(Arc<dyn Handler<Output = T>>),
    Blocking(Arc<dyn BlockingHandler<Output = T>>),
}

impl<T: Send + 'static> RouteHandler<T> {
    /// Wraps a cooperative handler.
    pub fn cooperative<H>(handler: H) -> Self
    where
        H: Handler<Output = T> + 'static,
    {
        Self {
            dispatch: Dispatch::Cooperative(Arc::new(handler)),
            name: short_type_name::<H>(),
        }
    }

    /// Wraps a blocking handler.
    pub fn blocking<H>(handler: H) -> Self
    where
        H: BlockingHandler<Output = T> + 'static,
    {
        Self {
            dispatch: Dispatch::Blocking(Arc::new(handler)),
            name: short_type_name::<H>(),
        }
    }
}

impl<T> RouteHandler<T> {
    /// The declared calling convention.
    pub fn kind(&self) -> HandlerKind {
        match self.dispatch {
            Dispatch::Cooperative(_) => HandlerKind::Cooperative,
            Dispatch::Blocking(_) => HandlerKind::Blocking,
        }
    }

    /// The cached type name of the concrete handler, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn dispatch(&self) -> &Dispatch<T> {
        &self.dispatch
    }
}

impl<T> fmt::Debug for RouteHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteHandler")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// The last path segment of a type name, e.g. `EchoHandler`.
fn short_type_name<H>() -> &'static str {
    let full = std::any::type_name::<H>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        type Output = Payload;

        async fn handle(&self, payload: Payload) -> HandlerResult<Payload> {
            Ok(payload)
        }
    }

    struct LengthHandler;

    impl BlockingHandler for LengthHandler {
        type Output = usize;

        fn handle(&self, payload: Payload) -> HandlerResult<usize> {
            Ok(payload.to_string().len())
        }
    }

    #[test]
    fn kind_reflects_registration() {
        let cooperative = RouteHandler::cooperative(EchoHandler);
        assert_eq!(cooperative.kind(), HandlerKind::Cooperative);

        let blocking = RouteHandler::blocking(LengthHandler);
        assert_eq!(blocking.kind(), HandlerKind::Blocking);
    }

    #[test]
    fn name_is_the_concrete_type() {
        let handler = RouteHandler::cooperative(EchoHandler);
        assert_eq!(handler.name(), "EchoHandler");
    }

    #[tokio::test]
    async fn closures_are_cooperative_handlers() {
        let handler = RouteHandler::cooperative(|payload: Payload| async move { Ok(payload) });
        assert_eq!(handler.kind(), HandlerKind::Cooperative);

        let Dispatch::Cooperative(inner) = handler.dispatch() else {
            panic!("expected cooperative dispatch");
        };
        let result = inner.handle(Payload::from("ping")).await.unwrap();
        assert_eq!(result.as_text(), Some("ping"));
    }

    #[test]
    fn closures_are_blocking_handlers() {
        let handler = RouteHandler::blocking(|payload: Payload| Ok(payload));

        let Dispatch::Blocking(inner) = handler.dispatch() else {
            panic!("expected blocking dispatch");
        };
        let result = inner.handle(Payload::from("pong")).unwrap();
        assert_eq!(result.as_text(), Some("pong"));
    }
}
