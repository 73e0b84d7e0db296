//! # Conveyor Core
//!
//! The routing and dispatch engine of the Conveyor message pipeline.
//!
//! A [`Route`] binds one message source to one handler via a translator and
//! decides, per message, how the handler is invoked: cooperatively on the
//! calling async context, or offloaded to a bounded worker pool when the
//! handler is blocking. Failed deliveries flow through a uniform hook whose
//! boolean tells the owning scheduler whether to acknowledge the message or
//! leave it for redelivery.
//!
//! ## Delivery Pipeline
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌───────────────┐    ┌─────────┐
//! │  Source  │───▶│ Translator │───▶│ Route::deliver│───▶│ Handler │
//! │ (opaque) │    │            │    │  (classify)   │    │         │
//! └──────────┘    └────────────┘    └───────┬───────┘    └─────────┘
//!                                           │ blocking
//!                                           ▼
//!                                    ┌──────────────┐
//!                                    │ TaskExecutor │
//!                                    └──────────────┘
//! ```
//!
//! The polling loop, the multi-route scheduler, and the acknowledge call
//! against the source are external collaborators; this crate is the piece
//! they share.
//!
//! ## Example
//!
//! ```rust,ignore
//! use conveyor_core::{Payload, Route, RouteHandler};
//!
//! let route = Route::builder(
//!     "https://sqs.sa-east-1.amazonaws.com/0/orders",
//!     RouteHandler::cooperative(|payload: Payload| async move {
//!         println!("processing {payload}");
//!         Ok(())
//!     }),
//! )
//! .name("orders")
//! .build();
//!
//! let result = route.deliver(Payload::from("hello")).await;
//! ```

pub mod envelope;
pub mod error;
pub mod executor;
pub mod handler;
pub mod policy;
pub mod route;
pub mod source;
pub mod translator;

pub use envelope::{Envelope, Payload};
pub use error::{
    ExecutorError, ExecutorResult, HandlerError, HandlerResult, PolicyError, PolicyResult,
    RouteError, RouteResult, TranslateError, TranslateResult,
};
pub use executor::{BlockingJob, BoxedExecutor, InlineExecutor, SpawnBlockingExecutor, TaskExecutor};
pub use handler::{BlockingHandler, Handler, HandlerKind, RouteHandler};
pub use policy::{
    AckPolicy, BoxedPolicy, BoxedSink, DiagnosticsSink, RequeueAlways, TracingSink,
};
pub use route::{DEFAULT_ROUTE_NAME, Route, RouteBuilder};
pub use source::{BoxedSource, MessageSource};
pub use translator::{
    BoxedTranslator, MessageTranslator, SnsNotificationTranslator, SqsBodyTranslator,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::envelope::{Envelope, Payload};
    pub use super::error::{HandlerError, HandlerResult, RouteError, RouteResult};
    pub use super::handler::{BlockingHandler, Handler, HandlerKind, RouteHandler};
    pub use super::policy::AckPolicy;
    pub use super::route::{Route, RouteBuilder};
    pub use super::source::MessageSource;
    pub use super::translator::MessageTranslator;
}
