//! # Conveyor
//!
//! Asynchronous message routing and handler dispatch for queue consumers.
//!
//! ## Overview
//!
//! Conveyor is the piece between a queue poller and your business logic. A
//! [`Route`](conveyor_core::Route) binds one message source to one handler
//! via a translator, dispatches each payload either cooperatively or on a
//! bounded worker pool, and turns handler failures into a single boolean
//! acknowledgment decision the owning scheduler acts on.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌───────────────────────────┐
//! │  Poller  │───▶│ Translator │───▶│ Route                     │
//! │ (yours)  │    │            │    │  deliver ──▶ Handler      │
//! └──────────┘    └────────────┘    │  error_handler ──▶ bool   │
//!                                   └────────────┬──────────────┘
//!                                                │ blocking
//!                                                ▼
//!                                       ┌─────────────────┐
//!                                       │ Worker pool     │
//!                                       │ (runtime layer) │
//!                                       └─────────────────┘
//! ```
//!
//! - **conveyor-core**: routes, handlers, translators, policies, executors
//! - **conveyor-runtime**: configuration, logging, the bounded worker pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conveyor::prelude::*;
//!
//! let route = Route::builder(
//!     "https://sqs.sa-east-1.amazonaws.com/0/orders",
//!     RouteHandler::cooperative(|payload: Payload| async move {
//!         println!("order: {payload}");
//!         Ok(())
//!     }),
//! )
//! .name("orders")
//! .build();
//!
//! // The scheduler drives it:
//! match route.deliver(payload).await {
//!     Ok(_) => { /* acknowledge */ }
//!     Err(error) => {
//!         if route.error_handler(&envelope, &error).await {
//!             /* acknowledge anyway */
//!         }
//!     }
//! }
//! ```

pub use conveyor_core as core;
pub use conveyor_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use conveyor::prelude::*;
/// ```
pub mod prelude {
    // Routing - the main entry point
    pub use conveyor_core::{Route, RouteBuilder, RouteHandler};

    // Messages and payloads
    pub use conveyor_core::{Envelope, Payload};

    // Capability traits for custom implementations
    pub use conveyor_core::{
        AckPolicy, BlockingHandler, DiagnosticsSink, Handler, HandlerKind, MessageSource,
        MessageTranslator, TaskExecutor,
    };

    // Bundled translators
    pub use conveyor_core::{SnsNotificationTranslator, SqsBodyTranslator};

    // Errors the scheduler pattern-matches on
    pub use conveyor_core::{HandlerError, HandlerResult, RouteError, RouteResult};

    // Runtime wiring
    pub use conveyor_runtime::{BoundedBlockingPool, ConveyorConfig, LoggingBuilder, load_config};
}
