//! Routes: the binding of a source, a handler, and a translator.
//!
//! A [`Route`] is created once at wiring time and lives for the process
//! lifetime. All fields are fixed at construction, so a route holds no
//! mutable shared state and needs no locking; the owning scheduler may run
//! any number of deliveries against it concurrently.
//!
//! Delivery flow:
//!
//! ```text
//! raw envelope ──▶ Translator ──▶ payload ──▶ Route::deliver ──▶ Handler
//!                                                  │
//!                                   failure ───────┘
//!                                      │
//!                                      ▼
//!                    Route::error_handler ──▶ bool ──▶ Scheduler ack/requeue
//! ```
//!
//! The route never acknowledges messages itself; it only returns the
//! decision. The scheduler performs the acknowledge/delete call against the
//! source.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::envelope::{Envelope, Payload};
use crate::error::{ExecutorError, RouteError, RouteResult};
use crate::executor::{BlockingJob, SpawnBlockingExecutor, TaskExecutor};
use crate::handler::{Dispatch, HandlerKind, RouteHandler};
use crate::policy::{AckPolicy, DiagnosticsSink, RequeueAlways, TracingSink};
use crate::source::MessageSource;
use crate::translator::{MessageTranslator, SnsNotificationTranslator};

/// Name used when a route is built without one.
pub const DEFAULT_ROUTE_NAME: &str = "default";

/// Binds one message source to one handler via a translator, and owns the
/// dispatch policy plus the failure-to-acknowledgment decision.
///
/// `T` is the handler's output type; [`deliver`](Route::deliver) yields it
/// unmodified whether the handler ran cooperatively or on the worker pool.
pub struct Route<T> {
    /// Display name; not required to be unique.
    name: String,
    /// Opaque source handle, used only for identification and logging.
    source: Arc<dyn MessageSource>,
    /// The handler plus its registration-time calling convention.
    handler: RouteHandler<T>,
    /// Normalizes raw envelopes for this route; held for the scheduler.
    translator: Arc<dyn MessageTranslator>,
    /// Accept/reject decision for failed deliveries.
    policy: Arc<dyn AckPolicy>,
    /// Failure recording.
    diagnostics: Arc<dyn DiagnosticsSink>,
    /// Where blocking handlers run; shared, never sized here.
    executor: Arc<dyn TaskExecutor>,
}

impl<T: Send + 'static> Route<T> {
    /// Starts building a route over `source` with the given handler.
    ///
    /// Everything else defaults: name to [`DEFAULT_ROUTE_NAME`], translator
    /// to [`SnsNotificationTranslator`], policy to [`RequeueAlways`],
    /// diagnostics to [`TracingSink`], executor to
    /// [`SpawnBlockingExecutor`].
    pub fn builder(
        source: impl MessageSource + 'static,
        handler: RouteHandler<T>,
    ) -> RouteBuilder<T> {
        RouteBuilder {
            name: None,
            source: Arc::new(source),
            handler,
            translator: None,
            policy: None,
            diagnostics: None,
            executor: None,
        }
    }

    /// Invokes the bound handler on one already-translated payload.
    ///
    /// Classification happens once, by the handler's registration-time
    /// convention. Cooperative handlers run on the calling context;
    /// blocking handlers are submitted to the executor and awaited. Either
    /// way the handler's value comes back unmodified, and handler failures
    /// propagate uncaught; pair a failed delivery with
    /// [`error_handler`](Route::error_handler).
    ///
    /// Dropping the returned future cancels the wait; whether an in-flight
    /// pooled invocation still finishes is up to the executor.
    pub async fn deliver(&self, payload: Payload) -> RouteResult<T> {
        info!(
            route = %self.name,
            handler = %self.handler.name(),
            "Delivering message content to handler"
        );

        match self.handler.dispatch() {
            Dispatch::Cooperative(handler) => {
                debug!(handler = %self.handler.name(), "Handler runs on the scheduling context");
                Ok(handler.handle(payload).await?)
            }
            Dispatch::Blocking(handler) => {
                debug!(handler = %self.handler.name(), "Handler runs on the worker pool");
                let handler = Arc::clone(handler);
                let (tx, rx) = oneshot::channel();
                let job: BlockingJob = Box::new(move || {
                    let _ = tx.send(handler.handle(payload));
                });

                self.executor.execute(job).await?;
                match rx.await {
                    Ok(result) => Ok(result?),
                    Err(_) => Err(ExecutorError::JobDropped.into()),
                }
            }
        }
    }

    /// Failure hook, called by the scheduler once per failed delivery.
    ///
    /// Records the failure through the diagnostics sink, then asks the
    /// acknowledgment policy. Returns `true` to have the message treated as
    /// processed, `false` to leave it for the source's redelivery policy.
    /// A policy that itself fails falls back to the conservative decision:
    /// record, return `false`.
    pub async fn error_handler(&self, envelope: &Envelope, error: &RouteError) -> bool {
        self.diagnostics
            .delivery_failure(&self.name, self.handler.name(), envelope, error);

        match self.policy.decide(envelope, error).await {
            Ok(acknowledge) => acknowledge,
            Err(policy_error) => {
                self.diagnostics.policy_failure(&self.name, &policy_error);
                false
            }
        }
    }
}

impl<T> Route<T> {
    /// The route's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source handle this route consumes from.
    pub fn source(&self) -> &Arc<dyn MessageSource> {
        &self.source
    }

    /// The translator the scheduler runs envelopes through before
    /// [`deliver`](Route::deliver).
    pub fn translator(&self) -> &Arc<dyn MessageTranslator> {
        &self.translator
    }

    /// The handler's declared calling convention.
    pub fn handler_kind(&self) -> HandlerKind {
        self.handler.kind()
    }

    /// The cached type name of the handler, as used in logs.
    pub fn handler_name(&self) -> &'static str {
        self.handler.name()
    }
}

impl<T> fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("source", &self.source.address())
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Builder for [`Route`].
pub struct RouteBuilder<T> {
    name: Option<String>,
    source: Arc<dyn MessageSource>,
    handler: RouteHandler<T>,
    translator: Option<Arc<dyn MessageTranslator>>,
    policy: Option<Arc<dyn AckPolicy>>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
    executor: Option<Arc<dyn TaskExecutor>>,
}

impl<T: Send + 'static> RouteBuilder<T> {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the default translator.
    pub fn translator(mut self, translator: Arc<dyn MessageTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Overrides the default acknowledgment policy.
    pub fn error_policy(mut self, policy: Arc<dyn AckPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Overrides the default diagnostics sink.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Overrides the default executor for blocking handlers.
    pub fn executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Finishes the route, filling in defaults for anything not set.
    pub fn build(self) -> Route<T> {
        Route {
            name: self.name.unwrap_or_else(|| DEFAULT_ROUTE_NAME.to_string()),
            source: self.source,
            handler: self.handler,
            translator: self
                .translator
                .unwrap_or_else(|| Arc::new(SnsNotificationTranslator)),
            policy: self.policy.unwrap_or_else(|| Arc::new(RequeueAlways)),
            diagnostics: self.diagnostics.unwrap_or_else(|| Arc::new(TracingSink)),
            executor: self
                .executor
                .unwrap_or_else(|| Arc::new(SpawnBlockingExecutor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HandlerError, PolicyError, PolicyResult};
    use crate::executor::InlineExecutor;
    use crate::handler::Handler;
    use crate::translator::SqsBodyTranslator;
    use async_trait::async_trait;
    use futures::future::join_all;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    struct FakeQueue;

    impl MessageSource for FakeQueue {
        fn address(&self) -> &str {
            "fake://orders"
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        type Output = Payload;

        async fn handle(&self, payload: Payload) -> Result<Payload, HandlerError> {
            Ok(payload)
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        type Output = Payload;

        async fn handle(&self, _payload: Payload) -> Result<Payload, HandlerError> {
            Err(HandlerError::Failed("bad".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        deliveries: Mutex<Vec<String>>,
        policies: Mutex<Vec<String>>,
    }

    impl DiagnosticsSink for RecordingSink {
        fn delivery_failure(
            &self,
            route: &str,
            handler: &str,
            _envelope: &Envelope,
            error: &RouteError,
        ) {
            self.deliveries.lock().push(format!("{route}/{handler}: {error}"));
        }

        fn policy_failure(&self, route: &str, error: &PolicyError) {
            self.policies.lock().push(format!("{route}: {error}"));
        }
    }

    struct AckAlways;

    #[async_trait]
    impl AckPolicy for AckAlways {
        async fn decide(&self, _: &Envelope, _: &RouteError) -> PolicyResult<bool> {
            Ok(true)
        }
    }

    struct BrokenPolicy;

    #[async_trait]
    impl AckPolicy for BrokenPolicy {
        async fn decide(&self, _: &Envelope, _: &RouteError) -> PolicyResult<bool> {
            Err(PolicyError::Failed("policy store unreachable".into()))
        }
    }

    #[tokio::test]
    async fn cooperative_delivery_yields_handler_value() {
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(EchoHandler))
            .name("orders")
            .build();

        let result = route.deliver(Payload::from("hello")).await.unwrap();
        assert_eq!(result.as_text(), Some("hello"));
    }

    #[tokio::test]
    async fn pooled_delivery_matches_direct_invocation() {
        let upper = |payload: Payload| -> Result<String, HandlerError> {
            Ok(payload.to_string().to_uppercase())
        };
        let direct = upper(Payload::from("hello")).unwrap();

        let route = Route::builder(FakeQueue, RouteHandler::blocking(upper)).build();
        let pooled = route.deliver(Payload::from("hello")).await.unwrap();

        assert_eq!(pooled, direct);
        assert_eq!(route.handler_kind(), HandlerKind::Blocking);
    }

    #[tokio::test]
    async fn pooled_delivery_works_on_inline_executor() {
        let route = Route::builder(
            FakeQueue,
            RouteHandler::blocking(|payload: Payload| Ok::<_, HandlerError>(payload)),
        )
        .executor(Arc::new(InlineExecutor))
        .build();

        let result = route.deliver(Payload::from("inline")).await.unwrap();
        assert_eq!(result.as_text(), Some("inline"));
    }

    #[tokio::test]
    async fn handler_failure_propagates_and_hook_declines() {
        let sink = Arc::new(RecordingSink::default());
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(FailingHandler))
            .name("orders")
            .diagnostics(Arc::clone(&sink) as Arc<dyn DiagnosticsSink>)
            .build();

        let error = route.deliver(Payload::from("x")).await.unwrap_err();
        assert!(matches!(
            error,
            RouteError::Handler(HandlerError::Failed(ref reason)) if reason == "bad"
        ));

        let envelope = Envelope::new("{}").with_message_id("m-1");
        let acknowledge = route.error_handler(&envelope, &error).await;

        assert!(!acknowledge);
        assert_eq!(sink.deliveries.lock().len(), 1);
        assert!(sink.policies.lock().is_empty());
    }

    #[tokio::test]
    async fn blocking_handler_failure_propagates_through_pool() {
        let route = Route::builder(
            FakeQueue,
            RouteHandler::blocking(|_: Payload| -> Result<Payload, HandlerError> {
                Err(HandlerError::Failed("bad".into()))
            }),
        )
        .build();

        let error = route.deliver(Payload::from("x")).await.unwrap_err();
        assert!(matches!(error, RouteError::Handler(_)));
    }

    #[tokio::test]
    async fn custom_policy_decision_passes_through() {
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(FailingHandler))
            .error_policy(Arc::new(AckAlways))
            .diagnostics(Arc::new(RecordingSink::default()))
            .build();

        let error = route.deliver(Payload::from("x")).await.unwrap_err();
        let envelope = Envelope::new("{}");

        assert!(route.error_handler(&envelope, &error).await);
    }

    #[tokio::test]
    async fn broken_policy_falls_back_to_requeue() {
        let sink = Arc::new(RecordingSink::default());
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(FailingHandler))
            .error_policy(Arc::new(BrokenPolicy))
            .diagnostics(Arc::clone(&sink) as Arc<dyn DiagnosticsSink>)
            .build();

        let error = route.deliver(Payload::from("x")).await.unwrap_err();
        let envelope = Envelope::new("{}");

        assert!(!route.error_handler(&envelope, &error).await);
        assert_eq!(sink.deliveries.lock().len(), 1);
        assert_eq!(sink.policies.lock().len(), 1);
    }

    #[tokio::test]
    async fn default_translator_reads_notification_documents() {
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(EchoHandler)).build();

        let body = json!({"Type": "Notification", "Message": "hello"}).to_string();
        let payloads = route.translator().translate(&Envelope::new(body)).unwrap();

        assert_eq!(payloads[0].as_text(), Some("hello"));
    }

    #[tokio::test]
    async fn supplied_translator_overrides_the_default() {
        let custom: Arc<dyn MessageTranslator> = Arc::new(SqsBodyTranslator);
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(EchoHandler))
            .translator(Arc::clone(&custom))
            .build();

        assert!(Arc::ptr_eq(route.translator(), &custom));
    }

    #[tokio::test]
    async fn concurrent_deliveries_see_each_payload_once() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let route = Route::builder(
            FakeQueue,
            RouteHandler::cooperative(move |payload: Payload| {
                let seen = Arc::clone(&recorder);
                async move {
                    seen.lock().push(payload.to_string());
                    Ok(payload)
                }
            }),
        )
        .build();

        let payloads: Vec<Payload> = (0..8).map(|i| Payload::from(format!("msg-{i}"))).collect();
        let results = join_all(payloads.iter().cloned().map(|p| route.deliver(p))).await;

        for result in results {
            result.unwrap();
        }

        let mut observed = seen.lock().clone();
        observed.sort();
        let mut expected: Vec<String> = (0..8).map(|i| format!("msg-{i}")).collect();
        expected.sort();
        assert_eq!(observed, expected);
    }

    #[tokio::test]
    async fn awaiting_caller_can_cancel_delivery() {
        let route = Route::builder(
            FakeQueue,
            RouteHandler::cooperative(|payload: Payload| async move {
                futures::future::pending::<()>().await;
                Ok(payload)
            }),
        )
        .build();

        let outcome =
            tokio::time::timeout(Duration::from_millis(20), route.deliver(Payload::from("x")))
                .await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn builder_defaults_and_debug_representation() {
        let route = Route::builder(FakeQueue, RouteHandler::cooperative(EchoHandler)).build();
        assert_eq!(route.name(), DEFAULT_ROUTE_NAME);
        assert_eq!(route.handler_kind(), HandlerKind::Cooperative);

        let named = Route::builder(FakeQueue, RouteHandler::cooperative(EchoHandler))
            .name("orders")
            .build();
        let repr = format!("{named:?}");
        assert!(repr.contains("orders"));
        assert!(repr.contains("fake://orders"));
        assert!(repr.contains("EchoHandler"));
    }
}
