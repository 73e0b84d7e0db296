//! Message source handles.
//!
//! A source is opaque to the routing core: the polling loop knows how to
//! fetch from it and the scheduler knows how to acknowledge against it. The
//! core only carries the handle for identification and logging.

use std::sync::Arc;

/// An opaque handle to the queue or topic a route consumes from.
pub trait MessageSource: Send + Sync {
    /// Provider address of this source, e.g. a queue URL or topic ARN.
    fn address(&self) -> &str;
}

/// A boxed source trait object.
pub type BoxedSource = Arc<dyn MessageSource>;

impl MessageSource for String {
    fn address(&self) -> &str {
        self
    }
}

impl MessageSource for &'static str {
    fn address(&self) -> &str {
        self
    }
}
