//! # Conveyor Runtime
//!
//! Runtime concerns shared by every process embedding the Conveyor routing
//! core: configuration loading, logging setup, and the bounded worker pool
//! that blocking handlers run on.
//!
//! The routing core never owns these; a scheduler wires them in:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use conveyor_core::{Payload, Route, RouteHandler};
//! use conveyor_runtime::{BoundedBlockingPool, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let pool = Arc::new(BoundedBlockingPool::from_config(&config.pool));
//!
//! let route = Route::builder(
//!     "https://sqs.sa-east-1.amazonaws.com/0/reports",
//!     RouteHandler::blocking(|payload: Payload| Ok(render_report(payload))),
//! )
//! .name("reports")
//! .executor(pool)
//! .build();
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pool;

pub use config::{ConfigLoader, ConveyorConfig, load_config, load_config_from_file};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use pool::BoundedBlockingPool;
