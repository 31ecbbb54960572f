//! Registrar Observability
//!
//! - [`init_logging`]: installs the global tracing subscriber
//! - [`logging_middleware`]: one log line per request with a request id
//!
//! # Examples
//!
//! ```no_run
//! use registrar_observability::init_logging;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_logging();
//!     // ... application code ...
//! }
//! ```

pub mod logging;

pub use logging::{LogFormat, init_logging, logging_middleware};
