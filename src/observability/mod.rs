//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling and config reloads produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap and off unless enabled

pub mod logging;
pub mod metrics;
