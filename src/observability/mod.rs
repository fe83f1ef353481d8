//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! payment flow, receiver lookup, HTTP server produce:
//!     → logging.rs (structured log events, payment attempt spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every payment attempt carries an `attempt_id` span field
//! - HTTP requests carry an `x-request-id`
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
pub use metrics::init_metrics;
