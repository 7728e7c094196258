//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Validation middleware produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (validation outcome counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
