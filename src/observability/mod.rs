//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator and racers produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Terminal or log aggregation (stderr, pretty or JSON)
//!     → Any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for the race result; diagnostics go to stderr
//! - Every race gets a `race_id` span so racer events correlate
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
