//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stderr, JSON lines)
//!     → Whatever metrics recorder the host application installs
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
