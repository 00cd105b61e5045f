//! Logging facilities for Horizon Table.
//!
//! Horizon Table uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_table::height=trace")
//!     .init();
//! ```
//!
//! Height measurement is the expensive path, so every measurement pass runs
//! inside a [`PerfSpan`] named after the reuse identifier being measured.
//! Filter on [`targets::HEIGHT`] to watch cache hits and misses while scrolling.

/// Operation names recorded on [`PerfSpan`]s.
pub mod span_names {
    /// Prototype measurement span.
    pub const MEASURE: &str = "horizon_table::measure";
    /// Row action dispatch span.
    pub const ACTION: &str = "horizon_table::action";
}

/// `tracing` targets, one per subsystem, for `EnvFilter` directives.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_table_core";
    /// Slot connection and emission.
    pub const SIGNAL: &str = "horizon_table_core::signal";
    /// Height calculation target.
    pub const HEIGHT: &str = "horizon_table::height";
    /// Row action dispatch target.
    pub const ACTION: &str = "horizon_table::action";
    /// Section and row model target.
    pub const MODEL: &str = "horizon_table::model";
    /// Director (host protocol) target.
    pub const DIRECTOR: &str = "horizon_table::director";
}

/// Keeps an `info`-level span on `horizon_table::perf` entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enters a span recording only the operation name.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_table::perf", "perf", operation = name);
        Self {
            _entered: span.entered(),
        }
    }

    /// Enters a span that also records what the operation is about, such as a
    /// reuse identifier or an action key.
    pub fn with_subject(name: &'static str, subject: &str) -> Self {
        let span = tracing::info_span!(
            target: "horizon_table::perf",
            "perf",
            operation = name,
            subject = subject
        );
        Self {
            _entered: span.entered(),
        }
    }
}

/// `tracing::trace!` on the crate-wide `horizon_table` target.
#[macro_export]
macro_rules! table_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_table", $($arg)*)
    };
}

/// `tracing::debug!` on the crate-wide `horizon_table` target.
#[macro_export]
macro_rules! table_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_table", $($arg)*)
    };
}

/// `tracing::warn!` on the crate-wide `horizon_table` target.
#[macro_export]
macro_rules! table_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_table", $($arg)*)
    };
}
