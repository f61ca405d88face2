//! Logging and debugging facilities for Horizon Tablix.
//!
//! Horizon Tablix uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Rendering sessions and scroll handling log at `debug!`/`trace!`;
//! defensive fallbacks (malformed persisted widths, the iteration safety
//! bound) log at `warn!`. Use the [`targets`] constants to filter by
//! subsystem.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_tablix_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_tablix_core::signal";
    /// Grid realization target.
    pub const GRID: &str = "horizon_tablix::grid";
    /// Rendering-session state machine target.
    pub const SESSION: &str = "horizon_tablix::session";
    /// Scrollbar and input dispatch target.
    pub const SCROLL: &str = "horizon_tablix::scroll";
    /// Column sizing and persistence target.
    pub const SIZING: &str = "horizon_tablix::sizing";
}

/// A guard that tracks the duration of an operation through a tracing span.
///
/// The span stays active until the guard is dropped, so wrapping a rendering
/// session in a `PerfSpan` attributes all of its logs to that session.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_tablix::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it compiles and doesn't panic without a subscriber.
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_distinct() {
        let all = [
            targets::CORE,
            targets::SIGNAL,
            targets::GRID,
            targets::SESSION,
            targets::SCROLL,
            targets::SIZING,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
