//! Logging facilities for Trellis.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! you need to install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout Trellis for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "trellis::signal";
    /// Property change span.
    pub const PROPERTY: &str = "trellis::property";
    /// Tick queue processing span.
    pub const TICK: &str = "trellis::tick";
    /// Grid layout computation span.
    pub const LAYOUT: &str = "trellis::layout";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "trellis_core::property";
    /// Tick queue target.
    pub const TICK: &str = "trellis_core::tick";
}

/// A guard that emits a tracing span when dropped.
///
/// This is useful for tracking the duration of operations.
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
        let span = tracing::info_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
