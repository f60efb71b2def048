#![forbid(unsafe_code)]

//! Structured logging shim.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported at
//! the crate root, so solver code writes `boxtree_core::debug!(..)` and
//! gets real events. Without the feature the same paths resolve to
//! macros that expand to nothing, keeping the solver free of a hard
//! `tracing` dependency.
//!
//! Targets in use:
//!
//! | Target            | Emitted by                                   |
//! |-------------------|----------------------------------------------|
//! | `boxtree.layout`  | allocation, propagation, rounding correction |
//! | `boxtree.root`    | load / resize handling on root layouts       |
//! | `boxtree.host`    | resize debouncing                            |

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Expands to nothing without the `tracing` feature.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to a [`NoopSpan`](crate::logging::NoopSpan) without the `tracing` feature.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Expands to nothing without the `tracing` feature.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing without the `tracing` feature.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Stand-in for a `tracing::Span` when the feature is off.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span; the guard does nothing.
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::entered`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
