#![forbid(unsafe_code)]

//! Core: geometry primitives, host ports, and resize debouncing.

pub mod debounce;
pub mod geometry;
pub mod host;
pub mod logging;

// Re-export tracing macros at crate root so call sites look the same with
// or without the feature.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
