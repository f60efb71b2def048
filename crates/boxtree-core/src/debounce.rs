#![forbid(unsafe_code)]

//! Latest-wins debouncing for container resize measurements.
//!
//! Hosts deliver resize notifications far faster than a layout pass is
//! worth running (dragging a window edge can produce one per pixel). The
//! solver assumes its resize callback runs at a bounded frequency; this
//! module is a small reusable way for an [`EventSource`] implementation to
//! keep that promise.
//!
//! # Rules
//!
//! - The first measurement after a quiet period is emitted immediately.
//! - Measurements arriving within `min_interval` of the last emission are
//!   held; only the most recent one is kept.
//! - [`ResizeDebouncer::flush`] emits the held measurement once the
//!   interval has elapsed. Hosts call it from their frame/tick hook.
//! - A measurement equal to the last emitted one is never emitted twice.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use boxtree_core::debounce::{DebounceConfig, ResizeDebouncer};
//! use boxtree_core::geometry::Region;
//!
//! let mut debouncer = ResizeDebouncer::new(DebounceConfig::default());
//! let t0 = Instant::now();
//!
//! assert!(debouncer.push(Region::from_size(800, 600), t0).is_some());
//! assert!(debouncer.push(Region::from_size(810, 600), t0).is_none());
//! assert!(debouncer.push(Region::from_size(820, 600), t0).is_none());
//!
//! let later = t0 + Duration::from_millis(40);
//! assert_eq!(debouncer.flush(later), Some(Region::from_size(820, 600)));
//! ```
//!
//! [`EventSource`]: crate::host::EventSource

use std::time::{Duration, Instant};

use crate::geometry::Region;

/// Configuration for [`ResizeDebouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Minimum spacing between two emitted measurements.
    pub min_interval: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(32),
        }
    }
}

impl DebounceConfig {
    /// Set the minimum spacing.
    #[must_use]
    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

/// Coalesces raw resize measurements to a bounded frequency.
///
/// Not thread-safe; drive it from the host's event thread.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    config: DebounceConfig,
    last_emit: Option<Instant>,
    last_region: Option<Region>,
    pending: Option<Region>,
    coalesced: u64,
}

impl ResizeDebouncer {
    /// Create a debouncer with no history.
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            last_emit: None,
            last_region: None,
            pending: None,
            coalesced: 0,
        }
    }

    /// Offer a new measurement.
    ///
    /// Returns `Some(region)` when the caller should run a resize pass now.
    pub fn push(&mut self, region: Region, now: Instant) -> Option<Region> {
        if self.last_region == Some(region) && self.pending.is_none() {
            return None;
        }
        if self.is_quiet(now) {
            self.pending = None;
            return self.emit(region, now);
        }
        if self.pending.replace(region).is_some() {
            self.coalesced += 1;
        }
        crate::trace!(
            target: "boxtree.host",
            width = region.width,
            height = region.height,
            "resize_held"
        );
        None
    }

    /// Emit the held measurement if the interval has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<Region> {
        if !self.is_quiet(now) {
            return None;
        }
        let region = self.pending.take()?;
        if self.last_region == Some(region) {
            return None;
        }
        self.emit(region, now)
    }

    /// Whether a measurement is waiting for [`ResizeDebouncer::flush`].
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Measurements dropped in favour of a later one.
    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    fn is_quiet(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(at) => {
                now.checked_duration_since(at).unwrap_or(Duration::ZERO)
                    >= self.config.min_interval
            }
        }
    }

    fn emit(&mut self, region: Region, now: Instant) -> Option<Region> {
        self.last_emit = Some(now);
        self.last_region = Some(region);
        Some(region)
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}
