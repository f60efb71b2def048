#![forbid(unsafe_code)]

//! Ports to the hosting UI shell.
//!
//! The solver never talks to a window system directly. Everything it needs
//! from the outside world goes through three narrow traits:
//!
//! - [`RuleSink`] receives solved geometry as named property sets
//!   (conventionally CSS rules). Writes are create-or-update by name.
//! - [`GeometrySource`] reports the current rectangle of the viewport or
//!   of a container element.
//! - [`EventSource`] calls back on container load and on every (already
//!   debounced) resize.
//!
//! With the `test-helpers` feature, [`FixedGeometry`] and [`ManualEvents`]
//! provide in-memory fakes for all of the above except the sink (see
//! `boxtree-style` for an in-memory sink).

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Region;

/// Ordered set of pixel-valued properties pushed to a [`RuleSink`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleProps(BTreeMap<String, i32>);

impl RuleProps {
    /// Empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All four position keys of `region`.
    #[must_use]
    pub fn from_region(region: Region) -> Self {
        let mut props = Self::new();
        props.set("top", region.top);
        props.set("left", region.left);
        props.set("width", region.width);
        props.set("height", region.height);
        props
    }

    /// Insert or overwrite one property.
    pub fn set(&mut self, key: impl Into<String>, px: i32) -> &mut Self {
        self.0.insert(key.into(), px);
        self
    }

    /// Builder form of [`RuleProps::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, px: i32) -> Self {
        self.set(key, px);
        self
    }

    /// Look up one property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i32> {
        self.0.get(key).copied()
    }

    /// Mutable access to one property, for in-place deltas.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut i32> {
        self.0.get_mut(key)
    }

    /// Iterate properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &RuleProps) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), *value);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for RuleProps {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Write-only store for solved geometry, keyed by rule name.
///
/// Both methods must be idempotent upserts: pushing the same name twice
/// replaces the earlier entry instead of adding a second one. The split
/// into two methods lets a sink distinguish seeding from re-solving, but
/// a sink is free to treat them identically.
pub trait RuleSink {
    /// Create the rule if absent, otherwise overwrite it.
    fn create_rule(&mut self, name: &str, props: &RuleProps);

    /// Overwrite the rule if present, otherwise create it.
    fn update_rule(&mut self, name: &str, props: &RuleProps);
}

impl<T: RuleSink + ?Sized> RuleSink for &mut T {
    fn create_rule(&mut self, name: &str, props: &RuleProps) {
        (**self).create_rule(name, props);
    }

    fn update_rule(&mut self, name: &str, props: &RuleProps) {
        (**self).update_rule(name, props);
    }
}

impl<T: RuleSink + ?Sized> RuleSink for Box<T> {
    fn create_rule(&mut self, name: &str, props: &RuleProps) {
        (**self).create_rule(name, props);
    }

    fn update_rule(&mut self, name: &str, props: &RuleProps) {
        (**self).update_rule(name, props);
    }
}

/// Opaque reference to a host container element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    /// Wrap a host-specific identifier (element id, selector, window key).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The host identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Current absolute rectangles of the viewport and of container elements.
pub trait GeometrySource {
    /// Rectangle of the whole viewport.
    fn viewport_region(&self) -> Region;

    /// Rectangle of one container element.
    fn element_region(&self, element: &ElementHandle) -> Region;
}

impl<T: GeometrySource + ?Sized> GeometrySource for &T {
    fn viewport_region(&self) -> Region {
        (**self).viewport_region()
    }

    fn element_region(&self, element: &ElementHandle) -> Region {
        (**self).element_region(element)
    }
}

impl<T: GeometrySource + ?Sized> GeometrySource for std::rc::Rc<T> {
    fn viewport_region(&self) -> Region {
        (**self).viewport_region()
    }

    fn element_region(&self, element: &ElementHandle) -> Region {
        (**self).element_region(element)
    }
}

/// Callback invoked by an [`EventSource`].
pub type HostCallback = Box<dyn FnMut()>;

/// Load and resize notifications from the host.
///
/// Resize callbacks are expected to arrive already coalesced to a bounded
/// frequency (see [`crate::debounce::ResizeDebouncer`]).
pub trait EventSource {
    /// Register a callback for the container's load event.
    fn on_load(&mut self, callback: HostCallback);

    /// Register a callback for every resize of the container.
    fn on_resize(&mut self, callback: HostCallback);
}

#[cfg(any(test, feature = "test-helpers"))]
pub use fakes::{FixedGeometry, ManualEvents};

#[cfg(any(test, feature = "test-helpers"))]
mod fakes {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{ElementHandle, EventSource, GeometrySource, HostCallback};
    use crate::geometry::Region;

    /// Geometry source whose rectangles are set by the test.
    ///
    /// Interior mutability lets a test share one instance (via `Rc`) with a
    /// root layout and still resize it between events.
    #[derive(Debug, Default)]
    pub struct FixedGeometry {
        viewport: RefCell<Region>,
        elements: RefCell<HashMap<ElementHandle, Region>>,
    }

    impl FixedGeometry {
        /// Geometry with the given viewport and no elements.
        #[must_use]
        pub fn new(viewport: Region) -> Self {
            Self {
                viewport: RefCell::new(viewport),
                elements: RefCell::new(HashMap::new()),
            }
        }

        /// Replace the viewport rectangle.
        pub fn set_viewport(&self, region: Region) {
            *self.viewport.borrow_mut() = region;
        }

        /// Insert or replace an element rectangle.
        pub fn set_element(&self, element: impl Into<ElementHandle>, region: Region) {
            self.elements.borrow_mut().insert(element.into(), region);
        }
    }

    impl GeometrySource for FixedGeometry {
        fn viewport_region(&self) -> Region {
            *self.viewport.borrow()
        }

        /// Unknown elements report an empty region, like a detached node.
        fn element_region(&self, element: &ElementHandle) -> Region {
            self.elements
                .borrow()
                .get(element)
                .copied()
                .unwrap_or_default()
        }
    }

    /// Event source whose callbacks are fired explicitly.
    #[derive(Default)]
    pub struct ManualEvents {
        load: Vec<HostCallback>,
        resize: Vec<HostCallback>,
    }

    impl ManualEvents {
        /// No callbacks registered yet.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Run every load callback in registration order.
        pub fn fire_load(&mut self) {
            for callback in &mut self.load {
                callback();
            }
        }

        /// Run every resize callback in registration order.
        pub fn fire_resize(&mut self) {
            for callback in &mut self.resize {
                callback();
            }
        }

        /// Number of registered (load, resize) callbacks.
        #[must_use]
        pub fn registered(&self) -> (usize, usize) {
            (self.load.len(), self.resize.len())
        }
    }

    impl EventSource for ManualEvents {
        fn on_load(&mut self, callback: HostCallback) {
            self.load.push(callback);
        }

        fn on_resize(&mut self, callback: HostCallback) {
            self.resize.push(callback);
        }
    }
}
