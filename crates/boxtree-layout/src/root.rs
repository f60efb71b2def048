//! Root layouts bound to a host container.
//!
//! A [`RootLayout`] owns an area tree, the geometry source it measures, and
//! the rule sink it writes to. The two flavors differ only in what they
//! measure:
//!
//! - [`ViewportLayout`] fills the whole viewport.
//! - [`WrapperLayout`] fills one container element, in that element's own
//!   coordinate frame.
//!
//! # Lifecycle
//!
//! On load the tree is initialized and fully solved. On every later resize
//! the root applies the size delta to itself and to every [`ResizeRule`],
//! then re-solves the subtree from the corrected root. Resizes that do not
//! change the size are ignored.
//!
//! # Example
//!
//! ```
//! use boxtree_core::geometry::Region;
//! use boxtree_core::host::FixedGeometry;
//! use boxtree_layout::{AreaOptions, ViewportLayout};
//! use boxtree_style::RuleSheet;
//!
//! let geometry = FixedGeometry::new(Region::from_size(1000, 800));
//! let mut app = ViewportLayout::new("app", &geometry, RuleSheet::new());
//! app.add_row(AreaOptions::new("header").size(0.2)).unwrap();
//! app.add_row(AreaOptions::new("body")).unwrap();
//! app.on_load().unwrap();
//! assert_eq!(app.sink().prop("body", "top"), Some(160));
//!
//! geometry.set_viewport(Region::from_size(1000, 900));
//! app.on_resize().unwrap();
//! assert_eq!(app.sink().prop("header", "height"), Some(180));
//! assert_eq!(app.sink().prop("body", "height"), Some(720));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use boxtree_core::geometry::Region;
use boxtree_core::host::{ElementHandle, EventSource, GeometrySource, RuleProps, RuleSink};

use crate::config::LayoutSpec;
use crate::error::LayoutError;
use crate::node::{AreaOptions, BoxNode};
use crate::resize_rule::ResizeRule;

/// Where a root takes its bounding rectangle from.
pub trait Container {
    /// Current bounding rectangle for the root.
    fn measure(&self, geometry: &dyn GeometrySource) -> Region;
}

/// The whole viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport;

impl Container for Viewport {
    fn measure(&self, geometry: &dyn GeometrySource) -> Region {
        geometry.viewport_region()
    }
}

/// One container element. Children are placed in the element's frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    element: ElementHandle,
}

impl Wrapper {
    /// Wrap `element`.
    pub fn new(element: impl Into<ElementHandle>) -> Self {
        Self {
            element: element.into(),
        }
    }

    /// The measured element.
    pub fn element(&self) -> &ElementHandle {
        &self.element
    }
}

impl Container for Wrapper {
    fn measure(&self, geometry: &dyn GeometrySource) -> Region {
        geometry.element_region(&self.element).local()
    }
}

/// An area tree bound to a container, a geometry source and a rule sink.
#[derive(Debug)]
pub struct RootLayout<C, G, S> {
    container: C,
    geometry: G,
    sink: S,
    root: BoxNode,
    resize_rules: Vec<ResizeRule>,
    last: Option<Region>,
    error: Option<LayoutError>,
}

/// Root that fills the viewport.
pub type ViewportLayout<G, S> = RootLayout<Viewport, G, S>;

/// Root that fills one container element.
pub type WrapperLayout<G, S> = RootLayout<Wrapper, G, S>;

impl<G: GeometrySource, S: RuleSink> RootLayout<Viewport, G, S> {
    /// An empty viewport root named `name`.
    pub fn new(name: impl Into<String>, geometry: G, sink: S) -> Self {
        Self::with_container(Viewport, BoxNode::root(name), geometry, sink)
    }

    /// A viewport root whose tree is described by `spec`.
    pub fn from_spec(spec: &LayoutSpec, geometry: G, sink: S) -> Result<Self, LayoutError> {
        Ok(Self::with_container(Viewport, spec.build_root()?, geometry, sink))
    }
}

impl<G: GeometrySource, S: RuleSink> RootLayout<Wrapper, G, S> {
    /// An empty root named `name` filling `element`.
    pub fn new(
        name: impl Into<String>,
        element: impl Into<ElementHandle>,
        geometry: G,
        sink: S,
    ) -> Self {
        Self::with_container(Wrapper::new(element), BoxNode::root(name), geometry, sink)
    }

    /// A root filling `element` whose tree is described by `spec`.
    pub fn from_spec(
        spec: &LayoutSpec,
        element: impl Into<ElementHandle>,
        geometry: G,
        sink: S,
    ) -> Result<Self, LayoutError> {
        Ok(Self::with_container(
            Wrapper::new(element),
            spec.build_root()?,
            geometry,
            sink,
        ))
    }
}

impl<C: Container, G: GeometrySource, S: RuleSink> RootLayout<C, G, S> {
    /// Bind an existing root node to `container`.
    pub fn with_container(container: C, root: BoxNode, geometry: G, sink: S) -> Self {
        Self {
            container,
            geometry,
            sink,
            root,
            resize_rules: Vec::new(),
            last: None,
            error: None,
        }
    }

    // --- Building --------------------------------------------------------

    /// Append a row to the root. See [`BoxNode::add_row`].
    pub fn add_row(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.root.add_row(options)
    }

    /// Append a column to the root. See [`BoxNode::add_column`].
    pub fn add_column(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.root.add_column(options)
    }

    /// Append a layout slot to the root. See [`BoxNode::add_layout`].
    pub fn add_layout(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.root.add_layout(options)
    }

    /// Register a rule that tracks this root's resize delta.
    ///
    /// The name may not collide with another resize rule or with a node.
    /// Rules registered after load are seeded immediately.
    pub fn add_resize_rule(
        &mut self,
        name: impl Into<String>,
        values: RuleProps,
    ) -> Result<&ResizeRule, LayoutError> {
        let name = name.into();
        if self.resize_rule(&name).is_some() || self.root.find(&name).is_some() {
            return Err(LayoutError::DuplicateName { name });
        }
        let rule = ResizeRule::new(name, values);
        if self.last.is_some() {
            rule.seed(&mut self.sink);
        }
        let index = self.resize_rules.len();
        self.resize_rules.push(rule);
        Ok(&self.resize_rules[index])
    }

    /// Bump one property of a registered resize rule.
    pub fn adjust_rule(&mut self, name: &str, property: &str, px: i32) -> Result<(), LayoutError> {
        let rule = self
            .resize_rules
            .iter_mut()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| LayoutError::UnknownRule {
                name: name.to_string(),
            })?;
        rule.adjust(property, px, &mut self.sink);
        Ok(())
    }

    // --- Host events -----------------------------------------------------

    /// Measure the container, initialize on first use, seed resize rules,
    /// and solve the whole tree.
    pub fn on_load(&mut self) -> Result<(), LayoutError> {
        let region = self.container.measure(&self.geometry);
        if let Some(rule) = self
            .resize_rules
            .iter()
            .find(|rule| self.root.find(rule.name()).is_some())
        {
            return Err(LayoutError::DuplicateName {
                name: rule.name().to_string(),
            });
        }
        if !self.root.is_initialized() {
            self.root.initialize(&mut self.sink)?;
        }
        for rule in &self.resize_rules {
            rule.seed(&mut self.sink);
        }
        self.root.update(region, &mut self.sink)?;
        self.last = Some(region);
        boxtree_core::debug!(
            target: "boxtree.root",
            root = %self.root.name(),
            width = region.width,
            height = region.height,
            "load"
        );
        Ok(())
    }

    /// Apply the container's size change since the last measurement.
    ///
    /// The delta is added to the root and to every resize rule; the
    /// subtree is then fully re-solved. Before the first load this behaves
    /// like [`RootLayout::on_load`].
    pub fn on_resize(&mut self) -> Result<(), LayoutError> {
        let Some(last) = self.last else {
            return self.on_load();
        };
        let region = self.container.measure(&self.geometry);
        let dx = region.width - last.width;
        let dy = region.height - last.height;
        if dx == 0 && dy == 0 {
            boxtree_core::trace!(
                target: "boxtree.root",
                root = %self.root.name(),
                "resize_unchanged"
            );
            return Ok(());
        }

        let _span = boxtree_core::debug_span!(
            target: "boxtree.root",
            "resize",
            root = %self.root.name()
        )
        .entered();

        for rule in &mut self.resize_rules {
            rule.update(dx, dy, &mut self.sink);
        }
        self.root.resize_by(dx, dy, &mut self.sink);
        self.root.propagate(&mut self.sink);
        self.last = Some(region);

        boxtree_core::debug!(
            target: "boxtree.root",
            dx,
            dy,
            width = self.root.region().width,
            height = self.root.region().height,
            "resize"
        );
        Ok(())
    }

    /// Register `on_load` and `on_resize` of a shared root with `events`.
    ///
    /// Callbacks hold a weak reference: once the last strong reference is
    /// dropped they do nothing. Errors raised inside a callback are logged
    /// and kept for [`RootLayout::take_error`].
    pub fn bind(this: &Rc<RefCell<Self>>, events: &mut dyn EventSource)
    where
        Self: 'static,
    {
        let weak = Rc::downgrade(this);
        events.on_load(Box::new(move || dispatch(&weak, "load", Self::on_load)));
        let weak = Rc::downgrade(this);
        events.on_resize(Box::new(move || {
            dispatch(&weak, "resize", Self::on_resize);
        }));
    }

    /// The error raised by the most recent failing bound callback.
    pub fn take_error(&mut self) -> Option<LayoutError> {
        self.error.take()
    }

    // --- Inspection ------------------------------------------------------

    /// Root node of the tree.
    pub fn root(&self) -> &BoxNode {
        &self.root
    }

    /// Mutable root node, for building before load.
    pub fn root_mut(&mut self) -> &mut BoxNode {
        &mut self.root
    }

    /// A registered resize rule.
    pub fn resize_rule(&self, name: &str) -> Option<&ResizeRule> {
        self.resize_rules.iter().find(|rule| rule.name() == name)
    }

    /// The container this root measures.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// The geometry source.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// The rule sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable rule sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Container rectangle seen at the last load or applied resize.
    pub fn last_region(&self) -> Option<Region> {
        self.last
    }

    /// Whether `on_load` has completed.
    pub fn is_loaded(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn dispatch<C: Container, G: GeometrySource, S: RuleSink>(
    weak: &Weak<RefCell<RootLayout<C, G, S>>>,
    event: &'static str,
    handler: fn(&mut RootLayout<C, G, S>) -> Result<(), LayoutError>,
) {
    let Some(root) = weak.upgrade() else {
        return;
    };
    let Ok(mut root) = root.try_borrow_mut() else {
        boxtree_core::warn!(
            target: "boxtree.root",
            event,
            "root is already borrowed; dropping event"
        );
        return;
    };
    if let Err(err) = handler(&mut *root) {
        boxtree_core::warn!(
            target: "boxtree.root",
            event,
            error = %err,
            "event handler failed"
        );
        root.error = Some(err);
    }
}
