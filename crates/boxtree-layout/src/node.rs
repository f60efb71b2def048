//! The area tree and its solver.
//!
//! A [`BoxNode`] is one rectangle in the tree: the root bound to a
//! container, a row or column area that splits its parent, or a terminal
//! layout slot. Building and solving follows a fixed lifecycle:
//!
//! 1. **Build**: [`BoxNode::add_row`], [`BoxNode::add_column`] and
//!    [`BoxNode::add_layout`] grow the tree top-down. All split children of
//!    one parent share an axis.
//! 2. **Initialize**: [`BoxNode::initialize`] freezes the tree, resolves
//!    every child's ratio or fixed length ([`BoxNode::allocate`]) and seeds
//!    one empty rule per node.
//! 3. **Solve**: [`BoxNode::update`] resolves the root's rectangle and
//!    [`BoxNode::propagate`] fans it out, parent before children, writing
//!    one rule per node.
//!
//! # Allocation
//!
//! Children with an explicit ratio keep it; children with a pixel size keep
//! it. Children without a size ("flex") split the remaining percentage in
//! whole hundredths: with `free = floor(100 * (1 - sum_ratio))` and `N` flex
//! children, `a = round(free / N)` and `r = free - N * a`; the first flex
//! child gets `(a + r) / 100`, every other one `a / 100`.
//!
//! # Rounding correction
//!
//! Each ratio child's length is floored independently, so a level can come
//! up a few pixels short. After positioning a level, the shortfall against
//! `round(variable_length * sum_ratio)` is added to the last ratio child and
//! every later sibling is shifted by the same amount.

use std::collections::HashSet;

use boxtree_core::geometry::{Axis, Gap, Region};
use boxtree_core::host::{RuleProps, RuleSink};

use crate::error::LayoutError;
use crate::solver::{floor_px, round_px};

/// What a node is, which decides how it resolves its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Bound to a container; fills it.
    Root,
    /// A row or column that takes a share of its parent.
    Area(Axis),
    /// A terminal slot that claims its parent's whole rectangle.
    Layout,
}

/// Coordinate frame a node hands to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    /// Children are positioned in the same (global) frame as this node.
    #[default]
    Flat,
    /// Children are positioned relative to this node's own box.
    Nested,
    /// Like `Nested`, but only the governing dimension is published.
    Wrap,
}

impl Structure {
    /// Whether this node reports a local (origin-anchored) frame.
    #[inline]
    pub const fn is_local(self) -> bool {
        matches!(self, Structure::Nested | Structure::Wrap)
    }
}

/// Gap consumed by direct split children, summed per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GapTotals {
    pub width: i32,
    pub height: i32,
}

impl GapTotals {
    /// Total along the stacking direction of `axis`.
    #[inline]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Row => self.height,
            Axis::Column => self.width,
        }
    }
}

/// Options for a child created by `add_row`, `add_column` or `add_layout`.
///
/// # Example
///
/// ```
/// use boxtree_layout::{AreaOptions, BoxNode, Structure};
/// use boxtree_core::geometry::Gap;
///
/// let mut root = BoxNode::root("app");
/// root.add_row(AreaOptions::new("header").size(48.0).gap(Gap::from((0, 8))))
///     .unwrap();
/// root.add_row(AreaOptions::new("body").structure(Structure::Nested))
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOptions {
    name: String,
    size: Option<f64>,
    gap: Gap,
    structure: Structure,
}

impl AreaOptions {
    /// A flexible, gapless, flat child named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            gap: Gap::ZERO,
            structure: Structure::Flat,
        }
    }

    /// Declared size: `0 < size < 1` is a ratio, `size >= 1` is pixels.
    ///
    /// Ignored for layout slots.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Optional form of [`AreaOptions::size`].
    #[must_use]
    pub fn maybe_size(mut self, size: Option<f64>) -> Self {
        self.size = size;
        self
    }

    /// Inset between the solved rectangle and the bounding box.
    #[must_use]
    pub fn gap(mut self, gap: Gap) -> Self {
        self.gap = gap;
        self
    }

    /// Coordinate frame handed to children.
    #[must_use]
    pub fn structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }
}

/// One node of the area tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
    name: String,
    kind: NodeKind,
    size: Option<f64>,
    structure: Structure,
    gap: Gap,
    ratio: Option<f64>,
    fixed: Option<i32>,
    sum_fixed: i32,
    sum_ratio: f64,
    sum_gap: GapTotals,
    split_axis: Option<Axis>,
    splits: Vec<BoxNode>,
    layouts: Vec<BoxNode>,
    region: Region,
    initialized: bool,
}

impl BoxNode {
    fn with_kind(name: String, kind: NodeKind, size: Option<f64>, gap: Gap, structure: Structure) -> Self {
        Self {
            name,
            kind,
            size,
            structure,
            gap,
            ratio: None,
            fixed: None,
            sum_fixed: 0,
            sum_ratio: 0.0,
            sum_gap: GapTotals::default(),
            split_axis: None,
            splits: Vec::new(),
            layouts: Vec::new(),
            region: Region::default(),
            initialized: false,
        }
    }

    /// A root node. Roots fill whatever rectangle `update` receives.
    pub fn root(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), NodeKind::Root, None, Gap::ZERO, Structure::Flat)
    }

    // --- Building --------------------------------------------------------

    /// Append a row: full parent width, height from the declared size.
    pub fn add_row(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.add_split(Axis::Row, options)
    }

    /// Append a column: full parent height, width from the declared size.
    pub fn add_column(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.add_split(Axis::Column, options)
    }

    /// Append a terminal slot that claims this node's whole rectangle.
    pub fn add_layout(&mut self, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.ensure_mutable()?;
        let AreaOptions {
            name,
            gap,
            structure,
            ..
        } = options;
        let index = self.layouts.len();
        self.layouts
            .push(Self::with_kind(name, NodeKind::Layout, None, gap, structure));
        Ok(&mut self.layouts[index])
    }

    fn add_split(&mut self, axis: Axis, options: AreaOptions) -> Result<&mut BoxNode, LayoutError> {
        self.ensure_mutable()?;
        if let Some(existing) = self.split_axis
            && existing != axis
        {
            return Err(LayoutError::MixedAxis {
                parent: self.name.clone(),
                existing,
                requested: axis,
            });
        }
        if let Some(size) = options.size
            && !(size.is_finite() && size > 0.0 && size <= f64::from(i32::MAX))
        {
            return Err(LayoutError::InvalidSize {
                name: options.name,
                size,
            });
        }
        self.split_axis = Some(axis);
        let AreaOptions {
            name,
            size,
            gap,
            structure,
        } = options;
        let index = self.splits.len();
        self.splits
            .push(Self::with_kind(name, NodeKind::Area(axis), size, gap, structure));
        Ok(&mut self.splits[index])
    }

    fn ensure_mutable(&self) -> Result<(), LayoutError> {
        if self.kind == NodeKind::Layout {
            return Err(LayoutError::TerminalNode {
                name: self.name.clone(),
            });
        }
        if self.initialized {
            return Err(LayoutError::AlreadyInitialized {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Replace this node's gap. Only valid before `initialize`.
    pub fn set_gap(&mut self, gap: Gap) -> Result<(), LayoutError> {
        if self.initialized {
            return Err(LayoutError::AlreadyInitialized {
                name: self.name.clone(),
            });
        }
        self.gap = gap;
        Ok(())
    }

    /// Replace this node's structure. Only valid before `initialize`.
    pub fn set_structure(&mut self, structure: Structure) -> Result<(), LayoutError> {
        if self.initialized {
            return Err(LayoutError::AlreadyInitialized {
                name: self.name.clone(),
            });
        }
        self.structure = structure;
        Ok(())
    }

    // --- Initialization --------------------------------------------------

    /// Freeze the tree, allocate every level, and seed one empty rule per
    /// node (parent before children, in insertion order).
    pub fn initialize(&mut self, sink: &mut dyn RuleSink) -> Result<(), LayoutError> {
        if self.initialized {
            return Err(LayoutError::AlreadyInitialized {
                name: self.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        let mut duplicate = None;
        self.walk(&mut |node| {
            if duplicate.is_none() && !seen.insert(node.name.clone()) {
                duplicate = Some(node.name.clone());
            }
        });
        if let Some(name) = duplicate {
            return Err(LayoutError::DuplicateName { name });
        }

        let mut count = 0usize;
        self.initialize_subtree(sink, &mut count);
        boxtree_core::debug!(
            target: "boxtree.layout",
            root = %self.name,
            nodes = count,
            "initialized"
        );
        Ok(())
    }

    fn initialize_subtree(&mut self, sink: &mut dyn RuleSink, count: &mut usize) {
        self.allocate();
        sink.create_rule(&self.name, &RuleProps::new());
        self.initialized = true;
        *count += 1;
        for child in self.splits.iter_mut().chain(self.layouts.iter_mut()) {
            child.initialize_subtree(sink, count);
        }
    }

    /// Resolve `ratio`/`fixed` on every direct split child and recompute
    /// the aggregates `sum_ratio`, `sum_fixed` and `sum_gap`.
    pub fn allocate(&mut self) {
        self.sum_ratio = 0.0;
        self.sum_fixed = 0;
        self.sum_gap = GapTotals::default();

        let mut flex = Vec::new();
        for (index, child) in self.splits.iter_mut().enumerate() {
            child.ratio = None;
            child.fixed = None;
            match child.size {
                None => flex.push(index),
                Some(size) if size < 1.0 => {
                    child.ratio = Some(size);
                    self.sum_ratio += size;
                }
                Some(size) => {
                    let px = size as i32;
                    child.fixed = Some(px);
                    self.sum_fixed = self.sum_fixed.saturating_add(px);
                }
            }
            self.sum_gap.width = self.sum_gap.width.saturating_add(child.gap.width());
            self.sum_gap.height = self.sum_gap.height.saturating_add(child.gap.height());
        }

        if flex.is_empty() {
            return;
        }

        let n = flex.len() as i64;
        let mut free = floor_px(100.0 * (1.0 - self.sum_ratio)) as i64;
        if free < 0 {
            boxtree_core::warn!(
                target: "boxtree.layout",
                name = %self.name,
                sum_ratio = self.sum_ratio,
                "ratios exceed 1; flex children get nothing"
            );
            free = 0;
        }
        let share = (free as f64 / n as f64).round() as i64;
        let remainder = free - n * share;
        boxtree_core::trace!(
            target: "boxtree.layout",
            name = %self.name,
            flex = n,
            free,
            share,
            remainder,
            "allocate"
        );

        for (position, index) in flex.into_iter().enumerate() {
            let hundredths = if position == 0 { share + remainder } else { share };
            let ratio = hundredths as f64 / 100.0;
            self.splits[index].ratio = Some(ratio);
            self.sum_ratio += ratio;
        }
    }

    // --- Solving ---------------------------------------------------------

    /// Resolve this node against a bounding region, then propagate.
    ///
    /// Public entry point for roots.
    pub fn update(&mut self, region: Region, sink: &mut dyn RuleSink) -> Result<(), LayoutError> {
        if !self.initialized {
            return Err(LayoutError::NotInitialized {
                name: self.name.clone(),
            });
        }
        let variable = region.extent(self.split_axis.unwrap_or(Axis::Row));
        self.set_region(region, variable, sink);
        self.propagate(sink);
        Ok(())
    }

    /// Compute this node's rectangle from its parent's frame, publish it,
    /// and return the frame handed to this node's own children.
    pub fn set_region(&mut self, parent: Region, variable_length: i32, sink: &mut dyn RuleSink) -> Region {
        let solver = self.kind.solver();
        self.region = solver.solve_region(self, parent, variable_length);
        self.push_rule(sink);
        self.get_region()
    }

    /// Lay out every direct child along this node's split axis, correct the
    /// rounding shortfall, place the layout slots, then recurse.
    pub fn propagate(&mut self, sink: &mut dyn RuleSink) {
        let frame = self.get_region();

        if let Some(axis) = self.split_axis {
            let variable = self.variable_length(axis);
            let mut cursor = frame;
            let mut used = 0;
            let mut fill = None;

            for (index, child) in self.splits.iter_mut().enumerate() {
                child.set_region(cursor, variable, sink);
                let outer = child.bounding_box();
                cursor = cursor.shifted(axis, outer.extent(axis));
                if child.ratio.is_some() {
                    used = child.region.extent(axis).saturating_add(used);
                    fill = Some(index);
                }
            }

            if self.sum_ratio > 0.0
                && let Some(fill) = fill
            {
                let actual = round_px(f64::from(variable) * self.sum_ratio);
                let delta = actual - used;
                if delta > 0 {
                    boxtree_core::trace!(
                        target: "boxtree.layout",
                        name = %self.name,
                        fill = %self.splits[fill].name,
                        delta,
                        "rounding_correction"
                    );
                    self.splits[fill].stretch(axis, delta, sink);
                    for sibling in &mut self.splits[fill + 1..] {
                        sibling.region = sibling.region.shifted(axis, delta);
                        sibling.push_rule(sink);
                    }
                }
            }
        }

        for layout in &mut self.layouts {
            layout.set_region(frame, 0, sink);
        }

        for child in self.splits.iter_mut().chain(self.layouts.iter_mut()) {
            child.propagate(sink);
        }
    }

    /// Length along `axis` left for ratio children once fixed lengths and
    /// child gaps are taken out. Never negative.
    pub fn variable_length(&self, axis: Axis) -> i32 {
        let variable = self
            .region
            .extent(axis)
            .saturating_sub(self.sum_fixed)
            .saturating_sub(self.sum_gap.along(axis));
        if variable < 0 {
            boxtree_core::warn!(
                target: "boxtree.layout",
                name = %self.name,
                variable,
                "fixed sizes and gaps overflow the area; clamping to 0"
            );
            return 0;
        }
        variable
    }

    fn stretch(&mut self, axis: Axis, delta: i32, sink: &mut dyn RuleSink) {
        match axis {
            Axis::Row => self.region.height = self.region.height.saturating_add(delta),
            Axis::Column => self.region.width = self.region.width.saturating_add(delta),
        }
        self.push_rule(sink);
    }

    /// Add a container resize delta to this node's size and republish.
    ///
    /// Children are untouched until the next [`BoxNode::propagate`].
    pub fn resize_by(&mut self, dx: i32, dy: i32, sink: &mut dyn RuleSink) {
        self.region.grow(dx, dy);
        self.push_rule(sink);
    }

    fn push_rule(&self, sink: &mut dyn RuleSink) {
        sink.update_rule(&self.name, &self.rule_props());
    }

    /// Properties published for this node.
    ///
    /// `wrap` nodes publish only the dimension they govern; layout slots
    /// publish their outer box plus their inset as padding.
    pub fn rule_props(&self) -> RuleProps {
        let rect = self.rule_region();
        if self.structure == Structure::Wrap {
            let mut props = RuleProps::new();
            match self.kind {
                NodeKind::Area(Axis::Row) => {
                    props.set("height", rect.height);
                }
                NodeKind::Area(Axis::Column) => {
                    props.set("width", rect.width);
                }
                NodeKind::Root | NodeKind::Layout => {
                    props.set("width", rect.width);
                    props.set("height", rect.height);
                }
            }
            return props;
        }

        let mut props = RuleProps::from_region(rect);
        if self.kind == NodeKind::Layout && !self.gap.is_zero() {
            props
                .set("padding-top", self.gap.top)
                .set("padding-right", self.gap.right)
                .set("padding-bottom", self.gap.bottom)
                .set("padding-left", self.gap.left);
        }
        props
    }

    // --- Inspection ------------------------------------------------------

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Declared size, if any.
    pub fn size(&self) -> Option<f64> {
        self.size
    }

    /// Coordinate frame handed to children.
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Inset around the solved rectangle.
    pub fn gap(&self) -> Gap {
        self.gap
    }

    /// Resolved share of the parent's variable length.
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Resolved fixed length in pixels.
    pub fn fixed(&self) -> Option<i32> {
        self.fixed
    }

    /// Sum of fixed child lengths.
    pub fn sum_fixed(&self) -> i32 {
        self.sum_fixed
    }

    /// Sum of child ratios, flex shares included.
    pub fn sum_ratio(&self) -> f64 {
        self.sum_ratio
    }

    /// Sum of child gaps.
    pub fn sum_gap(&self) -> GapTotals {
        self.sum_gap
    }

    /// Axis shared by the split children, once one was added.
    pub fn split_axis(&self) -> Option<Axis> {
        self.split_axis
    }

    /// Split children in insertion order.
    pub fn splits(&self) -> &[BoxNode] {
        &self.splits
    }

    /// Layout slots in insertion order.
    pub fn layouts(&self) -> &[BoxNode] {
        &self.layouts
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Last solved rectangle, in the parent's frame.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Frame handed to children: the solved rectangle, anchored at the
    /// origin for `nested` and `wrap` nodes.
    pub fn get_region(&self) -> Region {
        if self.structure.is_local() {
            self.region.local()
        } else {
            self.region
        }
    }

    /// Solved rectangle grown by the gap on all sides.
    ///
    /// `nested` and `wrap` nodes report an origin-anchored box.
    pub fn bounding_box(&self) -> Region {
        let outer = self.region.outset(self.gap);
        if self.structure.is_local() {
            outer.local()
        } else {
            outer
        }
    }

    /// Rectangle published to the rule sink.
    pub fn rule_region(&self) -> Region {
        self.kind.solver().rule_region(self)
    }

    /// Depth-first search by name, this node included.
    pub fn find(&self, name: &str) -> Option<&BoxNode> {
        if self.name == name {
            return Some(self);
        }
        self.splits
            .iter()
            .chain(self.layouts.iter())
            .find_map(|child| child.find(name))
    }

    /// Mutable form of [`BoxNode::find`].
    pub fn find_mut(&mut self, name: &str) -> Option<&mut BoxNode> {
        if self.name == name {
            return Some(self);
        }
        self.splits
            .iter_mut()
            .chain(self.layouts.iter_mut())
            .find_map(|child| child.find_mut(name))
    }

    /// Visit every node, parent before children, splits before layouts.
    pub fn walk<F: FnMut(&BoxNode)>(&self, visit: &mut F) {
        visit(self);
        for child in self.splits.iter().chain(self.layouts.iter()) {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}
