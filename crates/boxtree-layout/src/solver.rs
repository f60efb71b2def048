//! Per-kind rectangle resolution.
//!
//! The three node kinds share every field and the whole propagation walk;
//! they differ only in how a node turns its parent's frame into its own
//! rectangle, and in which rectangle it reports to the rule sink. Those two
//! decisions live behind [`RegionSolver`].
//!
//! | Kind        | Solved rectangle                                    | Rule rectangle     |
//! |-------------|-----------------------------------------------------|--------------------|
//! | Root        | parent frame inset by gap                           | solved rectangle   |
//! | Area(Row)   | full parent width, height from ratio or fixed       | solved rectangle   |
//! | Area(Column)| full parent height, width from ratio or fixed       | solved rectangle   |
//! | Layout      | parent frame inset by gap                           | rectangle + gap    |

use boxtree_core::geometry::{Axis, Region};

use crate::node::{BoxNode, NodeKind};

/// Rectangle resolution for one node kind.
pub trait RegionSolver {
    /// Compute `node`'s rectangle from its parent's frame.
    ///
    /// `parent` already carries the running sibling offset;
    /// `variable_length` is the parent's length available to ratio
    /// children along its split axis.
    fn solve_region(&self, node: &BoxNode, parent: Region, variable_length: i32) -> Region;

    /// Rectangle published to the rule sink.
    fn rule_region(&self, node: &BoxNode) -> Region;
}

/// Solver for root nodes: fill the container, minus the root's own gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootSolver;

/// Solver for row and column areas.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaSolver;

/// Solver for terminal layout nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSolver;

impl RegionSolver for RootSolver {
    fn solve_region(&self, node: &BoxNode, parent: Region, _variable_length: i32) -> Region {
        parent.inset(node.gap())
    }

    fn rule_region(&self, node: &BoxNode) -> Region {
        node.region()
    }
}

impl RegionSolver for AreaSolver {
    fn solve_region(&self, node: &BoxNode, parent: Region, variable_length: i32) -> Region {
        let gap = node.gap();
        let allocated = match (node.ratio(), node.fixed()) {
            (Some(ratio), _) => floor_px(f64::from(variable_length) * ratio),
            (None, Some(fixed)) => fixed,
            (None, None) => 0,
        };
        let (width, height) = match node.kind() {
            NodeKind::Area(Axis::Row) => (parent.width - gap.width(), allocated),
            NodeKind::Area(Axis::Column) => (allocated, parent.height - gap.height()),
            NodeKind::Root | NodeKind::Layout => {
                (parent.width - gap.width(), parent.height - gap.height())
            }
        };
        Region::new(parent.top + gap.top, parent.left + gap.left, width, height)
    }

    fn rule_region(&self, node: &BoxNode) -> Region {
        node.region()
    }
}

impl RegionSolver for LayoutSolver {
    fn solve_region(&self, node: &BoxNode, parent: Region, _variable_length: i32) -> Region {
        parent.inset(node.gap())
    }

    fn rule_region(&self, node: &BoxNode) -> Region {
        node.region().outset(node.gap())
    }
}

impl NodeKind {
    /// The solver that resolves nodes of this kind.
    pub fn solver(self) -> &'static dyn RegionSolver {
        match self {
            NodeKind::Root => &RootSolver,
            NodeKind::Area(_) => &AreaSolver,
            NodeKind::Layout => &LayoutSolver,
        }
    }
}

/// Slack absorbed before flooring so that products such as `0.29 * 100`
/// land on the integer they denote.
pub(crate) const ROUNDING_SLACK: f64 = 1e-9;

/// Floor a pixel product.
#[inline]
pub(crate) fn floor_px(value: f64) -> i32 {
    (value + ROUNDING_SLACK).floor() as i32
}

/// Round a pixel product to the nearest integer, halves away from zero.
#[inline]
pub(crate) fn round_px(value: f64) -> i32 {
    value.round() as i32
}
