#![forbid(unsafe_code)]

//! Constraint-based box layout.
//!
//! This crate turns a tree of named areas into concrete pixel rectangles
//! and publishes each one to a [`RuleSink`](boxtree_core::host::RuleSink):
//!
//! - [`BoxNode`] - the area tree: rows, columns and terminal layout slots
//! - [`RegionSolver`] - per-kind rectangle resolution
//! - [`ViewportLayout`] / [`WrapperLayout`] - roots bound to a container
//! - [`ResizeRule`] - properties that track a container's resize delta
//! - [`LayoutSpec`] - declarative trees loaded from JSON
//!
//! # Sizing
//!
//! Every child of an area declares an optional size. A size in `(0, 1)` is
//! a ratio of the parent's variable length, a size of at least `1` is a
//! fixed pixel length, and no size shares what the ratios leave over.
//!
//! ```
//! use boxtree_core::geometry::Region;
//! use boxtree_layout::{AreaOptions, BoxNode};
//! use boxtree_style::RuleSheet;
//!
//! let mut sheet = RuleSheet::new();
//! let mut root = BoxNode::root("app");
//! root.add_column(AreaOptions::new("nav").size(240.0)).unwrap();
//! root.add_column(AreaOptions::new("main")).unwrap();
//! root.initialize(&mut sheet).unwrap();
//! root.update(Region::from_size(1240, 600), &mut sheet).unwrap();
//!
//! assert_eq!(sheet.prop("main", "left"), Some(240));
//! assert_eq!(sheet.prop("main", "width"), Some(1000));
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod resize_rule;
pub mod root;
pub mod solver;

pub use boxtree_core::geometry::{Axis, Gap, Region};
pub use config::{GapSpec, LayoutSpec, SplitAxis};
pub use error::LayoutError;
pub use node::{AreaOptions, BoxNode, GapTotals, NodeKind, Structure};
pub use resize_rule::ResizeRule;
pub use root::{Container, RootLayout, Viewport, ViewportLayout, Wrapper, WrapperLayout};
pub use solver::{AreaSolver, LayoutSolver, RegionSolver, RootSolver};
