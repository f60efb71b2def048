//! Structural contract errors.
//!
//! Every variant is a programmer error in how a tree was assembled. They
//! are raised synchronously by the mutating call (`add_row`, `add_column`,
//! `add_layout`, `initialize`, ...) and never retried; the solver itself
//! has no recoverable runtime failures.

use std::fmt;

use boxtree_core::geometry::{Axis, GapParseError};

/// Errors raised while building or initializing an area tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A parent already holding children of one axis was given the other.
    MixedAxis {
        parent: String,
        existing: Axis,
        requested: Axis,
    },
    /// Structural mutation (or a second `initialize`) after `initialize`.
    AlreadyInitialized {
        name: String,
    },
    /// Gap shorthand with zero or more than four values.
    MalformedGap {
        len: usize,
    },
    /// A gap side below zero.
    NegativeGap {
        value: i32,
    },
    /// A declared size that is not positive, not finite, or beyond the pixel range.
    InvalidSize {
        name: String,
        size: f64,
    },
    /// Two nodes, or a node and a resize rule, share one rule name.
    DuplicateName {
        name: String,
    },
    /// Children added to a terminal layout node.
    TerminalNode {
        name: String,
    },
    /// `update` on a tree that was never initialized.
    NotInitialized {
        name: String,
    },
    /// `adjust_rule` on a resize rule that was never registered.
    UnknownRule {
        name: String,
    },
    /// A declarative layout description that could not be read.
    Config(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedAxis {
                parent,
                existing,
                requested,
            } => write!(
                f,
                "area {parent:?} already splits by {existing}; cannot add a {requested}"
            ),
            Self::AlreadyInitialized { name } => {
                write!(f, "area {name:?} is already initialized; its tree is frozen")
            }
            Self::MalformedGap { len } => {
                write!(f, "gap shorthand takes 1 to 4 values, got {len}")
            }
            Self::NegativeGap { value } => write!(f, "gap side {value} is negative"),
            Self::InvalidSize { name, size } => write!(
                f,
                "area {name:?} has invalid size {size}: expected a ratio in (0, 1) or pixels in [1, {}]",
                i32::MAX
            ),
            Self::DuplicateName { name } => {
                write!(f, "rule name {name:?} is used more than once")
            }
            Self::TerminalNode { name } => {
                write!(f, "layout {name:?} is terminal and cannot hold children")
            }
            Self::NotInitialized { name } => {
                write!(f, "area {name:?} must be initialized before update")
            }
            Self::UnknownRule { name } => write!(f, "no resize rule named {name:?}"),
            Self::Config(msg) => write!(f, "invalid layout description: {msg}"),
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<GapParseError> for LayoutError {
    fn from(err: GapParseError) -> Self {
        match err {
            GapParseError::Length { len } => Self::MalformedGap { len },
            GapParseError::Negative { value } => Self::NegativeGap { value },
            GapParseError::Token(_) => Self::Config(err.to_string()),
        }
    }
}
