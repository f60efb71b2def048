//! Declarative area trees.
//!
//! A [`LayoutSpec`] describes a tree as data, typically loaded from JSON:
//!
//! ```json
//! {
//!   "name": "app",
//!   "splits": [
//!     { "name": "header", "axis": "row", "size": 0.2, "gap": "0 8" },
//!     { "name": "body", "axis": "row", "structure": "nested",
//!       "layouts": [ { "name": "editor", "gap": [4] } ] }
//!   ]
//! }
//! ```
//!
//! Realizing a spec goes through the same `add_row` / `add_column` /
//! `add_layout` calls as hand-built trees, so every structural check
//! still applies.

use boxtree_core::geometry::Gap;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::node::{AreaOptions, BoxNode, Structure};

/// Split direction of a child in a [`LayoutSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Row,
    Column,
}

/// Gap in any of its accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GapSpec {
    /// One value for every side.
    Uniform(i32),
    /// CSS margin shorthand, 1 to 4 values.
    List(Vec<i32>),
    /// Whitespace-separated shorthand, e.g. `"4 8"` or `"2px 0"`.
    Shorthand(String),
}

impl GapSpec {
    /// Resolve to a [`Gap`].
    pub fn to_gap(&self) -> Result<Gap, LayoutError> {
        let gap = match self {
            GapSpec::Uniform(value) => Gap::parse(&[*value])?,
            GapSpec::List(values) => Gap::parse(values)?,
            GapSpec::Shorthand(text) => text.parse::<Gap>()?,
        };
        Ok(gap)
    }
}

/// Serializable description of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    pub name: String,
    /// Required for entries under `splits`, ignored elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<SplitAxis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<GapSpec>,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub splits: Vec<LayoutSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<LayoutSpec>,
}

impl LayoutSpec {
    /// A bare spec named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis: None,
            size: None,
            gap: None,
            structure: Structure::Flat,
            splits: Vec::new(),
            layouts: Vec::new(),
        }
    }

    /// Parse a spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(text).map_err(|err| LayoutError::Config(err.to_string()))
    }

    /// Render this spec as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string_pretty(self).map_err(|err| LayoutError::Config(err.to_string()))
    }

    /// Options for the node this spec describes.
    pub fn options(&self) -> Result<AreaOptions, LayoutError> {
        let gap = match &self.gap {
            Some(spec) => spec.to_gap()?,
            None => Gap::ZERO,
        };
        Ok(AreaOptions::new(self.name.clone())
            .maybe_size(self.size)
            .gap(gap)
            .structure(self.structure))
    }

    /// A root node carrying this spec's name, gap, structure and subtree.
    pub fn build_root(&self) -> Result<BoxNode, LayoutError> {
        let mut root = BoxNode::root(self.name.clone());
        if let Some(gap) = &self.gap {
            root.set_gap(gap.to_gap()?)?;
        }
        root.set_structure(self.structure)?;
        self.build_into(&mut root)?;
        Ok(root)
    }

    /// Add this spec's children, recursively, under `node`.
    ///
    /// `node` itself is not modified beyond gaining children.
    pub fn build_into(&self, node: &mut BoxNode) -> Result<(), LayoutError> {
        for split in &self.splits {
            let options = split.options()?;
            let child = match split.axis {
                Some(SplitAxis::Row) => node.add_row(options)?,
                Some(SplitAxis::Column) => node.add_column(options)?,
                None => {
                    return Err(LayoutError::Config(format!(
                        "split {:?} under {:?} has no axis",
                        split.name,
                        node.name()
                    )));
                }
            };
            split.build_into(child)?;
        }
        for layout in &self.layouts {
            let child = node.add_layout(layout.options()?)?;
            layout.build_into(child)?;
        }
        Ok(())
    }
}
