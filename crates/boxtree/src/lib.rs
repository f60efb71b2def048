#![forbid(unsafe_code)]

//! Boxtree public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.
//!
//! ```
//! use boxtree::prelude::*;
//! use boxtree::core::host::FixedGeometry;
//!
//! fn build() -> boxtree::Result<RuleSheet> {
//!     let geometry = FixedGeometry::new(Region::from_size(1000, 800));
//!     let mut app = ViewportLayout::new("app", &geometry, RuleSheet::new());
//!     app.add_row(AreaOptions::new("header").size(0.2))?;
//!     app.add_row(AreaOptions::new("body"))?;
//!     app.on_load()?;
//!     Ok(app.sink().clone())
//! }
//!
//! let sheet = build().unwrap();
//! assert_eq!(sheet.prop("header", "height"), Some(160));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use boxtree_core::debounce::{DebounceConfig, ResizeDebouncer};
pub use boxtree_core::geometry::{Axis, Gap, GapParseError, Region};
pub use boxtree_core::host::{
    ElementHandle, EventSource, GeometrySource, HostCallback, RuleProps, RuleSink,
};

// --- Layout re-exports -----------------------------------------------------

pub use boxtree_layout::{
    AreaOptions, BoxNode, Container, GapSpec, LayoutError, LayoutSpec, NodeKind, ResizeRule,
    RootLayout, SplitAxis, Structure, Viewport, ViewportLayout, Wrapper, WrapperLayout,
};

// --- Style re-exports ------------------------------------------------------

pub use boxtree_style::RuleSheet;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for boxtree users.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Tree construction, initialization or configuration failure.
    Layout(LayoutError),
    /// Gap shorthand that could not be parsed.
    Gap(GapParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::Gap(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Gap(err) => Some(err),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<GapParseError> for Error {
    fn from(err: GapParseError) -> Self {
        Self::Gap(err)
    }
}

/// Standard result type for boxtree APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AreaOptions, Axis, BoxNode, Error, Gap, LayoutSpec, Region, Result, RuleProps, RuleSheet,
        RuleSink, Structure, ViewportLayout, WrapperLayout,
    };

    pub use crate::{core, layout, style};
}

pub use boxtree_core as core;
pub use boxtree_layout as layout;
pub use boxtree_style as style;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_display() {
        let err: Error = LayoutError::DuplicateName { name: "x".into() }.into();
        assert_eq!(err.to_string(), "rule name \"x\" is used more than once");
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = "1 -2".parse::<Gap>().unwrap_err().into();
        assert_eq!(err, Error::Gap(GapParseError::Negative { value: -2 }));
    }
}
