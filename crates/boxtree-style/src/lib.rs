#![forbid(unsafe_code)]

//! In-memory rule sink for the boxtree layout solver.

pub mod rulesheet;

pub use rulesheet::RuleSheet;
