#![forbid(unsafe_code)]

//! RuleSheet registry for named geometry rules.
//!
//! A [`RuleSheet`] is the in-memory realization of the
//! [`RuleSink`] port: one entry per rule name, and every push is an upsert.
//! It can render itself as CSS text so a host can inject the result into a
//! style element in one go.
//!
//! # Example
//! ```
//! use boxtree_core::host::{RuleProps, RuleSink};
//! use boxtree_style::RuleSheet;
//!
//! let mut sheet = RuleSheet::new();
//! sheet.create_rule("header", &RuleProps::new());
//! sheet.update_rule("header", &RuleProps::new().with("height", 160));
//! sheet.update_rule("header", &RuleProps::new().with("height", 180));
//!
//! assert_eq!(sheet.len(), 1);
//! assert_eq!(sheet.get("header").unwrap().get("height"), Some(180));
//! assert_eq!(sheet.to_css(), ".header { height: 180px; }\n");
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::RwLock;

use boxtree_core::host::{RuleProps, RuleSink};

#[derive(Debug, Default, Clone)]
struct Entries {
    rules: BTreeMap<String, RuleProps>,
    creates: u64,
    updates: u64,
}

/// A registry of named geometry rules.
///
/// # Thread Safety
///
/// RuleSheet uses an internal RwLock so one sheet can be shared by
/// reference between several root layouts while tests read it back.
#[derive(Debug, Default)]
pub struct RuleSheet {
    entries: RwLock<Entries>,
}

impl RuleSheet {
    /// Create a new empty RuleSheet.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a rule wholesale.
    ///
    /// Counted as a create when the name is new, an update otherwise.
    pub fn define(&self, name: impl Into<String>, props: RuleProps) {
        let mut entries = self.entries.write().expect("RuleSheet lock poisoned");
        if entries.rules.insert(name.into(), props).is_some() {
            entries.updates += 1;
        } else {
            entries.creates += 1;
        }
    }

    /// Remove a rule, returning its last properties.
    pub fn remove(&self, name: &str) -> Option<RuleProps> {
        let mut entries = self.entries.write().expect("RuleSheet lock poisoned");
        entries.rules.remove(name)
    }

    /// Get a rule's current properties.
    pub fn get(&self, name: &str) -> Option<RuleProps> {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        entries.rules.get(name).cloned()
    }

    /// Get one property of one rule.
    pub fn prop(&self, name: &str, key: &str) -> Option<i32> {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        entries.rules.get(name).and_then(|props| props.get(key))
    }

    /// Check if a rule with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        entries.rules.contains_key(name)
    }

    /// Number of distinct rules.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        entries.rules.len()
    }

    /// Check if the sheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rule names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        entries.rules.keys().cloned().collect()
    }

    /// Writes that introduced a new name.
    pub fn creates(&self) -> u64 {
        self.entries.read().expect("RuleSheet lock poisoned").creates
    }

    /// Writes that replaced an existing name.
    pub fn updates(&self) -> u64 {
        self.entries.read().expect("RuleSheet lock poisoned").updates
    }

    /// Drop every rule and reset the counters.
    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("RuleSheet lock poisoned");
        *entries = Entries::default();
    }

    /// Render every rule as a CSS class block, in name order.
    ///
    /// Rules with no properties are skipped; they are seeded placeholders
    /// that have not been solved yet.
    pub fn to_css(&self) -> String {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        let mut out = String::new();
        for (name, props) in &entries.rules {
            if props.is_empty() {
                continue;
            }
            let _ = write!(out, ".{name} {{");
            for (key, px) in props.iter() {
                let _ = write!(out, " {key}: {px}px;");
            }
            out.push_str(" }\n");
        }
        out
    }

    fn upsert(&self, name: &str, props: &RuleProps) {
        let mut guard = self.entries.write().expect("RuleSheet lock poisoned");
        let entries = &mut *guard;
        if let Some(existing) = entries.rules.get_mut(name) {
            *existing = props.clone();
            entries.updates += 1;
        } else {
            entries.rules.insert(name.to_string(), props.clone());
            entries.creates += 1;
        }
    }
}

impl Clone for RuleSheet {
    fn clone(&self) -> Self {
        let entries = self.entries.read().expect("RuleSheet lock poisoned");
        Self {
            entries: RwLock::new(entries.clone()),
        }
    }
}

impl RuleSink for RuleSheet {
    fn create_rule(&mut self, name: &str, props: &RuleProps) {
        self.upsert(name, props);
    }

    fn update_rule(&mut self, name: &str, props: &RuleProps) {
        self.upsert(name, props);
    }
}

impl RuleSink for &RuleSheet {
    fn create_rule(&mut self, name: &str, props: &RuleProps) {
        self.upsert(name, props);
    }

    fn update_rule(&mut self, name: &str, props: &RuleProps) {
        self.upsert(name, props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rulesheet_is_empty() {
        let sheet = RuleSheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.len(), 0);
        assert_eq!(sheet.to_css(), "");
    }

    #[test]
    fn create_then_update_is_upsert() {
        let mut sheet = RuleSheet::new();
        sheet.create_rule("body", &RuleProps::new());
        sheet.update_rule("body", &RuleProps::new().with("height", 640));
        sheet.create_rule("body", &RuleProps::new().with("height", 720));

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.prop("body", "height"), Some(720));
        assert_eq!(sheet.creates(), 1);
        assert_eq!(sheet.updates(), 2);
    }

    #[test]
    fn update_of_unknown_name_creates() {
        let mut sheet = RuleSheet::new();
        sheet.update_rule("late", &RuleProps::new().with("width", 1));
        assert!(sheet.contains("late"));
        assert_eq!(sheet.creates(), 1);
    }

    #[test]
    fn update_replaces_whole_property_set() {
        let mut sheet = RuleSheet::new();
        sheet.update_rule("a", &RuleProps::new().with("top", 1).with("left", 2));
        sheet.update_rule("a", &RuleProps::new().with("height", 3));
        let props = sheet.get("a").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("top"), None);
    }

    #[test]
    fn shared_reference_is_a_sink() {
        let sheet = RuleSheet::new();
        let mut a = &sheet;
        let mut b = &sheet;
        a.update_rule("x", &RuleProps::new().with("width", 1));
        b.update_rule("y", &RuleProps::new().with("width", 2));
        assert_eq!(sheet.names(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn css_is_sorted_and_skips_placeholders() {
        let sheet = RuleSheet::new();
        sheet.define("zeta", RuleProps::new().with("width", 5));
        sheet.define("alpha", RuleProps::new().with("top", 0).with("height", 10));
        sheet.define("pending", RuleProps::new());
        assert_eq!(
            sheet.to_css(),
            ".alpha { height: 10px; top: 0px; }\n.zeta { width: 5px; }\n"
        );
    }

    #[test]
    fn remove_and_clear() {
        let sheet = RuleSheet::new();
        sheet.define("a", RuleProps::new());
        sheet.define("b", RuleProps::new());
        assert!(sheet.remove("a").is_some());
        assert!(sheet.remove("a").is_none());
        sheet.clear();
        assert!(sheet.is_empty());
        assert_eq!(sheet.creates(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let sheet = RuleSheet::new();
        sheet.define("a", RuleProps::new().with("width", 1));
        let copy = sheet.clone();
        sheet.define("a", RuleProps::new().with("width", 2));
        assert_eq!(copy.prop("a", "width"), Some(1));
    }
}
