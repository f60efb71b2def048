//! Rules that track a container's resize delta one to one.
//!
//! A [`ResizeRule`] lives outside the area tree. It holds a named set of
//! pixel properties (typically a chrome element's `width`/`height`) and
//! shifts them by exactly the delta the container moved.

use boxtree_core::host::{RuleProps, RuleSink};

/// A named property set moved by container resize deltas.
///
/// # Example
///
/// ```
/// use boxtree_core::host::RuleProps;
/// use boxtree_layout::ResizeRule;
/// use boxtree_style::RuleSheet;
///
/// let mut sheet = RuleSheet::new();
/// let mut rule = ResizeRule::new("toolbar", RuleProps::new().with("width", 1000));
/// rule.update(-100, 40, &mut sheet);
///
/// assert_eq!(sheet.prop("toolbar", "width"), Some(900));
/// assert_eq!(sheet.prop("toolbar", "height"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRule {
    name: String,
    values: RuleProps,
}

impl ResizeRule {
    /// A rule named `name` starting at `values`.
    pub fn new(name: impl Into<String>, values: RuleProps) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current property values.
    pub fn values(&self) -> &RuleProps {
        &self.values
    }

    /// Push the initial values with `create_rule`.
    pub fn seed(&self, sink: &mut dyn RuleSink) {
        sink.create_rule(&self.name, &self.values);
    }

    /// Add `dx` to `width` and `dy` to `height`, then republish.
    ///
    /// A dimension the rule does not carry stays absent.
    pub fn update(&mut self, dx: i32, dy: i32, sink: &mut dyn RuleSink) {
        if let Some(width) = self.values.get_mut("width") {
            *width += dx;
        }
        if let Some(height) = self.values.get_mut("height") {
            *height += dy;
        }
        sink.update_rule(&self.name, &self.values);
    }

    /// Add `px` to one property, creating it at `px` if absent, then
    /// republish.
    pub fn adjust(&mut self, property: &str, px: i32, sink: &mut dyn RuleSink) {
        match self.values.get_mut(property) {
            Some(value) => *value += px,
            None => {
                self.values.set(property, px);
            }
        }
        sink.update_rule(&self.name, &self.values);
    }
}

#[cfg(test)]
mod tests {
    use boxtree_style::RuleSheet;

    use super::*;

    #[test]
    fn update_moves_width_and_height() {
        let mut sheet = RuleSheet::new();
        let mut rule = ResizeRule::new(
            "frame",
            RuleProps::new().with("width", 1000).with("height", 800),
        );
        rule.seed(&mut sheet);
        rule.update(-50, 100, &mut sheet);

        assert_eq!(sheet.prop("frame", "width"), Some(950));
        assert_eq!(sheet.prop("frame", "height"), Some(900));
        assert_eq!(sheet.creates(), 1);
        assert_eq!(sheet.updates(), 1);
    }

    #[test]
    fn update_leaves_other_properties_alone() {
        let mut sheet = RuleSheet::new();
        let mut rule = ResizeRule::new(
            "badge",
            RuleProps::new().with("height", 20).with("left", 7),
        );
        rule.update(10, 5, &mut sheet);

        let props = sheet.get("badge").unwrap();
        assert_eq!(props.get("height"), Some(25));
        assert_eq!(props.get("left"), Some(7));
        assert_eq!(props.get("width"), None);
    }

    #[test]
    fn adjust_bumps_or_creates_one_property() {
        let mut sheet = RuleSheet::new();
        let mut rule = ResizeRule::new("gutter", RuleProps::new().with("left", 10));
        rule.adjust("left", -4, &mut sheet);
        rule.adjust("top", 3, &mut sheet);

        assert_eq!(rule.values().get("left"), Some(6));
        assert_eq!(rule.values().get("top"), Some(3));
        assert_eq!(sheet.get("gutter"), Some(rule.values().clone()));
    }
}
