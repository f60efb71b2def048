//! Property-based invariant tests for allocation and propagation.
//!
//! 1. Allocated ratios never exceed 1 at 1% granularity.
//! 2. Ratio children fill the variable length exactly after correction,
//!    and to the pixel when explicit ratios add up to 1.
//! 3. Fixed children always get their declared length.
//! 4. Siblings never overlap and tile the split axis in order.
//! 5. Incremental resize lands on the same rectangles as a fresh load.

use boxtree_core::geometry::{Axis, Gap, Region};
use boxtree_layout::{AreaOptions, BoxNode};
use boxtree_style::RuleSheet;
use proptest::prelude::*;

/// Declared size for one child: flexible, a ratio in hundredths, or pixels.
#[derive(Debug, Clone, Copy)]
enum Decl {
    Flex,
    Ratio(u8),
    Fixed(u16),
}

impl Decl {
    fn size(self) -> Option<f64> {
        match self {
            Decl::Flex => None,
            Decl::Ratio(pct) => Some(f64::from(pct) / 100.0),
            Decl::Fixed(px) => Some(f64::from(px)),
        }
    }
}

fn decl() -> impl Strategy<Value = Decl> {
    prop_oneof![
        3 => Just(Decl::Flex),
        2 => (1u8..=40).prop_map(Decl::Ratio),
        1 => (1u16..=120).prop_map(Decl::Fixed),
    ]
}

fn build(axis: Axis, decls: &[Decl], gap: i32) -> BoxNode {
    let mut root = BoxNode::root("root");
    for (index, decl) in decls.iter().enumerate() {
        let options = AreaOptions::new(format!("c{index}"))
            .maybe_size(decl.size())
            .gap(Gap::all(gap));
        match axis {
            Axis::Row => root.add_row(options).unwrap(),
            Axis::Column => root.add_column(options).unwrap(),
        };
    }
    root
}

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Row), Just(Axis::Column)]
}

/// At least two ratios, in whole hundredths, that add up to 100.
fn whole_split() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(1u8..100, 1..8).prop_map(|cuts| {
        let mut parts = Vec::with_capacity(cuts.len() + 1);
        let mut last = 0u8;
        for cut in cuts.into_iter().chain(std::iter::once(100)) {
            parts.push(cut - last);
            last = cut;
        }
        parts
    })
}

proptest! {
    #[test]
    fn allocation_stays_within_one(decls in prop::collection::vec(decl(), 1..10)) {
        let mut root = build(Axis::Row, &decls, 0);
        root.allocate();
        let declared: f64 = decls
            .iter()
            .filter_map(|d| match d {
                Decl::Ratio(pct) => Some(f64::from(*pct) / 100.0),
                _ => None,
            })
            .sum();
        let flex = decls.iter().any(|d| matches!(d, Decl::Flex));
        if flex && declared <= 1.0 {
            prop_assert!(root.sum_ratio() <= 1.0 + 1e-9, "sum {}", root.sum_ratio());
            prop_assert!(root.sum_ratio() >= declared - 1e-9);
        }
        for child in root.splits() {
            prop_assert!(child.ratio().is_some() != child.fixed().is_some());
        }
    }

    #[test]
    fn ratio_children_sum_to_variable_length(
        axis in axis(),
        decls in prop::collection::vec(decl(), 1..10),
        gap in 0i32..6,
        width in 200i32..3000,
        height in 200i32..3000,
    ) {
        let mut sheet = RuleSheet::new();
        let mut root = build(axis, &decls, gap);
        root.initialize(&mut sheet).unwrap();
        root.update(Region::from_size(width, height), &mut sheet).unwrap();

        let variable = root.variable_length(axis);
        let sum_ratio = root.sum_ratio();
        let used: i32 = root
            .splits()
            .iter()
            .filter(|c| c.ratio().is_some())
            .map(|c| c.region().extent(axis))
            .sum();
        if sum_ratio > 0.0 {
            let expected = (f64::from(variable) * sum_ratio).round() as i32;
            prop_assert!(used >= expected, "used {used} < expected {expected}");
            prop_assert!(used <= variable.max(expected));
        }
    }

    #[test]
    fn explicit_ratios_summing_to_one_fill_exactly(
        axis in axis(),
        parts in whole_split(),
        fixed in prop::option::of(1u16..=120),
        extent in 1i32..2000,
    ) {
        let mut decls: Vec<Decl> = parts.iter().copied().map(Decl::Ratio).collect();
        if let Some(px) = fixed {
            decls.insert(0, Decl::Fixed(px));
        }
        let mut sheet = RuleSheet::new();
        let mut root = build(axis, &decls, 0);
        root.initialize(&mut sheet).unwrap();
        root.update(Region::from_size(extent, extent), &mut sheet).unwrap();

        let variable = root.variable_length(axis);
        prop_assert_eq!(variable, (extent - fixed.map_or(0, i32::from)).max(0));
        let used: i32 = root
            .splits()
            .iter()
            .filter(|c| c.ratio().is_some())
            .map(|c| c.region().extent(axis))
            .sum();
        prop_assert_eq!(used, variable);
    }

    #[test]
    fn fixed_children_keep_declared_length(
        axis in axis(),
        decls in prop::collection::vec(decl(), 1..10),
        extent in 50i32..2000,
    ) {
        let mut sheet = RuleSheet::new();
        let mut root = build(axis, &decls, 0);
        root.initialize(&mut sheet).unwrap();
        root.update(Region::from_size(extent, extent), &mut sheet).unwrap();

        for (decl, child) in decls.iter().zip(root.splits()) {
            if let Decl::Fixed(px) = decl {
                prop_assert_eq!(child.region().extent(axis), i32::from(*px));
                prop_assert_eq!(
                    sheet.prop(child.name(), match axis {
                        Axis::Row => "height",
                        Axis::Column => "width",
                    }),
                    Some(i32::from(*px))
                );
            }
        }
    }

    #[test]
    fn siblings_tile_in_order(
        axis in axis(),
        decls in prop::collection::vec(decl(), 2..10),
        gap in 0i32..6,
        extent in 200i32..2000,
    ) {
        let mut sheet = RuleSheet::new();
        let mut root = build(axis, &decls, gap);
        root.initialize(&mut sheet).unwrap();
        root.update(Region::from_size(extent, extent), &mut sheet).unwrap();

        for pair in root.splits().windows(2) {
            let (a, b) = (pair[0].bounding_box(), pair[1].bounding_box());
            let (a_end, b_start) = match axis {
                Axis::Row => (a.bottom(), b.top),
                Axis::Column => (a.right(), b.left),
            };
            prop_assert_eq!(a_end, b_start);
        }
    }

    #[test]
    fn incremental_resize_matches_fresh_load(
        axis in axis(),
        decls in prop::collection::vec(decl(), 1..8),
        from in 100i32..1500,
        to in 100i32..1500,
    ) {
        let mut resized_sheet = RuleSheet::new();
        let mut resized = build(axis, &decls, 1);
        resized.initialize(&mut resized_sheet).unwrap();
        resized.update(Region::from_size(from, from), &mut resized_sheet).unwrap();
        resized.resize_by(to - from, to - from, &mut resized_sheet);
        resized.propagate(&mut resized_sheet);

        let mut fresh_sheet = RuleSheet::new();
        let mut fresh = build(axis, &decls, 1);
        fresh.initialize(&mut fresh_sheet).unwrap();
        fresh.update(Region::from_size(to, to), &mut fresh_sheet).unwrap();

        prop_assert_eq!(resized_sheet.to_css(), fresh_sheet.to_css());
    }
}
