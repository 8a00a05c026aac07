// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nodes: the composable units a pass is built from.
//!
//! A tree of [`Node`]s is built fresh for every pass that needs new content,
//! laid out once against the container size, and then asked for the
//! renderable items intersecting the visible bounds.
//!
//! # Layout protocol
//!
//! Every node starts [`Unlaid`](LayoutState::Unlaid). [`Node::layout`]
//! records a size and returns the node's [`SizingPair`]. Containers lay out in
//! two passes:
//!
//! 1. Lay out every child against the full container size.
//! 2. Combine the child sizings into their own, resolve their own size, solve
//!    the main axis with [`solve`](crate::solver::solve), and lay out again
//!    only the children whose main-axis sizing is not fixed.
//!
//! Layout results are cached by container size. Laying a node out again
//! against the size it was last laid out with returns the cached sizing
//! without touching its children or measure closures.
//!
//! # Coordinates
//!
//! [`Node::renderable_items`] takes the visible bounds in the node's own
//! coordinate space (origin at its top-left corner) and returns item frames in
//! the same space. Containers translate both for their children and nest the
//! item paths under their own. Children whose frame does not intersect the
//! visible bounds contribute no items.

use kurbo::{Rect, Size};

use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::IdentityPath;
use crate::sizing::SizingPair;

mod element;
mod frame;
mod overlay;
mod padding;
mod spacer;
mod stack;

pub use element::Element;
pub use frame::Frame;
pub use overlay::Overlay;
pub use padding::Padding;
pub use spacer::Spacer;
pub use stack::Stack;

/// A composable unit of layout.
pub trait Node<V> {
    /// Identity of this node, used to derive item paths.
    fn path(&self) -> &IdentityPath;

    /// Size from the last layout, or zero before the first.
    fn size(&self) -> Size;

    /// Lays the node out against `container` and returns its sizing.
    fn layout(&mut self, container: Size, cx: &LayoutContext) -> SizingPair;

    /// Returns the items intersecting `visible`, in stacking order.
    ///
    /// Must be called after [`layout`](Self::layout). Before that it trips a
    /// debug assertion and returns nothing.
    fn renderable_items(&self, visible: Rect) -> Vec<RenderableItem<V>>;
}

/// A type-erased node.
pub type BoxedNode<V> = Box<dyn Node<V>>;

impl<V> Node<V> for BoxedNode<V> {
    fn path(&self) -> &IdentityPath {
        (**self).path()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn layout(&mut self, container: Size, cx: &LayoutContext) -> SizingPair {
        (**self).layout(container, cx)
    }

    fn renderable_items(&self, visible: Rect) -> Vec<RenderableItem<V>> {
        (**self).renderable_items(visible)
    }
}

/// Wraps `children` in a vertical stack with no spacing.
#[must_use]
pub fn build_tree<V: 'static>(children: impl IntoIterator<Item = BoxedNode<V>>) -> Stack<V> {
    Stack::vertical().with_children(children)
}

/// Per-node layout progress, doubling as a single-entry layout cache.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LayoutState {
    /// Not laid out yet.
    #[default]
    Unlaid,
    /// Laid out against `container`.
    Laid {
        /// Container size of the last layout.
        container: Size,
        /// Resolved size.
        size: Size,
        /// Sizing returned by the last layout.
        sizing: SizingPair,
    },
}

impl LayoutState {
    /// Resolved size, or zero when unlaid.
    #[must_use]
    pub fn size(&self) -> Size {
        match self {
            Self::Unlaid => Size::ZERO,
            Self::Laid { size, .. } => *size,
        }
    }

    /// Whether the node has been laid out.
    #[must_use]
    pub fn is_laid(&self) -> bool {
        matches!(self, Self::Laid { .. })
    }

    /// Returns the cached sizing if the last layout used `container`.
    #[must_use]
    pub fn cached(&self, container: Size) -> Option<SizingPair> {
        match self {
            Self::Laid {
                container: last,
                sizing,
                ..
            } if *last == container => Some(*sizing),
            _ => None,
        }
    }

    /// Checks that the node was laid out before its items are queried.
    pub(crate) fn ready_for_items(&self, path: &IdentityPath) -> bool {
        debug_assert!(
            self.is_laid(),
            "renderable_items queried on {path} before layout"
        );
        self.is_laid()
    }
}

/// Placement of a child along an axis where it has more room than it needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Leading edge.
    Start,
    /// Centred.
    #[default]
    Center,
    /// Trailing edge.
    End,
    /// Leading edge, with the child laid out again at the full slot when its
    /// sizing along that axis is not fixed.
    Fill,
}

impl Alignment {
    /// Returns `(offset, extent)` of a child of length `extent` in `slot`.
    ///
    /// The extent is always the child's own, so frames match the items the
    /// child emits.
    pub(crate) fn place(self, slot: f64, extent: f64, cx: &LayoutContext) -> (f64, f64) {
        match self {
            Self::Center => (cx.round((slot - extent) / 2.0), extent),
            Self::End => (slot - extent, extent),
            Self::Start | Self::Fill => (0.0, extent),
        }
    }
}

/// Whether `frame` overlaps `visible`. Zero-sized frames strictly inside count.
pub(crate) fn intersects(frame: Rect, visible: Rect) -> bool {
    frame.x0 < visible.x1 && frame.x1 > visible.x0 && frame.y0 < visible.y1 && frame.y1 > visible.y0
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::sizing::Sizing;
    use crate::testing::{Recorder, View};

    fn cx() -> LayoutContext {
        LayoutContext::new(1.0)
    }

    fn names(items: &[RenderableItem<View>]) -> Vec<String> {
        items.iter().map(|i| i.path().to_string()).collect()
    }

    #[test]
    fn intersection_is_strict_at_edges() {
        let visible = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(intersects(Rect::new(90.0, 90.0, 110.0, 110.0), visible));
        assert!(!intersects(Rect::new(100.0, 0.0, 120.0, 10.0), visible));
        assert!(intersects(Rect::from_origin_size(Point::new(5.0, 5.0), Size::ZERO), visible));
    }

    #[test]
    fn alignment_places_within_slot() {
        let cx = cx();
        assert_eq!(Alignment::Start.place(100.0, 30.0, &cx), (0.0, 30.0));
        assert_eq!(Alignment::Center.place(100.0, 30.0, &cx), (35.0, 30.0));
        assert_eq!(Alignment::End.place(100.0, 30.0, &cx), (70.0, 30.0));
        assert_eq!(Alignment::Fill.place(100.0, 30.0, &cx), (0.0, 30.0));
    }

    #[test]
    fn build_tree_is_a_zero_spacing_vstack() {
        let rec = Recorder::new();
        let mut root = build_tree::<View>([
            Box::new(Element::new(rec.item("a")).with_sizing(SizingPair::new(
                Sizing::Flexible,
                Sizing::Fixed(30.0),
            ))) as BoxedNode<View>,
            Box::new(Element::new(rec.item("b"))),
        ]);
        let sizing = root.layout(Size::new(100.0, 100.0), &cx());
        assert_eq!(sizing.height, Sizing::Range { min: 30.0, max: f64::INFINITY });
        let items = root.renderable_items(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(names(&items), ["vstack[0]/'a'", "vstack[1]/'b'"]);
        assert_eq!(items[1].frame(), Rect::new(0.0, 30.0, 100.0, 100.0));
    }

    #[test]
    fn identical_trees_yield_identical_paths() {
        let rec = Recorder::new();
        let build = || {
            let mut root = build_tree::<View>([
                Box::new(
                    Stack::horizontal()
                        .with_child(Element::new(rec.item("icon")))
                        .spacer()
                        .with_child(Element::new(rec.item("label"))),
                ) as BoxedNode<View>,
                Box::new(Padding::uniform(4.0, Element::new(rec.item("body")))),
            ]);
            root.layout(Size::new(200.0, 100.0), &cx());
            names(&root.renderable_items(Rect::new(0.0, 0.0, 200.0, 100.0)))
        };
        let first = build();
        assert_eq!(first, build());
        assert_eq!(
            first,
            [
                "vstack[0]/hstack[0]/'icon'",
                "vstack[0]/hstack[2]/'label'",
                "vstack[1]/padding[0]/'body'",
            ]
        );
    }

    #[test]
    fn boxed_nodes_forward() {
        let rec = Recorder::new();
        let mut node: BoxedNode<View> = Box::new(Element::new(rec.item("a")));
        assert_eq!(node.size(), Size::ZERO);
        node.layout(Size::new(10.0, 20.0), &cx());
        assert_eq!(node.size(), Size::new(10.0, 20.0));
        assert_eq!(node.path(), &IdentityPath::custom("a"));
    }
}
