// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Point, Rect, Size};

use super::{Alignment, BoxedNode, LayoutState, Node, intersects};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::{IdentityPath, StandardTag};
use crate::sizing::{Sizing, SizingPair};

/// Overrides the sizing of one child.
///
/// Axes without an override report the child's own sizing. The child is laid
/// out inside the frame's resolved size and placed by the frame's
/// [`Alignment`], centred by default.
pub struct Frame<V> {
    path: IdentityPath,
    width: Option<Sizing>,
    height: Option<Sizing>,
    alignment: Alignment,
    child: BoxedNode<V>,
    child_frame: Rect,
    state: LayoutState,
}

impl<V> Frame<V> {
    /// Wraps `child` without overriding anything.
    #[must_use]
    pub fn new(child: impl Node<V> + 'static) -> Self {
        Self {
            path: IdentityPath::standard(StandardTag::Frame),
            width: None,
            height: None,
            alignment: Alignment::Center,
            child: Box::new(child),
            child_frame: Rect::ZERO,
            state: LayoutState::Unlaid,
        }
    }

    /// Returns a copy with a different identity.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<IdentityPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns a copy that overrides the horizontal sizing.
    #[must_use]
    pub fn with_width(mut self, width: Sizing) -> Self {
        self.width = Some(width);
        self
    }

    /// Returns a copy that overrides the vertical sizing.
    #[must_use]
    pub fn with_height(mut self, height: Sizing) -> Self {
        self.height = Some(height);
        self
    }

    /// Returns a copy fixed to `size`.
    #[must_use]
    pub fn with_size(self, size: Size) -> Self {
        self.with_width(Sizing::Fixed(size.width))
            .with_height(Sizing::Fixed(size.height))
    }

    /// Returns a copy with a different alignment for the child.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl<V> fmt::Debug for Frame<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alignment", &self.alignment)
            .field("child", self.child.path())
            .field("state", &self.state)
            .finish()
    }
}

impl<V> Node<V> for Frame<V> {
    fn path(&self) -> &IdentityPath {
        &self.path
    }

    fn size(&self) -> Size {
        self.state.size()
    }

    fn layout(&mut self, container: Size, cx: &LayoutContext) -> SizingPair {
        if let Some(sizing) = self.state.cached(container) {
            return sizing;
        }
        let child = self.child.layout(container, cx);
        let sizing = SizingPair::new(
            self.width.unwrap_or(child.width),
            self.height.unwrap_or(child.height),
        )
        .normalize();
        let size = cx.round_size(sizing.resolve(container));
        if size != container {
            self.child.layout(size, cx);
        }
        let child_size = self.child.size();
        let (x, width) = self.alignment.place(size.width, child_size.width, cx);
        let (y, height) = self.alignment.place(size.height, child_size.height, cx);
        self.child_frame = Rect::from_origin_size(Point::new(x, y), Size::new(width, height));
        self.state = LayoutState::Laid {
            container,
            size,
            sizing,
        };
        sizing
    }

    fn renderable_items(&self, visible: Rect) -> Vec<RenderableItem<V>> {
        if !self.state.ready_for_items(&self.path) || !intersects(self.child_frame, visible) {
            return Vec::new();
        }
        let offset = self.child_frame.origin().to_vec2();
        self.child
            .renderable_items(visible - offset)
            .into_iter()
            .map(|item| item.nested(&self.path, 0, offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, Stack};
    use crate::testing::Recorder;

    #[test]
    fn fixed_frame_centres_a_smaller_child() {
        let rec = Recorder::new();
        let mut frame = Frame::new(Element::new(rec.item("dot")).with_size(Size::new(10.0, 10.0)))
            .with_size(Size::new(50.0, 30.0));
        let sizing = frame.layout(Size::new(200.0, 200.0), &LayoutContext::new(1.0));
        assert_eq!(sizing, SizingPair::fixed(Size::new(50.0, 30.0)));
        let items = frame.renderable_items(Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(items[0].frame(), Rect::new(20.0, 10.0, 30.0, 20.0));
        assert_eq!(items[0].path().to_string(), "frame[0]/'dot'");
    }

    #[test]
    fn width_override_makes_a_flexible_child_fixed_in_a_stack() {
        let rec = Recorder::new();
        let mut row = Stack::horizontal()
            .with_child(Frame::new(Element::new(rec.item("a"))).with_width(Sizing::Fixed(30.0)))
            .with_child(Element::new(rec.item("b")));
        let sizing = row.layout(Size::new(100.0, 20.0), &LayoutContext::new(1.0));
        assert_eq!(sizing.width, Sizing::Range { min: 30.0, max: f64::INFINITY });
        let items = row.renderable_items(Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(items[0].frame(), Rect::new(0.0, 0.0, 30.0, 20.0));
        assert_eq!(items[1].frame(), Rect::new(30.0, 0.0, 100.0, 20.0));
    }

    #[test]
    fn range_override_clamps() {
        let rec = Recorder::new();
        let mut frame = Frame::new(Element::new(rec.item("a")))
            .with_height(Sizing::Range { min: 0.0, max: 44.0 })
            .with_alignment(Alignment::Start);
        frame.layout(Size::new(100.0, 100.0), &LayoutContext::new(1.0));
        let items = frame.renderable_items(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(items[0].frame(), Rect::new(0.0, 0.0, 100.0, 44.0));
    }
}
