// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Point, Rect, Size};

use super::{Alignment, BoxedNode, LayoutState, Node, intersects};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::{IdentityPath, StandardTag};
use crate::sizing::{AxisRole, Sizing, SizingPair};

/// Stacks children on top of each other in the same space.
///
/// Both axes use the cross-axis (envelope) combination of the child sizings.
/// Later children are drawn above earlier ones. Children smaller than the
/// overlay are placed by its [`Alignment`], centred by default.
pub struct Overlay<V> {
    path: IdentityPath,
    alignment: Alignment,
    children: Vec<BoxedNode<V>>,
    frames: Vec<Rect>,
    state: LayoutState,
}

impl<V> Default for Overlay<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Overlay<V> {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: IdentityPath::standard(StandardTag::Overlay),
            alignment: Alignment::Center,
            children: Vec::new(),
            frames: Vec::new(),
            state: LayoutState::Unlaid,
        }
    }

    /// Returns a copy with a different identity.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<IdentityPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns a copy with a different alignment, applied on both axes.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns a copy with `child` on top.
    #[must_use]
    pub fn with_child(mut self, child: impl Node<V> + 'static) -> Self {
        self.children.push(Box::new(child));
        self.state = LayoutState::Unlaid;
        self
    }

    /// Child frames from the last layout.
    #[must_use]
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }
}

impl<V> fmt::Debug for Overlay<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("path", &self.path)
            .field("alignment", &self.alignment)
            .field("children", &self.children.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<V> Node<V> for Overlay<V> {
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
        let zero = Sizing::Fixed(0.0);
        let mut sizing = SizingPair::new(zero, zero);
        let mut fixed = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            let s = child.layout(container, cx);
            sizing = SizingPair::new(
                sizing.width.combine(s.width, AxisRole::Cross),
                sizing.height.combine(s.height, AxisRole::Cross),
            );
            fixed.push(s.width.is_fixed() && s.height.is_fixed());
        }

        let size = cx.round_size(sizing.resolve(container));
        self.frames.clear();
        for (child, fixed) in self.children.iter_mut().zip(fixed) {
            if !fixed {
                child.layout(size, cx);
            }
            let child_size = child.size();
            let (x, width) = self.alignment.place(size.width, child_size.width, cx);
            let (y, height) = self.alignment.place(size.height, child_size.height, cx);
            self.frames
                .push(Rect::from_origin_size(Point::new(x, y), Size::new(width, height)));
        }

        self.state = LayoutState::Laid {
            container,
            size,
            sizing,
        };
        sizing
    }

    fn renderable_items(&self, visible: Rect) -> Vec<RenderableItem<V>> {
        if !self.state.ready_for_items(&self.path) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for (index, (child, frame)) in self.children.iter().zip(&self.frames).enumerate() {
            if !intersects(*frame, visible) {
                continue;
            }
            let offset = frame.origin().to_vec2();
            out.extend(
                child
                    .renderable_items(visible - offset)
                    .into_iter()
                    .map(|item| item.nested(&self.path, index, offset)),
            );
        }
        out
    }
}
