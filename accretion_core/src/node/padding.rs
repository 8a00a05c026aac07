// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Insets, Point, Rect, Size};

use super::{BoxedNode, LayoutState, Node, intersects};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::{IdentityPath, StandardTag};
use crate::sizing::{AxisRole, Sizing, SizingPair};

/// Insets one child.
///
/// The child is laid out in the container minus the insets. The padding's
/// sizing is the child's, main-combined with the fixed insets on each axis.
pub struct Padding<V> {
    path: IdentityPath,
    insets: Insets,
    child: BoxedNode<V>,
    child_frame: Rect,
    state: LayoutState,
}

impl<V> Padding<V> {
    /// Wraps `child` with the given insets.
    ///
    /// Negative insets are treated as zero.
    #[must_use]
    pub fn new(insets: Insets, child: impl Node<V> + 'static) -> Self {
        Self {
            path: IdentityPath::standard(StandardTag::Padding),
            insets: Insets::new(
                insets.x0.max(0.0),
                insets.y0.max(0.0),
                insets.x1.max(0.0),
                insets.y1.max(0.0),
            ),
            child: Box::new(child),
            child_frame: Rect::ZERO,
            state: LayoutState::Unlaid,
        }
    }

    /// Wraps `child` with the same inset on every side.
    #[must_use]
    pub fn uniform(inset: f64, child: impl Node<V> + 'static) -> Self {
        Self::new(Insets::uniform(inset), child)
    }

    /// Returns a copy with a different identity.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<IdentityPath>) -> Self {
        self.path = path.into();
        self
    }
}

impl<V> fmt::Debug for Padding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Padding")
            .field("path", &self.path)
            .field("insets", &self.insets)
            .field("child", self.child.path())
            .field("state", &self.state)
            .finish()
    }
}

impl<V> Node<V> for Padding<V> {
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
        let horizontal = self.insets.x_value();
        let vertical = self.insets.y_value();
        let inner = Size::new(
            (container.width - horizontal).max(0.0),
            (container.height - vertical).max(0.0),
        );
        let child = self.child.layout(inner, cx);
        let sizing = SizingPair::new(
            child.width.combine(Sizing::Fixed(horizontal), AxisRole::Main),
            child.height.combine(Sizing::Fixed(vertical), AxisRole::Main),
        );
        let child_size = self.child.size();
        self.child_frame =
            Rect::from_origin_size(Point::new(self.insets.x0, self.insets.y0), child_size);
        let size = Size::new(child_size.width + horizontal, child_size.height + vertical);
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
