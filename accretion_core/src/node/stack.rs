// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Rect, Size};

use super::{Alignment, BoxedNode, LayoutState, Node, Spacer, intersects};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::{IdentityPath, StandardTag};
use crate::sizing::{Axis, Sizing, SizingPair};
use crate::solver::solve;

/// Lays children out one after another along an axis.
///
/// The stack's main-axis sizing is the main-axis combination of its
/// children's sizings plus the spacing between them. Its cross-axis sizing
/// is their envelope. Main-axis space is distributed by
/// [`solve`](crate::solver::solve), and children are placed across the axis
/// according to the stack's [`Alignment`].
pub struct Stack<V> {
    path: IdentityPath,
    axis: Axis,
    spacing: f64,
    alignment: Alignment,
    children: Vec<BoxedNode<V>>,
    frames: Vec<Rect>,
    state: LayoutState,
}

impl<V> Stack<V> {
    /// Creates an empty stack along `axis`.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        let tag = match axis {
            Axis::Horizontal => StandardTag::HStack,
            Axis::Vertical => StandardTag::VStack,
        };
        Self {
            path: IdentityPath::standard(tag),
            axis,
            spacing: 0.0,
            alignment: Alignment::default(),
            children: Vec::new(),
            frames: Vec::new(),
            state: LayoutState::Unlaid,
        }
    }

    /// An empty row.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// An empty column.
    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Returns a copy with a different identity.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<IdentityPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns a copy with the given gap between adjacent children.
    ///
    /// Negative or non-finite values are treated as zero.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = if spacing.is_finite() && spacing > 0.0 {
            spacing
        } else {
            0.0
        };
        self
    }

    /// Returns a copy with a different cross-axis alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns a copy with `child` appended.
    #[must_use]
    pub fn with_child(mut self, child: impl Node<V> + 'static) -> Self {
        self.children.push(Box::new(child));
        self.state = LayoutState::Unlaid;
        self
    }

    /// Returns a copy with `children` appended.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = BoxedNode<V>>) -> Self {
        self.children.extend(children);
        self.state = LayoutState::Unlaid;
        self
    }

    /// Returns a copy with a flexible [`Spacer`] appended.
    #[must_use]
    pub fn spacer(self) -> Self {
        let axis = self.axis;
        self.with_child(Spacer::new(axis))
    }

    /// Stacking axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of children, spacers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the stack has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child frames from the last layout, in the stack's coordinate space.
    #[must_use]
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }
}

impl<V> fmt::Debug for Stack<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("path", &self.path)
            .field("axis", &self.axis)
            .field("spacing", &self.spacing)
            .field("alignment", &self.alignment)
            .field("children", &self.children.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<V> Node<V> for Stack<V> {
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
        let main = self.axis;
        let cross = main.cross();
        let gaps = self.spacing * self.children.len().saturating_sub(1) as f64;

        let sizings: Vec<SizingPair> = self
            .children
            .iter_mut()
            .map(|child| child.layout(container, cx))
            .collect();
        let sizing = sizings
            .iter()
            .fold(SizingPair::fixed(main.pack(gaps, 0.0)), |acc, s| {
                acc.combine(*s, main)
            });

        let size = cx.round_size(sizing.resolve(container));
        let main_len = main.of(size);
        let cross_len = cross.of(size);
        let main_sizings: Vec<Sizing> = sizings.iter().map(|s| s.along(main)).collect();
        let lengths = solve((main_len - gaps).max(0.0), &main_sizings, cx);
        let fill = self.alignment == Alignment::Fill;

        self.frames.clear();
        let mut offset = 0.0;
        for ((child, sizing), length) in self.children.iter_mut().zip(&sizings).zip(lengths) {
            if !sizing.along(main).is_fixed() || (fill && !sizing.along(cross).is_fixed()) {
                child.layout(main.pack(length, cross_len), cx);
            }
            let (cross_offset, cross_extent) =
                self.alignment.place(cross_len, cross.of(child.size()), cx);
            self.frames.push(Rect::from_origin_size(
                main.pack_point(offset, cross_offset),
                main.pack(length, cross_extent),
            ));
            offset += length + self.spacing;
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
