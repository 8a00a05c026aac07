// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use super::{LayoutState, Node};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::{IdentityPath, StandardTag};
use crate::sizing::{Axis, Sizing, SizingPair};

/// Empty space that grows along one axis and takes none across it.
#[derive(Clone, Debug)]
pub struct Spacer {
    path: IdentityPath,
    axis: Axis,
    min_length: f64,
    state: LayoutState,
}

impl Spacer {
    /// A flexible spacer along `axis`.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            path: IdentityPath::standard(StandardTag::Spacer),
            axis,
            min_length: 0.0,
            state: LayoutState::Unlaid,
        }
    }

    /// Returns a copy that never shrinks below `min_length`.
    #[must_use]
    pub fn with_min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    fn sizing(&self) -> SizingPair {
        SizingPair::FLEXIBLE
            .with(self.axis, Sizing::at_least(self.min_length))
            .with(self.axis.cross(), Sizing::Fixed(0.0))
    }
}

impl<V> Node<V> for Spacer {
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
        let sizing = self.sizing();
        self.state = LayoutState::Laid {
            container,
            size: cx.round_size(sizing.resolve(container)),
            sizing,
        };
        sizing
    }

    fn renderable_items(&self, _visible: Rect) -> Vec<RenderableItem<V>> {
        self.state.ready_for_items(&self.path);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::View;

    #[test]
    fn sizing_is_flexible_along_and_zero_across() {
        let mut spacer = Spacer::new(Axis::Vertical).with_min_length(12.0);
        let sizing = Node::<View>::layout(&mut spacer, Size::new(40.0, 100.0), &LayoutContext::new(1.0));
        assert_eq!(sizing.height, Sizing::Range { min: 12.0, max: f64::INFINITY });
        assert_eq!(sizing.width, Sizing::Fixed(0.0));
        assert_eq!(Node::<View>::size(&spacer), Size::new(0.0, 100.0));
        assert!(Node::<View>::renderable_items(&spacer, Rect::new(0.0, 0.0, 40.0, 100.0)).is_empty());
    }

    #[test]
    fn zero_minimum_is_plain_flexible() {
        let mut spacer = Spacer::new(Axis::Horizontal);
        let sizing = Node::<View>::layout(&mut spacer, Size::new(40.0, 100.0), &LayoutContext::new(1.0));
        assert_eq!(sizing.width, Sizing::Flexible);
    }
}
