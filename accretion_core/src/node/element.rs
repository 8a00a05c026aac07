// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use super::{LayoutState, Node, intersects};
use crate::context::LayoutContext;
use crate::item::RenderableItem;
use crate::path::IdentityPath;
use crate::sizing::SizingPair;

enum Measure {
    Static(SizingPair),
    Closure(Rc<dyn Fn(Size) -> SizingPair>),
}

/// A leaf node producing exactly one renderable item.
///
/// The element's identity is its item's path. Its sizing is either static or
/// computed by a measure closure from the container size. The closure only
/// runs when the container size differs from the previous layout.
pub struct Element<V> {
    item: RenderableItem<V>,
    measure: Measure,
    state: LayoutState,
}

impl<V> Element<V> {
    /// Wraps `item` in a node that is flexible on both axes.
    #[must_use]
    pub fn new(item: RenderableItem<V>) -> Self {
        Self {
            item,
            measure: Measure::Static(SizingPair::FLEXIBLE),
            state: LayoutState::Unlaid,
        }
    }

    /// Returns a copy with static sizing.
    #[must_use]
    pub fn with_sizing(mut self, sizing: SizingPair) -> Self {
        self.measure = Measure::Static(sizing);
        self
    }

    /// Returns a copy with a fixed size.
    #[must_use]
    pub fn with_size(self, size: Size) -> Self {
        self.with_sizing(SizingPair::fixed(size))
    }

    /// Returns a copy whose sizing is computed from the container size.
    #[must_use]
    pub fn with_measure(mut self, measure: impl Fn(Size) -> SizingPair + 'static) -> Self {
        self.measure = Measure::Closure(Rc::new(measure));
        self
    }

    /// Returns the wrapped item.
    #[must_use]
    pub fn item(&self) -> &RenderableItem<V> {
        &self.item
    }
}

impl<V> fmt::Debug for Element<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("path", self.item.path());
        match &self.measure {
            Measure::Static(sizing) => s.field("sizing", sizing),
            Measure::Closure(_) => s.field("sizing", &"<measured>"),
        };
        s.field("state", &self.state).finish()
    }
}

impl<V> Node<V> for Element<V> {
    fn path(&self) -> &IdentityPath {
        self.item.path()
    }

    fn size(&self) -> Size {
        self.state.size()
    }

    fn layout(&mut self, container: Size, cx: &LayoutContext) -> SizingPair {
        if let Some(sizing) = self.state.cached(container) {
            return sizing;
        }
        let sizing = match &self.measure {
            Measure::Static(sizing) => *sizing,
            Measure::Closure(measure) => measure(container),
        }
        .normalize();
        let size = cx.round_size(sizing.resolve(container));
        self.state = LayoutState::Laid {
            container,
            size,
            sizing,
        };
        sizing
    }

    fn renderable_items(&self, visible: Rect) -> Vec<RenderableItem<V>> {
        if !self.state.ready_for_items(self.item.path()) {
            return Vec::new();
        }
        let bounds = Rect::from_origin_size(Point::ORIGIN, self.state.size());
        if !intersects(bounds, visible) {
            return Vec::new();
        }
        vec![self.item.clone().with_frame(bounds)]
    }
}
