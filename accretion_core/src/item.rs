// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable items: the flat output of a layout pass.
//!
//! A [`RenderableItem`] pairs an [`IdentityPath`] and a frame with the
//! callbacks that create and maintain one native view. Items are cheap to
//! clone (all callbacks are reference-counted) and are created fresh on every
//! pass. The only long-lived state is the view itself, which the
//! [`Reconciler`](crate::reconcile::Reconciler) keys by path.
//!
//! Every hook receives the view and an [`UpdateContext`] describing why it was
//! called. The order for one item is:
//!
//! | Situation | Calls |
//! |---|---|
//! | insert | `make`, `will_insert`, `update`, attach, `did_insert` |
//! | update | `will_update`, `update` |
//! | remove | `will_remove`, `did_remove`, detach |
//!
//! With a [`Transition`], `did_insert` or `did_remove` (and the detach) are
//! deferred until the animator calls [`Completion::complete`].

use core::fmt;
use std::rc::Rc;

use kurbo::{Rect, Vec2};

use crate::context::{AnimationTiming, UpdateContext};
use crate::path::{IdentityPath, StandardTag};
use crate::reconcile::Completion;

/// Creates the native view for a newly inserted item.
pub type MakeFn<V> = Rc<dyn Fn(&UpdateContext) -> V>;

/// A lifecycle hook.
pub type HookFn<V> = Rc<dyn Fn(&mut V, &UpdateContext)>;

/// Starts an insert or remove animation.
///
/// The animator must eventually call [`Completion::complete`] (possibly
/// synchronously) for the deferred callback to run.
pub type Animator<V> = Rc<dyn Fn(&mut V, &UpdateContext, Completion)>;

/// Insert and remove animations for an item.
pub struct Transition<V> {
    /// Runs after the view is attached. Defers `did_insert`.
    pub insert: Option<Animator<V>>,
    /// Runs after `will_remove`. Defers `did_remove` and detaching.
    pub remove: Option<Animator<V>>,
}

impl<V> Transition<V> {
    /// A transition with neither animation.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            insert: None,
            remove: None,
        }
    }

    /// Returns a copy with an insert animation.
    #[must_use]
    pub fn with_insert(
        mut self,
        animator: impl Fn(&mut V, &UpdateContext, Completion) + 'static,
    ) -> Self {
        self.insert = Some(Rc::new(animator));
        self
    }

    /// Returns a copy with a remove animation.
    #[must_use]
    pub fn with_remove(
        mut self,
        animator: impl Fn(&mut V, &UpdateContext, Completion) + 'static,
    ) -> Self {
        self.remove = Some(Rc::new(animator));
        self
    }
}

impl<V> Clone for Transition<V> {
    fn clone(&self) -> Self {
        Self {
            insert: self.insert.clone(),
            remove: self.remove.clone(),
        }
    }
}

impl<V> Default for Transition<V> {
    fn default() -> Self {
        Self::none()
    }
}

impl<V> fmt::Debug for Transition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("insert", &self.insert.is_some())
            .field("remove", &self.remove.is_some())
            .finish()
    }
}

/// One positioned, identified view descriptor.
pub struct RenderableItem<V> {
    path: IdentityPath,
    frame: Rect,
    make: MakeFn<V>,
    update: HookFn<V>,
    will_insert: Option<HookFn<V>>,
    did_insert: Option<HookFn<V>>,
    will_update: Option<HookFn<V>>,
    will_remove: Option<HookFn<V>>,
    did_remove: Option<HookFn<V>>,
    transition: Option<Transition<V>>,
    animation: Option<AnimationTiming>,
}

impl<V> RenderableItem<V> {
    /// Creates an item with the standard element path and an empty frame.
    ///
    /// `update` runs on insert and on every later pass that keeps the item.
    pub fn new(
        make: impl Fn(&UpdateContext) -> V + 'static,
        update: impl Fn(&mut V, &UpdateContext) + 'static,
    ) -> Self {
        Self {
            path: IdentityPath::standard(StandardTag::Element),
            frame: Rect::ZERO,
            make: Rc::new(make),
            update: Rc::new(update),
            will_insert: None,
            did_insert: None,
            will_update: None,
            will_remove: None,
            did_remove: None,
            transition: None,
            animation: None,
        }
    }

    /// Returns the identity path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &IdentityPath {
        &self.path
    }

    /// Returns the frame in the coordinate space of whoever produced the item.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Returns the transition, if any.
    #[must_use]
    pub fn transition(&self) -> Option<&Transition<V>> {
        self.transition.as_ref()
    }

    /// Returns the item's own animation timing, if any.
    #[must_use]
    pub fn animation(&self) -> Option<AnimationTiming> {
        self.animation
    }

    /// Returns a copy with a different path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<IdentityPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns a copy with a different frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Returns a copy nested under `parent`, shifted by `offset`.
    ///
    /// Containers use this to lift child items into their own coordinate
    /// space. The path is joined with [`IdentityPath::join_index`].
    #[must_use]
    pub fn nested(mut self, parent: &IdentityPath, index: usize, offset: Vec2) -> Self {
        self.path = parent.join_index(&self.path, index);
        self.frame = self.frame + offset;
        self
    }

    /// Returns a copy with a `will_insert` hook.
    #[must_use]
    pub fn with_will_insert(mut self, hook: impl Fn(&mut V, &UpdateContext) + 'static) -> Self {
        self.will_insert = Some(Rc::new(hook));
        self
    }

    /// Returns a copy with a `did_insert` hook.
    #[must_use]
    pub fn with_did_insert(mut self, hook: impl Fn(&mut V, &UpdateContext) + 'static) -> Self {
        self.did_insert = Some(Rc::new(hook));
        self
    }

    /// Returns a copy with a `will_update` hook.
    #[must_use]
    pub fn with_will_update(mut self, hook: impl Fn(&mut V, &UpdateContext) + 'static) -> Self {
        self.will_update = Some(Rc::new(hook));
        self
    }

    /// Returns a copy with a `will_remove` hook.
    #[must_use]
    pub fn with_will_remove(mut self, hook: impl Fn(&mut V, &UpdateContext) + 'static) -> Self {
        self.will_remove = Some(Rc::new(hook));
        self
    }

    /// Returns a copy with a `did_remove` hook.
    #[must_use]
    pub fn with_did_remove(mut self, hook: impl Fn(&mut V, &UpdateContext) + 'static) -> Self {
        self.did_remove = Some(Rc::new(hook));
        self
    }

    /// Returns a copy with insert and remove animations.
    #[must_use]
    pub fn with_transition(mut self, transition: Transition<V>) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Returns a copy with its own animation timing, used instead of the
    /// composer default when a pass is animated.
    #[must_use]
    pub fn with_animation(mut self, timing: AnimationTiming) -> Self {
        self.animation = Some(timing);
        self
    }

    pub(crate) fn make(&self, cx: &UpdateContext) -> V {
        (self.make)(cx)
    }

    pub(crate) fn update(&self, view: &mut V, cx: &UpdateContext) {
        (self.update)(view, cx);
    }

    pub(crate) fn will_insert(&self, view: &mut V, cx: &UpdateContext) {
        call(self.will_insert.as_ref(), view, cx);
    }

    pub(crate) fn did_insert(&self, view: &mut V, cx: &UpdateContext) {
        call(self.did_insert.as_ref(), view, cx);
    }

    pub(crate) fn will_update(&self, view: &mut V, cx: &UpdateContext) {
        call(self.will_update.as_ref(), view, cx);
    }

    pub(crate) fn will_remove(&self, view: &mut V, cx: &UpdateContext) {
        call(self.will_remove.as_ref(), view, cx);
    }

    pub(crate) fn did_remove(&self, view: &mut V, cx: &UpdateContext) {
        call(self.did_remove.as_ref(), view, cx);
    }

    pub(crate) fn insert_animator(&self) -> Option<&Animator<V>> {
        self.transition.as_ref()?.insert.as_ref()
    }

    pub(crate) fn remove_animator(&self) -> Option<&Animator<V>> {
        self.transition.as_ref()?.remove.as_ref()
    }
}

fn call<V>(hook: Option<&HookFn<V>>, view: &mut V, cx: &UpdateContext) {
    if let Some(hook) = hook {
        hook(view, cx);
    }
}

impl<V> Clone for RenderableItem<V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            frame: self.frame,
            make: Rc::clone(&self.make),
            update: Rc::clone(&self.update),
            will_insert: self.will_insert.clone(),
            did_insert: self.did_insert.clone(),
            will_update: self.will_update.clone(),
            will_remove: self.will_remove.clone(),
            did_remove: self.did_remove.clone(),
            transition: self.transition.clone(),
            animation: self.animation,
        }
    }
}

impl<V> fmt::Debug for RenderableItem<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderableItem")
            .field("path", &self.path)
            .field("frame", &self.frame)
            .field("transition", &self.transition)
            .field("animation", &self.animation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_joins_path_and_offsets_frame() {
        let item = RenderableItem::new(|_| 0_u32, |_, _| {})
            .with_path("label")
            .with_frame(Rect::new(0.0, 0.0, 10.0, 5.0));
        let parent = IdentityPath::standard(StandardTag::HStack);
        let nested = item.nested(&parent, 2, Vec2::new(30.0, 1.0));
        assert_eq!(nested.path().to_string(), "hstack[2]/'label'");
        assert_eq!(nested.frame(), Rect::new(30.0, 1.0, 40.0, 6.0));
    }

    #[test]
    fn fixed_path_survives_nesting() {
        let item = RenderableItem::new(|_| 0_u32, |_, _| {})
            .with_path(IdentityPath::custom("player").fixed());
        let parent = IdentityPath::standard(StandardTag::VStack);
        let nested = item.nested(&parent, 0, Vec2::ZERO);
        assert_eq!(nested.path(), &IdentityPath::custom("player").fixed());
    }

    #[test]
    fn debug_elides_callbacks() {
        let item = RenderableItem::new(|_| (), |_, _| {})
            .with_transition(Transition::none().with_remove(|_, _, done| done.complete()));
        let text = format!("{item:?}");
        assert!(text.contains("remove: true"), "{text}");
        assert!(text.contains(".."), "{text}");
    }
}
