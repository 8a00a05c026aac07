// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Accretion never creates or positions native objects itself. Each
//! [`RenderableItem`](crate::item::RenderableItem) makes its own view through
//! its `make` callback and applies frames and content in its lifecycle hooks.
//! What remains for a platform binding is placing those views in the native
//! hierarchy, which is the job of a [`Presenter`].
//!
//! # Crate boundaries
//!
//! `accretion_core` owns sizing, layout, reconciliation and this contract
//! module. Platform crates depend on `accretion_core` and implement
//! [`Presenter`] for their view type (for example a `CALayer` handle or a DOM
//! element). Application code wires both together through a
//! [`Composer`](crate::composer::Composer).

use crate::path::IdentityPath;

/// Places views produced by renderable items into a native hierarchy.
///
/// `z_index` is the item's position in the current pass's item list. Later
/// items are stacked above earlier ones.
///
/// # Pass pseudocode
///
/// A typical host callback wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_layout(&mut self, bounds: Rect) {
///     self.composer.set_container_size(bounds.size());
///     self.composer.set_visible_bounds(bounds);
///     if let Some(report) = self.composer.render_pass(&mut self.presenter, &mut tracer, now()) {
///         log_changes(&report.changes);
///     }
/// }
///
/// fn on_animation_finished(&mut self) {
///     self.composer.process_transitions(&mut self.presenter, &mut tracer);
/// }
/// ```
pub trait Presenter<V> {
    /// Inserts a freshly made view into the hierarchy.
    fn attach(&mut self, path: &IdentityPath, view: &V, z_index: usize);

    /// Removes a view from the hierarchy. Called once, after any removal
    /// transition has completed. The view is dropped afterwards.
    fn detach(&mut self, path: &IdentityPath, view: V);

    /// Moves an attached view to a new stacking position.
    ///
    /// Called only when the view's order relative to the other surviving views
    /// changed, or when a view with a pending removal is re-inserted.
    fn reorder(&mut self, path: &IdentityPath, view: &V, z_index: usize) {
        _ = (path, view, z_index);
    }
}
