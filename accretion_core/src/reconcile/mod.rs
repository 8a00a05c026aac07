// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-based reconciliation of renderable item lists.
//!
//! - [`diff`] is the pure set computation: which paths are new, which survive,
//!   which are gone.
//! - [`Reconciler`] applies the same classification with side effects. It
//!   makes, updates, and removes native views through the item callbacks and a
//!   [`Presenter`](crate::backend::Presenter), and tracks in-flight
//!   [transitions](crate::item::Transition) so that re-inserting an item whose
//!   removal is still animating reuses its view.

mod diff;
mod reconciler;
mod transition;

pub use diff::{Diff, diff};
pub use reconciler::{Changeset, PassContext, Reconciler};
pub use transition::{Completion, TransitionId, TransitionKind};
