// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`Composer`](crate::composer::Composer) coalesces host requests between
//! passes with a multi-channel [`understory_dirty`] tracker. Every request
//! marks the composer's root key on one of the channels below; the next
//! [`render_pass`](crate::composer::Composer::render_pass) drains all three
//! and derives a single [`UpdateType`](crate::context::UpdateType) from
//! whichever were set.
//!
//! # Precedence
//!
//! [`SIZE`] wins over [`REFRESH`], which wins over [`BOUNDS`]. A size change
//! always rebuilds the tree, so a refresh requested in the same pass is
//! subsumed by it. Bounds changes only re-query the retained tree and are
//! reported only when nothing stronger is pending.

use understory_dirty::Channel;

/// Host asked for a re-render. Rebuilds and re-lays-out the tree.
pub const REFRESH: Channel = Channel::new(0);

/// Container size changed. Rebuilds and re-lays-out the tree.
pub const SIZE: Channel = Channel::new(1);

/// Visible bounds moved or resized. Reuses the laid-out tree.
pub const BOUNDS: Channel = Channel::new(2);
