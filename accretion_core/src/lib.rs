// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode composition: sizing, stack layout, and identity-preserving
//! reconciliation of native views.
//!
//! `accretion_core` lets a host describe its content as a fresh tree of
//! [`Node`](node::Node)s on every refresh while keeping the native views it
//! produces alive across passes. Views are matched by [`IdentityPath`], so a
//! view survives as long as its position in the tree does.
//!
//! # Architecture
//!
//! One render pass flows through four phases:
//!
//! ```text
//!   host requests ──► dirty channels ──► Composer::render_pass
//!                                              │
//!              ┌───────────────────────────────┘
//!              ▼
//!   Build (builder closure) ──► Layout (Node::layout, solver)
//!                                              │
//!              ┌───────────────────────────────┘
//!              ▼
//!   Collect (Node::renderable_items) ──► Reconcile ──► Presenter
//!                                              │
//!              ┌───────────────────────────────┘
//!              ▼
//!   Completion::complete ──► Composer::process_transitions
//! ```
//!
//! **[`sizing`]**: the [`Sizing`](sizing::Sizing) algebra of fixed, flexible,
//! and range lengths, combined along main and cross axes.
//!
//! **[`solver`]**: water-filling distribution of a stack's main axis among
//! its children, with cumulative pixel rounding.
//!
//! **[`path`]**: structural [`IdentityPath`]s derived from tree position.
//!
//! **[`node`]**: the [`Node`](node::Node) trait and the standard nodes:
//! stacks, overlays, padding, frames, spacers, and elements.
//!
//! **[`item`]**: [`RenderableItem`](item::RenderableItem), the recipe for one
//! native view and its lifecycle callbacks.
//!
//! **[`reconcile`]**: identity diff and the [`Reconciler`] that keeps views
//! alive and drives insert and removal transitions.
//!
//! **[`composer`]**: the host driver that coalesces requests and runs passes.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait hosts
//! implement to attach, restack, and detach native views.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) and event types for pass
//! instrumentation, behind a zero-overhead [`Tracer`](trace::Tracer).
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies.
//! - `trace-rich` (disabled by default, implies `trace`): Adds per-item change
//!   events.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod composer;
pub mod context;
pub mod dirty;
pub mod item;
pub mod node;
pub mod path;
pub mod reconcile;
pub mod sizing;
pub mod solver;
pub mod time;
pub mod trace;

#[cfg(test)]
mod testing;

pub use composer::{Composer, ComposerConfig, PassReport};
pub use path::IdentityPath;
pub use reconcile::Reconciler;
