// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for render passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Composer`](crate::composer::Composer) and the
//! [`Reconciler`](crate::reconcile::Reconciler) call at each stage of a pass.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] collects phase timestamps during a pass and produces
//! a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`ItemChange`] events and the
//!   corresponding `TraceSink` method.

use kurbo::Size;

use crate::context::UpdateType;
use crate::reconcile::{TransitionId, TransitionKind};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a render pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Rebuilding the node tree.
    Build,
    /// Laying the tree out against the container size.
    Layout,
    /// Collecting renderable items for the visible bounds.
    Collect,
    /// Diffing items and driving lifecycles.
    Reconcile,
}

/// What happened to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionState {
    /// The animator was started.
    Started,
    /// The host reported completion and the terminal callback ran.
    Completed,
    /// A later pass superseded the transition before it completed.
    Cancelled,
}

/// How an item changed during reconciliation.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemChangeKind {
    /// A new view was made and attached.
    Insert,
    /// A pending removal was cancelled and its view reused.
    Reinsert,
    /// An existing view was updated.
    Update,
    /// The item left the list.
    Remove,
    /// A survivor moved relative to the other survivors.
    Reorder,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a render pass starts.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Why the pass runs.
    pub update_type: UpdateType,
    /// Whether lifecycle callbacks receive an animation.
    pub animated: bool,
    /// Container size the tree is laid out against.
    pub container_size: Size,
    /// Host time when the pass started.
    pub timestamp: HostTime,
}

/// Marks the beginning of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Counts produced by one reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Items absent from the previous list, including re-inserts.
    pub inserted: u32,
    /// Inserted items that reused a view with a pending removal.
    pub reinserted: u32,
    /// Items present in both lists.
    pub updated: u32,
    /// Items absent from the current list.
    pub removed: u32,
    /// Survivors whose relative order changed.
    pub reordered: u32,
    /// Transitions still awaiting completion after this reconciliation.
    pub pending: u32,
}

/// Emitted when a transition starts, completes, or is cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    /// Index of the pass that was current when the event occurred.
    pub pass_index: u64,
    /// Transition handle.
    pub id: TransitionId,
    /// Insert or remove.
    pub kind: TransitionKind,
    /// What happened.
    pub state: TransitionState,
}

/// Per-pass timing summary produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Why the pass ran.
    pub update_type: UpdateType,
    /// Host time when the pass started.
    pub now: HostTime,
    /// Whether the node tree was rebuilt (false for scroll and bounds passes).
    pub rebuilt: bool,
    /// Number of renderable items collected.
    pub item_count: u32,
    /// Build phase duration in nanoseconds (0 if not measured).
    pub build_nanos: u64,
    /// Layout phase duration in nanoseconds (0 if not measured).
    pub layout_nanos: u64,
    /// Collect phase duration in nanoseconds (0 if not measured).
    pub collect_nanos: u64,
    /// Reconcile phase duration in nanoseconds (0 if not measured).
    pub reconcile_nanos: u64,
}

/// A per-item change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemChange {
    /// Position in the current item list, or in the previous one for removals.
    pub index: u32,
    /// What happened.
    pub kind: ItemChangeKind,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from render passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a pass phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after each reconciliation.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called when a transition changes state.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called with a per-pass timing summary.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called with per-pass item changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        _ = (pass_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reconcile(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits item changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        if let Some(s) = &mut self.sink {
            s.on_item_changes(pass_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a pass and produces a [`PassSummary`].
#[derive(Debug)]
pub struct PassSummaryBuilder {
    begin: PassBeginEvent,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
    rebuilt: bool,
    item_count: u32,
}

impl PassSummaryBuilder {
    /// Starts building a summary for the given pass.
    #[must_use]
    pub fn new(begin: &PassBeginEvent) -> Self {
        Self {
            begin: *begin,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            rebuilt: false,
            item_count: 0,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Sets whether the tree was rebuilt.
    pub fn set_rebuilt(&mut self, rebuilt: bool) {
        self.rebuilt = rebuilt;
    }

    /// Sets the number of collected items.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = u32::try_from(count).unwrap_or(u32::MAX);
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub fn finish(self) -> PassSummary {
        PassSummary {
            pass_index: self.begin.pass_index,
            update_type: self.begin.update_type,
            now: self.begin.timestamp,
            rebuilt: self.rebuilt,
            item_count: self.item_count,
            build_nanos: self.phase_duration(PhaseKind::Build),
            layout_nanos: self.phase_duration(PhaseKind::Layout),
            collect_nanos: self.phase_duration(PhaseKind::Collect),
            reconcile_nanos: self.phase_duration(PhaseKind::Reconcile),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "phase durations never approach u64::MAX nanoseconds"
    )]
    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).as_nanos() as u64,
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Build => 0,
        PhaseKind::Layout => 1,
        PhaseKind::Collect => 2,
        PhaseKind::Reconcile => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> PassBeginEvent {
        PassBeginEvent {
            pass_index: 42,
            update_type: UpdateType::Refresh,
            animated: true,
            container_size: Size::new(320.0, 480.0),
            timestamp: HostTime(1_000_000),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_pass_begin(&sample_begin());
        sink.on_reconcile(&ReconcileEvent::default());
        sink.on_pass_summary(&PassSummaryBuilder::new(&sample_begin()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.pass_begin(&sample_begin());
        tracer.reconcile(&ReconcileEvent::default());
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = PassSummaryBuilder::new(&sample_begin());

        builder.phase_begin(PhaseKind::Build, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Build, HostTime(1_000_100));
        builder.phase_begin(PhaseKind::Layout, HostTime(1_000_100));
        builder.phase_end(PhaseKind::Layout, HostTime(1_000_500));
        builder.phase_begin(PhaseKind::Collect, HostTime(1_000_500));
        builder.phase_end(PhaseKind::Collect, HostTime(1_000_600));
        builder.phase_begin(PhaseKind::Reconcile, HostTime(1_000_600));
        builder.phase_end(PhaseKind::Reconcile, HostTime(1_002_000));
        builder.set_rebuilt(true);
        builder.set_item_count(12);

        let summary = builder.finish();
        assert_eq!(summary.build_nanos, 100);
        assert_eq!(summary.layout_nanos, 400);
        assert_eq!(summary.collect_nanos, 100);
        assert_eq!(summary.reconcile_nanos, 1400);
        assert!(summary.rebuilt);
        assert_eq!(summary.item_count, 12);
        assert_eq!(summary.pass_index, 42);
        assert_eq!(summary.update_type, UpdateType::Refresh);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let summary = PassSummaryBuilder::new(&sample_begin()).finish();
        assert_eq!(summary.build_nanos, 0);
        assert_eq!(summary.layout_nanos, 0);
        assert_eq!(summary.collect_nanos, 0);
        assert_eq!(summary.reconcile_nanos, 0);
        assert!(!summary.rebuilt);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        struct RecordingSink {
            passes: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_pass_begin(&mut self, e: &PassBeginEvent) {
                self.passes.push(e.pass_index);
            }
        }

        let mut sink = RecordingSink { passes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.pass_begin(&sample_begin());
        drop(tracer);
        assert_eq!(sink.passes, &[42]);
    }
}
