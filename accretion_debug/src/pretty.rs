// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use accretion_core::time::HostTime;
use accretion_core::trace::{
    ItemChange, PassBeginEvent, PassSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    ReconcileEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

fn at(t: HostTime) -> f64 {
    us(t.nanos())
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Build => "build",
        PhaseKind::Layout => "layout",
        PhaseKind::Collect => "collect",
        PhaseKind::Reconcile => "reconcile",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass] pass={} {:?} animated={} container={}x{} at {:.1}µs",
            e.pass_index,
            e.update_type,
            e.animated,
            e.container_size.width,
            e.container_size.height,
            at(e.timestamp),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] pass={} {} at {:.1}µs",
            e.pass_index,
            phase_name(e.phase),
            at(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] pass={} {} at {:.1}µs",
            e.pass_index,
            phase_name(e.phase),
            at(e.timestamp),
        );
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        let _ = writeln!(
            self.writer,
            "[reconcile] pass={} +{} ({} reused) ~{} -{} reordered={} pending={}",
            e.pass_index, e.inserted, e.reinserted, e.updated, e.removed, e.reordered, e.pending,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] pass={} #{} {:?} {:?}",
            e.pass_index, e.id.0, e.kind, e.state,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let rebuilt = if s.rebuilt { "rebuilt" } else { "reused" };
        let _ = writeln!(
            self.writer,
            "[summary] pass={} {:?} {rebuilt} items={} build={:.1}µs layout={:.1}µs \
             collect={:.1}µs reconcile={:.1}µs",
            s.pass_index,
            s.update_type,
            s.item_count,
            us(s.build_nanos),
            us(s.layout_nanos),
            us(s.collect_nanos),
            us(s.reconcile_nanos),
        );
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        let _ = writeln!(
            self.writer,
            "[items] pass={pass_index} changes={}",
            changes.len(),
        );
    }
}
