// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Item-change events ([`on_item_changes`](TraceSink::on_item_changes)) store
//! only the count.

use accretion_core::context::UpdateType;
use accretion_core::reconcile::{TransitionId, TransitionKind};
use accretion_core::time::HostTime;
use accretion_core::trace::{
    ItemChange, PassBeginEvent, PassSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    ReconcileEvent, TraceSink, TransitionEvent, TransitionState,
};
use kurbo::Size;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_RECONCILE: u8 = 4;
const TAG_TRANSITION: u8 = 5;
const TAG_PASS_SUMMARY: u8 = 6;
const TAG_ITEM_CHANGES_COUNT: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_update_type(&mut self, u: UpdateType) {
        self.write_u8(match u {
            UpdateType::Insert => 0,
            UpdateType::Refresh => 1,
            UpdateType::Scroll => 2,
            UpdateType::SizeChange => 3,
            UpdateType::BoundsChange => 4,
        });
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Build => 0,
            PhaseKind::Layout => 1,
            PhaseKind::Collect => 2,
            PhaseKind::Reconcile => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_update_type(e.update_type);
        self.write_u8(u8::from(e.animated));
        self.write_f64(e.container_size.width);
        self.write_f64(e.container_size.height);
        self.write_u64(e.timestamp.nanos());
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.pass_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.nanos());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.pass_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.nanos());
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.write_u8(TAG_RECONCILE);
        self.write_u64(e.pass_index);
        self.write_u32(e.inserted);
        self.write_u32(e.reinserted);
        self.write_u32(e.updated);
        self.write_u32(e.removed);
        self.write_u32(e.reordered);
        self.write_u32(e.pending);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u64(e.pass_index);
        self.write_u64(e.id.0);
        self.write_u8(match e.kind {
            TransitionKind::Insert => 0,
            TransitionKind::Remove => 1,
        });
        self.write_u8(match e.state {
            TransitionState::Started => 0,
            TransitionState::Completed => 1,
            TransitionState::Cancelled => 2,
        });
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u64(s.pass_index);
        self.write_update_type(s.update_type);
        self.write_u64(s.now.nanos());
        self.write_u8(u8::from(s.rebuilt));
        self.write_u32(s.item_count);
        self.write_u64(s.build_nanos);
        self.write_u64(s.layout_nanos);
        self.write_u64(s.collect_nanos);
        self.write_u64(s.reconcile_nanos);
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        self.write_u8(TAG_ITEM_CHANGES_COUNT);
        self.write_u64(pass_index);
        self.write_u32(u32::try_from(changes.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`ReconcileEvent`].
    Reconcile(ReconcileEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// Item-change count for a pass.
    ItemChangesCount {
        /// Pass counter.
        pass_index: u64,
        /// Number of item changes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_update_type(&mut self) -> Option<UpdateType> {
        Some(match self.read_u8()? {
            0 => UpdateType::Insert,
            1 => UpdateType::Refresh,
            2 => UpdateType::Scroll,
            3 => UpdateType::SizeChange,
            _ => UpdateType::BoundsChange,
        })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Build,
            1 => PhaseKind::Layout,
            2 => PhaseKind::Collect,
            _ => PhaseKind::Reconcile,
        })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            update_type: self.read_update_type()?,
            animated: self.read_bool()?,
            container_size: Size::new(self.read_f64()?, self.read_f64()?),
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            pass_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            pass_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_reconcile(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reconcile(ReconcileEvent {
            pass_index: self.read_u64()?,
            inserted: self.read_u32()?,
            reinserted: self.read_u32()?,
            updated: self.read_u32()?,
            removed: self.read_u32()?,
            reordered: self.read_u32()?,
            pending: self.read_u32()?,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            pass_index: self.read_u64()?,
            id: TransitionId(self.read_u64()?),
            kind: match self.read_u8()? {
                0 => TransitionKind::Insert,
                _ => TransitionKind::Remove,
            },
            state: match self.read_u8()? {
                0 => TransitionState::Started,
                1 => TransitionState::Completed,
                _ => TransitionState::Cancelled,
            },
        }))
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            pass_index: self.read_u64()?,
            update_type: self.read_update_type()?,
            now: self.read_time()?,
            rebuilt: self.read_bool()?,
            item_count: self.read_u32()?,
            build_nanos: self.read_u64()?,
            layout_nanos: self.read_u64()?,
            collect_nanos: self.read_u64()?,
            reconcile_nanos: self.read_u64()?,
        }))
    }

    fn decode_item_changes_count(&mut self) -> Option<RecordedEvent> {
        let pass_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::ItemChangesCount { pass_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_RECONCILE => self.decode_reconcile(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_ITEM_CHANGES_COUNT => self.decode_item_changes_count(),
            _ => None, // unknown tag, stop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use accretion_core::trace::ItemChangeKind;

    use super::*;

    fn sample_begin() -> PassBeginEvent {
        PassBeginEvent {
            pass_index: 7,
            update_type: UpdateType::BoundsChange,
            animated: true,
            container_size: Size::new(320.5, 480.0),
            timestamp: HostTime(1_000_000),
        }
    }

    fn sample_summary() -> PassSummary {
        PassSummary {
            pass_index: 7,
            update_type: UpdateType::Refresh,
            now: HostTime(1_000_000),
            rebuilt: true,
            item_count: 12,
            build_nanos: 100,
            layout_nanos: 400,
            collect_nanos: 50,
            reconcile_nanos: 1500,
        }
    }

    #[test]
    fn pass_begin_keeps_fractional_sizes() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&sample_begin());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::PassBegin(e) => {
                assert_eq!(e.pass_index, 7);
                assert_eq!(e.update_type, UpdateType::BoundsChange);
                assert!(e.animated);
                assert_eq!(e.container_size, Size::new(320.5, 480.0));
                assert_eq!(e.timestamp, HostTime(1_000_000));
            }
            other => panic!("expected PassBegin, got {other:?}"),
        }
    }

    #[test]
    fn transition_states_survive_recording() {
        let mut rec = RecorderSink::new();
        for state in [
            TransitionState::Started,
            TransitionState::Completed,
            TransitionState::Cancelled,
        ] {
            rec.on_transition(&TransitionEvent {
                pass_index: 2,
                id: TransitionId(4),
                kind: TransitionKind::Insert,
                state,
            });
        }

        let states: Vec<_> = decode(rec.as_bytes())
            .map(|event| match event {
                RecordedEvent::Transition(e) => e.state,
                other => panic!("expected Transition, got {other:?}"),
            })
            .collect();
        assert_eq!(
            states,
            [
                TransitionState::Started,
                TransitionState::Completed,
                TransitionState::Cancelled,
            ]
        );
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&sample_begin());
        rec.on_phase_begin(&PhaseBeginEvent {
            pass_index: 7,
            phase: PhaseKind::Collect,
            timestamp: HostTime(1000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            pass_index: 7,
            phase: PhaseKind::Collect,
            timestamp: HostTime(3000),
        });
        let reconcile = ReconcileEvent {
            pass_index: 7,
            inserted: 3,
            updated: 9,
            pending: 1,
            ..ReconcileEvent::default()
        };
        rec.on_reconcile(&reconcile);
        rec.on_pass_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], RecordedEvent::PassBegin(_)));
        match &events[1] {
            RecordedEvent::PhaseBegin(e) => assert_eq!(e.phase, PhaseKind::Collect),
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        assert!(matches!(events[2], RecordedEvent::PhaseEnd(_)));
        match &events[3] {
            RecordedEvent::Reconcile(e) => assert_eq!(*e, reconcile),
            other => panic!("expected Reconcile, got {other:?}"),
        }
        match &events[4] {
            RecordedEvent::PassSummary(s) => {
                assert_eq!(s.item_count, 12);
                assert_eq!(s.reconcile_nanos, 1500);
                assert!(s.rebuilt);
            }
            other => panic!("expected PassSummary, got {other:?}"),
        }
    }

    #[test]
    fn item_changes_store_only_the_count() {
        let mut rec = RecorderSink::new();
        let changes = [
            ItemChange {
                index: 0,
                kind: ItemChangeKind::Insert,
            },
            ItemChange {
                index: 1,
                kind: ItemChangeKind::Reorder,
            },
        ];
        rec.on_item_changes(42, &changes);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::ItemChangesCount { pass_index, count } => {
                assert_eq!(*pass_index, 42);
                assert_eq!(*count, 2);
            }
            other => panic!("expected ItemChangesCount, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_pass_summary(&sample_summary());
        rec.on_pass_summary(&sample_summary());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
        assert!(decode(&[]).next().is_none());
    }
}
