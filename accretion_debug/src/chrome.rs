// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration slices on thread 0. Reconciliation and transition
/// events are instants on thread 1, stamped with the start of their pass.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Reconcile and transition events carry no timestamp of their own.
    let mut pass_start = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PassBegin(e) => {
                pass_start = nanos_to_us(e.timestamp.nanos());
                events.push(json!({
                    "ph": "i",
                    "name": "PassBegin",
                    "cat": "Pass",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass_index": e.pass_index,
                        "update_type": format!("{:?}", e.update_type),
                        "animated": e.animated,
                        "container_width": e.container_size.width,
                        "container_height": e.container_size.height,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Pass",
                    "ts": nanos_to_us(e.timestamp.nanos()),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Pass",
                    "ts": nanos_to_us(e.timestamp.nanos()),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::Reconcile(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Reconcile",
                    "cat": "Items",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "inserted": e.inserted,
                        "reinserted": e.reinserted,
                        "updated": e.updated,
                        "removed": e.removed,
                        "reordered": e.reordered,
                        "pending": e.pending,
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}{:?}", e.kind, e.state),
                    "cat": "Transition",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "id": e.id.0,
                    }
                }));
            }
            RecordedEvent::PassSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PassSummary",
                    "cat": "Summary",
                    "ts": nanos_to_us(s.now.nanos()),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass_index": s.pass_index,
                        "update_type": format!("{:?}", s.update_type),
                        "rebuilt": s.rebuilt,
                        "item_count": s.item_count,
                        "build_us": nanos_to_us(s.build_nanos),
                        "layout_us": nanos_to_us(s.layout_nanos),
                        "collect_us": nanos_to_us(s.collect_nanos),
                        "reconcile_us": nanos_to_us(s.reconcile_nanos),
                    }
                }));
            }
            RecordedEvent::ItemChangesCount { pass_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "ItemChanges",
                    "cat": "Rich",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 1,
                    "s": "p",
                    "args": {
                        "pass_index": pass_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use accretion_core::context::UpdateType;
    use accretion_core::reconcile::{TransitionId, TransitionKind};
    use accretion_core::time::HostTime;
    use accretion_core::trace::{
        PassBeginEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink, TransitionEvent,
        TransitionState,
    };
    use kurbo::Size;

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            update_type: UpdateType::Refresh,
            animated: false,
            container_size: Size::new(100.0, 100.0),
            timestamp: HostTime(1_000_000),
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            pass_index: 0,
            phase: PhaseKind::Layout,
            timestamp: HostTime(1_000_000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            pass_index: 0,
            phase: PhaseKind::Layout,
            timestamp: HostTime(1_000_100),
        });
        rec.on_transition(&TransitionEvent {
            pass_index: 0,
            id: TransitionId(1),
            kind: TransitionKind::Remove,
            state: TransitionState::Started,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "PassBegin");
        assert_eq!(parsed[0]["args"]["update_type"], "Refresh");

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "Layout");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 1000.1);

        assert_eq!(parsed[3]["name"], "RemoveStarted");
        assert_eq!(parsed[3]["ts"], 1000.0);
        assert_eq!(parsed[3]["tid"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
