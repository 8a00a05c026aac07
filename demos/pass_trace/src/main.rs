// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless composer session that exercises layout, reconciliation, and the
//! tracing pipeline.
//!
//! Drives a scripted sequence of passes over a small feed (initial layout,
//! scroll, animated removal, resize) against a presenter that keeps views in
//! a `Vec`. Events go to both a
//! [`PrettyPrintSink`](accretion_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](accretion_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use accretion_core::backend::Presenter;
use accretion_core::context::UpdateContext;
use accretion_core::item::{RenderableItem, Transition};
use accretion_core::node::{BoxedNode, Element, Padding, Stack};
use accretion_core::reconcile::Completion;
use accretion_core::sizing::{Sizing, SizingPair};
use accretion_core::time::HostTime;
use accretion_core::trace::{
    ItemChange, PassBeginEvent, PassSummary, PhaseBeginEvent, PhaseEndEvent, ReconcileEvent,
    TraceSink, Tracer, TransitionEvent,
};
use accretion_core::{Composer, ComposerConfig, IdentityPath, PassReport};
use kurbo::{Rect, Size};

use accretion_debug::pretty::PrettyPrintSink;
use accretion_debug::recorder::RecorderSink;

const ROW_HEIGHT: f64 = 44.0;
/// Simulated cost of one traced phase boundary.
const PHASE_STEP_NS: u64 = 15_000;

/// A stand-in native view.
#[derive(Debug)]
struct Label {
    text: String,
    frame: Rect,
}

/// Keeps attached views in stacking order.
#[derive(Debug, Default)]
struct HeadlessPresenter {
    stack: Vec<IdentityPath>,
}

impl Presenter<Label> for HeadlessPresenter {
    fn attach(&mut self, path: &IdentityPath, view: &Label, z_index: usize) {
        println!("  attach  {path} {:?} at {z_index}", view.text);
        let at = z_index.min(self.stack.len());
        self.stack.insert(at, path.clone());
    }

    fn detach(&mut self, path: &IdentityPath, view: Label) {
        println!("  detach  {path} (last frame {:?})", view.frame);
        self.stack.retain(|p| p != path);
    }

    fn reorder(&mut self, path: &IdentityPath, _view: &Label, z_index: usize) {
        self.stack.retain(|p| p != path);
        let at = z_index.min(self.stack.len());
        self.stack.insert(at, path.clone());
    }
}

/// Forwards every event to two sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.pretty.on_pass_begin(e);
        self.recorder.on_pass_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.pretty.on_reconcile(e);
        self.recorder.on_reconcile(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.pretty.on_transition(e);
        self.recorder.on_transition(e);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.pretty.on_pass_summary(s);
        self.recorder.on_pass_summary(s);
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        self.pretty.on_item_changes(pass_index, changes);
        self.recorder.on_item_changes(pass_index, changes);
    }
}

fn label(text: &str) -> RenderableItem<Label> {
    let text = text.to_owned();
    RenderableItem::new(
        move |cx: &UpdateContext| Label {
            text: text.clone(),
            frame: cx.new_frame,
        },
        |view: &mut Label, cx: &UpdateContext| view.frame = cx.new_frame,
    )
}

/// Header row followed by one row per model entry.
///
/// Rows use fixed paths so they keep their views when earlier rows go away.
fn feed(rows: &[String], fading: &Rc<RefCell<Vec<Completion>>>) -> BoxedNode<Label> {
    let header = Stack::horizontal()
        .with_spacing(8.0)
        .with_child(Element::new(label("Menu").with_path("menu")).with_size(Size::new(24.0, 24.0)))
        .spacer()
        .with_child(Element::new(label("Inbox").with_path("title")).with_size(Size::new(80.0, 24.0)));

    let mut column = Stack::vertical().with_child(Padding::uniform(10.0, header));
    for row in rows {
        let fading = Rc::clone(fading);
        let item = label(row)
            .with_path(IdentityPath::custom(row).fixed())
            .with_transition(Transition::none().with_remove(
                move |_: &mut Label, _: &UpdateContext, done: Completion| {
                    fading.borrow_mut().push(done);
                },
            ));
        column = column.with_child(Padding::uniform(
            4.0,
            Element::new(item)
                .with_sizing(SizingPair::new(Sizing::Flexible, Sizing::Fixed(ROW_HEIGHT - 8.0))),
        ));
    }
    Box::new(column)
}

fn report(step: &str, report: Option<PassReport>, presenter: &HeadlessPresenter) {
    match report {
        Some(r) => println!(
            "{step}: pass {} {:?} rebuilt={} items={} +{} ~{} -{} content={}x{} attached={}",
            r.pass_index,
            r.update_type,
            r.rebuilt,
            r.item_count,
            r.changes.inserted.len(),
            r.changes.updated.len(),
            r.changes.removed.len(),
            r.content_size.width,
            r.content_size.height,
            presenter.stack.len(),
        ),
        None => println!("{step}: no pass needed, attached={}", presenter.stack.len()),
    }
}

fn main() {
    let model: Rc<RefCell<Vec<String>>> =
        Rc::new(RefCell::new((0..30).map(|i| format!("message-{i:02}")).collect()));
    let fading: Rc<RefCell<Vec<Completion>>> = Rc::default();
    let clock = Rc::new(Cell::new(1_000_000_000_u64));

    let builder = {
        let (model, fading) = (Rc::clone(&model), Rc::clone(&fading));
        move || feed(&model.borrow(), &fading)
    };
    let ticking = Rc::clone(&clock);
    let mut composer = Composer::new(ComposerConfig::high_density(), builder).with_clock(move || {
        ticking.set(ticking.get() + PHASE_STEP_NS);
        HostTime(ticking.get())
    });
    let mut presenter = HeadlessPresenter::default();

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    let mut pass = |step: &str,
                    composer: &mut Composer<Label>,
                    presenter: &mut HeadlessPresenter| {
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        let now = HostTime(clock.get());
        let r = composer.render_pass(presenter, &mut tracer, now);
        composer.process_transitions(presenter, &mut tracer);
        report(step, r, presenter);
        clock.set(clock.get() + 16_666_667);
    };

    // 1. Initial layout.
    composer.set_container_size(Size::new(375.0, 1400.0));
    composer.set_visible_bounds(Rect::new(0.0, 0.0, 375.0, 667.0));
    pass("initial", &mut composer, &mut presenter);

    // 2. Nothing changed.
    pass("idle", &mut composer, &mut presenter);

    // 3. Scroll down by half a screen.
    composer.set_visible_bounds(Rect::new(0.0, 330.0, 375.0, 997.0));
    pass("scroll", &mut composer, &mut presenter);

    // 4. Delete two visible messages with an animated refresh.
    model
        .borrow_mut()
        .retain(|m| m != "message-09" && m != "message-10");
    composer.set_needs_refresh(true);
    pass("delete", &mut composer, &mut presenter);
    println!("  {} removal(s) animating", composer.pending_transitions());

    // 5. The host's animations finish.
    for done in fading.borrow_mut().drain(..) {
        done.complete();
    }
    pass("animations done", &mut composer, &mut presenter);

    // 6. Rotate to landscape.
    composer.set_container_size(Size::new(667.0, 1400.0));
    composer.set_visible_bounds(Rect::new(0.0, 330.0, 667.0, 705.0));
    pass("rotate", &mut composer, &mut presenter);

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    accretion_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path}");
}
