// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test doubles: a view type, items that log their lifecycle, and a
//! presenter that logs attach/detach/reorder into the same log.

use core::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Size};

use crate::backend::Presenter;
use crate::context::{HostGeometry, UpdateContext, UpdateType};
use crate::item::RenderableItem;
use crate::path::IdentityPath;
use crate::reconcile::PassContext;

type Log = Rc<RefCell<Vec<String>>>;

/// Stand-in for a native view.
#[derive(Debug)]
pub(crate) struct View {
    pub(crate) name: Rc<str>,
    pub(crate) frame: Rect,
}

/// Builds items and a presenter that write to one shared log.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    log: Log,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An item with path `name` that logs every callback.
    pub(crate) fn item(&self, name: &str) -> RenderableItem<View> {
        let name: Rc<str> = Rc::from(name);
        let make = {
            let log = Rc::clone(&self.log);
            let name = Rc::clone(&name);
            move |cx: &UpdateContext| {
                log.borrow_mut().push(format!("make {name}"));
                View {
                    name: Rc::clone(&name),
                    frame: cx.new_frame,
                }
            }
        };
        let update = {
            let log = Rc::clone(&self.log);
            move |view: &mut View, cx: &UpdateContext| {
                log.borrow_mut()
                    .push(format!("update {} {:?}", view.name, cx.update_type));
                view.frame = cx.new_frame;
            }
        };
        RenderableItem::new(make, update)
            .with_path(IdentityPath::custom(&name))
            .with_will_insert(hook(&self.log, "will_insert"))
            .with_did_insert(hook(&self.log, "did_insert"))
            .with_will_update(hook(&self.log, "will_update"))
            .with_will_remove(hook(&self.log, "will_remove"))
            .with_did_remove(hook(&self.log, "did_remove"))
    }

    /// Several items at once.
    pub(crate) fn items(&self, names: &[&str]) -> Vec<RenderableItem<View>> {
        names.iter().map(|n| self.item(n)).collect()
    }

    pub(crate) fn presenter(&self) -> RecordingPresenter {
        RecordingPresenter {
            log: Rc::clone(&self.log),
            attached: Vec::new(),
        }
    }

    /// Returns and clears the log.
    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.log.borrow_mut())
    }
}

fn hook(log: &Log, event: &'static str) -> impl Fn(&mut View, &UpdateContext) + 'static {
    let log = Rc::clone(log);
    move |view: &mut View, _: &UpdateContext| {
        log.borrow_mut().push(format!("{event} {}", view.name));
    }
}

/// Presenter double that keeps the attached views in stacking order.
///
/// Views with an in-flight removal stay in `attached` until detached.
#[derive(Debug)]
pub(crate) struct RecordingPresenter {
    log: Log,
    pub(crate) attached: Vec<Rc<str>>,
}

impl Presenter<View> for RecordingPresenter {
    fn attach(&mut self, _path: &IdentityPath, view: &View, z_index: usize) {
        self.log
            .borrow_mut()
            .push(format!("attach {} {z_index}", view.name));
        let at = z_index.min(self.attached.len());
        self.attached.insert(at, Rc::clone(&view.name));
    }

    fn detach(&mut self, _path: &IdentityPath, view: View) {
        self.log.borrow_mut().push(format!("detach {}", view.name));
        let at = self.attached.iter().position(|n| *n == view.name);
        assert!(at.is_some(), "detach of a view that was never attached");
        if let Some(at) = at {
            self.attached.remove(at);
        }
    }

    fn reorder(&mut self, _path: &IdentityPath, view: &View, z_index: usize) {
        self.log
            .borrow_mut()
            .push(format!("reorder {} {z_index}", view.name));
        if let Some(at) = self.attached.iter().position(|n| *n == view.name) {
            let name = self.attached.remove(at);
            let at = z_index.min(self.attached.len());
            self.attached.insert(at, name);
        }
    }
}

/// A pass context for a 100x100 container with no animation.
pub(crate) fn pass(pass_index: u64, update_type: UpdateType) -> PassContext {
    PassContext {
        pass_index,
        update_type,
        animation: None,
        host: HostGeometry {
            container_size: Size::new(100.0, 100.0),
            visible_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            scale_factor: 1.0,
        },
    }
}

pub(crate) fn paths(names: &[&str]) -> Vec<IdentityPath> {
    names.iter().copied().map(IdentityPath::custom).collect()
}
