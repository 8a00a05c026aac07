// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use super::transition::{CompletionQueue, TransitionId, TransitionKind};
use crate::backend::Presenter;
use crate::context::{AnimationTiming, HostGeometry, UpdateContext, UpdateType};
use crate::item::RenderableItem;
use crate::path::IdentityPath;
#[cfg(feature = "trace-rich")]
use crate::trace::{ItemChange, ItemChangeKind};
use crate::trace::{ReconcileEvent, Tracer, TransitionEvent, TransitionState};

/// Per-pass input to [`Reconciler::reconcile`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassContext {
    /// Monotonic pass counter, used for trace events.
    pub pass_index: u64,
    /// Update type handed to `update` for surviving items.
    pub update_type: UpdateType,
    /// Default timing when the pass is animated, `None` otherwise.
    ///
    /// Items with their own timing use it instead of this default.
    pub animation: Option<AnimationTiming>,
    /// Host geometry handed to every callback.
    pub host: HostGeometry,
}

impl PassContext {
    fn timing_for<V>(&self, item: &RenderableItem<V>) -> Option<AnimationTiming> {
        self.animation.map(|default| item.animation().unwrap_or(default))
    }
}

/// What one reconciliation did, by path.
///
/// `inserted`, `updated` and `removed` are the identity diff of the two item
/// lists (see [`diff`](super::diff)). `reinserted` is the subset of
/// `inserted` that reused a view whose removal was still in flight.
/// `reordered` is the subset of `updated` whose position among the surviving
/// items changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changeset {
    /// Paths new to this pass, in current order.
    pub inserted: Vec<IdentityPath>,
    /// Inserted paths that cancelled a pending removal.
    pub reinserted: Vec<IdentityPath>,
    /// Paths present in both passes, in current order.
    pub updated: Vec<IdentityPath>,
    /// Paths gone from this pass, in previous order.
    pub removed: Vec<IdentityPath>,
    /// Updated paths that were restacked.
    pub reordered: Vec<IdentityPath>,
}

impl Changeset {
    /// Whether no item was inserted or removed.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }

    fn event(&self, pass_index: u64, pending: usize) -> ReconcileEvent {
        ReconcileEvent {
            pass_index,
            inserted: count(self.inserted.len()),
            reinserted: count(self.reinserted.len()),
            updated: count(self.updated.len()),
            removed: count(self.removed.len()),
            reordered: count(self.reordered.len()),
            pending: count(pending),
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Live,
    Inserting(TransitionId),
    Removing(TransitionId),
}

struct Entry<V> {
    view: V,
    item: RenderableItem<V>,
    phase: Phase,
}

#[derive(Debug)]
struct Pending {
    path: IdentityPath,
    kind: TransitionKind,
    context: UpdateContext,
}

/// Keeps native views alive across passes and drives their lifecycles.
///
/// Each call to [`reconcile`](Self::reconcile) compares the new item list
/// with the previous one by [`IdentityPath`]:
///
/// 1. Items that disappeared are removed, in previous order. Removal runs
///    `will_remove`, then either `did_remove` and a detach, or the item's
///    remove animator. In the latter case the view stays alive until the
///    animator completes.
/// 2. The current items are then visited in order. New items are made and
///    attached at their index. Survivors get `will_update` and `update`, and
///    are restacked if their rank among the survivors changed. Items whose
///    removal is still animating are re-inserted. The removal is cancelled and
///    the view reused, so `make` and `did_remove` do not run for it.
/// 3. Completed transitions are processed.
///
/// Removing an item while its insert animation runs cancels the insert, so
/// its `did_insert` never runs. Updates never cancel an in-flight insert.
pub struct Reconciler<V> {
    entries: HashMap<IdentityPath, Entry<V>>,
    order: Vec<IdentityPath>,
    pending: BTreeMap<TransitionId, Pending>,
    queue: CompletionQueue,
    next_transition: u64,
    pass_index: u64,
}

impl<V> Default for Reconciler<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Reconciler<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("order", &self.order)
            .field("views", &self.entries.len())
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<V> Reconciler<V> {
    /// Creates an empty reconciler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            pending: BTreeMap::new(),
            queue: CompletionQueue::default(),
            next_transition: 0,
            pass_index: 0,
        }
    }

    /// Paths of the previous pass, in order.
    #[must_use]
    pub fn order(&self) -> &[IdentityPath] {
        &self.order
    }

    /// Number of views in the current list.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.order.len()
    }

    /// Number of views alive, including those whose removal is animating.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of transitions awaiting completion.
    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Returns the view for `path`, including views being removed.
    #[must_use]
    pub fn view(&self, path: &IdentityPath) -> Option<&V> {
        self.entries.get(path).map(|e| &e.view)
    }

    /// Whether the view for `path` is animating out.
    #[must_use]
    pub fn is_removing(&self, path: &IdentityPath) -> bool {
        self.entries
            .get(path)
            .is_some_and(|e| matches!(e.phase, Phase::Removing(_)))
    }

    /// Reconciles `items` against the previous pass.
    ///
    /// Item paths must be unique. In debug builds a duplicate trips an
    /// assertion. Release builds keep the first occurrence.
    pub fn reconcile<P: Presenter<V> + ?Sized>(
        &mut self,
        mut items: Vec<RenderableItem<V>>,
        pass: &PassContext,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> Changeset {
        self.pass_index = pass.pass_index;

        let mut current: HashSet<IdentityPath> = HashSet::with_capacity(items.len());
        items.retain(|item| {
            let fresh = current.insert(item.path().clone());
            debug_assert!(fresh, "duplicate identity path {} in one pass", item.path());
            fresh
        });

        let mut changes = Changeset::default();
        #[cfg(feature = "trace-rich")]
        let mut item_changes = Vec::new();

        let previous = core::mem::take(&mut self.order);
        for (_index, path) in previous.iter().enumerate() {
            if current.contains(path) {
                continue;
            }
            self.remove(path, pass, presenter, tracer);
            changes.removed.push(path.clone());
            #[cfg(feature = "trace-rich")]
            item_changes.push(ItemChange {
                index: count(_index),
                kind: ItemChangeKind::Remove,
            });
        }

        let ranks: HashMap<&IdentityPath, usize> = previous
            .iter()
            .filter(|p| current.contains(*p))
            .enumerate()
            .map(|(rank, p)| (p, rank))
            .collect();

        let mut rank = 0;
        self.order.reserve(items.len());
        for (z_index, item) in items.into_iter().enumerate() {
            let path = item.path().clone();
            if let Some(&before) = ranks.get(&path) {
                let moved = before != rank;
                rank += 1;
                self.update(item, z_index, moved, pass, presenter);
                changes.updated.push(path.clone());
                if moved {
                    changes.reordered.push(path.clone());
                }
                #[cfg(feature = "trace-rich")]
                item_changes.push(ItemChange {
                    index: count(z_index),
                    kind: if moved {
                        ItemChangeKind::Reorder
                    } else {
                        ItemChangeKind::Update
                    },
                });
            } else if self.entries.contains_key(&path) {
                self.reinsert(item, z_index, pass, presenter, tracer);
                changes.inserted.push(path.clone());
                changes.reinserted.push(path.clone());
                #[cfg(feature = "trace-rich")]
                item_changes.push(ItemChange {
                    index: count(z_index),
                    kind: ItemChangeKind::Reinsert,
                });
            } else {
                self.insert(item, z_index, pass, presenter, tracer);
                changes.inserted.push(path.clone());
                #[cfg(feature = "trace-rich")]
                item_changes.push(ItemChange {
                    index: count(z_index),
                    kind: ItemChangeKind::Insert,
                });
            }
            self.order.push(path);
        }

        self.process_completions(presenter, tracer);

        #[cfg(feature = "trace-rich")]
        tracer.item_changes(pass.pass_index, &item_changes);
        tracer.reconcile(&changes.event(pass.pass_index, self.pending.len()));
        changes
    }

    /// Applies every queued transition completion.
    ///
    /// Runs at the end of each [`reconcile`](Self::reconcile). Hosts whose
    /// animations finish between passes call it directly. Returns the number
    /// of transitions completed. Completions of cancelled transitions are
    /// discarded.
    pub fn process_completions<P: Presenter<V> + ?Sized>(
        &mut self,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> usize {
        let mut completed = 0;
        loop {
            let ids = self.queue.drain();
            if ids.is_empty() {
                return completed;
            }
            for id in ids {
                let Some(pending) = self.pending.remove(&id) else {
                    continue;
                };
                let Some(mut entry) = self.entries.remove(&pending.path) else {
                    continue;
                };
                match (pending.kind, entry.phase) {
                    (TransitionKind::Insert, Phase::Inserting(current)) if current == id => {
                        entry.phase = Phase::Live;
                        entry.item.did_insert(&mut entry.view, &pending.context);
                        self.entries.insert(pending.path, entry);
                    }
                    (TransitionKind::Remove, Phase::Removing(current)) if current == id => {
                        entry.item.did_remove(&mut entry.view, &pending.context);
                        presenter.detach(&pending.path, entry.view);
                    }
                    _ => {
                        self.entries.insert(pending.path, entry);
                        continue;
                    }
                }
                completed += 1;
                tracer.transition(&TransitionEvent {
                    pass_index: self.pass_index,
                    id,
                    kind: pending.kind,
                    state: TransitionState::Completed,
                });
            }
        }
    }

    fn insert<P: Presenter<V> + ?Sized>(
        &mut self,
        item: RenderableItem<V>,
        z_index: usize,
        pass: &PassContext,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) {
        let cx = UpdateContext {
            update_type: UpdateType::Insert,
            old_frame: item.frame(),
            new_frame: item.frame(),
            animation: pass.timing_for(&item),
            host: pass.host,
        };
        let mut view = item.make(&cx);
        item.will_insert(&mut view, &cx);
        item.update(&mut view, &cx);
        presenter.attach(item.path(), &view, z_index);
        let phase = self.finish_insert(&item, &mut view, &cx, tracer);
        self.entries
            .insert(item.path().clone(), Entry { view, item, phase });
    }

    fn reinsert<P: Presenter<V> + ?Sized>(
        &mut self,
        item: RenderableItem<V>,
        z_index: usize,
        pass: &PassContext,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) {
        let Some(mut entry) = self.entries.remove(item.path()) else {
            return;
        };
        if let Phase::Removing(id) = entry.phase {
            self.cancel(id, tracer);
        }
        let cx = UpdateContext {
            update_type: UpdateType::Insert,
            old_frame: entry.item.frame(),
            new_frame: item.frame(),
            animation: pass.timing_for(&item),
            host: pass.host,
        };
        item.will_insert(&mut entry.view, &cx);
        item.update(&mut entry.view, &cx);
        presenter.reorder(item.path(), &entry.view, z_index);
        entry.phase = self.finish_insert(&item, &mut entry.view, &cx, tracer);
        entry.item = item;
        self.entries.insert(entry.item.path().clone(), entry);
    }

    /// Runs `did_insert` now, or starts the insert animation that defers it.
    fn finish_insert(
        &mut self,
        item: &RenderableItem<V>,
        view: &mut V,
        cx: &UpdateContext,
        tracer: &mut Tracer<'_>,
    ) -> Phase {
        match item.insert_animator().map(Rc::clone) {
            Some(animator) => {
                let id = self.begin(item.path(), TransitionKind::Insert, cx, tracer);
                animator(view, cx, self.queue.handle(id));
                Phase::Inserting(id)
            }
            None => {
                item.did_insert(view, cx);
                Phase::Live
            }
        }
    }

    fn update<P: Presenter<V> + ?Sized>(
        &mut self,
        item: RenderableItem<V>,
        z_index: usize,
        moved: bool,
        pass: &PassContext,
        presenter: &mut P,
    ) {
        let Some(entry) = self.entries.get_mut(item.path()) else {
            return;
        };
        let cx = UpdateContext {
            update_type: pass.update_type,
            old_frame: entry.item.frame(),
            new_frame: item.frame(),
            animation: pass.timing_for(&item),
            host: pass.host,
        };
        item.will_update(&mut entry.view, &cx);
        item.update(&mut entry.view, &cx);
        if moved {
            presenter.reorder(item.path(), &entry.view, z_index);
        }
        entry.item = item;
    }

    fn remove<P: Presenter<V> + ?Sized>(
        &mut self,
        path: &IdentityPath,
        pass: &PassContext,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) {
        let Some(mut entry) = self.entries.remove(path) else {
            return;
        };
        if let Phase::Inserting(id) = entry.phase {
            self.cancel(id, tracer);
        }
        let frame = entry.item.frame();
        let cx = UpdateContext {
            update_type: pass.update_type,
            old_frame: frame,
            new_frame: frame,
            animation: pass.timing_for(&entry.item),
            host: pass.host,
        };
        entry.item.will_remove(&mut entry.view, &cx);
        match entry.item.remove_animator().map(Rc::clone) {
            Some(animator) => {
                let id = self.begin(path, TransitionKind::Remove, &cx, tracer);
                entry.phase = Phase::Removing(id);
                animator(&mut entry.view, &cx, self.queue.handle(id));
                self.entries.insert(path.clone(), entry);
            }
            None => {
                entry.item.did_remove(&mut entry.view, &cx);
                presenter.detach(path, entry.view);
            }
        }
    }

    fn begin(
        &mut self,
        path: &IdentityPath,
        kind: TransitionKind,
        cx: &UpdateContext,
        tracer: &mut Tracer<'_>,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        self.pending.insert(
            id,
            Pending {
                path: path.clone(),
                kind,
                context: *cx,
            },
        );
        tracer.transition(&TransitionEvent {
            pass_index: self.pass_index,
            id,
            kind,
            state: TransitionState::Started,
        });
        id
    }

    fn cancel(&mut self, id: TransitionId, tracer: &mut Tracer<'_>) {
        if let Some(pending) = self.pending.remove(&id) {
            tracer.transition(&TransitionEvent {
                pass_index: self.pass_index,
                id,
                kind: pending.kind,
                state: TransitionState::Cancelled,
            });
        }
    }
}
