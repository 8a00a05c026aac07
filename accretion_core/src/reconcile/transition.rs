// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

/// Handle to one in-flight insert or remove transition.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(pub u64);

impl fmt::Debug for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransitionId({})", self.0)
    }
}

/// Which lifecycle edge a transition animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Defers `did_insert`.
    Insert,
    /// Defers `did_remove` and detaching.
    Remove,
}

/// Cooperative queue of completed transitions.
///
/// Completions only enqueue ids. The reconciler applies them the next time it
/// processes the queue, so an animator may complete synchronously without
/// re-entering the reconciler.
#[derive(Clone, Default)]
pub(crate) struct CompletionQueue {
    ids: Rc<RefCell<Vec<TransitionId>>>,
}

impl CompletionQueue {
    pub(crate) fn handle(&self, id: TransitionId) -> Completion {
        Completion {
            id,
            queue: Rc::clone(&self.ids),
        }
    }

    pub(crate) fn drain(&self) -> Vec<TransitionId> {
        core::mem::take(&mut *self.ids.borrow_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.borrow().len()
    }
}

impl fmt::Debug for CompletionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids.borrow().iter()).finish()
    }
}

/// Passed to an [`Animator`](crate::item::Animator); report the end of the
/// animation with [`complete`](Self::complete).
///
/// Completing a transition that was cancelled in the meantime (because the
/// item was re-inserted or removed again) has no effect.
pub struct Completion {
    id: TransitionId,
    queue: Rc<RefCell<Vec<TransitionId>>>,
}

impl Completion {
    /// The transition this handle completes.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Marks the transition as finished.
    pub fn complete(self) {
        self.queue.borrow_mut().push(self.id);
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Completion").field(&self.id).finish()
    }
}
