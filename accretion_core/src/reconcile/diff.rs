// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashSet;

use crate::path::IdentityPath;

/// Classification of two consecutive item lists by identity.
///
/// The three buckets are disjoint. `inserted` and `updated` follow the current
/// order. `removed` follows the previous order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    /// Paths in `current` but not in `previous`.
    pub inserted: Vec<IdentityPath>,
    /// Paths in both lists.
    pub updated: Vec<IdentityPath>,
    /// Paths in `previous` but not in `current`.
    pub removed: Vec<IdentityPath>,
}

impl Diff {
    /// Whether both lists held the same set of paths.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

/// Computes the identity diff between two path lists.
#[must_use]
pub fn diff(previous: &[IdentityPath], current: &[IdentityPath]) -> Diff {
    let before: HashSet<&IdentityPath> = previous.iter().collect();
    let after: HashSet<&IdentityPath> = current.iter().collect();
    let mut out = Diff::default();
    for path in current {
        if before.contains(path) {
            out.updated.push(path.clone());
        } else {
            out.inserted.push(path.clone());
        }
    }
    out.removed = previous
        .iter()
        .filter(|p| !after.contains(p))
        .cloned()
        .collect();
    out
}
