// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity paths.
//!
//! Every node and every renderable item carries an [`IdentityPath`]. Paths are
//! structural. A container wraps each child's path in its own with
//! [`IdentityPath::join`], usually using the child's position as the suffix. As
//! long as the shape of the tree is stable from one pass to the next, the
//! resulting paths are equal and the reconciler matches the items up.
//!
//! A path marked [`fixed`](IdentityPath::fixed) escapes this nesting, and
//! joining returns it unchanged. Use it for native objects that must survive
//! reparenting, such as externally supplied views that should never be
//! recreated.
//!
//! Paths are reference-counted and cheap to clone. Equality, ordering, and
//! hashing are structural.

use core::fmt;
use std::rc::Rc;

/// Built-in node kinds, used as the default identity of each node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardTag {
    /// A horizontal [`Stack`](crate::node::Stack).
    HStack,
    /// A vertical [`Stack`](crate::node::Stack).
    VStack,
    /// An [`Overlay`](crate::node::Overlay).
    Overlay,
    /// A [`Padding`](crate::node::Padding) wrapper.
    Padding,
    /// A [`Frame`](crate::node::Frame) wrapper.
    Frame,
    /// A [`Spacer`](crate::node::Spacer).
    Spacer,
    /// A leaf [`Element`](crate::node::Element).
    Element,
}

impl StandardTag {
    const fn name(self) -> &'static str {
        match self {
            Self::HStack => "hstack",
            Self::VStack => "vstack",
            Self::Overlay => "overlay",
            Self::Padding => "padding",
            Self::Frame => "frame",
            Self::Spacer => "spacer",
            Self::Element => "element",
        }
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Kind {
    Standard(StandardTag),
    Custom(Rc<str>),
    Nested(Rc<Nested>),
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Nested {
    parent: IdentityPath,
    suffix: Option<Rc<str>>,
    child: IdentityPath,
}

/// A hierarchical key used to match renderable items across render passes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityPath {
    kind: Kind,
    fixed: bool,
}

impl IdentityPath {
    /// A path for one of the built-in node kinds.
    #[must_use]
    pub const fn standard(tag: StandardTag) -> Self {
        Self {
            kind: Kind::Standard(tag),
            fixed: false,
        }
    }

    /// A caller-chosen path.
    #[must_use]
    pub fn custom(name: impl AsRef<str>) -> Self {
        Self {
            kind: Kind::Custom(Rc::from(name.as_ref())),
            fixed: false,
        }
    }

    /// Returns a copy that escapes ancestor nesting when joined.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Whether joining with an ancestor leaves this path unchanged.
    #[inline]
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Nests `child` under this path.
    ///
    /// Returns `child` unmodified if it [is fixed](Self::is_fixed).
    #[must_use]
    pub fn join(&self, child: &Self, suffix: Option<&str>) -> Self {
        if child.fixed {
            return child.clone();
        }
        Self {
            kind: Kind::Nested(Rc::new(Nested {
                parent: self.clone(),
                suffix: suffix.map(Rc::from),
                child: child.clone(),
            })),
            fixed: false,
        }
    }

    /// Nests `child` under this path using a positional suffix.
    #[must_use]
    pub fn join_index(&self, child: &Self, index: usize) -> Self {
        if child.fixed {
            return child.clone();
        }
        let suffix = index.to_string();
        self.join(child, Some(&suffix))
    }

    /// Number of path segments from the outermost ancestor to the leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.kind {
            Kind::Standard(_) | Kind::Custom(_) => 1,
            Kind::Nested(n) => n.parent.depth() + n.child.depth(),
        }
    }

    /// Returns the innermost (non-nested) component of the path.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match &self.kind {
            Kind::Nested(n) => n.child.leaf(),
            _ => self,
        }
    }
}

impl From<StandardTag> for IdentityPath {
    fn from(tag: StandardTag) -> Self {
        Self::standard(tag)
    }
}

impl From<&str> for IdentityPath {
    fn from(name: &str) -> Self {
        Self::custom(name)
    }
}

impl fmt::Display for IdentityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Standard(tag) => f.write_str(tag.name())?,
            Kind::Custom(name) => write!(f, "'{name}'")?,
            Kind::Nested(n) => {
                write!(f, "{}", n.parent)?;
                if let Some(suffix) = &n.suffix {
                    write!(f, "[{suffix}]")?;
                }
                write!(f, "/{}", n.child)?;
            }
        }
        if self.fixed {
            f.write_str("!")?;
        }
        Ok(())
    }
}

impl fmt::Debug for IdentityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityPath({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_nests_unfixed_children() {
        let stack = IdentityPath::standard(StandardTag::VStack);
        let leaf = IdentityPath::standard(StandardTag::Element);
        let joined = stack.join_index(&leaf, 0);
        assert_ne!(joined, leaf);
        assert_eq!(joined.depth(), 2);
        assert_eq!(joined.leaf(), &leaf);
        assert_eq!(joined.to_string(), "vstack[0]/element");
    }

    #[test]
    fn join_returns_fixed_child_unchanged() {
        let stack = IdentityPath::standard(StandardTag::HStack);
        let video = IdentityPath::custom("video").fixed();
        assert_eq!(stack.join_index(&video, 3), video);
        let outer = IdentityPath::custom("outer");
        assert_eq!(outer.join(&stack.join_index(&video, 3), None), video);
    }

    #[test]
    fn equal_shapes_produce_equal_paths() {
        let build = || {
            let root = IdentityPath::standard(StandardTag::VStack);
            let row = IdentityPath::standard(StandardTag::HStack);
            let leaf = IdentityPath::custom("label");
            root.join_index(&row.join_index(&leaf, 1), 2)
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn suffix_distinguishes_siblings() {
        let stack = IdentityPath::standard(StandardTag::VStack);
        let leaf = IdentityPath::standard(StandardTag::Element);
        assert_ne!(stack.join_index(&leaf, 0), stack.join_index(&leaf, 1));
        assert_ne!(stack.join(&leaf, None), stack.join_index(&leaf, 0));
    }

    #[test]
    fn fixed_flag_is_part_of_identity() {
        let a = IdentityPath::custom("a");
        assert_ne!(a.clone(), a.fixed());
    }
}
