// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing algebra.
//!
//! A [`Sizing`] describes how a node behaves along one dimension when offered
//! a different amount of space: it either insists on a [`Fixed`] length, takes
//! whatever it is given ([`Flexible`]), or accepts anything within a bounded
//! [`Range`].
//!
//! Containers never re-walk their children to find their own sizing. Instead
//! they fold the children's sizings with [`Sizing::combine`]:
//!
//! - **Main axis** ([`AxisRole::Main`]): children are laid end to end, so the
//!   bounds add.
//! - **Cross axis** ([`AxisRole::Cross`]): children share the same extent, so
//!   the result is the enclosing envelope of the bounds.
//!
//! Viewed as closed intervals (`Fixed(x)` is `[x, x]`, `Flexible` is
//! `[0, ∞]`), main-axis combination is interval addition and cross-axis
//! combination takes the componentwise maximum. Both are associative, which
//! is what lets a container summarize any number of children in one pass.
//!
//! [`Fixed`]: Sizing::Fixed
//! [`Flexible`]: Sizing::Flexible
//! [`Range`]: Sizing::Range

use core::fmt;

use kurbo::{Point, Size};

/// How a single dimension responds to the space it is offered.
#[derive(Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Always exactly this length.
    Fixed(f64),
    /// Takes all of the offered length.
    Flexible,
    /// Takes the offered length, clamped to `[min, max]`.
    ///
    /// Well-formed ranges satisfy `0 <= min < max`. `max` may be infinite.
    Range {
        /// Smallest acceptable length.
        min: f64,
        /// Largest acceptable length.
        max: f64,
    },
}

/// Whether two sizings are combined along or across the stacking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisRole {
    /// Along the stacking direction: lengths concatenate.
    Main,
    /// Across the stacking direction: lengths overlap.
    Cross,
}

/// A layout axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// Returns the perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Returns the component of `size` along this axis.
    #[inline]
    #[must_use]
    pub const fn of(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Builds a size from a length along this axis and one across it.
    #[inline]
    #[must_use]
    pub const fn pack(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Builds a point from an offset along this axis and one across it.
    #[inline]
    #[must_use]
    pub const fn pack_point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }
}

impl Sizing {
    /// `Range(0, ∞)`, which normalizes to [`Flexible`](Self::Flexible).
    pub const UNBOUNDED: Self = Self::Range {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Creates a range sizing, normalized.
    #[must_use]
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max }.normalize()
    }

    /// Creates a range with a lower bound and no upper bound, normalized.
    #[must_use]
    pub fn at_least(min: f64) -> Self {
        Self::range(min, f64::INFINITY)
    }

    /// Returns the canonical form of this sizing.
    ///
    /// - Negative or NaN lengths are clamped to zero.
    /// - An infinite fixed length becomes [`Flexible`](Self::Flexible).
    /// - `Range(0, ∞)` becomes [`Flexible`](Self::Flexible).
    /// - `Range(x, x)` becomes `Fixed(x)`.
    /// - An inverted range (`min > max`) collapses to `Fixed(min)`.
    ///
    /// Malformed input (negative lengths, inverted ranges) trips a debug
    /// assertion; release builds fall through to the clamped value.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Fixed(v) => {
                debug_assert!(v >= 0.0, "malformed sizing: negative fixed length {v}");
                if v.is_nan() || v < 0.0 {
                    Self::Fixed(0.0)
                } else if v.is_infinite() {
                    Self::Flexible
                } else {
                    Self::Fixed(v)
                }
            }
            Self::Flexible => Self::Flexible,
            Self::Range { min, max } => {
                debug_assert!(min >= 0.0, "malformed sizing: negative range minimum {min}");
                debug_assert!(
                    !(min > max),
                    "malformed sizing: range minimum {min} exceeds maximum {max}"
                );
                let min = if min.is_nan() || min < 0.0 { 0.0 } else { min };
                let max = if max.is_nan() { f64::INFINITY } else { max };
                if min >= max {
                    if min.is_infinite() {
                        Self::Flexible
                    } else {
                        Self::Fixed(min)
                    }
                } else if min == 0.0 && max == f64::INFINITY {
                    Self::Flexible
                } else {
                    Self::Range { min, max }
                }
            }
        }
    }

    /// Combines two sizings along the given axis role.
    ///
    /// Both operands are normalized first, and so is the result.
    #[must_use]
    pub fn combine(self, other: Self, role: AxisRole) -> Self {
        let a = self.normalize();
        let b = other.normalize();
        let combined = match role {
            AxisRole::Main => combine_main(a, b),
            AxisRole::Cross => combine_cross(a, b),
        };
        combined.normalize()
    }

    /// Returns the concrete length this sizing takes when offered `available`.
    #[must_use]
    pub fn resolve(self, available: f64) -> f64 {
        match self {
            Self::Fixed(v) => v,
            Self::Flexible => available.max(0.0),
            Self::Range { min, max } => available.max(min).min(max),
        }
    }

    /// Returns the smallest length this sizing accepts.
    #[must_use]
    pub const fn min_length(self) -> f64 {
        match self {
            Self::Fixed(v) => v,
            Self::Flexible => 0.0,
            Self::Range { min, .. } => min,
        }
    }

    /// Returns the largest length this sizing accepts.
    #[must_use]
    pub const fn max_length(self) -> f64 {
        match self {
            Self::Fixed(v) => v,
            Self::Flexible => f64::INFINITY,
            Self::Range { max, .. } => max,
        }
    }

    /// Returns `true` for [`Fixed`](Self::Fixed) sizings.
    #[inline]
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

fn combine_main(a: Sizing, b: Sizing) -> Sizing {
    use Sizing::{Fixed, Flexible, Range};
    match (a, b) {
        (Fixed(x), Fixed(y)) => Fixed(x + y),
        (Fixed(x), Flexible) | (Flexible, Fixed(x)) => {
            if x <= 0.0 {
                Flexible
            } else {
                Range {
                    min: x,
                    max: f64::INFINITY,
                }
            }
        }
        (Fixed(x), Range { min, max }) | (Range { min, max }, Fixed(x)) => {
            let (min, max) = (min + x, max + x);
            if min == max {
                Fixed(min)
            } else {
                Range { min, max }
            }
        }
        (Flexible, Flexible) => Flexible,
        (Flexible, Range { min, .. }) | (Range { min, .. }, Flexible) => open_above(min),
        (Range { min: a0, max: a1 }, Range { min: b0, max: b1 }) => Range {
            min: a0 + b0,
            max: a1 + b1,
        },
    }
}

fn combine_cross(a: Sizing, b: Sizing) -> Sizing {
    use Sizing::{Fixed, Flexible, Range};
    match (a, b) {
        (Fixed(x), Fixed(y)) => Fixed(x.max(y)),
        (Fixed(x), Flexible) | (Flexible, Fixed(x)) => open_above(x),
        (Fixed(x), Range { min, max }) | (Range { min, max }, Fixed(x)) => {
            if x >= max {
                Fixed(x)
            } else {
                Range {
                    min: x.max(min),
                    max,
                }
            }
        }
        (Flexible, Flexible) => Flexible,
        (Flexible, Range { min, .. }) | (Range { min, .. }, Flexible) => open_above(min),
        (Range { min: a0, max: a1 }, Range { min: b0, max: b1 }) => Range {
            min: a0.max(b0),
            max: a1.max(b1),
        },
    }
}

/// `Flexible` when `min` is zero, otherwise `Range(min, ∞)`.
fn open_above(min: f64) -> Sizing {
    if min == 0.0 {
        Sizing::Flexible
    } else {
        Sizing::Range {
            min,
            max: f64::INFINITY,
        }
    }
}

impl Default for Sizing {
    fn default() -> Self {
        Self::Flexible
    }
}

impl fmt::Debug for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => write!(f, "Fixed({v})"),
            Self::Flexible => f.write_str("Flexible"),
            Self::Range { min, max } => write!(f, "Range({min}, {max})"),
        }
    }
}

/// The pair of sizings a node reports from
/// [`layout`](crate::node::Node::layout): one per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizingPair {
    /// Horizontal behaviour.
    pub width: Sizing,
    /// Vertical behaviour.
    pub height: Sizing,
}

impl SizingPair {
    /// Flexible along both axes.
    pub const FLEXIBLE: Self = Self {
        width: Sizing::Flexible,
        height: Sizing::Flexible,
    };

    /// Creates a pair from two sizings.
    #[must_use]
    pub const fn new(width: Sizing, height: Sizing) -> Self {
        Self { width, height }
    }

    /// A pair that is fixed to `size` on both axes.
    #[must_use]
    pub const fn fixed(size: Size) -> Self {
        Self {
            width: Sizing::Fixed(size.width),
            height: Sizing::Fixed(size.height),
        }
    }

    /// Returns the sizing along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Returns a copy with the sizing along `axis` replaced.
    #[must_use]
    pub fn with(mut self, axis: Axis, sizing: Sizing) -> Self {
        match axis {
            Axis::Horizontal => self.width = sizing,
            Axis::Vertical => self.height = sizing,
        }
        self
    }

    /// Combines two pairs, treating `main` as the stacking axis.
    #[must_use]
    pub fn combine(self, other: Self, main: Axis) -> Self {
        let cross = main.cross();
        Self::default()
            .with(
                main,
                self.along(main).combine(other.along(main), AxisRole::Main),
            )
            .with(
                cross,
                self.along(cross)
                    .combine(other.along(cross), AxisRole::Cross),
            )
    }

    /// Normalizes both components.
    #[must_use]
    pub fn normalize(self) -> Self {
        Self {
            width: self.width.normalize(),
            height: self.height.normalize(),
        }
    }

    /// Resolves both components against the offered space.
    #[must_use]
    pub fn resolve(&self, available: Size) -> Size {
        Size::new(
            self.width.resolve(available.width),
            self.height.resolve(available.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn r(min: f64, max: f64) -> Sizing {
        Sizing::Range { min, max }
    }

    #[test]
    fn normalize_folds_degenerate_ranges() {
        assert_eq!(r(0.0, INF).normalize(), Sizing::Flexible);
        assert_eq!(r(7.0, 7.0).normalize(), Sizing::Fixed(7.0));
        assert_eq!(r(2.0, 9.0).normalize(), r(2.0, 9.0));
        assert_eq!(Sizing::Fixed(INF).normalize(), Sizing::Flexible);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "malformed sizing: negative fixed length")
    )]
    fn negative_fixed_clamps_to_zero() {
        assert_eq!(Sizing::Fixed(-3.0).normalize(), Sizing::Fixed(0.0));
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "malformed sizing: range minimum 9 exceeds maximum 4")
    )]
    fn inverted_range_collapses_to_minimum() {
        assert_eq!(r(9.0, 4.0).normalize(), Sizing::Fixed(9.0));
    }

    #[test]
    fn main_axis_table() {
        use AxisRole::Main;
        let fixed = Sizing::Fixed;
        let flex = Sizing::Flexible;

        assert_eq!(fixed(10.0).combine(fixed(5.0), Main), fixed(15.0));
        assert_eq!(fixed(0.0).combine(flex, Main), flex);
        assert_eq!(fixed(10.0).combine(flex, Main), r(10.0, INF));
        assert_eq!(fixed(10.0).combine(r(5.0, 20.0), Main), r(15.0, 30.0));
        assert_eq!(fixed(10.0).combine(r(5.0, INF), Main), r(15.0, INF));
        assert_eq!(flex.combine(flex, Main), flex);
        assert_eq!(flex.combine(r(0.0, 20.0), Main), flex);
        assert_eq!(flex.combine(r(4.0, 20.0), Main), r(4.0, INF));
        assert_eq!(r(1.0, 2.0).combine(r(3.0, 5.0), Main), r(4.0, 7.0));
    }

    #[test]
    fn cross_axis_table() {
        use AxisRole::Cross;
        let fixed = Sizing::Fixed;
        let flex = Sizing::Flexible;

        assert_eq!(fixed(10.0).combine(fixed(5.0), Cross), fixed(10.0));
        assert_eq!(fixed(0.0).combine(flex, Cross), flex);
        assert_eq!(fixed(10.0).combine(flex, Cross), r(10.0, INF));
        assert_eq!(fixed(30.0).combine(r(5.0, 20.0), Cross), fixed(30.0));
        assert_eq!(fixed(20.0).combine(r(5.0, 20.0), Cross), fixed(20.0));
        assert_eq!(fixed(10.0).combine(r(5.0, 20.0), Cross), r(10.0, 20.0));
        assert_eq!(fixed(2.0).combine(r(5.0, 20.0), Cross), r(5.0, 20.0));
        assert_eq!(flex.combine(r(0.0, 20.0), Cross), flex);
        assert_eq!(flex.combine(r(4.0, 20.0), Cross), r(4.0, INF));
        assert_eq!(r(1.0, 8.0).combine(r(3.0, 5.0), Cross), r(3.0, 8.0));
    }

    #[test]
    fn combine_is_symmetric() {
        let samples = samples();
        for role in [AxisRole::Main, AxisRole::Cross] {
            for &a in &samples {
                for &b in &samples {
                    assert_eq!(
                        a.combine(b, role),
                        b.combine(a, role),
                        "{a:?} with {b:?} along {role:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn combine_is_associative() {
        let samples = samples();
        for role in [AxisRole::Main, AxisRole::Cross] {
            for &a in &samples {
                for &b in &samples {
                    for &c in &samples {
                        let left = a.combine(b, role).combine(c, role);
                        let right = a.combine(b.combine(c, role), role);
                        assert_eq!(left, right, "({a:?}, {b:?}, {c:?}) along {role:?}");
                    }
                }
            }
        }
    }

    fn samples() -> Vec<Sizing> {
        vec![
            Sizing::Fixed(0.0),
            Sizing::Fixed(5.0),
            Sizing::Fixed(20.0),
            Sizing::Flexible,
            r(0.0, 10.0),
            r(3.0, 8.0),
            r(2.0, 30.0),
            r(10.0, INF),
        ]
    }

    #[test]
    fn resolve_clamps_to_range() {
        assert_eq!(Sizing::Fixed(12.0).resolve(100.0), 12.0);
        assert_eq!(Sizing::Flexible.resolve(100.0), 100.0);
        assert_eq!(r(10.0, 40.0).resolve(100.0), 40.0);
        assert_eq!(r(10.0, 40.0).resolve(4.0), 10.0);
    }

    #[test]
    fn pair_combine_uses_axis_roles() {
        let a = SizingPair::new(Sizing::Fixed(10.0), Sizing::Fixed(30.0));
        let b = SizingPair::new(Sizing::Fixed(20.0), Sizing::Fixed(5.0));
        let row = a.combine(b, Axis::Horizontal);
        assert_eq!(row.width, Sizing::Fixed(30.0));
        assert_eq!(row.height, Sizing::Fixed(30.0));
        let column = a.combine(b, Axis::Vertical);
        assert_eq!(column.width, Sizing::Fixed(20.0));
        assert_eq!(column.height, Sizing::Fixed(35.0));
    }
}
