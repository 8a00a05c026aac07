// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Main-axis space distribution for stacking containers.
//!
//! [`solve`] turns an available length and an ordered list of child sizings
//! into one concrete length per child:
//!
//! 1. Fixed children receive exactly their fixed length.
//! 2. The remainder is shared equally among the flexible and range children
//!    (a flexible child behaves as `Range(0, ∞)`).
//! 3. Children whose share falls outside their range are clamped and frozen,
//!    and the share is recomputed among the rest. This repeats until no
//!    unfrozen child violates its bounds (water-filling).
//! 4. Once the distribution settles, every child (fixed and clamped ones
//!    included) is rounded to device pixels using running edges, so the
//!    rounded lengths add up to the rounded total.
//!
//! When several children violate their bounds in the same iteration, the
//! direction of the net violation decides which ones freeze. If clamping
//! would add length overall, only the children raised to their minimum are
//! frozen. If it would remove length, only those cut to their maximum are. If
//! the violations cancel exactly, all of them are frozen. This resolves
//! simultaneous clamps without depending on child order.
//!
//! If nothing is left after the fixed children (`available − Σfixed ≤ 0`),
//! every flexible child gets zero and every range child gets its minimum.
//! The same happens when `available` is not finite.
//!
//! The solver never looks at the children themselves. Containers lay children
//! out after the lengths are assigned.

use crate::context::LayoutContext;
use crate::sizing::Sizing;

/// Distributes `available` along the main axis among children with the given
/// sizings.
#[must_use]
pub fn solve(available: f64, sizings: &[Sizing], cx: &LayoutContext) -> Vec<f64> {
    let mut out = Vec::with_capacity(sizings.len());
    solve_into(available, sizings, cx, &mut out);
    out
}

/// Like [`solve`], but reuses a caller-provided buffer.
pub fn solve_into(available: f64, sizings: &[Sizing], cx: &LayoutContext, out: &mut Vec<f64>) {
    out.clear();
    out.resize(sizings.len(), 0.0);

    let mut fixed_total = 0.0;
    let mut open: Vec<(usize, Sizing)> = Vec::new();
    for (i, sizing) in sizings.iter().enumerate() {
        match sizing.normalize() {
            Sizing::Fixed(v) => {
                out[i] = v;
                fixed_total += v;
            }
            other => open.push((i, other)),
        }
    }
    let remaining = available - fixed_total;
    if !(remaining > 0.0) || !available.is_finite() {
        for (i, sizing) in open {
            out[i] = sizing.min_length();
        }
        round_edges(out, cx);
        return;
    }

    let mut left = remaining;
    while !open.is_empty() {
        let share = left / open.len() as f64;
        let mut net = 0.0;
        let mut violated = false;
        for &(_, sizing) in &open {
            let clamped = sizing.resolve(share);
            if clamped != share {
                violated = true;
                net += clamped - share;
            }
        }
        if !violated {
            for &(i, _) in &open {
                out[i] = share;
            }
            break;
        }

        open.retain(|&(i, sizing)| {
            let clamped = sizing.resolve(share);
            let freeze = if net > 0.0 {
                clamped > share
            } else if net < 0.0 {
                clamped < share
            } else {
                clamped != share
            };
            if freeze {
                out[i] = clamped;
                left -= clamped;
            }
            !freeze
        });
    }
    round_edges(out, cx);
}

/// Rounds each length so that every running edge lands on a device pixel.
fn round_edges(lengths: &mut [f64], cx: &LayoutContext) {
    let mut exact = 0.0;
    let mut placed = 0.0;
    for length in lengths {
        exact += *length;
        let edge = cx.round(exact);
        *length = edge - placed;
        placed = edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn cx() -> LayoutContext {
        LayoutContext::new(1.0)
    }

    fn r(min: f64, max: f64) -> Sizing {
        Sizing::Range { min, max }
    }

    #[test]
    fn flexible_children_split_evenly() {
        let sizes = solve(90.0, &[Sizing::Flexible, Sizing::Flexible], &cx());
        assert_eq!(sizes, [45.0, 45.0]);
    }

    #[test]
    fn fixed_children_keep_their_length() {
        let sizes = solve(100.0, &[Sizing::Fixed(50.0), Sizing::Flexible], &cx());
        assert_eq!(sizes, [50.0, 50.0]);
    }

    #[test]
    fn max_clamp_redistributes() {
        let sizes = solve(100.0, &[r(0.0, 20.0), Sizing::Flexible], &cx());
        assert_eq!(sizes, [20.0, 80.0]);
    }

    #[test]
    fn min_clamp_redistributes() {
        let sizes = solve(
            100.0,
            &[r(60.0, INF), Sizing::Flexible, Sizing::Flexible],
            &cx(),
        );
        assert_eq!(sizes, [60.0, 20.0, 20.0]);
    }

    #[test]
    fn simultaneous_clamps_freeze_together() {
        let sizes = solve(
            100.0,
            &[r(0.0, 10.0), Sizing::Flexible, r(0.0, 10.0)],
            &cx(),
        );
        assert_eq!(sizes, [10.0, 80.0, 10.0]);
    }

    #[test]
    fn opposing_violations_resolve_by_net_direction() {
        // Share is 50: the first child wants at least 70, the second at most 10.
        // Net violation is +20-40 < 0, so only the max-clamped child freezes,
        // and the first child then takes the remaining 90.
        let sizes = solve(100.0, &[r(70.0, INF), r(0.0, 10.0)], &cx());
        assert_eq!(sizes, [90.0, 10.0]);
    }

    #[test]
    fn exhausted_space_gives_minimums() {
        let sizes = solve(
            100.0,
            &[
                Sizing::Fixed(80.0),
                Sizing::Fixed(40.0),
                r(10.0, 20.0),
                Sizing::Flexible,
            ],
            &cx(),
        );
        assert_eq!(sizes, [80.0, 40.0, 10.0, 0.0]);
    }

    #[test]
    fn minimums_larger_than_space_squeeze_flexible_to_zero() {
        let sizes = solve(50.0, &[r(40.0, INF), r(30.0, INF), Sizing::Flexible], &cx());
        assert_eq!(sizes, [40.0, 30.0, 0.0]);
    }

    #[test]
    fn rounding_conserves_total() {
        let flex = [Sizing::Flexible; 3];
        let sizes = solve(100.0, &flex, &cx());
        assert_eq!(sizes, [33.0, 34.0, 33.0]);

        let sizes = solve(100.0, &flex, &LayoutContext::new(2.0));
        assert_eq!(sizes.iter().sum::<f64>(), 100.0);
        for s in sizes {
            assert!((s - 100.0 / 3.0).abs() <= 0.5, "{s} is not within half a pixel");
        }
    }

    #[test]
    fn space_is_conserved_with_a_flexible_child() {
        let configs: &[&[Sizing]] = &[
            &[Sizing::Flexible],
            &[Sizing::Fixed(10.0), Sizing::Flexible, r(5.0, 15.0)],
            &[r(20.0, 30.0), Sizing::Flexible, Sizing::Fixed(7.0), r(0.0, 4.0)],
            &[r(40.0, INF), Sizing::Flexible, Sizing::Flexible, Sizing::Fixed(1.0)],
            &[r(0.0, 1.0), r(0.0, 2.0), r(0.0, 3.0), Sizing::Flexible],
        ];
        for width in [60.0, 100.0, 257.0] {
            for sizings in configs {
                let sizes = solve(width, sizings, &cx());
                let total: f64 = sizes.iter().sum();
                assert_eq!(total, width, "{sizings:?} in {width} gave {sizes:?}");
            }
        }
    }

    #[test]
    fn fractional_fixed_and_clamped_lengths_are_rounded() {
        let sizes = solve(100.0, &[r(0.0, 33.3), Sizing::Flexible], &cx());
        assert_eq!(sizes, [33.0, 67.0]);

        let sizes = solve(100.0, &[Sizing::Fixed(10.5), Sizing::Flexible], &cx());
        assert_eq!(sizes, [11.0, 89.0]);

        let sizes = solve(
            100.0,
            &[Sizing::Fixed(10.5), r(0.0, 33.3), Sizing::Flexible],
            &LayoutContext::new(2.0),
        );
        assert_eq!(sizes, [10.5, 33.5, 56.0]);
    }

    #[test]
    fn unbounded_space_gives_minimums() {
        let sizes = solve(
            INF,
            &[Sizing::Flexible, r(5.0, 20.0), Sizing::Flexible, Sizing::Fixed(8.0)],
            &cx(),
        );
        assert_eq!(sizes, [0.0, 5.0, 0.0, 8.0]);
        assert!(solve(f64::NAN, &[Sizing::Flexible; 2], &cx()).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn empty_input() {
        assert!(solve(100.0, &[], &cx()).is_empty());
    }
}
