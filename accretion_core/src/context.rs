// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context values that flow from the host into layout and lifecycle callbacks.
//!
//! - [`LayoutContext`]: pixel-rounding granularity, supplied by the host and
//!   consumed by the [stack solver](crate::solver).
//! - [`UpdateContext`]: why a lifecycle callback fired, the frames involved,
//!   and the animation (if any) to run it under.
//! - [`HostGeometry`]: read-only view of the host's geometry, passed to every
//!   callback instead of a stored back-reference to the host.

use core::time::Duration;

use kurbo::{Rect, Size};

/// Host-supplied parameters for a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutContext {
    scale_factor: f64,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl LayoutContext {
    /// One device pixel per layout unit.
    pub const STANDARD: Self = Self { scale_factor: 1.0 };

    /// Two device pixels per layout unit.
    pub const HIGH_DENSITY: Self = Self { scale_factor: 2.0 };

    /// Creates a context for a display with the given device-pixel ratio.
    ///
    /// # Panics
    ///
    /// Panics if `scale_factor` is not a positive finite number.
    #[must_use]
    pub fn new(scale_factor: f64) -> Self {
        assert!(
            scale_factor.is_finite() && scale_factor > 0.0,
            "scale factor must be positive and finite, got {scale_factor}"
        );
        Self { scale_factor }
    }

    /// Returns the device-pixel ratio.
    #[inline]
    #[must_use]
    pub const fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Rounds a length to the nearest device pixel.
    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        if value.is_finite() {
            (value * self.scale_factor).round() / self.scale_factor
        } else {
            value
        }
    }

    /// Rounds both dimensions of a size to the nearest device pixel.
    #[must_use]
    pub fn round_size(&self, size: Size) -> Size {
        Size::new(self.round(size.width), self.round(size.height))
    }
}

/// Why a lifecycle callback fired.
///
/// Collaborators use this to choose between a full and a partial refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateType {
    /// The item is new this pass.
    Insert,
    /// The host explicitly asked for a re-render.
    Refresh,
    /// The visible region moved without changing size.
    Scroll,
    /// The container was resized.
    SizeChange,
    /// The visible region changed size without a container resize.
    BoundsChange,
}

/// Easing curve for an animated update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Curve {
    /// Constant velocity.
    Linear,
    /// Starts slow.
    EaseIn,
    /// Ends slow.
    EaseOut,
    /// Starts and ends slow.
    #[default]
    EaseInOut,
    /// Damped spring, `damping` in `(0, 1]`.
    Spring {
        /// Damping ratio; `1.0` is critically damped.
        damping: f64,
    },
}

/// How an animated update should be timed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTiming {
    /// Length of the animation.
    pub duration: Duration,
    /// Delay before the animation starts.
    pub delay: Duration,
    /// Easing curve.
    pub curve: Curve,
}

impl AnimationTiming {
    /// An ease-in-out animation of the given length.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            curve: Curve::EaseInOut,
        }
    }

    /// Returns a copy with a different curve.
    #[must_use]
    pub const fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Returns a copy with a start delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

/// Read-only geometry of the host view at the time of a callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostGeometry {
    /// Size the root node was laid out against.
    pub container_size: Size,
    /// Region of the content currently visible.
    pub visible_bounds: Rect,
    /// Device-pixel ratio.
    pub scale_factor: f64,
}

impl Default for HostGeometry {
    fn default() -> Self {
        Self {
            container_size: Size::ZERO,
            visible_bounds: Rect::ZERO,
            scale_factor: 1.0,
        }
    }
}

/// Passed to every lifecycle callback of a renderable item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateContext {
    /// Why the callback fired.
    pub update_type: UpdateType,
    /// Frame from the previous pass (equal to `new_frame` on first insert).
    pub old_frame: Rect,
    /// Frame from this pass.
    pub new_frame: Rect,
    /// Animation to apply, if the pass is animated.
    pub animation: Option<AnimationTiming>,
    /// Host geometry for theme and layout queries.
    pub host: HostGeometry,
}

impl UpdateContext {
    /// Whether the frame moved or resized since the previous pass.
    #[must_use]
    pub fn frame_changed(&self) -> bool {
        self.old_frame != self.new_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_device_pixels() {
        let cx = LayoutContext::new(2.0);
        assert_eq!(cx.round(10.3), 10.5);
        assert_eq!(cx.round(10.2), 10.0);
        assert_eq!(cx.round(f64::INFINITY), f64::INFINITY);
        assert_eq!(
            LayoutContext::new(1.0).round_size(Size::new(33.4, 66.6)),
            Size::new(33.0, 67.0)
        );
    }

    #[test]
    #[should_panic(expected = "scale factor must be positive and finite")]
    fn zero_scale_factor_panics() {
        let _ = LayoutContext::new(0.0);
    }

    #[test]
    fn animation_builders() {
        let timing = AnimationTiming::new(Duration::from_millis(100))
            .with_curve(Curve::Linear)
            .with_delay(Duration::from_millis(20));
        assert_eq!(timing.curve, Curve::Linear);
        assert_eq!(timing.delay, Duration::from_millis(20));
    }
}
