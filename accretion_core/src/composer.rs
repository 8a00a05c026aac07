// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host driver.
//!
//! A [`Composer`] is what a host view owns. It holds the tree builder, the
//! laid-out tree of the last pass, and the [`Reconciler`]. Hosts report what
//! changed through [`set_needs_refresh`](Composer::set_needs_refresh),
//! [`set_container_size`](Composer::set_container_size) and
//! [`set_visible_bounds`](Composer::set_visible_bounds). Requests accumulate
//! on [dirty channels](crate::dirty) until the host runs
//! [`render_pass`](Composer::render_pass), which coalesces them into a single
//! pass:
//!
//! | Dirty channels | Update type | Tree |
//! |---|---|---|
//! | [`SIZE`](crate::dirty::SIZE) (any others) | `SizeChange` | rebuilt and laid out |
//! | [`REFRESH`](crate::dirty::REFRESH) (with or without bounds) | `Refresh` | rebuilt and laid out |
//! | [`BOUNDS`](crate::dirty::BOUNDS), origin moved | `Scroll` | reused |
//! | [`BOUNDS`](crate::dirty::BOUNDS), size changed | `BoundsChange` | reused |
//!
//! Transition completions reported by the host between passes are applied by
//! [`process_transitions`](Composer::process_transitions).

use core::fmt;
use core::time::Duration;

use kurbo::{Rect, Size};
use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use crate::backend::Presenter;
use crate::context::{AnimationTiming, HostGeometry, LayoutContext, UpdateType};
use crate::dirty;
use crate::node::BoxedNode;
use crate::reconcile::{Changeset, PassContext, Reconciler};
use crate::time::HostTime;
use crate::trace::{
    PassBeginEvent, PassSummaryBuilder, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// Dirty key for the composer's single root.
const ROOT: u32 = 0;

/// Visible bounds used when offscreen pruning is disabled.
const EVERYTHING: Rect = Rect::new(
    f64::NEG_INFINITY,
    f64::NEG_INFINITY,
    f64::INFINITY,
    f64::INFINITY,
);

/// Composer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComposerConfig {
    /// Pixel rounding for layout.
    pub layout: LayoutContext,
    /// Timing handed to callbacks of an animated pass when the item has none
    /// of its own.
    pub default_animation: AnimationTiming,
    /// Collect only items intersecting the visible bounds.
    ///
    /// When `false`, every item of the laid-out tree is reconciled regardless
    /// of the visible bounds.
    pub prune_offscreen: bool,
}

impl ComposerConfig {
    /// Configuration for a standard-density display.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            layout: LayoutContext::STANDARD,
            default_animation: AnimationTiming::new(Duration::from_millis(250)),
            prune_offscreen: true,
        }
    }

    /// Configuration for a 2x display.
    #[must_use]
    pub const fn high_density() -> Self {
        Self {
            layout: LayoutContext::HIGH_DENSITY,
            ..Self::standard()
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of one [`Composer::render_pass`].
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    /// Monotonic pass counter, starting at zero.
    pub pass_index: u64,
    /// How the pass was classified.
    pub update_type: UpdateType,
    /// Whether callbacks received an animation.
    pub animated: bool,
    /// Whether the tree was rebuilt and laid out.
    pub rebuilt: bool,
    /// Number of items collected for reconciliation.
    pub item_count: usize,
    /// Size of the laid-out root.
    pub content_size: Size,
    /// What the reconciler did.
    pub changes: Changeset,
}

/// Owns the node builder, the retained tree, and the reconciler of one host
/// view.
pub struct Composer<V> {
    config: ComposerConfig,
    builder: Box<dyn FnMut() -> BoxedNode<V>>,
    clock: Option<Box<dyn Fn() -> HostTime>>,
    root: Option<BoxedNode<V>>,
    reconciler: Reconciler<V>,
    dirty: DirtyTracker<u32>,
    requested: bool,
    animated: bool,
    container_size: Size,
    visible_bounds: Rect,
    presented_bounds: Rect,
    pass_index: u64,
}

impl<V> fmt::Debug for Composer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("config", &self.config)
            .field("container_size", &self.container_size)
            .field("visible_bounds", &self.visible_bounds)
            .field("requested", &self.requested)
            .field("pass_index", &self.pass_index)
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

impl<V> Composer<V> {
    /// Creates a composer. A refresh is already pending, so the first
    /// [`render_pass`](Self::render_pass) builds the tree.
    pub fn new(config: ComposerConfig, builder: impl FnMut() -> BoxedNode<V> + 'static) -> Self {
        let mut composer = Self {
            config,
            builder: Box::new(builder),
            clock: None,
            root: None,
            reconciler: Reconciler::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            requested: false,
            animated: false,
            container_size: Size::ZERO,
            visible_bounds: Rect::ZERO,
            presented_bounds: Rect::ZERO,
            pass_index: 0,
        };
        composer.mark(dirty::REFRESH);
        composer
    }

    /// Returns a copy that stamps phase events with `clock` instead of the
    /// pass start time.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> HostTime + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Requests a rebuild on the next pass.
    ///
    /// Repeated requests before a pass coalesce; the last `animated` wins.
    pub fn set_needs_refresh(&mut self, animated: bool) {
        self.animated = animated;
        self.mark(dirty::REFRESH);
    }

    /// Sets the size the root is laid out against.
    ///
    /// Sizes must be finite and non-negative. In release builds other values
    /// are clamped to zero.
    pub fn set_container_size(&mut self, size: Size) {
        debug_assert!(
            size.is_finite() && size.width >= 0.0 && size.height >= 0.0,
            "container size must be finite and non-negative, got {size:?}"
        );
        let size = Size::new(sanitize(size.width), sanitize(size.height));
        if size != self.container_size {
            self.container_size = size;
            self.mark(dirty::SIZE);
        }
    }

    /// Sets the visible region in content coordinates.
    pub fn set_visible_bounds(&mut self, bounds: Rect) {
        if bounds != self.visible_bounds {
            self.visible_bounds = bounds;
            self.mark(dirty::BOUNDS);
        }
    }

    /// Whether a request is pending.
    #[must_use]
    pub fn needs_pass(&self) -> bool {
        self.requested
    }

    /// Size of the laid-out root, zero before the first pass.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.root.as_ref().map_or(Size::ZERO, |root| root.size())
    }

    /// Number of items in the last reconciled list.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.reconciler.live_count()
    }

    /// Number of transitions awaiting completion.
    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.reconciler.pending_transitions()
    }

    /// The reconciler, for inspecting live views.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler<V> {
        &self.reconciler
    }

    /// Runs one pass if anything was requested since the last one.
    ///
    /// `now` stamps the pass in trace events. Returns `None` when nothing was
    /// pending.
    pub fn render_pass<P: Presenter<V> + ?Sized>(
        &mut self,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
        now: HostTime,
    ) -> Option<PassReport> {
        if !self.requested {
            return None;
        }
        self.requested = false;
        let size = self.drain(dirty::SIZE);
        let refresh = self.drain(dirty::REFRESH);
        let bounds = self.drain(dirty::BOUNDS);

        let update_type = if size {
            UpdateType::SizeChange
        } else if refresh {
            UpdateType::Refresh
        } else if bounds {
            if self.visible_bounds.size() == self.presented_bounds.size() {
                UpdateType::Scroll
            } else {
                UpdateType::BoundsChange
            }
        } else {
            return None;
        };
        let animated = core::mem::take(&mut self.animated) && refresh;
        let pass_index = self.pass_index;
        self.pass_index += 1;

        let begin = PassBeginEvent {
            pass_index,
            update_type,
            animated,
            container_size: self.container_size,
            timestamp: now,
        };
        tracer.pass_begin(&begin);
        let mut summary = PassSummaryBuilder::new(&begin);

        let rebuilt = size || refresh || self.root.is_none();
        if rebuilt {
            self.phase(PhaseKind::Build, pass_index, now, tracer, &mut summary, |this| {
                this.root = Some((this.builder)());
            });
            self.phase(PhaseKind::Layout, pass_index, now, tracer, &mut summary, |this| {
                let (container, cx) = (this.container_size, this.config.layout);
                if let Some(root) = &mut this.root {
                    root.layout(container, &cx);
                }
            });
        }
        summary.set_rebuilt(rebuilt);

        let items = self.phase(PhaseKind::Collect, pass_index, now, tracer, &mut summary, |this| {
            let visible = if this.config.prune_offscreen {
                this.visible_bounds
            } else {
                EVERYTHING
            };
            this.root
                .as_ref()
                .map(|root| root.renderable_items(visible))
                .unwrap_or_default()
        });
        let item_count = items.len();
        summary.set_item_count(item_count);

        let pass = PassContext {
            pass_index,
            update_type,
            animation: animated.then_some(self.config.default_animation),
            host: HostGeometry {
                container_size: self.container_size,
                visible_bounds: self.visible_bounds,
                scale_factor: self.config.layout.scale_factor(),
            },
        };
        let at = self.stamp(now);
        summary.phase_begin(PhaseKind::Reconcile, at);
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PhaseKind::Reconcile,
            timestamp: at,
        });
        let changes = self.reconciler.reconcile(items, &pass, presenter, tracer);
        let at = self.stamp(now);
        summary.phase_end(PhaseKind::Reconcile, at);
        tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PhaseKind::Reconcile,
            timestamp: at,
        });

        self.presented_bounds = self.visible_bounds;
        tracer.pass_summary(&summary.finish());

        Some(PassReport {
            pass_index,
            update_type,
            animated,
            rebuilt,
            item_count,
            content_size: self.content_size(),
            changes,
        })
    }

    /// Applies transition completions reported since the last pass.
    ///
    /// Returns the number of transitions completed.
    pub fn process_transitions<P: Presenter<V> + ?Sized>(
        &mut self,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> usize {
        self.reconciler.process_completions(presenter, tracer)
    }

    fn mark(&mut self, channel: Channel) {
        self.dirty.mark(ROOT, channel);
        self.requested = true;
    }

    fn drain(&mut self, channel: Channel) -> bool {
        let keys: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        !keys.is_empty()
    }

    fn stamp(&self, fallback: HostTime) -> HostTime {
        self.clock.as_ref().map_or(fallback, |clock| clock())
    }

    fn phase<R>(
        &mut self,
        phase: PhaseKind,
        pass_index: u64,
        now: HostTime,
        tracer: &mut Tracer<'_>,
        summary: &mut PassSummaryBuilder,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let at = self.stamp(now);
        summary.phase_begin(phase, at);
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase,
            timestamp: at,
        });
        let out = body(self);
        let at = self.stamp(now);
        summary.phase_end(phase, at);
        tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase,
            timestamp: at,
        });
        out
    }
}

fn sanitize(length: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        length
    } else {
        0.0
    }
}
