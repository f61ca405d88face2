//! Item-based scrollbar for one tablix axis.
//!
//! Unlike a pixel scrollbar, a tablix scrollbar moves in whole items: the
//! matrix is virtualized, so the natural scroll unit is "one more row" or
//! "one more column", and the view window is described by the index of the
//! first visible item plus the realized window length.
//!
//! # Example
//!
//! ```
//! use horizon_tablix::hierarchy::Axis;
//! use horizon_tablix::widget::Scrollbar;
//!
//! // A vertical scrollbar over 1000 rows, 20 visible
//! let mut scrollbar = Scrollbar::new(Axis::Row)
//!     .with_total(1000)
//!     .with_view_size(20);
//!
//! // Connect to offset changes
//! scrollbar.scrolled.connect(|&view_min| {
//!     println!("First visible item: {}", view_min);
//! });
//!
//! scrollbar.scroll_by(3);
//! ```

use horizon_tablix_core::Signal;

use crate::hierarchy::Axis;

use super::events::WheelEvent;

/// Pixel magnitude of one hardware wheel notch.
///
/// Deltas at or below this map to a single-item scroll, so small wheel
/// nudges always move by exactly one row or column.
pub const WHEEL_UNIT_THRESHOLD: f32 = 120.0;

/// Upper bound on items scrolled by a single wheel event.
const MAX_WHEEL_STEP: usize = 8;

/// The default wheel-delta to scroll-step mapping.
///
/// A delta magnitude at or below [`WHEEL_UNIT_THRESHOLD`] scrolls one item
/// regardless of raw pixel value; larger deltas scroll proportionally more,
/// capped at a page-sized bound. Zero maps to zero (no scroll).
pub fn default_wheel_step(delta_magnitude: f32) -> usize {
    if delta_magnitude <= 0.0 {
        0
    } else if delta_magnitude <= WHEEL_UNIT_THRESHOLD {
        1
    } else {
        ((delta_magnitude / WHEEL_UNIT_THRESHOLD).ceil() as usize).min(MAX_WHEEL_STEP)
    }
}

/// Maps a wheel delta magnitude (pixels) to a number of items to scroll.
pub type WheelStepFn = Box<dyn Fn(f32) -> usize + Send + Sync>;

/// A scrollbar controlling the visible item window of one axis.
///
/// Row and column scrollbars are independent; each gates its own input
/// dispatch on its visibility flag, so one axis can absorb wheel events
/// while the other is hidden.
///
/// # Signals
///
/// - `scrolled(usize)`: Emitted when `view_min` actually changes. A scroll
///   request that clamps to the current position emits nothing.
/// - `view_changed((usize, usize))`: Emitted when the (view_size, total)
///   window geometry changes.
pub struct Scrollbar {
    /// Which axis this scrollbar moves through.
    axis: Axis,

    /// Index of the first visible item.
    view_min: usize,

    /// Number of visible items.
    view_size: usize,

    /// Total number of items in the logical dimension.
    total: usize,

    /// Whether the scrollbar is shown and accepts input.
    visible: bool,

    /// Wheel-delta to step-count mapping.
    wheel_step: WheelStepFn,

    /// Emitted when the scroll offset changes. Argument: the new
    /// `view_min`.
    pub scrolled: Signal<usize>,

    /// Emitted when the view window geometry changes.
    /// Args: (view_size, total).
    pub view_changed: Signal<(usize, usize)>,
}

impl Scrollbar {
    /// Create a new scrollbar for the given axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            view_min: 0,
            view_size: 0,
            total: 0,
            visible: false,
            wheel_step: Box::new(default_wheel_step),
            scrolled: Signal::new(),
            view_changed: Signal::new(),
        }
    }

    /// Set the total item count using builder pattern.
    pub fn with_total(mut self, total: usize) -> Self {
        self.set_total(total);
        self
    }

    /// Set the visible item count using builder pattern.
    pub fn with_view_size(mut self, view_size: usize) -> Self {
        self.set_view_size(view_size);
        self
    }

    /// Set visibility using builder pattern.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// The axis this scrollbar moves through.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Index of the first visible item.
    pub fn view_min(&self) -> usize {
        self.view_min
    }

    /// Number of visible items.
    pub fn view_size(&self) -> usize {
        self.view_size
    }

    /// Total number of items in the logical dimension.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The largest valid `view_min`.
    pub fn max_view_min(&self) -> usize {
        self.total.saturating_sub(self.view_size)
    }

    /// Whether the scrollbar is shown and accepts input.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the scrollbar. A hidden scrollbar ignores input.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Set the total item count, clamping the offset into the new range.
    pub fn set_total(&mut self, total: usize) {
        if self.total != total {
            self.total = total;
            self.view_min = self.view_min.min(self.max_view_min());
            self.view_changed.emit((self.view_size, self.total));
        }
    }

    /// Set the visible item count, clamping the offset into the new range.
    pub fn set_view_size(&mut self, view_size: usize) {
        if self.view_size != view_size {
            self.view_size = view_size;
            self.view_min = self.view_min.min(self.max_view_min());
            self.view_changed.emit((self.view_size, self.total));
        }
    }

    /// Update both window dimensions at once (one `view_changed` emission).
    ///
    /// Called by the control after a rendering session reports the realized
    /// window size.
    pub fn set_view(&mut self, view_size: usize, total: usize) {
        if self.view_size != view_size || self.total != total {
            self.view_size = view_size;
            self.total = total;
            self.view_min = self.view_min.min(self.max_view_min());
            self.view_changed.emit((self.view_size, self.total));
        }
    }

    /// Replace the wheel-delta to step-count mapping.
    ///
    /// The exact proportionality of large deltas is host policy; the
    /// single-item behavior for small deltas is the contract every mapping
    /// should preserve.
    pub fn set_wheel_step_fn<F>(&mut self, f: F)
    where
        F: Fn(f32) -> usize + Send + Sync + 'static,
    {
        self.wheel_step = Box::new(f);
    }

    /// Advance the view by `delta` items, clamped to
    /// `[0, total - view_size]`.
    ///
    /// Returns `true` and emits `scrolled` only when the offset actually
    /// changes; a fully clamped request at either end is a silent no-op.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let new_min = self
            .view_min
            .saturating_add_signed(delta)
            .min(self.max_view_min());
        self.scroll_to(new_min)
    }

    /// Scroll so that `view_min` becomes `offset` (clamped).
    ///
    /// Same change-gating as [`scroll_by`](Self::scroll_by).
    pub fn scroll_to(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.max_view_min());
        if self.view_min == clamped {
            return false;
        }
        self.view_min = clamped;
        tracing::trace!(
            target: "horizon_tablix::scroll",
            axis = ?self.axis,
            view_min = clamped,
            "scrolled"
        );
        self.scrolled.emit(clamped);
        true
    }

    /// Handle a wheel event: quantize the delta into an item step and
    /// scroll.
    ///
    /// A hidden scrollbar ignores the event. The delta along this
    /// scrollbar's natural direction is preferred; a pure-horizontal wheel
    /// still drives a row scrollbar (and vice versa) so that whichever bar
    /// receives the event can consume it.
    ///
    /// Returns `true` if the event produced an actual offset change.
    pub fn on_mouse_wheel(&mut self, event: &WheelEvent) -> bool {
        if !self.visible {
            return false;
        }

        let (primary, secondary) = match self.axis {
            Axis::Row => (event.pixel_delta_y(), event.pixel_delta_x()),
            Axis::Column => (event.pixel_delta_x(), event.pixel_delta_y()),
        };
        let delta = if primary != 0.0 { primary } else { secondary };
        if delta == 0.0 {
            return false;
        }

        let steps = (self.wheel_step)(delta.abs());
        if steps == 0 {
            return false;
        }

        // Negative delta (toward the user / leftwards) advances the view.
        let signed = if delta < 0.0 {
            steps as isize
        } else {
            -(steps as isize)
        };
        self.scroll_by(signed)
    }
}

static_assertions::assert_impl_all!(Scrollbar: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scrollbar(total: usize, view_size: usize) -> Scrollbar {
        Scrollbar::new(Axis::Row)
            .with_total(total)
            .with_view_size(view_size)
            .with_visible(true)
    }

    #[test]
    fn test_scroll_by_clamps() {
        let mut bar = scrollbar(10, 4);
        assert!(bar.scroll_by(100));
        assert_eq!(bar.view_min(), 6);

        assert!(bar.scroll_by(-100));
        assert_eq!(bar.view_min(), 0);
    }

    #[test]
    fn test_wheel_small_delta_scrolls_one_item() {
        let mut bar = scrollbar(100, 10);
        let scrolls = Arc::new(AtomicUsize::new(0));
        let offsets = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let s = scrolls.clone();
        let o = offsets.clone();
        bar.scrolled.connect(move |&view_min| {
            s.fetch_add(1, Ordering::SeqCst);
            o.lock().push(view_min);
        });

        // A small wheel nudge moves by exactly one row
        assert!(bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, -10.0)));
        assert_eq!(scrolls.load(Ordering::SeqCst), 1);
        assert_eq!(*offsets.lock(), vec![1]);
    }

    #[test]
    fn test_wheel_large_delta_is_bounded() {
        let mut bar = scrollbar(1000, 10);
        assert!(bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, -100_000.0)));
        // Bounded step, not a jump to the end
        assert!(bar.view_min() <= 8);
        assert!(bar.view_min() > 1);
    }

    #[test]
    fn test_no_callback_when_clamped_at_end() {
        let mut bar = scrollbar(20, 5);
        bar.scroll_to(bar.max_view_min());
        assert_eq!(bar.view_min(), 15);

        let scrolls = Arc::new(AtomicUsize::new(0));
        let s = scrolls.clone();
        bar.scrolled.connect(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        // Already at the terminal position: a large downward wheel must not
        // invoke any scroll callback.
        assert!(!bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, -500.0)));
        assert_eq!(scrolls.load(Ordering::SeqCst), 0);
        assert_eq!(bar.view_min(), 15);
    }

    #[test]
    fn test_hidden_scrollbar_ignores_input() {
        let mut bar = scrollbar(100, 10);
        bar.set_visible(false);
        assert!(!bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, -10.0)));
        assert_eq!(bar.view_min(), 0);
    }

    #[test]
    fn test_positive_delta_scrolls_backward() {
        let mut bar = scrollbar(100, 10);
        bar.scroll_to(5);
        assert!(bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, 10.0)));
        assert_eq!(bar.view_min(), 4);
    }

    #[test]
    fn test_default_wheel_step_mapping() {
        assert_eq!(default_wheel_step(0.0), 0);
        assert_eq!(default_wheel_step(10.0), 1);
        assert_eq!(default_wheel_step(WHEEL_UNIT_THRESHOLD), 1);
        assert_eq!(default_wheel_step(240.0), 2);
        assert_eq!(default_wheel_step(1e9), 8);
    }

    #[test]
    fn test_set_view_clamps_offset() {
        let mut bar = scrollbar(100, 10);
        bar.scroll_to(90);
        assert_eq!(bar.view_min(), 90);

        // Shrinking the dimension pulls the offset back into range
        bar.set_view(10, 50);
        assert_eq!(bar.view_min(), 40);
    }

    #[test]
    fn test_custom_wheel_step_fn() {
        let mut bar = scrollbar(100, 10);
        bar.set_wheel_step_fn(|_| 5);
        bar.on_mouse_wheel(&WheelEvent::from_pixels(0.0, -1.0));
        assert_eq!(bar.view_min(), 5);
    }
}
