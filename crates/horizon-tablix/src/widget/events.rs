//! Input and layout events consumed by the tablix control.
//!
//! The host page owns the real input sources; it translates whatever its
//! platform delivers into these events and feeds them to
//! [`TablixControl::handle_event`](crate::widget::TablixControl::handle_event).
//! Wheel deltas arrive in two conventions in the wild — per-pixel and
//! per-line — and are normalized to a single signed pixel convention before
//! any scroll decision is made.

use super::geometry::{Point, Size};

/// Common data for all events.
#[derive(Debug, Clone, Copy)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl Default for EventBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, allowing further propagation.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// How a wheel event's deltas are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDeltaUnit {
    /// Deltas are logical pixels (trackpads, high-resolution wheels).
    Pixel,
    /// Deltas are text lines (classic wheel notches; one notch is
    /// typically three lines).
    Line,
}

/// Pixels per line for normalizing line-delta wheel events.
///
/// Three lines per hardware notch at 40px each lands one notch on the same
/// 120px magnitude that pixel-delta platforms report.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Mouse wheel (scroll) event.
///
/// Positive `delta_y` means away from the user (scrolling up); positive
/// `delta_x` means right.
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    /// Base event data.
    pub base: EventBase,
    /// Position in container-local coordinates.
    pub local_pos: Point,
    /// Horizontal scroll delta, in `unit`s.
    pub delta_x: f32,
    /// Vertical scroll delta, in `unit`s.
    pub delta_y: f32,
    /// How the deltas are expressed.
    pub unit: WheelDeltaUnit,
}

impl WheelEvent {
    /// Create a new wheel event.
    pub fn new(local_pos: Point, delta_x: f32, delta_y: f32, unit: WheelDeltaUnit) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            delta_x,
            delta_y,
            unit,
        }
    }

    /// Create a pixel-delta wheel event at the origin. The common case in
    /// tests and synthetic dispatch.
    pub fn from_pixels(delta_x: f32, delta_y: f32) -> Self {
        Self::new(Point::ZERO, delta_x, delta_y, WheelDeltaUnit::Pixel)
    }

    /// The vertical delta normalized to pixels.
    pub fn pixel_delta_y(&self) -> f32 {
        match self.unit {
            WheelDeltaUnit::Pixel => self.delta_y,
            WheelDeltaUnit::Line => self.delta_y * PIXELS_PER_LINE,
        }
    }

    /// The horizontal delta normalized to pixels.
    pub fn pixel_delta_x(&self) -> f32 {
        match self.unit {
            WheelDeltaUnit::Pixel => self.delta_x,
            WheelDeltaUnit::Line => self.delta_x * PIXELS_PER_LINE,
        }
    }
}

/// Touch pan event: an accumulated drag delta in pixels.
///
/// The host's gesture recognizer owns the physics (velocity, inertia); the
/// engine only translates the delta into a scroll offset.
#[derive(Debug, Clone, Copy)]
pub struct PanEvent {
    /// Base event data.
    pub base: EventBase,
    /// Horizontal pan delta in pixels (positive = content dragged right).
    pub delta_x: f32,
    /// Vertical pan delta in pixels (positive = content dragged down).
    pub delta_y: f32,
}

impl PanEvent {
    /// Create a new pan event.
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            base: EventBase::new(),
            delta_x,
            delta_y,
        }
    }
}

/// Resize event, sent when the host container's size changes.
#[derive(Debug, Clone, Copy)]
pub struct ResizeEvent {
    /// Base event data.
    pub base: EventBase,
    /// The old size of the container.
    pub old_size: Size,
    /// The new size of the container.
    pub new_size: Size,
}

impl ResizeEvent {
    /// Create a new resize event.
    pub fn new(old_size: Size, new_size: Size) -> Self {
        Self {
            base: EventBase::new(),
            old_size,
            new_size,
        }
    }
}

/// An event routed to the tablix control.
#[derive(Debug)]
pub enum TablixEvent {
    /// Mouse wheel event.
    Wheel(WheelEvent),
    /// Touch pan event.
    Pan(PanEvent),
    /// Container resize event.
    Resize(ResizeEvent),
}

impl TablixEvent {
    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::Wheel(e) => e.base.is_accepted(),
            Self::Pan(e) => e.base.is_accepted(),
            Self::Resize(e) => e.base.is_accepted(),
        }
    }

    /// Accept the event.
    pub fn accept(&mut self) {
        match self {
            Self::Wheel(e) => e.base.accept(),
            Self::Pan(e) => e.base.accept(),
            Self::Resize(e) => e.base.accept(),
        }
    }

    /// Ignore the event.
    pub fn ignore(&mut self) {
        match self {
            Self::Wheel(e) => e.base.ignore(),
            Self::Pan(e) => e.base.ignore(),
            Self::Resize(e) => e.base.ignore(),
        }
    }
}
