//! The control surface: geometry, events, scrollbars, and the top-level
//! tablix control.
//!
//! The host page owns real input sources and pixels; this module owns the
//! translation from input events to scroll/resize actions and the
//! orchestration of rendering sessions.

mod control;
mod events;
mod geometry;
mod scroll_bar;

pub use control::{
    CONTAINER_CLASS, ContainerStyle, DEFAULT_FONT_SIZE, IterationStats, StopPredicate,
    TablixControl, TablixLayoutKind, TablixOptions,
};
pub use events::{
    EventBase, PIXELS_PER_LINE, PanEvent, ResizeEvent, TablixEvent, WheelDeltaUnit, WheelEvent,
};
pub use geometry::{Point, Rect, Size};
pub use scroll_bar::{Scrollbar, WHEEL_UNIT_THRESHOLD, WheelStepFn, default_wheel_step};
