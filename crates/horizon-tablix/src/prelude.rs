//! Convenient re-exports for typical tablix hosts.
//!
//! ```
//! use horizon_tablix::prelude::*;
//! ```

pub use crate::binder::{TablixBinder, TextBinder};
pub use crate::error::{HierarchyError, TablixError};
pub use crate::grid::{
    CellKind, CellPresenter, ColumnIdentity, ColumnWidthEntry, ColumnWidthManager, SessionState,
    TablixColumn, TablixGrid, TablixRow,
};
pub use crate::hierarchy::{
    Axis, GroupTree, HierarchyNavigator, ItemHandle, ItemKind, MatrixNavigator,
};
pub use crate::widget::{
    Point, Rect, Scrollbar, Size, TablixControl, TablixEvent, TablixLayoutKind, TablixOptions,
    WheelDeltaUnit, WheelEvent,
};

pub use horizon_tablix_core::{ConnectionId, Signal};
