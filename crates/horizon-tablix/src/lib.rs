//! Horizon Tablix: a virtualized tabular grid engine.
//!
//! The engine renders a potentially huge two-dimensional,
//! hierarchically-grouped dataset into a scrollable viewport without
//! materializing the full matrix. Rendering is decomposed into bounded
//! iterations gated by a caller-supplied stop predicate, so large datasets
//! never block the host UI thread in one unbroken pass.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   wheel/pan/resize   ┌──────────────┐
//! │  TablixControl   │<─────────────────────│     Host     │
//! └────────┬─────────┘                      └──────────────┘
//!          │ drives sessions
//! ┌────────▼─────────┐  realizes through  ┌───────────────────┐
//! │    TablixGrid    │───────────────────>│HierarchyNavigator │
//! │ (rows x columns) │                    │   TablixBinder    │
//! └────────┬─────────┘                    └───────────────────┘
//!          │ reports realized geometry
//! ┌────────▼─────────┐                    ┌───────────────────┐
//! │    Scrollbars    │                    │ColumnWidthManager │──> external
//! └──────────────────┘                    └───────────────────┘    settings
//! ```
//!
//! The navigator and binder are external collaborators: the engine decides
//! *which* cells exist on screen, never *what* data they show.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use horizon_tablix::prelude::*;
//!
//! // Two-level column hierarchy, flat rows
//! let mut rows = GroupTree::new();
//! rows.add_root("North");
//! rows.add_root("South");
//! let mut columns = GroupTree::new();
//! let year = columns.add_root("2019");
//! columns.add_child(year, "Q1").unwrap();
//! columns.add_child(year, "Q2").unwrap();
//!
//! let navigator = Arc::new(MatrixNavigator::new(rows, columns));
//! let binder = Arc::new(TextBinder::positional(navigator.clone()));
//!
//! let mut control =
//!     TablixControl::new(navigator, binder, TablixOptions::default()).unwrap();
//! control.set_viewport(Size::new(640.0, 480.0));
//! control.refresh(true);
//!
//! assert_eq!(control.grid().realized_column_count(), 2);
//! ```

pub mod binder;
pub mod error;
pub mod grid;
pub mod hierarchy;
pub mod prelude;
pub mod widget;

pub use error::{HierarchyError, Result, TablixError};
