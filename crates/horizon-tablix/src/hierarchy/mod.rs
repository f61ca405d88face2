//! Hierarchy navigation for the tablix engine.
//!
//! A tablix renders a two-dimensional matrix whose rows and columns are the
//! leaves of two grouping trees. This module provides:
//!
//! - `ItemHandle`: structural-identity handles for header, body, and corner
//!   items
//! - `HierarchyNavigator`: the read-only traversal contract the engine
//!   consumes
//! - `GroupTree` / `MatrixNavigator`: a concrete grouping-tree navigator
//!
//! The engine never mutates hierarchy state; navigators are pure query
//! objects shared behind `Arc<dyn HierarchyNavigator>`.

mod item;
mod matrix;
mod navigator;

pub use item::{Axis, ItemHandle, ItemKind};
pub use matrix::{GroupTree, MatrixNavigator};
pub use navigator::HierarchyNavigator;
