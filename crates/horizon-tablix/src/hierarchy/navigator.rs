//! The hierarchy navigator contract.
//!
//! A navigator is a read-only traversal interface over the row and column
//! grouping trees of a tablix. The engine realizes only the visible window
//! of a potentially huge matrix, so every structural question — depth, leaf
//! counts, parent/child edges, intersections — is answered on demand
//! through this trait rather than from a materialized grid.
//!
//! Navigators hold no engine state of their own and are never mutated by
//! the engine.

use super::item::{Axis, ItemHandle, ItemKind};

/// Read-only traversal over a pair of row/column grouping hierarchies.
///
/// # Implementation Requirements
///
/// At minimum, implement the structural queries:
/// - [`depth`](HierarchyNavigator::depth) / [`leaf_count`](HierarchyNavigator::leaf_count)
/// - [`leaf_at`](HierarchyNavigator::leaf_at) - Leaf header item by index
/// - [`parent_of`](HierarchyNavigator::parent_of) / [`child_count`](HierarchyNavigator::child_count) / [`child_at`](HierarchyNavigator::child_at)
/// - [`intersection`](HierarchyNavigator::intersection) - Body-cell item for a (row, column) leaf pair
/// - [`corner`](HierarchyNavigator::corner) - Corner item for a (row level, column level) pair
///
/// Lookups that cannot be answered return [`ItemHandle::invalid`] rather
/// than an error; the engine treats absence as a normal state.
///
/// # Identity
///
/// The equality predicates compare handles structurally, because the same
/// logical item may be re-fetched across rendering sessions as a fresh
/// handle value. Reference identity is never meaningful.
pub trait HierarchyNavigator: Send + Sync {
    /// Number of header levels in the given hierarchy.
    fn depth(&self, axis: Axis) -> usize;

    /// Number of leaf items in the given hierarchy.
    ///
    /// This is the logical dimension length: the count of realizable rows
    /// or columns, independent of what is currently realized.
    fn leaf_count(&self, axis: Axis) -> usize;

    /// The leaf header item at `index`, in hierarchy traversal order.
    ///
    /// Returns an invalid handle if `index` is out of bounds.
    fn leaf_at(&self, axis: Axis, index: usize) -> ItemHandle;

    /// Number of top-level items in the given hierarchy.
    fn root_count(&self, axis: Axis) -> usize;

    /// The top-level item at `index`.
    ///
    /// Returns an invalid handle if `index` is out of bounds.
    fn root_at(&self, axis: Axis, index: usize) -> ItemHandle;

    /// The parent of a header item, or an invalid handle for top-level
    /// items, non-header items, and invalid handles.
    fn parent_of(&self, item: &ItemHandle) -> ItemHandle;

    /// Number of children of a header item. Returns 0 for leaves,
    /// non-header items, and invalid handles.
    fn child_count(&self, item: &ItemHandle) -> usize;

    /// The child of a header item at `index`, or an invalid handle when out
    /// of bounds.
    fn child_at(&self, item: &ItemHandle, index: usize) -> ItemHandle;

    /// The hierarchy level of a header item (roots are level 0).
    /// Returns 0 for non-header items and invalid handles.
    fn level_of(&self, item: &ItemHandle) -> usize;

    /// The body-cell item at the intersection of a row leaf and a column
    /// leaf. Returns an invalid handle unless both inputs are leaf headers
    /// of their respective hierarchies.
    fn intersection(&self, row_item: &ItemHandle, column_item: &ItemHandle) -> ItemHandle;

    /// The corner item for a (row level, column level) pair, or an invalid
    /// handle when either level is out of range.
    fn corner(&self, row_level: usize, column_level: usize) -> ItemHandle;

    // -------------------------------------------------------------------------
    // Provided equality predicates
    // -------------------------------------------------------------------------

    /// Whether two handles address the same header item.
    fn headers_equal(&self, a: &ItemHandle, b: &ItemHandle) -> bool {
        matches!(a.kind(), ItemKind::RowHeader | ItemKind::ColumnHeader)
            && a.is_valid()
            && a == b
    }

    /// Whether two handles address the same body cell.
    fn cells_equal(&self, a: &ItemHandle, b: &ItemHandle) -> bool {
        a.kind() == ItemKind::BodyCell && a.is_valid() && a == b
    }

    /// Whether two handles address the same corner cell.
    fn corners_equal(&self, a: &ItemHandle, b: &ItemHandle) -> bool {
        a.kind() == ItemKind::Corner && a.is_valid() && a == b
    }
}
