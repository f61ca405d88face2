//! Item handles for addressing cells within grouping hierarchies.
//!
//! The `ItemHandle` type is the fundamental way a navigator identifies a
//! row header, column header, body cell, or corner cell. A handle carries
//! position, level, and navigator-internal IDs so that identity is
//! **structural**: two handles fetched in different rendering sessions for
//! the same logical item compare equal even though they are distinct values.

use std::hash::{Hash, Hasher};

/// The axis a hierarchy item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The row grouping hierarchy.
    Row,
    /// The column grouping hierarchy.
    Column,
}

/// What kind of cell an item handle addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A header item in the row hierarchy.
    RowHeader,
    /// A header item in the column hierarchy.
    ColumnHeader,
    /// A body cell at the intersection of a row leaf and a column leaf.
    BodyCell,
    /// A corner cell at the intersection of a row level and a column level.
    Corner,
}

/// Identifies one logical item within a tablix hierarchy.
///
/// Handles are cheap to clone and should be treated as ephemeral: fetch
/// them from the navigator when needed rather than caching across data
/// updates. Identity is structural, never by reference — the same logical
/// item re-fetched in a later session yields an equal handle.
///
/// # Validity
///
/// [`ItemHandle::invalid`] represents absent items (no parent, failed
/// lookup). Accessors on an invalid handle return defensive defaults
/// rather than panicking.
#[derive(Clone)]
pub struct ItemHandle {
    /// What the handle addresses.
    kind: ItemKind,
    /// Position within the parent (headers), row-leaf index (body cells),
    /// or row level (corners).
    index: usize,
    /// Column-leaf index (body cells) or column level (corners); unused
    /// for headers.
    peer_index: usize,
    /// Depth within the hierarchy for headers; 0 otherwise.
    level: usize,
    /// Navigator-internal ID of the item's (row-side) node; 0 = none.
    node_id: u64,
    /// Navigator-internal ID of the column-side node for body cells;
    /// 0 = none.
    peer_id: u64,
    /// Whether this handle addresses a real item.
    valid: bool,
}

impl Default for ItemHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ItemHandle {
    /// Creates an invalid (null) item handle.
    ///
    /// Used to represent the root of a hierarchy (as a parent reference)
    /// and failed lookups.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            kind: ItemKind::RowHeader,
            index: 0,
            peer_index: 0,
            level: 0,
            node_id: 0,
            peer_id: 0,
            valid: false,
        }
    }

    /// Creates a header item handle.
    ///
    /// `index` is the item's position within its parent, `level` its depth
    /// in the hierarchy (roots are level 0), and `node_id` the navigator's
    /// internal identifier for the node.
    #[inline]
    pub fn header(axis: Axis, index: usize, level: usize, node_id: u64) -> Self {
        Self {
            kind: match axis {
                Axis::Row => ItemKind::RowHeader,
                Axis::Column => ItemKind::ColumnHeader,
            },
            index,
            peer_index: 0,
            level,
            node_id,
            peer_id: 0,
            valid: true,
        }
    }

    /// Creates a body-cell item handle for the intersection of a row leaf
    /// and a column leaf.
    #[inline]
    pub fn body_cell(
        row_index: usize,
        column_index: usize,
        row_node_id: u64,
        column_node_id: u64,
    ) -> Self {
        Self {
            kind: ItemKind::BodyCell,
            index: row_index,
            peer_index: column_index,
            level: 0,
            node_id: row_node_id,
            peer_id: column_node_id,
            valid: true,
        }
    }

    /// Creates a corner item handle for a (row level, column level) pair.
    #[inline]
    pub fn corner(row_level: usize, column_level: usize) -> Self {
        Self {
            kind: ItemKind::Corner,
            index: row_level,
            peer_index: column_level,
            level: 0,
            node_id: 0,
            peer_id: 0,
            valid: true,
        }
    }

    /// Returns `true` if this handle addresses a real item.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// What kind of cell the handle addresses.
    #[inline]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The axis a header item belongs to, or `None` for body/corner cells
    /// and invalid handles.
    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        if !self.valid {
            return None;
        }
        match self.kind {
            ItemKind::RowHeader => Some(Axis::Row),
            ItemKind::ColumnHeader => Some(Axis::Column),
            _ => None,
        }
    }

    /// Position within the parent (headers), row-leaf index (body cells),
    /// or row level (corners). Returns 0 for invalid handles.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Column-leaf index (body cells) or column level (corners).
    /// Returns 0 for headers and invalid handles.
    #[inline]
    pub fn peer_index(&self) -> usize {
        self.peer_index
    }

    /// Depth within the hierarchy for headers. Returns 0 otherwise.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Navigator-internal ID of the item's node (0 = none).
    #[inline]
    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Navigator-internal ID of the column-side node for body cells
    /// (0 = none).
    #[inline]
    pub fn peer_id(&self) -> u64 {
        self.peer_id
    }
}

impl std::fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ItemHandle")
                .field("kind", &self.kind)
                .field("index", &self.index)
                .field("peer_index", &self.peer_index)
                .field("level", &self.level)
                .field("node_id", &self.node_id)
                .finish()
        } else {
            write!(f, "ItemHandle(invalid)")
        }
    }
}

impl PartialEq for ItemHandle {
    fn eq(&self, other: &Self) -> bool {
        // Two invalid handles are equal
        if !self.valid && !other.valid {
            return true;
        }
        if self.valid != other.valid {
            return false;
        }
        self.kind == other.kind
            && self.index == other.index
            && self.peer_index == other.peer_index
            && self.level == other.level
            && self.node_id == other.node_id
            && self.peer_id == other.peer_id
    }
}

impl Eq for ItemHandle {}

impl Hash for ItemHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.kind.hash(state);
            self.index.hash(state);
            self.peer_index.hash(state);
            self.node_id.hash(state);
            self.peer_id.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle() {
        let handle = ItemHandle::invalid();
        assert!(!handle.is_valid());
        assert_eq!(handle.index(), 0);
        assert_eq!(handle.level(), 0);
        assert!(handle.axis().is_none());
    }

    #[test]
    fn test_header_handle() {
        let handle = ItemHandle::header(Axis::Column, 3, 1, 42);
        assert!(handle.is_valid());
        assert_eq!(handle.kind(), ItemKind::ColumnHeader);
        assert_eq!(handle.axis(), Some(Axis::Column));
        assert_eq!(handle.index(), 3);
        assert_eq!(handle.level(), 1);
        assert_eq!(handle.node_id(), 42);
    }

    #[test]
    fn test_body_cell_handle() {
        let cell = ItemHandle::body_cell(2, 5, 10, 20);
        assert_eq!(cell.kind(), ItemKind::BodyCell);
        assert_eq!(cell.index(), 2);
        assert_eq!(cell.peer_index(), 5);
        assert_eq!(cell.node_id(), 10);
        assert_eq!(cell.peer_id(), 20);
        assert!(cell.axis().is_none());
    }

    #[test]
    fn test_structural_equality() {
        // Two invalid handles are equal
        assert_eq!(ItemHandle::invalid(), ItemHandle::invalid());

        // Separately constructed handles for the same logical item compare
        // equal — identity is structural, not by reference.
        let a = ItemHandle::header(Axis::Row, 1, 0, 7);
        let b = ItemHandle::header(Axis::Row, 1, 0, 7);
        assert_eq!(a, b);

        // Different axis, same position: not equal
        let c = ItemHandle::header(Axis::Column, 1, 0, 7);
        assert_ne!(a, c);

        // Valid never equals invalid
        assert_ne!(a, ItemHandle::invalid());
    }

    #[test]
    fn test_corner_handle() {
        let corner = ItemHandle::corner(1, 2);
        assert_eq!(corner.kind(), ItemKind::Corner);
        assert_eq!(corner.index(), 1);
        assert_eq!(corner.peer_index(), 2);
        assert_eq!(corner, ItemHandle::corner(1, 2));
        assert_ne!(corner, ItemHandle::corner(2, 1));
    }
}
