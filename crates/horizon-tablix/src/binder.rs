//! The binder contract: turning hierarchy items into cell content.
//!
//! The engine realizes cells and places presenters; the binder — an
//! externally supplied collaborator — decides what each cell actually
//! shows. The grid calls `bind_*` exactly once when a cell presenter is
//! realized and `unbind_*` exactly once when it is released; one bind
//! always precedes each unbind for a given presenter instance.

use std::sync::Arc;

use crate::grid::CellPresenter;
use crate::hierarchy::{HierarchyNavigator, ItemHandle, MatrixNavigator};

/// Translates hierarchy items into bound cell content.
///
/// Implementations are shared behind `Arc<dyn TablixBinder>` and must not
/// assume exclusive access. All methods take `&self`; binders that carry
/// state use interior mutability.
pub trait TablixBinder: Send + Sync {
    /// Called when a rendering session begins, before any `bind_*` call of
    /// that session.
    fn on_start_rendering_session(&self) {}

    /// Called when a rendering session ends.
    fn on_end_rendering_session(&self) {}

    /// Binds a realized row header cell.
    fn bind_row_header(&self, item: &ItemHandle, cell: &CellPresenter);

    /// Releases a row header cell.
    fn unbind_row_header(&self, _item: &ItemHandle, _cell: &CellPresenter) {}

    /// Binds a realized column header cell.
    fn bind_column_header(&self, item: &ItemHandle, cell: &CellPresenter);

    /// Releases a column header cell.
    fn unbind_column_header(&self, _item: &ItemHandle, _cell: &CellPresenter) {}

    /// Binds a realized body cell.
    fn bind_body_cell(&self, item: &ItemHandle, cell: &CellPresenter);

    /// Releases a body cell.
    fn unbind_body_cell(&self, _item: &ItemHandle, _cell: &CellPresenter) {}

    /// Binds a corner cell (row header area x column header area).
    fn bind_corner_cell(&self, item: &ItemHandle, cell: &CellPresenter);

    /// Releases a corner cell.
    fn unbind_corner_cell(&self, _item: &ItemHandle, _cell: &CellPresenter) {}

    /// Binds the empty-space cell beside the last column header.
    fn bind_empty_space_header_cell(&self, _cell: &CellPresenter) {}

    /// Releases the empty-space header cell.
    fn unbind_empty_space_header_cell(&self, _cell: &CellPresenter) {}

    /// Binds an empty-space / footer band cell.
    fn bind_empty_space_footer_cell(&self, _cell: &CellPresenter) {}

    /// Releases an empty-space footer cell.
    fn unbind_empty_space_footer_cell(&self, _cell: &CellPresenter) {}

    /// The label for a header item.
    ///
    /// Doubles as the stable column identity for width persistence, so
    /// binders should return a name that survives sibling reordering
    /// (a qualified path, not a bare caption, when groups can repeat).
    fn header_label(&self, item: &ItemHandle) -> String;

    /// The content for a body cell item.
    fn cell_content(&self, item: &ItemHandle) -> String;

    /// Whether the row hierarchy has any groups (drives row header and
    /// corner realization).
    fn has_row_groups(&self) -> bool;
}

/// A plain-text binder over a [`MatrixNavigator`].
///
/// Fills header cells with the navigator's labels and body cells through a
/// caller-supplied content function. The default binder for hosts that
/// render text-only grids, and the reference implementation of the binding
/// contract.
pub struct TextBinder {
    navigator: Arc<MatrixNavigator>,
    content: Box<dyn Fn(&ItemHandle) -> String + Send + Sync>,
}

impl TextBinder {
    /// Creates a binder whose body cells show `content(item)`.
    pub fn new<F>(navigator: Arc<MatrixNavigator>, content: F) -> Self
    where
        F: Fn(&ItemHandle) -> String + Send + Sync + 'static,
    {
        Self {
            navigator,
            content: Box::new(content),
        }
    }

    /// Creates a binder whose body cells show `"row,column"` leaf
    /// positions. Useful for demos and tests.
    pub fn positional(navigator: Arc<MatrixNavigator>) -> Self {
        Self::new(navigator, |item| {
            format!("{},{}", item.index(), item.peer_index())
        })
    }
}

impl TablixBinder for TextBinder {
    fn bind_row_header(&self, item: &ItemHandle, cell: &CellPresenter) {
        cell.set_content(self.header_label(item));
    }

    fn bind_column_header(&self, item: &ItemHandle, cell: &CellPresenter) {
        cell.set_content(self.header_label(item));
    }

    fn bind_body_cell(&self, item: &ItemHandle, cell: &CellPresenter) {
        cell.set_content(self.cell_content(item));
    }

    fn bind_corner_cell(&self, _item: &ItemHandle, cell: &CellPresenter) {
        cell.set_content(String::new());
    }

    fn header_label(&self, item: &ItemHandle) -> String {
        self.navigator.header_path(item).unwrap_or_default()
    }

    fn cell_content(&self, item: &ItemHandle) -> String {
        (self.content)(item)
    }

    fn has_row_groups(&self) -> bool {
        self.navigator.leaf_count(crate::hierarchy::Axis::Row) > 0
            && self.navigator.depth(crate::hierarchy::Axis::Row) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellKind;
    use crate::hierarchy::{Axis, GroupTree, HierarchyNavigator};

    fn navigator() -> Arc<MatrixNavigator> {
        let mut rows = GroupTree::new();
        rows.add_root("North");
        rows.add_root("South");
        let mut columns = GroupTree::new();
        let y = columns.add_root("2019");
        columns.add_child(y, "Q1").unwrap();
        columns.add_child(y, "Q2").unwrap();
        Arc::new(MatrixNavigator::new(rows, columns))
    }

    #[test]
    fn test_text_binder_header_label_is_path() {
        let nav = navigator();
        let binder = TextBinder::positional(nav.clone());
        let q2 = nav.leaf_at(Axis::Column, 1);
        assert_eq!(binder.header_label(&q2), "2019/Q2");
    }

    #[test]
    fn test_text_binder_fills_presenters() {
        let nav = navigator();
        let binder = TextBinder::positional(nav.clone());

        let row = nav.leaf_at(Axis::Row, 1);
        let col = nav.leaf_at(Axis::Column, 0);
        let cell_item = nav.intersection(&row, &col);

        let header = CellPresenter::new(CellKind::RowHeader, row.clone());
        binder.bind_row_header(&row, &header);
        assert_eq!(header.content().as_deref(), Some("South"));

        let body = CellPresenter::new(CellKind::BodyCell, cell_item.clone());
        binder.bind_body_cell(&cell_item, &body);
        assert_eq!(body.content().as_deref(), Some("1,0"));
    }
}
