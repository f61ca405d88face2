//! Cell presenters: the visual-agnostic placeholder for one rendered cell.
//!
//! A presenter carries the geometry of a realized cell and the slot the
//! binder fills with content. The engine places presenters; what they look
//! like is entirely the host's concern.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::hierarchy::ItemHandle;
use crate::widget::Rect;

/// What class of cell a presenter stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// A row header cell.
    RowHeader,
    /// A column header cell.
    ColumnHeader,
    /// A body cell.
    BodyCell,
    /// A corner cell (row levels x column levels).
    CornerCell,
    /// Empty space to the side of the last column header.
    EmptySpaceHeader,
    /// Empty space below the last row / the footer band.
    EmptySpaceFooter,
}

/// Geometry and binding slot for one realized cell.
///
/// Presenters are shared as `Arc<CellPresenter>` between the grid's
/// realized collections and the host; interior mutability keeps the shared
/// handles usable while layout adjusts bounds.
///
/// The bound flag tracks the binder pairing invariant: exactly one `bind_*`
/// call precedes each `unbind_*` call for a given presenter instance.
pub struct CellPresenter {
    kind: CellKind,
    item: ItemHandle,
    bounds: Mutex<Rect>,
    content: Mutex<Option<String>>,
    bound: AtomicBool,
}

impl CellPresenter {
    /// Creates an unbound presenter for the given item.
    ///
    /// Empty-space presenters carry an invalid item handle.
    pub fn new(kind: CellKind, item: ItemHandle) -> Self {
        Self {
            kind,
            item,
            bounds: Mutex::new(Rect::ZERO),
            content: Mutex::new(None),
            bound: AtomicBool::new(false),
        }
    }

    /// The cell class this presenter stands in for.
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// The hierarchy item this presenter displays.
    pub fn item(&self) -> &ItemHandle {
        &self.item
    }

    /// Current placement of the cell.
    pub fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    /// Places the cell.
    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
    }

    /// Content the binder has filled in, if any.
    pub fn content(&self) -> Option<String> {
        self.content.lock().clone()
    }

    /// Fills the binding slot. Called by binders during `bind_*`.
    pub fn set_content(&self, content: impl Into<String>) {
        *self.content.lock() = Some(content.into());
    }

    /// Whether a `bind_*` call is currently outstanding.
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// Marks the presenter bound. Returns `false` if it was already bound
    /// (a pairing violation the grid treats as a no-op).
    pub(crate) fn mark_bound(&self) -> bool {
        !self.bound.swap(true, Ordering::SeqCst)
    }

    /// Marks the presenter unbound and clears the binding slot. Returns
    /// `false` if it was not bound.
    pub(crate) fn mark_unbound(&self) -> bool {
        let was_bound = self.bound.swap(false, Ordering::SeqCst);
        if was_bound {
            *self.content.lock() = None;
        }
        was_bound
    }
}

impl std::fmt::Debug for CellPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellPresenter")
            .field("kind", &self.kind)
            .field("item", &self.item)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Releases a presenter through the matching `unbind_*` binder call.
///
/// A presenter that was never bound is left untouched, preserving the
/// one-bind-per-unbind pairing.
pub(crate) fn release_presenter(binder: &dyn crate::binder::TablixBinder, cell: &CellPresenter) {
    if !cell.is_bound() {
        return;
    }
    match cell.kind() {
        CellKind::RowHeader => binder.unbind_row_header(cell.item(), cell),
        CellKind::ColumnHeader => binder.unbind_column_header(cell.item(), cell),
        CellKind::BodyCell => binder.unbind_body_cell(cell.item(), cell),
        CellKind::CornerCell => binder.unbind_corner_cell(cell.item(), cell),
        CellKind::EmptySpaceHeader => binder.unbind_empty_space_header_cell(cell),
        CellKind::EmptySpaceFooter => binder.unbind_empty_space_footer_cell(cell),
    }
    cell.mark_unbound();
}

static_assertions::assert_impl_all!(CellPresenter: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Axis;

    #[test]
    fn test_presenter_starts_unbound() {
        let presenter = CellPresenter::new(CellKind::BodyCell, ItemHandle::invalid());
        assert!(!presenter.is_bound());
        assert!(presenter.content().is_none());
        assert_eq!(presenter.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_bind_unbind_pairing() {
        let presenter = CellPresenter::new(
            CellKind::ColumnHeader,
            ItemHandle::header(Axis::Column, 0, 0, 1),
        );
        assert!(presenter.mark_bound());
        // Double-bind is rejected
        assert!(!presenter.mark_bound());
        assert!(presenter.mark_unbound());
        // Double-unbind is rejected
        assert!(!presenter.mark_unbound());
    }

    #[test]
    fn test_unbind_clears_content() {
        let presenter = CellPresenter::new(CellKind::BodyCell, ItemHandle::body_cell(0, 0, 1, 2));
        presenter.mark_bound();
        presenter.set_content("42");
        assert_eq!(presenter.content().as_deref(), Some("42"));
        presenter.mark_unbound();
        assert!(presenter.content().is_none());
    }
}
