//! The tablix grid: realized collections and the rendering-session state
//! machine.
//!
//! A grid owns the two dimension layout managers plus the corner cells and
//! at most one footer row, and coordinates a rendering session across both
//! axes. Realized collections exist only between a clearing session start
//! and the next clear; every realization step is idempotent and additive,
//! so an abandoned session leaves the grid valid and reusable.

use std::sync::Arc;

use horizon_tablix_core::Signal;

use crate::binder::TablixBinder;
use crate::hierarchy::{Axis, HierarchyNavigator};
use crate::widget::{Rect, Size};

use super::column::{DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, TablixColumn, TablixRow};
use super::dimension::{ColumnLayoutManager, RowLayoutManager};
use super::presenter::{CellKind, CellPresenter, release_presenter};
use super::sizing::ColumnWidthManager;

/// The rendering-session state machine.
///
/// `Idle` -> `SessionStarted` -> `Iterating` (zero or more times) ->
/// `SessionEnded` -> `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session is active.
    #[default]
    Idle,
    /// A session has started; no iteration is in flight.
    SessionStarted,
    /// An iteration is realizing a bounded slice of the matrix.
    Iterating,
    /// The session has ended; the realized state is the session's result.
    SessionEnded,
}

/// The virtualized grid behind one tablix control.
///
/// # Signals
///
/// - `rows_cleared(())`: Emitted once per clearing session start, when the
///   realized rows (and the footer row) are discarded.
pub struct TablixGrid {
    navigator: Arc<dyn HierarchyNavigator>,
    binder: Arc<dyn TablixBinder>,
    width_manager: Arc<ColumnWidthManager>,

    rows: RowLayoutManager,
    columns: ColumnLayoutManager,

    /// At most one footer row per session.
    footer_row: Option<Arc<TablixRow>>,
    /// Corner cells, row levels x column levels, realized once per
    /// session.
    corners: Option<Vec<Arc<CellPresenter>>>,
    /// Empty space beside the last column header, when the data runs out
    /// before the viewport does.
    empty_space_header: Option<Arc<CellPresenter>>,

    state: SessionState,
    font_size: f32,
    viewport: Size,

    /// Emitted when the realized rows are discarded by a clearing session.
    pub rows_cleared: Signal<()>,
}

impl TablixGrid {
    /// Creates a grid over the given collaborators.
    pub fn new(
        navigator: Arc<dyn HierarchyNavigator>,
        binder: Arc<dyn TablixBinder>,
        width_manager: Arc<ColumnWidthManager>,
        font_size: f32,
    ) -> Self {
        Self {
            navigator,
            binder,
            width_manager,
            rows: RowLayoutManager::new(),
            columns: ColumnLayoutManager::new(),
            footer_row: None,
            corners: None,
            empty_space_header: None,
            state: SessionState::Idle,
            font_size,
            viewport: Size::ZERO,
            rows_cleared: Signal::new(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The row dimension manager.
    pub fn row_layout(&self) -> &RowLayoutManager {
        &self.rows
    }

    /// The column dimension manager.
    pub fn column_layout(&self) -> &ColumnLayoutManager {
        &self.columns
    }

    /// The footer row, if realized this session.
    pub fn footer_row(&self) -> Option<&Arc<TablixRow>> {
        self.footer_row.as_ref()
    }

    /// Realized corner cells, row-major. Empty outside sessions.
    pub fn corners(&self) -> &[Arc<CellPresenter>] {
        self.corners.as_deref().unwrap_or(&[])
    }

    /// Number of realized rows (0 when the collection is absent).
    pub fn realized_row_count(&self) -> usize {
        self.rows.realized_count()
    }

    /// Number of realized columns (0 when the collection is absent).
    pub fn realized_column_count(&self) -> usize {
        self.columns.realized_count()
    }

    /// Propagates the viewport size to both dimension managers.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        self.rows.set_viewport_extent(size.height);
        self.columns.set_viewport_extent(size.width);
    }

    /// Propagates the scroll offsets to both dimension managers.
    pub fn set_scroll_offsets(&mut self, row_offset: usize, column_offset: usize) {
        self.rows.set_scroll_offset(row_offset);
        self.columns.set_scroll_offset(column_offset);
    }

    /// Starts a rendering session.
    ///
    /// With `clear`, discards the realized rows, columns, footer row, and
    /// corner cells before any new realization, then re-arms both dimension
    /// managers so persisted/auto sizes are recomputed for the new pass.
    /// Without `clear`, realized state from an unfinished prior session is
    /// reused as-is.
    pub fn on_start_rendering_session(&mut self, clear: bool) {
        tracing::debug!(
            target: "horizon_tablix::session",
            clear,
            state = ?self.state,
            "rendering session started"
        );
        self.binder.on_start_rendering_session();
        if clear {
            self.clear_rows();
            self.clear_columns();
        }
        self.rows.on_start_rendering_session(self.navigator.as_ref());
        self.columns
            .on_start_rendering_session(self.navigator.as_ref());
        self.state = SessionState::SessionStarted;
    }

    /// Discards the realized rows, the footer row, and the corner cells.
    ///
    /// Emits `rows_cleared` exactly once per call.
    pub fn clear_rows(&mut self) {
        self.rows.clear(self.binder.as_ref());
        if let Some(footer) = self.footer_row.take() {
            footer.release(self.binder.as_ref());
        }
        if let Some(corners) = self.corners.take() {
            for corner in &corners {
                release_presenter(self.binder.as_ref(), corner);
            }
        }
        tracing::debug!(target: "horizon_tablix::session", "realized rows cleared");
        self.rows_cleared.emit(());
    }

    /// Discards the realized columns and the empty-space header cell.
    pub fn clear_columns(&mut self) {
        self.columns.clear(self.binder.as_ref());
        if let Some(cell) = self.empty_space_header.take() {
            release_presenter(self.binder.as_ref(), &cell);
        }
    }

    /// Prepares one iteration without discarding prior iterations' work.
    pub fn on_start_rendering_iteration(&mut self) {
        self.rows.on_start_rendering_iteration();
        self.columns.on_start_rendering_iteration();
        self.state = SessionState::Iterating;
    }

    /// Marks the end of one iteration. Returns whether the realized window
    /// already satisfies the viewport on both axes — the default
    /// termination answer callers fold into their own stop predicate.
    pub fn on_end_rendering_iteration(&mut self) -> bool {
        self.state = SessionState::SessionStarted;
        self.viewport_covered()
    }

    /// Ends the session. Realized state stays in place as the session's
    /// result until the next clearing session.
    pub fn on_end_rendering_session(&mut self) {
        self.binder.on_end_rendering_session();
        self.state = SessionState::SessionEnded;
        tracing::debug!(
            target: "horizon_tablix::session",
            rows = self.realized_row_count(),
            columns = self.realized_column_count(),
            "rendering session ended"
        );
    }

    /// Whether both axes report their viewport satisfied.
    pub fn viewport_covered(&self) -> bool {
        self.rows.viewport_filled() && self.columns.viewport_filled()
    }

    /// Returns the realized row at `index`, creating it on first request.
    /// Idempotent within a session.
    pub fn get_or_create_row(&mut self, index: usize) -> Arc<TablixRow> {
        let navigator = Arc::clone(&self.navigator);
        let binder = Arc::clone(&self.binder);
        self.rows
            .get_or_create(index, navigator.as_ref(), binder.as_ref())
    }

    /// Returns the realized column at `index`, creating it on first
    /// request. Idempotent within a session.
    pub fn get_or_create_column(&mut self, index: usize) -> Arc<TablixColumn> {
        let navigator = Arc::clone(&self.navigator);
        let binder = Arc::clone(&self.binder);
        self.columns.get_or_create(
            index,
            navigator.as_ref(),
            binder.as_ref(),
            &self.width_manager,
            self.font_size,
        )
    }

    /// Returns the footer row, creating it on first request. Idempotent
    /// within a session.
    pub fn get_or_create_footers_row(&mut self) -> Arc<TablixRow> {
        if let Some(footer) = &self.footer_row {
            return footer.clone();
        }
        let presenter = Arc::new(CellPresenter::new(
            CellKind::EmptySpaceFooter,
            crate::hierarchy::ItemHandle::invalid(),
        ));
        self.binder.bind_empty_space_footer_cell(&presenter);
        presenter.mark_bound();
        let footer = Arc::new(TablixRow::footer(presenter));
        self.footer_row = Some(footer.clone());
        footer
    }

    /// Realizes the corner cells (row levels x column levels) once per
    /// session. Skipped when the binder reports no row groups.
    pub fn bind_corners(&mut self) {
        if self.corners.is_some() || !self.binder.has_row_groups() {
            return;
        }
        let row_depth = self.navigator.depth(Axis::Row);
        let column_depth = self.navigator.depth(Axis::Column);
        let mut corners = Vec::with_capacity(row_depth * column_depth);
        for row_level in 0..row_depth {
            for column_level in 0..column_depth {
                let item = self.navigator.corner(row_level, column_level);
                let presenter = Arc::new(CellPresenter::new(CellKind::CornerCell, item.clone()));
                self.binder.bind_corner_cell(&item, &presenter);
                presenter.mark_bound();
                corners.push(presenter);
            }
        }
        self.corners = Some(corners);
    }

    /// Fills body cells for every realized (row, column) pair that does
    /// not have one yet.
    ///
    /// Intersection lookups happen only here, after both the row and the
    /// column are realized; rows gain cells strictly in column order.
    pub fn bind_intersections(&mut self) {
        let navigator = Arc::clone(&self.navigator);
        let binder = Arc::clone(&self.binder);
        let columns: Vec<_> = self.columns.realized_items().to_vec();

        for row in self.rows.realized_items() {
            for column in columns.iter().skip(row.cell_count()) {
                let item = navigator.intersection(row.item(), column.item());
                let presenter = Arc::new(CellPresenter::new(CellKind::BodyCell, item.clone()));
                binder.bind_body_cell(&item, &presenter);
                presenter.mark_bound();
                row.add_cell(presenter);
            }
        }

        if let Some(footer) = &self.footer_row {
            for _ in columns.iter().skip(footer.cell_count()) {
                let presenter = Arc::new(CellPresenter::new(
                    CellKind::EmptySpaceFooter,
                    crate::hierarchy::ItemHandle::invalid(),
                ));
                binder.bind_empty_space_footer_cell(&presenter);
                presenter.mark_bound();
                footer.add_cell(presenter);
            }
        }
    }

    /// Realizes the empty-space cell beside the last column header, once
    /// per session. Used when the data runs out before the viewport does.
    pub fn bind_empty_space_header(&mut self) {
        if self.empty_space_header.is_some() {
            return;
        }
        let presenter = Arc::new(CellPresenter::new(
            CellKind::EmptySpaceHeader,
            crate::hierarchy::ItemHandle::invalid(),
        ));
        self.binder.bind_empty_space_header_cell(&presenter);
        presenter.mark_bound();
        self.empty_space_header = Some(presenter);
    }

    /// Resolves contextual widths for the realized columns (see
    /// [`ColumnLayoutManager::calculate_contextual_widths`]).
    pub fn calculate_contextual_widths(&mut self) {
        self.columns
            .calculate_contextual_widths(&self.width_manager);
    }

    /// Places every realized presenter from the resolved contextual sizes.
    ///
    /// Column headers occupy one band per column level at the top; row
    /// headers one band per row level on the left (when the binder reports
    /// row groups); body cells fill the remainder in realized order.
    pub fn arrange_presenters(&mut self) {
        let column_depth = self.navigator.depth(Axis::Column).max(1);
        let header_height = column_depth as f32 * DEFAULT_ROW_HEIGHT;
        let row_header_width = if self.binder.has_row_groups() {
            self.navigator.depth(Axis::Row) as f32 * DEFAULT_COLUMN_WIDTH
        } else {
            0.0
        };

        let mut x = row_header_width;
        for column in self.columns.realized_items() {
            let width = column.contextual_width();
            column
                .presenter()
                .set_bounds(Rect::new(x, 0.0, width, header_height));
            x += width;
        }
        let content_right = x;

        let mut y = header_height;
        for row in self.rows.realized_items() {
            let height = row.contextual_height();
            row.presenter()
                .set_bounds(Rect::new(0.0, y, row_header_width, height));
            let cells = row.cells();
            let mut cell_x = row_header_width;
            for (cell, column) in cells.iter().zip(self.columns.realized_items()) {
                let width = column.contextual_width();
                cell.set_bounds(Rect::new(cell_x, y, width, height));
                cell_x += width;
            }
            y += height;
        }

        if let Some(footer) = &self.footer_row {
            let height = footer.contextual_height();
            footer
                .presenter()
                .set_bounds(Rect::new(0.0, y, row_header_width, height));
            let cells = footer.cells();
            let mut cell_x = row_header_width;
            for (cell, column) in cells.iter().zip(self.columns.realized_items()) {
                let width = column.contextual_width();
                cell.set_bounds(Rect::new(cell_x, y, width, height));
                cell_x += width;
            }
        }

        if let Some(corners) = &self.corners {
            for corner in corners {
                let row_level = corner.item().index();
                let column_level = corner.item().peer_index();
                corner.set_bounds(Rect::new(
                    row_level as f32 * DEFAULT_COLUMN_WIDTH,
                    column_level as f32 * DEFAULT_ROW_HEIGHT,
                    DEFAULT_COLUMN_WIDTH,
                    DEFAULT_ROW_HEIGHT,
                ));
            }
        }

        if let Some(cell) = &self.empty_space_header {
            let remainder = (self.viewport.width - content_right).max(0.0);
            cell.set_bounds(Rect::new(content_right, 0.0, remainder, header_height));
        }
    }

    /// The resolved widths from the last layout pass, in realized order.
    pub fn widths_to_persist(&self) -> &[f32] {
        self.columns.widths_to_persist()
    }
}

static_assertions::assert_impl_all!(TablixGrid: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::TextBinder;
    use crate::hierarchy::{GroupTree, MatrixNavigator};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn grid() -> TablixGrid {
        let mut rows = GroupTree::new();
        for name in ["r0", "r1", "r2"] {
            rows.add_root(name);
        }
        let mut columns = GroupTree::new();
        let group = columns.add_root("g");
        for name in ["a", "b"] {
            columns.add_child(group, name).unwrap();
        }
        let navigator = Arc::new(MatrixNavigator::new(rows, columns));
        let binder = Arc::new(TextBinder::positional(navigator.clone()));
        TablixGrid::new(
            navigator,
            binder,
            Arc::new(ColumnWidthManager::new(true)),
            12.0,
        )
    }

    #[test]
    fn test_idempotent_realization_within_session() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();

        let first = grid.get_or_create_column(1);
        let second = grid.get_or_create_column(1);
        assert!(Arc::ptr_eq(&first, &second));

        let row_a = grid.get_or_create_row(0);
        let row_b = grid.get_or_create_row(0);
        assert!(Arc::ptr_eq(&row_a, &row_b));
    }

    #[test]
    fn test_session_clear_invariant() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();
        let old_row = grid.get_or_create_row(0);
        let old_column = grid.get_or_create_column(0);
        grid.get_or_create_footers_row();
        grid.on_end_rendering_session();

        assert_eq!(grid.realized_row_count(), 1);

        // A clearing session discards rows, columns, and the footer row
        grid.on_start_rendering_session(true);
        assert_eq!(grid.realized_row_count(), 0);
        assert_eq!(grid.realized_column_count(), 0);
        assert!(grid.footer_row().is_none());

        // New realizations are fresh instances, not the cleared ones
        grid.on_start_rendering_iteration();
        let new_row = grid.get_or_create_row(0);
        let new_column = grid.get_or_create_column(0);
        assert!(!Arc::ptr_eq(&old_row, &new_row));
        assert!(!Arc::ptr_eq(&old_column, &new_column));
    }

    #[test]
    fn test_rows_cleared_emitted_once_per_clear() {
        let mut grid = grid();
        let clears = Arc::new(AtomicUsize::new(0));
        let c = clears.clone();
        grid.rows_cleared.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        grid.on_start_rendering_session(true);
        assert_eq!(clears.load(Ordering::SeqCst), 1);

        // Non-clearing session start does not clear
        grid.on_start_rendering_session(false);
        assert_eq!(clears.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut grid = grid();
        assert_eq!(grid.state(), SessionState::Idle);

        grid.on_start_rendering_session(true);
        assert_eq!(grid.state(), SessionState::SessionStarted);

        grid.on_start_rendering_iteration();
        assert_eq!(grid.state(), SessionState::Iterating);

        grid.on_end_rendering_iteration();
        assert_eq!(grid.state(), SessionState::SessionStarted);

        grid.on_end_rendering_session();
        assert_eq!(grid.state(), SessionState::SessionEnded);
    }

    #[test]
    fn test_intersections_bound_after_both_axes() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();

        let row = grid.get_or_create_row(1);
        grid.get_or_create_column(1);
        assert_eq!(row.cell_count(), 0);

        grid.bind_intersections();
        assert_eq!(row.cell_count(), 2);
        // Cells arrive in column order
        assert_eq!(row.cells()[0].item().peer_index(), 0);
        assert_eq!(row.cells()[1].item().peer_index(), 1);

        // Idempotent: a second pass adds nothing
        grid.bind_intersections();
        assert_eq!(row.cell_count(), 2);
    }

    #[test]
    fn test_corners_cover_levels() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();
        grid.bind_corners();

        // 1 row level x 2 column levels
        assert_eq!(grid.corners().len(), 2);
        for corner in grid.corners() {
            assert!(corner.is_bound());
        }

        // Once per session
        grid.bind_corners();
        assert_eq!(grid.corners().len(), 2);
    }

    #[test]
    fn test_abandoned_session_reusable() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();
        grid.get_or_create_row(0);
        // Session abandoned: no end-of-iteration, no end-of-session.

        // A non-clearing restart resumes with the partial state intact
        grid.on_start_rendering_session(false);
        assert_eq!(grid.realized_row_count(), 1);
        grid.on_start_rendering_iteration();
        let row = grid.get_or_create_row(1);
        assert_eq!(row.position(), 1);
        assert_eq!(grid.realized_row_count(), 2);
    }

    #[test]
    fn test_arrange_presenters_places_cells() {
        let mut grid = grid();
        grid.set_viewport(Size::new(640.0, 480.0));
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();
        grid.get_or_create_row(1);
        grid.get_or_create_column(1);
        grid.bind_corners();
        grid.bind_intersections();
        grid.calculate_contextual_widths();
        grid.arrange_presenters();

        let rows = grid.row_layout().realized_items().to_vec();
        let columns = grid.column_layout().realized_items().to_vec();
        // One row level on the left, two column levels on top
        let row_header_width = DEFAULT_COLUMN_WIDTH;
        let header_height = 2.0 * DEFAULT_ROW_HEIGHT;

        let first_col = columns[0].presenter().bounds();
        assert_eq!(first_col.origin.x, row_header_width);
        assert_eq!(first_col.height(), header_height);

        let second_col = columns[1].presenter().bounds();
        assert_eq!(
            second_col.origin.x,
            row_header_width + columns[0].contextual_width()
        );

        // Body cell (1, 1) sits below the header band and right of the
        // first column
        let cell = rows[1].cells()[1].bounds();
        assert_eq!(cell.origin.y, header_height + rows[0].contextual_height());
        assert_eq!(cell.origin.x, second_col.origin.x);
        assert_eq!(cell.width(), columns[1].contextual_width());
    }

    #[test]
    fn test_footer_row_idempotent() {
        let mut grid = grid();
        grid.on_start_rendering_session(true);
        grid.on_start_rendering_iteration();

        let first = grid.get_or_create_footers_row();
        let second = grid.get_or_create_footers_row();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.is_footer());
        assert!(first.presenter().is_bound());
    }
}
