//! Dimension layout managers.
//!
//! One manager per axis tracks the realized subset of that dimension: an
//! ordered sequence of realized items starting at the scroll offset, the
//! running size total, and the fit decision against the viewport extent.
//! The realized sequence is the only per-session state; it is absent
//! outside clearing sessions and lazily created on the first
//! `get_or_create` of a session.

use std::sync::Arc;

use crate::binder::TablixBinder;
use crate::hierarchy::{Axis, HierarchyNavigator};

use super::column::{DEFAULT_COLUMN_WIDTH, TablixColumn, TablixRow};
use super::presenter::{CellKind, CellPresenter};
use super::sizing::{ColumnIdentity, ColumnWidthManager};

/// Layout manager for the row dimension.
pub struct RowLayoutManager {
    /// Realized rows, in increasing leaf-index order starting at
    /// `first_index`. Absent outside an active session.
    realized: Option<Vec<Arc<TablixRow>>>,
    /// Leaf index of the first realized row.
    first_index: usize,
    /// Viewport height available to rows, in pixels. Zero or negative
    /// means unbounded (realize until the data runs out).
    viewport_extent: f32,
    /// Scroll offset: the leaf index realization starts from.
    scroll_offset: usize,
    /// Total leaf count, cached at session start.
    item_count: usize,
    /// Running total of realized heights.
    extent: f32,
    /// Items realized during the current iteration.
    realized_this_iteration: usize,
}

impl Default for RowLayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RowLayoutManager {
    /// Creates a manager with nothing realized.
    pub fn new() -> Self {
        Self {
            realized: None,
            first_index: 0,
            viewport_extent: 0.0,
            scroll_offset: 0,
            item_count: 0,
            extent: 0.0,
            realized_this_iteration: 0,
        }
    }

    /// Sets the viewport height available to rows.
    pub fn set_viewport_extent(&mut self, extent: f32) {
        self.viewport_extent = extent;
    }

    /// Sets the leaf index realization starts from.
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    /// The leaf index realization starts from.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Number of realized rows, or **0** when the realized sequence is
    /// absent. Absence is the normal pre-session state, not an error.
    pub fn realized_count(&self) -> usize {
        self.realized.as_ref().map_or(0, Vec::len)
    }

    /// The realized rows, oldest first. Empty when nothing is realized.
    pub fn realized_items(&self) -> &[Arc<TablixRow>] {
        self.realized.as_deref().unwrap_or(&[])
    }

    /// The realized row at `index - first_index`, if realized.
    pub fn realized_at(&self, index: usize) -> Option<&Arc<TablixRow>> {
        let realized = self.realized.as_ref()?;
        index
            .checked_sub(self.first_index)
            .and_then(|offset| realized.get(offset))
    }

    /// Caches the dimension length for the session.
    pub(crate) fn on_start_rendering_session(&mut self, navigator: &dyn HierarchyNavigator) {
        self.item_count = navigator.leaf_count(Axis::Row);
    }

    /// Resets per-iteration counters. Already-realized rows survive.
    pub(crate) fn on_start_rendering_iteration(&mut self) {
        self.realized_this_iteration = 0;
    }

    /// Items realized during the current iteration.
    pub fn realized_this_iteration(&self) -> usize {
        self.realized_this_iteration
    }

    /// Sum of realized heights.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Whether every remaining leaf is already realized.
    pub fn exhausted(&self) -> bool {
        let next = match &self.realized {
            Some(realized) => self.first_index + realized.len(),
            None => self.scroll_offset,
        };
        next >= self.item_count
    }

    /// Whether the realized window satisfies the viewport: either the
    /// realized extent covers it, or there is nothing left to realize.
    pub fn viewport_filled(&self) -> bool {
        self.exhausted() || (self.viewport_extent > 0.0 && self.extent >= self.viewport_extent)
    }

    /// Returns the realized row at `index`, creating it (and any gap up to
    /// it, to preserve increasing-order realization) on first request.
    /// Idempotent within a session.
    pub(crate) fn get_or_create(
        &mut self,
        index: usize,
        navigator: &dyn HierarchyNavigator,
        binder: &dyn TablixBinder,
    ) -> Arc<TablixRow> {
        if self.realized.is_none() || self.realized.as_ref().is_some_and(|r| r.is_empty()) {
            self.realized = Some(Vec::new());
            self.first_index = index;
        }
        let first_index = self.first_index;
        let realized = self.realized.as_mut().expect("created above");

        if index < first_index {
            // Requests never go backwards within a session; hand back the
            // window start rather than corrupting realization order.
            tracing::warn!(
                target: "horizon_tablix::grid",
                index,
                first_index,
                "row request before realized window"
            );
            return realized.first().expect("non-empty window").clone();
        }
        if let Some(existing) = realized.get(index - first_index) {
            return existing.clone();
        }

        let mut next = first_index + realized.len();
        loop {
            let item = navigator.leaf_at(Axis::Row, next);
            let presenter = Arc::new(CellPresenter::new(CellKind::RowHeader, item.clone()));
            binder.bind_row_header(&item, &presenter);
            presenter.mark_bound();
            let row = Arc::new(TablixRow::new(next, item, presenter));
            self.extent += row.contextual_height();
            self.realized_this_iteration += 1;
            realized.push(row);
            if next == index {
                break;
            }
            next += 1;
        }
        realized.last().expect("just pushed").clone()
    }

    /// Discards the realized sequence, releasing every row through the
    /// binder.
    pub(crate) fn clear(&mut self, binder: &dyn TablixBinder) {
        if let Some(realized) = self.realized.take() {
            for row in &realized {
                row.release(binder);
            }
        }
        self.first_index = 0;
        self.extent = 0.0;
    }
}

/// Layout manager for the column dimension.
///
/// Shares the row manager's realization discipline and adds contextual
/// width computation plus the widths-to-persist sequence read by the
/// control after layout.
pub struct ColumnLayoutManager {
    realized: Option<Vec<Arc<TablixColumn>>>,
    first_index: usize,
    viewport_extent: f32,
    scroll_offset: usize,
    item_count: usize,
    extent: f32,
    realized_this_iteration: usize,
    /// Resolved widths in realized order, refreshed by
    /// `calculate_contextual_widths`.
    widths_to_persist: Vec<f32>,
}

impl Default for ColumnLayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnLayoutManager {
    /// Creates a manager with nothing realized.
    pub fn new() -> Self {
        Self {
            realized: None,
            first_index: 0,
            viewport_extent: 0.0,
            scroll_offset: 0,
            item_count: 0,
            extent: 0.0,
            realized_this_iteration: 0,
            widths_to_persist: Vec::new(),
        }
    }

    /// Sets the viewport width available to columns.
    pub fn set_viewport_extent(&mut self, extent: f32) {
        self.viewport_extent = extent;
    }

    /// Sets the leaf index realization starts from.
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    /// The leaf index realization starts from.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Number of realized columns, or **0** when the realized sequence is
    /// absent.
    pub fn realized_count(&self) -> usize {
        self.realized.as_ref().map_or(0, Vec::len)
    }

    /// The realized columns, in realization order.
    pub fn realized_items(&self) -> &[Arc<TablixColumn>] {
        self.realized.as_deref().unwrap_or(&[])
    }

    /// The realized column at `index - first_index`, if realized.
    pub fn realized_at(&self, index: usize) -> Option<&Arc<TablixColumn>> {
        let realized = self.realized.as_ref()?;
        index
            .checked_sub(self.first_index)
            .and_then(|offset| realized.get(offset))
    }

    pub(crate) fn on_start_rendering_session(&mut self, navigator: &dyn HierarchyNavigator) {
        self.item_count = navigator.leaf_count(Axis::Column);
    }

    pub(crate) fn on_start_rendering_iteration(&mut self) {
        self.realized_this_iteration = 0;
    }

    /// Items realized during the current iteration.
    pub fn realized_this_iteration(&self) -> usize {
        self.realized_this_iteration
    }

    /// Sum of realized contextual widths.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Whether every remaining leaf is already realized.
    pub fn exhausted(&self) -> bool {
        let next = match &self.realized {
            Some(realized) => self.first_index + realized.len(),
            None => self.scroll_offset,
        };
        next >= self.item_count
    }

    /// Whether the realized window satisfies the viewport.
    pub fn viewport_filled(&self) -> bool {
        self.exhausted() || (self.viewport_extent > 0.0 && self.extent >= self.viewport_extent)
    }

    /// Returns the realized column at `index`, creating it on first
    /// request. Idempotent within a session.
    pub(crate) fn get_or_create(
        &mut self,
        index: usize,
        navigator: &dyn HierarchyNavigator,
        binder: &dyn TablixBinder,
        width_manager: &Arc<ColumnWidthManager>,
        font_size: f32,
    ) -> Arc<TablixColumn> {
        if self.realized.is_none() || self.realized.as_ref().is_some_and(|r| r.is_empty()) {
            self.realized = Some(Vec::new());
            self.first_index = index;
        }
        let first_index = self.first_index;
        let realized = self.realized.as_mut().expect("created above");

        if index < first_index {
            tracing::warn!(
                target: "horizon_tablix::grid",
                index,
                first_index,
                "column request before realized window"
            );
            return realized.first().expect("non-empty window").clone();
        }
        if let Some(existing) = realized.get(index - first_index) {
            return existing.clone();
        }

        let mut next = first_index + realized.len();
        loop {
            let item = navigator.leaf_at(Axis::Column, next);
            let presenter = Arc::new(CellPresenter::new(CellKind::ColumnHeader, item.clone()));
            binder.bind_column_header(&item, &presenter);
            presenter.mark_bound();

            let identity = ColumnIdentity::new(binder.header_label(&item));
            let persisted = width_manager.persisted_width(&identity);
            let column = Arc::new(TablixColumn::new(
                next,
                identity,
                item,
                presenter,
                persisted,
                font_size,
                width_manager.clone(),
            ));
            self.extent += column.contextual_width();
            self.realized_this_iteration += 1;
            realized.push(column);
            if next == index {
                break;
            }
            next += 1;
        }
        realized.last().expect("just pushed").clone()
    }

    /// Resolves the contextual width of every realized column, in realized
    /// order, and refreshes the widths-to-persist sequence.
    ///
    /// With auto-size active each column is measured through
    /// [`TablixColumn::calculate_size`]; with auto-size disabled the
    /// persisted widths snapshot is used verbatim and no measurement
    /// happens.
    pub(crate) fn calculate_contextual_widths(&mut self, width_manager: &ColumnWidthManager) {
        self.widths_to_persist.clear();
        let Some(realized) = self.realized.as_ref() else {
            return;
        };

        if width_manager.is_auto_size() {
            for column in realized {
                self.widths_to_persist.push(column.calculate_size());
            }
        } else {
            let snapshot = width_manager.column_widths();
            for column in realized {
                let width = snapshot
                    .get(column.position())
                    .copied()
                    .unwrap_or(DEFAULT_COLUMN_WIDTH);
                column.apply_persisted(width);
                self.widths_to_persist.push(width);
            }
        }

        self.extent = realized.iter().map(|c| c.contextual_width()).sum();
    }

    /// The resolved widths from the last layout pass, in realized order.
    pub fn widths_to_persist(&self) -> &[f32] {
        &self.widths_to_persist
    }

    /// Discards the realized sequence, releasing every column through the
    /// binder. The widths-to-persist sequence is cleared with it.
    pub(crate) fn clear(&mut self, binder: &dyn TablixBinder) {
        if let Some(realized) = self.realized.take() {
            for column in &realized {
                column.release(binder);
            }
        }
        self.first_index = 0;
        self.extent = 0.0;
        self.widths_to_persist.clear();
    }
}
