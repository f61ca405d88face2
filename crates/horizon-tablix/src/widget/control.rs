//! The tablix control: top-level orchestration.
//!
//! A control owns the grid and the two scrollbars, wires the externally
//! supplied navigator and binder to a host container, routes input events
//! to scroll/resize actions, and drives rendering sessions on data change
//! or resize.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_tablix::binder::TextBinder;
//! use horizon_tablix::hierarchy::{GroupTree, MatrixNavigator};
//! use horizon_tablix::widget::{Size, TablixControl, TablixOptions};
//!
//! let mut rows = GroupTree::new();
//! rows.add_root("North");
//! rows.add_root("South");
//! let mut columns = GroupTree::new();
//! columns.add_root("Sales");
//!
//! let navigator = Arc::new(MatrixNavigator::new(rows, columns));
//! let binder = Arc::new(TextBinder::positional(navigator.clone()));
//!
//! let mut control =
//!     TablixControl::new(navigator, binder, TablixOptions::default()).unwrap();
//! control.set_viewport(Size::new(400.0, 300.0));
//! control.refresh(true);
//! ```

use std::sync::Arc;

use horizon_tablix_core::PerfSpan;

use crate::binder::TablixBinder;
use crate::error::TablixError;
use crate::grid::{ColumnWidthEntry, ColumnWidthManager, DEFAULT_ROW_HEIGHT, TablixGrid};
use crate::hierarchy::{Axis, HierarchyNavigator};

use super::events::{PanEvent, TablixEvent, WheelEvent};
use super::geometry::Size;
use super::scroll_bar::Scrollbar;

/// CSS-style class applied to the host container.
pub const CONTAINER_CLASS: &str = "tablixContainer";

/// Font size used when the options leave it unset.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Safety bound on rendering iterations per session. Sessions whose stop
/// predicate never fires still terminate here.
const MAX_RENDER_ITERATIONS: usize = 64;

/// Rows realized per iteration.
const ROW_REALIZATION_BAND: usize = 16;

/// Columns realized per iteration.
const COLUMN_REALIZATION_BAND: usize = 8;

/// How the surrounding layout hosts the tablix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablixLayoutKind {
    /// Free-form canvas placement.
    #[default]
    Canvas,
    /// A dashboard tile with externally constrained size.
    DashboardTile,
}

/// Constructor-injected configuration for a control.
#[derive(Debug, Clone)]
pub struct TablixOptions {
    /// Whether the control reacts to input events at all.
    pub interactive: bool,
    /// Whether touch pan deltas translate to scrolling.
    pub touch_enabled: bool,
    /// How the surrounding layout hosts the tablix.
    pub layout_kind: TablixLayoutKind,
    /// Font size for auto-size measurement and the container style.
    /// `None` leaves the host's font untouched.
    pub font_size: Option<f32>,
    /// When `true`, persisted column widths are used verbatim and no
    /// auto-size measurement happens.
    pub fixed_column_widths: bool,
    /// Whether to realize a footer row.
    pub show_footer: bool,
}

impl Default for TablixOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            touch_enabled: false,
            layout_kind: TablixLayoutKind::Canvas,
            font_size: None,
            fixed_column_widths: false,
            show_footer: false,
        }
    }
}

impl TablixOptions {
    /// Set interactivity using builder pattern.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Set touch support using builder pattern.
    pub fn with_touch_enabled(mut self, touch_enabled: bool) -> Self {
        self.touch_enabled = touch_enabled;
        self
    }

    /// Set the layout kind using builder pattern.
    pub fn with_layout_kind(mut self, layout_kind: TablixLayoutKind) -> Self {
        self.layout_kind = layout_kind;
        self
    }

    /// Set the font size using builder pattern.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Set fixed column widths using builder pattern.
    pub fn with_fixed_column_widths(mut self, fixed: bool) -> Self {
        self.fixed_column_widths = fixed;
        self
    }

    /// Set footer realization using builder pattern.
    pub fn with_footer(mut self, show_footer: bool) -> Self {
        self.show_footer = show_footer;
        self
    }
}

/// What the control applies to its host container: the fixed class name
/// and the optional font-size style.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStyle {
    /// Always [`CONTAINER_CLASS`].
    pub class_name: &'static str,
    /// Font size style, when configured.
    pub font_size: Option<f32>,
}

/// Snapshot handed to the stop predicate after each rendering iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationStats {
    /// 1-based count of completed iterations this session.
    pub iteration: usize,
    /// Realized rows so far.
    pub rows_realized: usize,
    /// Realized columns so far.
    pub columns_realized: usize,
    /// Whether the realized window satisfies the viewport on both axes.
    pub viewport_covered: bool,
}

/// The caller-supplied "should I stop" function: the scheduling contract
/// for iteration budgeting.
pub type StopPredicate = Box<dyn Fn(&IterationStats) -> bool + Send + Sync>;

/// The top-level tablix orchestrator.
///
/// Owns the grid and both scrollbars; rendering sessions run inside
/// [`refresh`](TablixControl::refresh), decomposed into bounded iterations
/// gated by an injectable stop predicate so large matrices never block the
/// host in one unbroken pass.
pub struct TablixControl {
    grid: TablixGrid,
    row_scrollbar: Scrollbar,
    column_scrollbar: Scrollbar,
    navigator: Arc<dyn HierarchyNavigator>,
    options: TablixOptions,
    container: ContainerStyle,
    width_manager: Arc<ColumnWidthManager>,
    viewport: Size,
    stop_predicate: StopPredicate,
    /// Whether the last session covered its viewport. An incomplete
    /// session is resumed, not cleared, by `refresh(false)`.
    render_complete: bool,
}

impl TablixControl {
    /// Creates a control over the supplied navigator and binder.
    ///
    /// Fails when the options are invalid (non-finite or non-positive font
    /// size).
    pub fn new(
        navigator: Arc<dyn HierarchyNavigator>,
        binder: Arc<dyn TablixBinder>,
        options: TablixOptions,
    ) -> Result<Self, TablixError> {
        if let Some(font_size) = options.font_size
            && !(font_size.is_finite() && font_size > 0.0)
        {
            return Err(TablixError::InvalidFontSize(font_size));
        }
        let font_size = options.font_size.unwrap_or(DEFAULT_FONT_SIZE);

        let container = ContainerStyle {
            class_name: CONTAINER_CLASS,
            font_size: options.font_size,
        };
        let width_manager = Arc::new(ColumnWidthManager::new(!options.fixed_column_widths));
        let grid = TablixGrid::new(
            navigator.clone(),
            binder,
            width_manager.clone(),
            font_size,
        );

        Ok(Self {
            grid,
            row_scrollbar: Scrollbar::new(Axis::Row),
            column_scrollbar: Scrollbar::new(Axis::Column),
            navigator,
            options,
            container,
            width_manager,
            viewport: Size::ZERO,
            stop_predicate: Box::new(|stats| stats.viewport_covered),
            render_complete: false,
        })
    }

    /// The style the host applies to its container element.
    pub fn container_style(&self) -> &ContainerStyle {
        &self.container
    }

    /// The control's options.
    pub fn options(&self) -> &TablixOptions {
        &self.options
    }

    /// The grid behind this control.
    pub fn grid(&self) -> &TablixGrid {
        &self.grid
    }

    /// The width persistence boundary. Hosts connect to its
    /// `column_width_changed` signal to update external storage.
    pub fn width_manager(&self) -> &Arc<ColumnWidthManager> {
        &self.width_manager
    }

    /// The row-axis scrollbar.
    pub fn row_scrollbar(&self) -> &Scrollbar {
        &self.row_scrollbar
    }

    /// Mutable access for hosts wiring signals or custom wheel mappings.
    pub fn row_scrollbar_mut(&mut self) -> &mut Scrollbar {
        &mut self.row_scrollbar
    }

    /// The column-axis scrollbar.
    pub fn column_scrollbar(&self) -> &Scrollbar {
        &self.column_scrollbar
    }

    /// Mutable access for hosts wiring signals or custom wheel mappings.
    pub fn column_scrollbar_mut(&mut self) -> &mut Scrollbar {
        &mut self.column_scrollbar
    }

    /// Installs the persisted column widths snapshot for upcoming
    /// sessions.
    pub fn set_persisted_column_widths(&self, entries: &[ColumnWidthEntry]) {
        self.width_manager.set_persisted_widths(entries);
    }

    /// Replaces the stop predicate consulted after each rendering
    /// iteration.
    ///
    /// The default stops once the viewport is covered. Hosts that budget
    /// work per UI frame stop earlier (e.g. after N iterations) and call
    /// `refresh(false)` again on the next frame to resume.
    pub fn set_stop_predicate<F>(&mut self, predicate: F)
    where
        F: Fn(&IterationStats) -> bool + Send + Sync + 'static,
    {
        self.stop_predicate = Box::new(predicate);
    }

    /// Resizes the viewport and re-renders without clearing.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        self.grid.set_viewport(size);
    }

    /// The current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Drives a rendering session to completion.
    ///
    /// `clear_all = true` forces a full re-session: the grid's realized
    /// state is discarded (exactly one `clear_rows`) and rebuilt from the
    /// current scroll offsets. `clear_all = false` performs zero
    /// `clear_rows` calls: an unfinished prior session is resumed, a
    /// finished one is extended in place — in both cases work already done
    /// is kept, regardless of how many internal iterations run.
    pub fn refresh(&mut self, clear_all: bool) {
        let _perf = PerfSpan::new("tablix_refresh");
        self.grid.set_scroll_offsets(
            self.row_scrollbar.view_min(),
            self.column_scrollbar.view_min(),
        );
        self.grid.on_start_rendering_session(clear_all);

        let mut iteration = 0;
        loop {
            self.grid.on_start_rendering_iteration();
            let rows_before = self.grid.realized_row_count();
            let columns_before = self.grid.realized_column_count();

            self.render_iteration();

            iteration += 1;
            let viewport_covered = self.grid.on_end_rendering_iteration();
            let stats = IterationStats {
                iteration,
                rows_realized: self.grid.realized_row_count(),
                columns_realized: self.grid.realized_column_count(),
                viewport_covered,
            };
            if (self.stop_predicate)(&stats) {
                break;
            }
            let progressed = stats.rows_realized > rows_before
                || stats.columns_realized > columns_before;
            if !progressed {
                // Data source exhausted: terminate even if the predicate
                // never fires.
                tracing::debug!(
                    target: "horizon_tablix::session",
                    iteration,
                    "no progress, stopping iteration loop"
                );
                break;
            }
            if iteration >= MAX_RENDER_ITERATIONS {
                tracing::warn!(
                    target: "horizon_tablix::session",
                    iteration,
                    "iteration safety bound hit"
                );
                break;
            }
        }

        // Completion is judged at realization granularity, before width
        // resolution rescales the realized extent.
        self.render_complete = self.grid.viewport_covered();
        self.grid.calculate_contextual_widths();
        self.grid.arrange_presenters();
        self.grid.on_end_rendering_session();
        self.update_scrollbars();
    }

    /// Whether the last session covered its viewport.
    pub fn is_render_complete(&self) -> bool {
        self.render_complete
    }

    /// The resolved column widths from the last layout pass, in realized
    /// order. Hosts persist these alongside resize updates.
    pub fn widths_to_persist(&self) -> &[f32] {
        self.grid.widths_to_persist()
    }

    /// One bounded slice of realization work: a band of rows, a band of
    /// columns, then the cells their intersections need.
    fn render_iteration(&mut self) {
        let row_total = self.navigator.leaf_count(Axis::Row);
        let column_total = self.navigator.leaf_count(Axis::Column);
        let row_offset = self.row_scrollbar.view_min();
        let column_offset = self.column_scrollbar.view_min();

        let row_target = self.grid.realized_row_count() + ROW_REALIZATION_BAND;
        loop {
            let next = row_offset + self.grid.realized_row_count();
            if next >= row_total
                || self.grid.realized_row_count() >= row_target
                || self.grid.row_layout().viewport_filled()
            {
                break;
            }
            self.grid.get_or_create_row(next);
        }

        let column_target = self.grid.realized_column_count() + COLUMN_REALIZATION_BAND;
        loop {
            let next = column_offset + self.grid.realized_column_count();
            if next >= column_total
                || self.grid.realized_column_count() >= column_target
                || self.grid.column_layout().viewport_filled()
            {
                break;
            }
            self.grid.get_or_create_column(next);
        }

        self.grid.bind_corners();
        if self.options.show_footer {
            self.grid.get_or_create_footers_row();
        }
        self.grid.bind_intersections();

        if self.grid.column_layout().exhausted()
            && self.viewport.width > self.grid.column_layout().extent()
        {
            self.grid.bind_empty_space_header();
        }
    }

    /// Sizes both scrollbars from the realized geometry of the last
    /// session.
    fn update_scrollbars(&mut self) {
        let row_total = self.navigator.leaf_count(Axis::Row);
        let column_total = self.navigator.leaf_count(Axis::Column);

        self.row_scrollbar
            .set_view(self.grid.realized_row_count(), row_total);
        self.column_scrollbar
            .set_view(self.grid.realized_column_count(), column_total);

        self.row_scrollbar
            .set_visible(row_total > self.grid.realized_row_count());
        self.column_scrollbar
            .set_visible(column_total > self.grid.realized_column_count());
    }

    /// Routes an input event.
    ///
    /// Wheel events go to the row scrollbar first if visible, else to the
    /// column scrollbar if visible; at most one scrollbar reacts per
    /// event. Returns `true` when the event changed control state.
    pub fn handle_event(&mut self, event: &mut TablixEvent) -> bool {
        match event {
            TablixEvent::Wheel(e) => {
                if !self.options.interactive {
                    return false;
                }
                let wheel = *e;
                if self.handle_wheel(&wheel) {
                    event.accept();
                    return true;
                }
                false
            }
            TablixEvent::Pan(e) => {
                if !self.options.interactive || !self.options.touch_enabled {
                    return false;
                }
                let pan = *e;
                if self.handle_pan(&pan) {
                    event.accept();
                    return true;
                }
                false
            }
            TablixEvent::Resize(e) => {
                let new_size = e.new_size;
                e.base.accept();
                self.set_viewport(new_size);
                self.refresh(false);
                true
            }
        }
    }

    fn handle_wheel(&mut self, event: &WheelEvent) -> bool {
        let scrolled = if self.row_scrollbar.is_visible() {
            self.row_scrollbar.on_mouse_wheel(event)
        } else if self.column_scrollbar.is_visible() {
            self.column_scrollbar.on_mouse_wheel(event)
        } else {
            false
        };
        if scrolled {
            // The realized window is tied to the old offset; rebuild it.
            self.refresh(true);
        }
        scrolled
    }

    fn handle_pan(&mut self, event: &PanEvent) -> bool {
        // Dragging content down reveals earlier rows.
        let row_items = -(event.delta_y / DEFAULT_ROW_HEIGHT).round() as isize;
        let column_items =
            -(event.delta_x / crate::grid::DEFAULT_COLUMN_WIDTH).round() as isize;

        let scrolled = if self.row_scrollbar.is_visible() && row_items != 0 {
            self.row_scrollbar.scroll_by(row_items)
        } else if self.column_scrollbar.is_visible() && column_items != 0 {
            self.column_scrollbar.scroll_by(column_items)
        } else {
            false
        };
        if scrolled {
            self.refresh(true);
        }
        scrolled
    }
}

static_assertions::assert_impl_all!(TablixControl: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{TablixBinder, TextBinder};
    use crate::grid::{CellPresenter, ColumnIdentity};
    use crate::hierarchy::{GroupTree, ItemHandle, MatrixNavigator};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn navigator(rows: usize, columns: usize) -> Arc<MatrixNavigator> {
        let mut row_tree = GroupTree::new();
        for i in 0..rows {
            row_tree.add_root(format!("r{i}"));
        }
        let mut column_tree = GroupTree::new();
        for i in 0..columns {
            column_tree.add_root(format!("c{i}"));
        }
        Arc::new(MatrixNavigator::new(row_tree, column_tree))
    }

    fn control(rows: usize, columns: usize, options: TablixOptions) -> TablixControl {
        let nav = navigator(rows, columns);
        let binder = Arc::new(TextBinder::positional(nav.clone()));
        TablixControl::new(nav, binder, options).unwrap()
    }

    #[test]
    fn test_invalid_font_size_rejected() {
        let nav = navigator(1, 1);
        let binder = Arc::new(TextBinder::positional(nav.clone()));
        let result = TablixControl::new(
            nav,
            binder,
            TablixOptions::default().with_font_size(f32::NAN),
        );
        assert!(matches!(
            result.as_ref().err(),
            Some(TablixError::InvalidFontSize(_))
        ));
    }

    #[test]
    fn test_container_style() {
        let control = control(1, 1, TablixOptions::default().with_font_size(14.0));
        assert_eq!(control.container_style().class_name, "tablixContainer");
        assert_eq!(control.container_style().font_size, Some(14.0));
    }

    #[test]
    fn test_refresh_true_clears_exactly_once() {
        let mut control = control(100, 10, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 300.0));

        let clears = Arc::new(AtomicUsize::new(0));
        let c = clears.clone();
        control.grid().rows_cleared.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        control.refresh(true);
        assert_eq!(clears.load(Ordering::SeqCst), 1);

        control.refresh(true);
        assert_eq!(clears.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refresh_false_never_clears() {
        let mut control = control(100, 10, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 300.0));

        let clears = Arc::new(AtomicUsize::new(0));
        let c = clears.clone();
        control.grid().rows_cleared.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // Multi-iteration sessions included: still zero clear calls
        control.set_stop_predicate(|stats| stats.iteration >= 2);
        control.refresh(false);
        control.set_stop_predicate(|stats| stats.viewport_covered);
        control.refresh(false);
        assert_eq!(clears.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_refresh_realizes_viewport_window() {
        let mut control = control(1000, 100, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        // 240px / 24px rows: about ten rows, never the full thousand
        let rows = control.grid().realized_row_count();
        assert!(rows >= 10 && rows < 50, "rows = {rows}");
        // 400px / 100px default columns: a handful, never all hundred
        let columns = control.grid().realized_column_count();
        assert!(columns >= 4 && columns < 20, "columns = {columns}");
        assert!(control.is_render_complete());
    }

    #[test]
    fn test_budgeted_session_resumes_without_clear() {
        let mut control = control(1000, 4, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 2400.0));

        // Budget: one iteration per refresh
        control.set_stop_predicate(|stats| stats.iteration >= 1);
        control.refresh(true);
        let after_first = control.grid().realized_row_count();
        assert!(!control.is_render_complete());

        control.refresh(false);
        let after_second = control.grid().realized_row_count();
        assert!(after_second > after_first);
    }

    #[test]
    fn test_scrollbars_sized_from_realized_geometry() {
        let mut control = control(1000, 2, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        assert!(control.row_scrollbar().is_visible());
        assert_eq!(control.row_scrollbar().total(), 1000);
        assert_eq!(
            control.row_scrollbar().view_size(),
            control.grid().realized_row_count()
        );
        // Both columns fit: no column scrollbar
        assert!(!control.column_scrollbar().is_visible());
    }

    #[test]
    fn test_wheel_routes_to_row_scrollbar_first() {
        let mut control = control(1000, 100, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);
        assert!(control.row_scrollbar().is_visible());
        assert!(control.column_scrollbar().is_visible());

        let mut event = TablixEvent::Wheel(WheelEvent::from_pixels(0.0, -10.0));
        assert!(control.handle_event(&mut event));
        assert!(event.is_accepted());

        // Only the row axis moved
        assert_eq!(control.row_scrollbar().view_min(), 1);
        assert_eq!(control.column_scrollbar().view_min(), 0);
    }

    #[test]
    fn test_wheel_falls_through_to_column_scrollbar() {
        // One row, many columns: the row scrollbar stays hidden
        let mut control = control(1, 100, TablixOptions::default());
        control.set_viewport(Size::new(300.0, 240.0));
        control.refresh(true);
        assert!(!control.row_scrollbar().is_visible());
        assert!(control.column_scrollbar().is_visible());

        let mut event = TablixEvent::Wheel(WheelEvent::from_pixels(0.0, -10.0));
        assert!(control.handle_event(&mut event));
        assert_eq!(control.column_scrollbar().view_min(), 1);
    }

    #[test]
    fn test_non_interactive_ignores_input() {
        let mut control = control(
            1000,
            10,
            TablixOptions::default().with_interactive(false),
        );
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        let mut event = TablixEvent::Wheel(WheelEvent::from_pixels(0.0, -10.0));
        assert!(!control.handle_event(&mut event));
        assert!(!event.is_accepted());
        assert_eq!(control.row_scrollbar().view_min(), 0);
    }

    #[test]
    fn test_scroll_moves_realized_window() {
        let mut control = control(1000, 2, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        let mut event = TablixEvent::Wheel(WheelEvent::from_pixels(0.0, -10.0));
        control.handle_event(&mut event);

        // The realized window now starts at the new offset
        let first = &control.grid().row_layout().realized_items()[0];
        assert_eq!(first.position(), 1);
    }

    #[test]
    fn test_pan_scrolls_when_touch_enabled() {
        let mut control = control(
            1000,
            2,
            TablixOptions::default().with_touch_enabled(true),
        );
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        // Drag content up by three row heights: advance three rows
        let mut event = TablixEvent::Pan(PanEvent::new(0.0, -3.0 * DEFAULT_ROW_HEIGHT));
        assert!(control.handle_event(&mut event));
        assert_eq!(control.row_scrollbar().view_min(), 3);

        // Without touch support the same event is ignored
        let mut control = control_without_touch();
        let mut event = TablixEvent::Pan(PanEvent::new(0.0, -3.0 * DEFAULT_ROW_HEIGHT));
        assert!(!control.handle_event(&mut event));
    }

    fn control_without_touch() -> TablixControl {
        let mut control = control(1000, 2, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);
        control
    }

    #[test]
    fn test_resize_event_triggers_rerender() {
        let mut control = control(1000, 2, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 120.0));
        control.refresh(true);
        let small = control.grid().realized_row_count();

        let mut event = TablixEvent::Resize(crate::widget::ResizeEvent::new(
            Size::new(400.0, 120.0),
            Size::new(400.0, 480.0),
        ));
        assert!(control.handle_event(&mut event));
        assert!(control.grid().realized_row_count() > small);
    }

    #[test]
    fn test_resize_persistence_round_trip() {
        let mut control = control(10, 4, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        let received = Arc::new(Mutex::new(Vec::new()));
        let r = received.clone();
        control
            .width_manager()
            .column_width_changed
            .connect(move |(identity, position, width)| {
                r.lock().push((identity.clone(), *position, *width));
            });

        let column = control.grid().column_layout().realized_items()[1].clone();
        column.resize(35.0);

        let events = received.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], (ColumnIdentity::new("c1"), 1, 35.0));
        assert_eq!(column.contextual_width(), 35.0);
    }

    #[test]
    fn test_fixed_widths_bypass_measurement() {
        let mut control = control(
            4,
            2,
            TablixOptions::default().with_fixed_column_widths(true),
        );
        control.set_persisted_column_widths(&[
            ColumnWidthEntry::new(ColumnIdentity::new("c0"), 35.0),
            ColumnWidthEntry::new(ColumnIdentity::new("c1"), 50.0),
        ]);
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        assert_eq!(control.widths_to_persist(), &[35.0, 50.0]);
        for column in control.grid().column_layout().realized_items() {
            assert!(column.computed_width().is_none());
        }
    }

    #[test]
    fn test_auto_size_produces_widths_to_persist() {
        let mut control = control(4, 3, TablixOptions::default());
        control.set_viewport(Size::new(400.0, 240.0));
        control.refresh(true);

        assert_eq!(control.widths_to_persist().len(), 3);
        for width in control.widths_to_persist() {
            assert!(*width >= crate::grid::MINIMUM_COLUMN_WIDTH);
        }
    }

    /// Binder that counts bind/unbind pairs to check the pairing
    /// invariant through full control sessions.
    struct CountingBinder {
        inner: TextBinder,
        binds: AtomicUsize,
        unbinds: AtomicUsize,
    }

    impl CountingBinder {
        fn new(navigator: Arc<MatrixNavigator>) -> Self {
            Self {
                inner: TextBinder::positional(navigator),
                binds: AtomicUsize::new(0),
                unbinds: AtomicUsize::new(0),
            }
        }
    }

    impl TablixBinder for CountingBinder {
        fn bind_row_header(&self, item: &ItemHandle, cell: &CellPresenter) {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.inner.bind_row_header(item, cell);
        }

        fn unbind_row_header(&self, _item: &ItemHandle, _cell: &CellPresenter) {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
        }

        fn bind_column_header(&self, item: &ItemHandle, cell: &CellPresenter) {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.inner.bind_column_header(item, cell);
        }

        fn unbind_column_header(&self, _item: &ItemHandle, _cell: &CellPresenter) {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
        }

        fn bind_body_cell(&self, item: &ItemHandle, cell: &CellPresenter) {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.inner.bind_body_cell(item, cell);
        }

        fn unbind_body_cell(&self, _item: &ItemHandle, _cell: &CellPresenter) {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
        }

        fn bind_corner_cell(&self, item: &ItemHandle, cell: &CellPresenter) {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.inner.bind_corner_cell(item, cell);
        }

        fn unbind_corner_cell(&self, _item: &ItemHandle, _cell: &CellPresenter) {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
        }

        fn header_label(&self, item: &ItemHandle) -> String {
            self.inner.header_label(item)
        }

        fn cell_content(&self, item: &ItemHandle) -> String {
            self.inner.cell_content(item)
        }

        fn has_row_groups(&self) -> bool {
            self.inner.has_row_groups()
        }
    }

    #[test]
    fn test_bind_unbind_pairing_across_sessions() {
        let nav = navigator(6, 3);
        let binder = Arc::new(CountingBinder::new(nav.clone()));
        let mut control =
            TablixControl::new(nav, binder.clone(), TablixOptions::default()).unwrap();
        control.set_viewport(Size::new(400.0, 240.0));

        control.refresh(true);
        control.refresh(true);
        control.refresh(true);

        let binds = binder.binds.load(Ordering::SeqCst);
        let unbinds = binder.unbinds.load(Ordering::SeqCst);
        // Two clearing sessions released everything the first two bound;
        // the third session's cells are still live.
        assert!(binds > 0);
        assert_eq!(binds - unbinds, binds / 3);
    }
}
