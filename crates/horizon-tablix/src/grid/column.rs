//! Realized rows and columns.
//!
//! A realized item is the materialized form of one leaf of a dimension for
//! the current viewport window — the full logical dimension may be orders
//! of magnitude larger. Realized items are shared as `Arc`s between the
//! grid's collections and the host, and torn down when the next clearing
//! session starts.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::binder::TablixBinder;
use crate::hierarchy::ItemHandle;

use super::presenter::{CellPresenter, release_presenter};
use super::sizing::{ColumnIdentity, ColumnWidthManager};

/// Width of a column with no persisted or measured size.
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// Smallest width a column can take, by resize or measurement.
pub const MINIMUM_COLUMN_WIDTH: f32 = 20.0;

/// Height of a realized row.
pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;

/// Advance width of one character as a fraction of the font size, for
/// auto-size estimation.
const CHAR_WIDTH_EM: f32 = 0.6;

/// Horizontal padding added around measured header text.
const CELL_PADDING: f32 = 8.0;

/// Per-column width state: a persisted value wins over a measured one.
struct WidthState {
    persisted: Option<f32>,
    computed: Option<f32>,
}

/// One realized column of the grid.
///
/// Carries the column header's item and presenter plus the contextual
/// width for the current layout pass. [`resize`](TablixColumn::resize) is
/// the only path by which a user-driven width change becomes observable
/// outside the grid.
pub struct TablixColumn {
    /// Absolute leaf index within the column dimension.
    position: usize,
    /// Stable identity for width persistence.
    identity: ColumnIdentity,
    /// The column header item.
    item: ItemHandle,
    /// The realized header cell.
    presenter: Arc<CellPresenter>,
    /// Contextual width state.
    width: Mutex<WidthState>,
    /// Font size used for auto-size measurement.
    font_size: f32,
    /// Persistence boundary the resize path forwards to.
    width_manager: Arc<ColumnWidthManager>,
}

impl TablixColumn {
    pub(crate) fn new(
        position: usize,
        identity: ColumnIdentity,
        item: ItemHandle,
        presenter: Arc<CellPresenter>,
        persisted: Option<f32>,
        font_size: f32,
        width_manager: Arc<ColumnWidthManager>,
    ) -> Self {
        Self {
            position,
            identity,
            item,
            presenter,
            width: Mutex::new(WidthState {
                persisted,
                computed: None,
            }),
            font_size,
            width_manager,
        }
    }

    /// Absolute leaf index within the column dimension.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Stable identity for width persistence.
    pub fn identity(&self) -> &ColumnIdentity {
        &self.identity
    }

    /// The column header item.
    pub fn item(&self) -> &ItemHandle {
        &self.item
    }

    /// The realized header cell.
    pub fn presenter(&self) -> &Arc<CellPresenter> {
        &self.presenter
    }

    /// Current effective width: the persisted value if present, else the
    /// last computed auto-size, else the default.
    pub fn contextual_width(&self) -> f32 {
        let width = self.width.lock();
        width
            .persisted
            .or(width.computed)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// The persisted width, if any.
    pub fn persisted_width(&self) -> Option<f32> {
        self.width.lock().persisted
    }

    /// The last auto-size measurement, if one was taken this session.
    pub fn computed_width(&self) -> Option<f32> {
        self.width.lock().computed
    }

    /// Measures the column's auto-size from its bound header content and
    /// caches the result.
    ///
    /// This is an estimate (character count against the configured font
    /// size); pixel-exact shaping belongs to the host's text stack.
    pub fn calculate_size(&self) -> f32 {
        let chars = self.presenter.content().map_or(0, |c| c.chars().count());
        let measured =
            (chars as f32 * self.font_size * CHAR_WIDTH_EM + CELL_PADDING * 2.0)
                .max(MINIMUM_COLUMN_WIDTH);
        self.width.lock().computed = Some(measured);
        measured
    }

    /// Applies a persisted width from the session snapshot without
    /// notifying the persistence boundary. Layout-only path.
    pub(crate) fn apply_persisted(&self, width: f32) {
        self.width.lock().persisted = Some(width);
    }

    /// Resizes the column to `new_width` (clamped to the minimum) and
    /// forwards the value to the Column Width Manager.
    ///
    /// Fires the manager's `column_width_changed` signal exactly once per
    /// call; a second call with a different value overwrites the prior
    /// persisted width.
    pub fn resize(&self, new_width: f32) {
        let width = new_width.max(MINIMUM_COLUMN_WIDTH);
        self.width.lock().persisted = Some(width);
        self.width_manager
            .on_column_resized(&self.identity, self.position, width);
    }

    /// Releases the header cell through the binder.
    pub(crate) fn release(&self, binder: &dyn TablixBinder) {
        release_presenter(binder, &self.presenter);
    }
}

/// One realized row of the grid, also used for the footer row.
pub struct TablixRow {
    /// Absolute leaf index within the row dimension; unused for the
    /// footer.
    position: usize,
    /// The row header item (invalid for the footer row).
    item: ItemHandle,
    /// Whether this is the footer row.
    footer: bool,
    /// Contextual height for the current layout pass.
    height: Mutex<f32>,
    /// The realized row header (or empty-space footer) cell.
    presenter: Arc<CellPresenter>,
    /// Realized cells, one per realized column, appended in column order.
    cells: Mutex<Vec<Arc<CellPresenter>>>,
}

impl TablixRow {
    pub(crate) fn new(position: usize, item: ItemHandle, presenter: Arc<CellPresenter>) -> Self {
        Self {
            position,
            item,
            footer: false,
            height: Mutex::new(DEFAULT_ROW_HEIGHT),
            presenter,
            cells: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn footer(presenter: Arc<CellPresenter>) -> Self {
        Self {
            position: 0,
            item: ItemHandle::invalid(),
            footer: true,
            height: Mutex::new(DEFAULT_ROW_HEIGHT),
            presenter,
            cells: Mutex::new(Vec::new()),
        }
    }

    /// Absolute leaf index within the row dimension.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The row header item (invalid for the footer row).
    pub fn item(&self) -> &ItemHandle {
        &self.item
    }

    /// Whether this is the footer row.
    pub fn is_footer(&self) -> bool {
        self.footer
    }

    /// Current effective height.
    pub fn contextual_height(&self) -> f32 {
        *self.height.lock()
    }

    /// Overrides the row's height for this layout pass.
    pub fn set_contextual_height(&self, height: f32) {
        *self.height.lock() = height.max(1.0);
    }

    /// The realized row header (or empty-space footer) cell.
    pub fn presenter(&self) -> &Arc<CellPresenter> {
        &self.presenter
    }

    /// Number of realized cells in this row.
    pub fn cell_count(&self) -> usize {
        self.cells.lock().len()
    }

    /// Snapshot of the row's realized cells, in column order.
    pub fn cells(&self) -> Vec<Arc<CellPresenter>> {
        self.cells.lock().clone()
    }

    pub(crate) fn add_cell(&self, cell: Arc<CellPresenter>) {
        self.cells.lock().push(cell);
    }

    /// Releases the header cell and every realized cell through the
    /// binder.
    pub(crate) fn release(&self, binder: &dyn TablixBinder) {
        for cell in self.cells.lock().drain(..) {
            release_presenter(binder, &cell);
        }
        release_presenter(binder, &self.presenter);
    }
}

static_assertions::assert_impl_all!(TablixColumn: Send, Sync);
static_assertions::assert_impl_all!(TablixRow: Send, Sync);
