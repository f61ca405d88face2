//! Column width persistence boundary.
//!
//! User-driven column widths outlive a rendering session: they are stored
//! by an external settings layer (a document, a dashboard definition) and
//! handed back to the engine as a snapshot at session start. The
//! [`ColumnWidthManager`] is the seam between the two worlds — layout reads
//! the snapshot, and the only write path back out is the resize signal
//! fired from [`TablixColumn::resize`](super::TablixColumn::resize).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use horizon_tablix_core::Signal;

use super::column::DEFAULT_COLUMN_WIDTH;

/// Stable identity of a column for width persistence.
///
/// Keyed by the binder-supplied header name (a qualified path such as
/// `"2019/Q1"`), not by positional index, because columns may reorder
/// across data updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnIdentity(String);

impl ColumnIdentity {
    /// Creates an identity from a stable column name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnIdentity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ColumnIdentity {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for ColumnIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted `(column identity, width)` pair.
///
/// Serializable so the external settings layer can store entries however it
/// stores the rest of its document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWidthEntry {
    /// The column's stable identity.
    pub identity: ColumnIdentity,
    /// The persisted width in logical pixels.
    pub width: f32,
}

impl ColumnWidthEntry {
    /// Creates a new entry.
    pub fn new(identity: impl Into<ColumnIdentity>, width: f32) -> Self {
        Self {
            identity: identity.into(),
            width,
        }
    }
}

/// Persistence boundary for user-driven column resize.
///
/// Holds the externally supplied persisted-width snapshot for the current
/// session plus the identity-keyed lookup that resize updates. Layout
/// computation never mutates the snapshot; the external store is updated
/// only through the `column_width_changed` signal.
///
/// # Signals
///
/// - `column_width_changed((ColumnIdentity, usize, f32))`: Emitted exactly
///   once per [`TablixColumn::resize`](super::TablixColumn::resize) call
///   with the column's identity, position, and new width.
pub struct ColumnWidthManager {
    /// Whether columns auto-size from content. When `false`, persisted
    /// widths are used verbatim and no measurement happens.
    auto_size: AtomicBool,

    /// Ordered persisted widths for the session, as supplied externally.
    snapshot: Mutex<Vec<f32>>,

    /// Identity-keyed widths, updated by user resize.
    lookup: Mutex<HashMap<ColumnIdentity, f32>>,

    /// Emitted when the user resizes a column.
    /// Args: (identity, position, new width).
    pub column_width_changed: Signal<(ColumnIdentity, usize, f32)>,
}

impl ColumnWidthManager {
    /// Creates a manager. `auto_size` controls whether contextual widths
    /// are measured (`true`) or taken verbatim from the persisted snapshot
    /// (`false`).
    pub fn new(auto_size: bool) -> Self {
        Self {
            auto_size: AtomicBool::new(auto_size),
            snapshot: Mutex::new(Vec::new()),
            lookup: Mutex::new(HashMap::new()),
            column_width_changed: Signal::new(),
        }
    }

    /// Whether auto-size measurement is active.
    pub fn is_auto_size(&self) -> bool {
        self.auto_size.load(Ordering::SeqCst)
    }

    /// Switches auto-size measurement on or off.
    pub fn set_auto_size(&self, auto_size: bool) {
        self.auto_size.store(auto_size, Ordering::SeqCst);
    }

    /// Installs the persisted snapshot for the next session.
    ///
    /// Malformed widths (non-finite or non-positive) fall back to the
    /// default contextual width rather than failing the session.
    pub fn set_persisted_widths(&self, entries: &[ColumnWidthEntry]) {
        let mut snapshot = Vec::with_capacity(entries.len());
        let mut lookup = HashMap::with_capacity(entries.len());
        for entry in entries {
            let width = sanitize_width(entry.width).unwrap_or_else(|| {
                tracing::warn!(
                    target: "horizon_tablix::sizing",
                    identity = %entry.identity,
                    width = entry.width,
                    "malformed persisted width, using default"
                );
                DEFAULT_COLUMN_WIDTH
            });
            snapshot.push(width);
            lookup.insert(entry.identity.clone(), width);
        }
        *self.snapshot.lock() = snapshot;
        *self.lookup.lock() = lookup;
    }

    /// The persisted widths snapshot used to initialize a session, in
    /// column order.
    pub fn column_widths(&self) -> Vec<f32> {
        self.snapshot.lock().clone()
    }

    /// The persisted width for a column identity, if one exists.
    pub fn persisted_width(&self, identity: &ColumnIdentity) -> Option<f32> {
        self.lookup.lock().get(identity).copied()
    }

    /// Records a user resize and notifies the external store.
    ///
    /// Called only from [`TablixColumn::resize`](super::TablixColumn::resize);
    /// emits `column_width_changed` exactly once per call. A later resize of
    /// the same column overwrites the previous width (no history kept).
    pub(crate) fn on_column_resized(&self, identity: &ColumnIdentity, position: usize, width: f32) {
        self.lookup.lock().insert(identity.clone(), width);
        tracing::debug!(
            target: "horizon_tablix::sizing",
            identity = %identity,
            position,
            width,
            "column resized"
        );
        self.column_width_changed
            .emit((identity.clone(), position, width));
    }
}

fn sanitize_width(width: f32) -> Option<f32> {
    (width.is_finite() && width > 0.0).then_some(width)
}

static_assertions::assert_impl_all!(ColumnWidthManager: Send, Sync);
