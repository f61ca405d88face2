//! Error types for the tablix engine.

use thiserror::Error;

/// Errors that can occur while building a grouping hierarchy.
///
/// The engine's own query surface never produces errors (absent collections
/// count as zero, out-of-range scrolls clamp); these arise only when a
/// caller constructs a concrete hierarchy or control with invalid inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HierarchyError {
    /// The parent node ID does not exist in the tree.
    #[error("unknown parent node id {0}")]
    UnknownParent(u64),

    /// A header level beyond the hierarchy depth was requested.
    #[error("level {level} out of range for hierarchy of depth {depth}")]
    LevelOutOfRange { level: usize, depth: usize },
}

/// The main error type for tablix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TablixError {
    /// The configured font size is not a finite positive number.
    #[error("font size must be finite and positive, got {0}")]
    InvalidFontSize(f32),

    /// Hierarchy construction failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// A specialized Result type for tablix operations.
pub type Result<T> = std::result::Result<T, TablixError>;
