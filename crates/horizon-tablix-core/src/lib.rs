//! Core systems for Horizon Tablix.
//!
//! This crate provides the foundational components of the Horizon Tablix
//! grid engine:
//!
//! - **Signal/Slot System**: Type-safe component-to-component notification
//! - **Logging**: `tracing` integration with per-subsystem targets
//!
//! The engine above this crate is single-threaded and cooperative: there is
//! no event loop here, and signals dispatch directly on the emitting thread.
//! Hosts that need deferral schedule their own work between rendering
//! iterations.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_tablix_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
