//! # wavescaler-core — WaveJSON editing core
//!
//! Document model, path-addressed tree editing and snapshot history for
//! WaveDrom timing diagrams.
//!
//! ## Architecture
//!
//! ```text
//!  UI edit ──▸ tree::move_item / direct mutation
//!                    │
//!                    ▼ new WaveDocument
//!            HistoryManager::save_state ──(diff::is_different)──▸ entries
//!                    │
//!                    ▼ undo / redo
//!            owned snapshot copy back to the caller
//! ```
//!
//! ## Modules
//!
//! - [`model`]: `WaveDocument`, `SignalItem` (Signal | Group | Spacer)
//! - [`path`]: `TreePath` addressing
//! - [`tree`]: copy-on-write move/insert/remove
//! - [`diff`]: structural difference used for history dedup
//! - [`history`]: bounded linear undo/redo log
//! - [`selection`]: lane and cell selection

pub mod diff;
pub mod history;
pub mod model;
pub mod path;
pub mod selection;
pub mod tree;

pub use diff::is_different;
pub use history::{HistoryConfig, HistoryEntry, HistoryManager, DEFAULT_CAPACITY};
pub use model::{
    Group, Signal, SignalData, SignalItem, TextSection, WaveConfig, WaveDocument, IMPLICIT_CYCLE,
};
pub use path::{ParsePathError, TreePath};
pub use selection::{CellSelection, LaneSelection};
pub use tree::{
    insert_item, item_at_path, item_at_path_mut, move_item, remove_item, try_insert_item,
    try_item_at_path, try_move_item, try_remove_item, DropPosition, TreeError,
};
