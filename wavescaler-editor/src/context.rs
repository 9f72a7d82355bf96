//! The seam between commands and whatever owns the live document.

use wavescaler_core::{
    item_at_path, item_at_path_mut, CellSelection, LaneSelection, Signal, SignalItem, TreePath,
    WaveDocument,
};

use crate::theme::Theme;

/// Everything a command may read or change.
///
/// Implemented by [`EditorState`](crate::session::EditorState); tests may
/// provide their own.
pub trait CommandContext {
    fn document(&self) -> &WaveDocument;

    /// Replace the live document and record it in history.
    fn set_document(&mut self, doc: WaveDocument, description: Option<&str>);

    fn selected_cells(&self) -> &[CellSelection];
    fn clear_cell_selection(&mut self);

    fn selected_lanes(&self) -> &LaneSelection;
    fn set_selected_lanes(&mut self, lanes: LaneSelection);
    fn clear_lane_selection(&mut self);

    fn undo(&mut self) -> bool;
    fn redo(&mut self) -> bool;
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;

    fn cycle_theme(&mut self) -> Theme;

    fn signal_at(&self, path: &TreePath) -> Option<&Signal> {
        item_at_path(&self.document().signal, path).and_then(SignalItem::as_signal)
    }

    /// Replace the Signal at `path`. Returns `false`, changing nothing,
    /// when `path` does not address a Signal.
    fn update_signal_at(&mut self, path: &TreePath, signal: Signal) -> bool {
        let mut doc = self.document().clone();
        match item_at_path_mut(&mut doc.signal, path) {
            Some(SignalItem::Signal(slot)) => *slot = signal,
            _ => return false,
        }
        self.set_document(doc, Some("Update signal"));
        true
    }
}
