//! Live editing session.
//!
//! `EditorState` is the single owner of the document being edited, its
//! history and the selection state; it is what commands see through
//! [`CommandContext`]. `EditorSession` adds the command registry, the
//! palette and configuration around it. The registry and the state are
//! separate fields so a command can borrow the registry while mutating
//! the state.

use wavescaler_core::{
    is_different, CellSelection, DropPosition, HistoryConfig, HistoryManager, LaneSelection,
    TreePath, WaveDocument,
};
use wavescaler_format::{decode_share_url, generate, parse, share_url, FormatError, ParseWarning};

use crate::command::{register_core, CommandAction, CommandError, CommandPalette, CommandRegistry};
use crate::config::EditorConfig;
use crate::context::CommandContext;
use crate::theme::{Theme, ThemeStore};

#[derive(Debug)]
pub struct EditorState {
    document: WaveDocument,
    history: HistoryManager,
    cells: Vec<CellSelection>,
    lanes: LaneSelection,
    theme: ThemeStore,
}

impl EditorState {
    /// Default history capacity and an in-memory theme store.
    pub fn new(document: WaveDocument) -> Self {
        Self::with_parts(document, HistoryConfig::default(), ThemeStore::default())
    }

    pub fn with_parts(document: WaveDocument, history: HistoryConfig, theme: ThemeStore) -> Self {
        let mut history = HistoryManager::new(history);
        history.initialize(&document);
        Self {
            document,
            history,
            cells: Vec::new(),
            lanes: LaneSelection::new(),
            theme,
        }
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    pub fn set_selected_cells(&mut self, cells: Vec<CellSelection>) {
        self.cells = cells;
    }

    pub fn select_cell(&mut self, cell: CellSelection) {
        if !self.cells.contains(&cell) {
            self.cells.push(cell);
        }
    }

    pub fn lanes_mut(&mut self) -> &mut LaneSelection {
        &mut self.lanes
    }

    /// Start over with `document`: history is reset to it and selections
    /// are cleared.
    pub fn replace_document(&mut self, document: WaveDocument) {
        self.history.reset();
        self.history.initialize(&document);
        self.document = document;
        self.cells.clear();
        self.lanes.clear();
    }
}

impl CommandContext for EditorState {
    fn document(&self) -> &WaveDocument {
        &self.document
    }

    fn set_document(&mut self, doc: WaveDocument, description: Option<&str>) {
        self.history.save_state(&doc, description);
        self.document = doc;
    }

    fn selected_cells(&self) -> &[CellSelection] {
        &self.cells
    }

    fn clear_cell_selection(&mut self) {
        self.cells.clear();
    }

    fn selected_lanes(&self) -> &LaneSelection {
        &self.lanes
    }

    fn set_selected_lanes(&mut self, lanes: LaneSelection) {
        self.lanes = lanes;
    }

    fn clear_lane_selection(&mut self) {
        self.lanes.clear();
    }

    fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(doc) => {
                self.document = doc;
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(doc) => {
                self.document = doc;
                true
            }
            None => false,
        }
    }

    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn cycle_theme(&mut self) -> Theme {
        self.theme.cycle()
    }
}

// ---------------------------------------------------------------
// Session
// ---------------------------------------------------------------

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    state: EditorState,
    registry: CommandRegistry,
    palette: CommandPalette,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(config, WaveDocument::new())
    }

    /// Session over `document` with the built-in commands registered.
    pub fn with_document(config: EditorConfig, document: WaveDocument) -> Self {
        let state = EditorState::with_parts(document, config.history_config(), config.theme_store());
        let mut registry = CommandRegistry::new();
        register_core(&mut registry);
        Self {
            config,
            state,
            registry,
            palette: CommandPalette::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &WaveDocument {
        self.state.document()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn register_command(&mut self, command: CommandAction) {
        self.registry.register(command);
    }

    pub fn theme(&self) -> Theme {
        self.state.theme().current()
    }

    /// Parse `text` and make it the current document as an undoable edit.
    pub fn load_text(&mut self, text: &str) -> Result<Vec<ParseWarning>, FormatError> {
        let parsed = parse(text)?;
        self.state.set_document(parsed.document, Some("Load document"));
        Ok(parsed.warnings)
    }

    /// Current document rendered with the configured indentation.
    pub fn to_text(&self) -> Result<String, FormatError> {
        generate(self.state.document(), self.config.pretty_output)
    }

    /// Move an item and record the result. Returns `false` when the move
    /// left the document unchanged.
    pub fn move_item(&mut self, source: &TreePath, target: &TreePath, position: DropPosition) -> bool {
        let moved = self.state.document().moved(source, target, position);
        if !is_different(self.state.document(), &moved) {
            log::debug!("move {source} -> {target} ({position:?}) changed nothing");
            return false;
        }
        self.state.set_document(moved, Some("Move item"));
        true
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo()
    }

    pub fn execute(&mut self, id: &str) -> Result<(), CommandError> {
        self.registry.execute(id, &mut self.state)
    }

    pub fn share_url(&self) -> Result<String, FormatError> {
        share_url(&self.config.share_base_url, self.state.document())
    }

    /// Open the document carried by a share link, if it has one. History
    /// starts over from the loaded document.
    pub fn open_share_url(&mut self, url: &str) -> Result<Option<Vec<ParseWarning>>, FormatError> {
        let Some(parsed) = decode_share_url(url)? else {
            return Ok(None);
        };
        self.state.replace_document(parsed.document);
        Ok(Some(parsed.warnings))
    }

    // -- palette ---------------------------------------------------

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    pub fn open_palette(&mut self) {
        self.palette.open(&self.registry, &self.state);
    }

    pub fn close_palette(&mut self) {
        self.palette.close();
    }

    pub fn toggle_palette(&mut self) {
        self.palette.toggle(&self.registry, &self.state);
    }

    pub fn set_palette_query(&mut self, query: &str) {
        self.palette.set_query(query, &self.registry, &self.state);
    }

    pub fn palette_next(&mut self) {
        self.palette.select_next();
    }

    pub fn palette_previous(&mut self) {
        self.palette.select_previous();
    }

    pub fn execute_palette_selection(&mut self) -> Result<Option<String>, CommandError> {
        self.palette.execute_selected(&self.registry, &mut self.state)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescaler_core::Signal;

    #[test]
    fn test_state_starts_with_initial_entry() {
        let state = EditorState::new(WaveDocument::new());
        assert_eq!(state.history().len(), 1);
        assert!(!state.can_undo());
    }

    #[test]
    fn test_set_document_dedups() {
        let mut state = EditorState::new(WaveDocument::new());
        state.set_document(WaveDocument::new(), Some("noop"));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_replace_document_resets_history() {
        let mut state = EditorState::new(WaveDocument::new());
        state.set_document(WaveDocument::with_signals([Signal::new("a", "0").into()]), None);
        state.lanes_mut().select(TreePath::from([0]));

        state.replace_document(WaveDocument::new());
        assert_eq!(state.history().len(), 1);
        assert!(state.selected_lanes().is_empty());
    }

    #[test]
    fn test_move_item_noop_not_recorded() {
        let mut session = EditorSession::with_document(
            EditorConfig::default(),
            WaveDocument::with_signals([Signal::new("a", "0").into(), Signal::new("b", "1").into()]),
        );
        assert!(!session.move_item(&TreePath::from([0]), &TreePath::from([0]), DropPosition::After));
        assert!(!session.move_item(&TreePath::from([7]), &TreePath::from([0]), DropPosition::After));
        assert_eq!(session.state().history().len(), 1);

        assert!(session.move_item(&TreePath::from([0]), &TreePath::from([1]), DropPosition::After));
        let names: Vec<_> = session
            .document()
            .signals()
            .map(|(_, s)| s.name_or_default().to_string())
            .collect();
        assert_eq!(names, ["b", "a"]);
        assert!(session.undo());
    }

    #[test]
    fn test_config_capacity_applies() {
        let config = EditorConfig {
            history_capacity: 2,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::new(config);
        for _ in 0..5 {
            session.execute("add-spacer").unwrap();
        }
        assert_eq!(session.state().history().len(), 2);
    }
}
