//! End-to-end editing sessions: load text, run commands, undo, share.

use wavescaler_core::{CellSelection, DropPosition, TreePath};
use wavescaler_editor::{
    CommandContext, CommandError, EditorConfig, EditorSession, FilePreferences, PreferenceStore,
    Theme,
};

const SOURCE: &str = r#"{
  signal: [
    { name: 'clk', wave: 'p...' },
    [ 'bus',
      { name: 'd0', wave: '0.1.' },
      { name: 'd1', wave: '1...' },
    ],
  ],
}"#;

fn loaded_session() -> EditorSession {
    let mut session = EditorSession::default();
    let warnings = session.load_text(SOURCE).unwrap();
    assert!(warnings.is_empty());
    session
}

#[test]
fn test_load_is_undoable() {
    let mut session = loaded_session();
    assert_eq!(session.document().signal.len(), 2);
    assert!(session.undo());
    assert!(session.document().signal.is_empty());
    assert!(session.redo());
    assert_eq!(session.document().signal.len(), 2);
}

#[test]
fn test_bad_text_leaves_document_alone() {
    let mut session = loaded_session();
    let before = session.document().clone();
    assert!(session.load_text("{ signal: ").is_err());
    assert_eq!(session.document(), &before);
}

#[test]
fn test_edit_cells_then_undo() {
    let mut session = loaded_session();
    session.state_mut().set_selected_cells(vec![
        CellSelection::new(TreePath::from([1, 0]), 0, "d0"),
        CellSelection::new(TreePath::from([1, 1]), 2, "d1"),
    ]);
    session.execute("invert-selection").unwrap();

    let d0 = session.state().signal_at(&TreePath::from([1, 0])).unwrap();
    assert_eq!(d0.wave_str(), "101.");
    let d1 = session.state().signal_at(&TreePath::from([1, 1])).unwrap();
    assert_eq!(d1.wave_str(), "1.01");

    session.execute("undo").unwrap();
    let d0 = session.state().signal_at(&TreePath::from([1, 0])).unwrap();
    assert_eq!(d0.wave_str(), "0.1.");
}

#[test]
fn test_move_into_group_and_out() {
    let mut session = loaded_session();
    assert!(session.move_item(&TreePath::from([0]), &TreePath::from([1]), DropPosition::Inside));
    let group = session.document().signal[0].as_group().unwrap();
    assert_eq!(group.items.len(), 3);

    assert!(session.move_item(&TreePath::from([0, 2]), &TreePath::from([0]), DropPosition::Before));
    assert_eq!(
        session.document().signal[0].as_signal().and_then(|s| s.name.as_deref()),
        Some("clk")
    );
}

#[test]
fn test_palette_flow() {
    let mut session = loaded_session();
    session.open_palette();
    session.set_palette_query("zoom");
    assert_eq!(session.palette().selected_id(), Some("zoom-in"));
    session.palette_next();
    assert_eq!(session.palette().selected_id(), Some("zoom-out"));
    session.palette_previous();

    let ran = session.execute_palette_selection().unwrap();
    assert_eq!(ran.as_deref(), Some("zoom-in"));
    assert_eq!(session.document().hscale(), 1.25);
    assert!(!session.palette().is_open());
}

#[test]
fn test_unavailable_command_errors() {
    let mut session = loaded_session();
    assert_eq!(
        session.execute("clear-selection"),
        Err(CommandError::Unavailable("clear-selection".into()))
    );
}

#[test]
fn test_share_round_trip() {
    let session = loaded_session();
    let url = session.share_url().unwrap();
    assert!(url.starts_with("http://localhost:5173/?waveform="));

    let mut other = EditorSession::default();
    let warnings = other.open_share_url(&url).unwrap();
    assert_eq!(warnings, Some(Vec::new()));
    assert_eq!(other.document(), session.document());
    assert!(!other.undo());

    assert_eq!(other.open_share_url("http://localhost:5173/").unwrap(), None);
}

#[test]
fn test_to_text_follows_config() {
    let config = EditorConfig {
        pretty_output: false,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::new(config);
    session.execute("add-signal").unwrap();
    assert_eq!(
        session.to_text().unwrap(),
        r#"{"signal":[{"name":"sig1","wave":"0..1..0."}]}"#
    );
}

#[test]
fn test_theme_persists_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");
    let config = EditorConfig {
        preferences_path: Some(prefs.clone()),
        ..EditorConfig::default()
    };

    let mut session = EditorSession::new(config.clone());
    assert_eq!(session.theme(), Theme::Auto);
    session.execute("cycle-theme").unwrap();
    session.execute("cycle-theme").unwrap();
    assert_eq!(session.theme(), Theme::Dark);

    let reopened = EditorSession::new(config);
    assert_eq!(reopened.theme(), Theme::Dark);

    let stored = FilePreferences::new(&prefs).get("theme").unwrap();
    assert_eq!(stored.as_deref(), Some("dark"));
}
