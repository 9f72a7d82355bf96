//! Built-in categories and commands.

use std::collections::HashSet;

use wavescaler_core::{
    item_at_path_mut, Group, LaneSelection, Signal, SignalItem, WaveConfig, WaveDocument,
    IMPLICIT_CYCLE,
};

use crate::command::{CommandAction, CommandCategory, CommandError, CommandRegistry};
use crate::context::CommandContext;

/// Wave given to newly added signals.
pub const NEW_SIGNAL_WAVE: &str = "0..1..0.";

pub const ZOOM_STEP: f64 = 0.25;
pub const ZOOM_MIN: f64 = 0.25;
pub const ZOOM_MAX: f64 = 3.0;

pub fn core_categories() -> Vec<CommandCategory> {
    vec![
        CommandCategory::new("waveform", "Waveform", 1),
        CommandCategory::new("selection", "Selection", 2),
        CommandCategory::new("edit", "Edit", 3),
        CommandCategory::new("view", "View", 4),
        CommandCategory::new("file", "File", 5),
    ]
}

pub fn core_commands() -> Vec<CommandAction> {
    vec![
        // Waveform
        CommandAction::new("add-signal", "Add Signal", "waveform", add_signal)
            .with_description("Add a new signal to the waveform")
            .with_keywords(["signal", "new", "create"])
            .with_shortcut("Ctrl+Shift+S"),
        CommandAction::new("add-group", "Add Group", "waveform", add_group)
            .with_description("Add a new signal group")
            .with_keywords(["group", "folder", "organize"])
            .with_shortcut("Ctrl+Shift+G"),
        CommandAction::new("add-spacer", "Add Spacer", "waveform", |ctx| {
            let mut doc = ctx.document().clone();
            doc.signal.push(SignalItem::Spacer);
            ctx.set_document(doc, Some("Add spacer"));
            Ok(())
        })
        .with_description("Add a spacer line for visual separation")
        .with_keywords(["spacer", "separator", "divider"]),
        // Selection
        CommandAction::new("clear-selection", "Clear Selection", "selection", |ctx| {
            ctx.clear_cell_selection();
            ctx.clear_lane_selection();
            Ok(())
        })
        .with_description("Clear all selected cells and lanes")
        .with_keywords(["clear", "deselect", "none"])
        .with_shortcut("Escape")
        .available_when(|ctx| !ctx.selected_cells().is_empty() || !ctx.selected_lanes().is_empty()),
        CommandAction::new("select-all-signals", "Select All Signals", "selection", |ctx| {
            let lanes: LaneSelection = ctx.document().signal_paths().into_iter().collect();
            ctx.set_selected_lanes(lanes);
            Ok(())
        })
        .with_description("Select all signal lanes")
        .with_keywords(["select", "all", "signals"])
        .with_shortcut("Ctrl+A"),
        // Edit
        CommandAction::new("set-high", "Set to High (1)", "edit", |ctx| {
            set_selected_cells(ctx, '1', "Set cells high")
        })
        .with_description("Set selected cells to high state")
        .with_keywords(["high", "1", "set"])
        .with_shortcut("1")
        .available_when(has_cells),
        CommandAction::new("set-low", "Set to Low (0)", "edit", |ctx| {
            set_selected_cells(ctx, '0', "Set cells low")
        })
        .with_description("Set selected cells to low state")
        .with_keywords(["low", "0", "set"])
        .with_shortcut("0")
        .available_when(has_cells),
        CommandAction::new("set-unknown", "Set to Unknown (X)", "edit", |ctx| {
            set_selected_cells(ctx, 'x', "Set cells unknown")
        })
        .with_description("Set selected cells to unknown state")
        .with_keywords(["unknown", "x", "undefined"])
        .with_shortcut("x")
        .available_when(has_cells),
        CommandAction::new("invert-selection", "Invert Selection", "edit", |ctx| {
            edit_selected_cells(ctx, "Invert cells", |current| current.and_then(inverted))
        })
        .with_description("Invert binary values in selected cells (0↔1)")
        .with_keywords(["invert", "toggle", "flip"])
        .with_shortcut("Ctrl+I")
        .available_when(has_cells),
        CommandAction::new("undo", "Undo", "edit", |ctx| {
            ctx.undo();
            Ok(())
        })
        .with_description("Revert the last change")
        .with_keywords(["undo", "revert", "back"])
        .with_shortcut("Ctrl+Z")
        .available_when(|ctx| ctx.can_undo()),
        CommandAction::new("redo", "Redo", "edit", |ctx| {
            ctx.redo();
            Ok(())
        })
        .with_description("Reapply the last undone change")
        .with_keywords(["redo", "forward"])
        .with_shortcut("Ctrl+Shift+Z")
        .available_when(|ctx| ctx.can_redo()),
        // View
        CommandAction::new("zoom-in", "Zoom In", "view", |ctx| {
            set_zoom(ctx, |scale| (scale + ZOOM_STEP).min(ZOOM_MAX), "Zoom in")
        })
        .with_description("Increase horizontal scale")
        .with_keywords(["zoom", "scale", "magnify"])
        .with_shortcut("Ctrl+Wheel Down"),
        CommandAction::new("zoom-out", "Zoom Out", "view", |ctx| {
            set_zoom(ctx, |scale| (scale - ZOOM_STEP).max(ZOOM_MIN), "Zoom out")
        })
        .with_description("Decrease horizontal scale")
        .with_keywords(["zoom", "scale", "shrink"])
        .with_shortcut("Ctrl+Wheel Up"),
        CommandAction::new("reset-zoom", "Reset Zoom", "view", |ctx| {
            set_zoom(ctx, |_| 1.0, "Reset zoom")
        })
        .with_description("Reset horizontal scale to 1x")
        .with_keywords(["reset", "zoom", "default"])
        .with_shortcut("Ctrl+0"),
        CommandAction::new("cycle-theme", "Cycle Theme", "view", |ctx| {
            let theme = ctx.cycle_theme();
            log::debug!("theme is now {theme}");
            Ok(())
        })
        .with_description("Switch between auto, light and dark appearance")
        .with_keywords(["theme", "dark", "light", "appearance"]),
        // File
        CommandAction::new("clear-waveform", "Clear Waveform", "file", |ctx| {
            let doc = WaveDocument {
                config: Some(WaveConfig {
                    hscale: Some(1.into()),
                    ..WaveConfig::default()
                }),
                ..WaveDocument::default()
            };
            ctx.set_document(doc, Some("Clear waveform"));
            ctx.clear_cell_selection();
            ctx.clear_lane_selection();
            Ok(())
        })
        .with_description("Remove all signals and start fresh")
        .with_keywords(["clear", "delete", "empty", "new"]),
    ]
}

/// Register [`core_categories`] and [`core_commands`].
pub fn register_core(registry: &mut CommandRegistry) {
    for category in core_categories() {
        registry.register_category(category);
    }
    registry.register_many(core_commands());
}

fn has_cells(ctx: &dyn CommandContext) -> bool {
    !ctx.selected_cells().is_empty()
}

fn add_signal(ctx: &mut dyn CommandContext) -> Result<(), CommandError> {
    let name = next_name(&signal_names(ctx.document()), "sig");
    let mut doc = ctx.document().clone();
    doc.signal.push(Signal::new(name, NEW_SIGNAL_WAVE).into());
    ctx.set_document(doc, Some("Add signal"));
    Ok(())
}

fn add_group(ctx: &mut dyn CommandContext) -> Result<(), CommandError> {
    let group_name = next_name(&group_names(ctx.document()), "Group");
    let signal_name = next_name(&signal_names(ctx.document()), "sig");
    let mut doc = ctx.document().clone();
    doc.signal.push(
        Group::new(group_name)
            .with_items([Signal::new(signal_name, NEW_SIGNAL_WAVE).into()])
            .into(),
    );
    ctx.set_document(doc, Some("Add group"));
    Ok(())
}

fn set_zoom(
    ctx: &mut dyn CommandContext,
    scale: impl Fn(f64) -> f64,
    description: &str,
) -> Result<(), CommandError> {
    let mut doc = ctx.document().clone();
    doc.set_hscale(scale(doc.hscale()));
    ctx.set_document(doc, Some(description));
    Ok(())
}

fn set_selected_cells(
    ctx: &mut dyn CommandContext,
    value: char,
    description: &str,
) -> Result<(), CommandError> {
    edit_selected_cells(ctx, description, |_| Some(value))
}

/// Apply `edit` to the effective value of every selected cell and commit
/// the result as one history entry.
///
/// Effective values are read from the document as it was before the edit,
/// so overlapping cells in one batch do not see each other's changes. A
/// following implicit cycle is pinned to its old value first so the edit
/// stays confined to the selected cell.
fn edit_selected_cells(
    ctx: &mut dyn CommandContext,
    description: &str,
    edit: impl Fn(Option<char>) -> Option<char>,
) -> Result<(), CommandError> {
    let mut doc = ctx.document().clone();
    let mut changed = false;

    for cell in ctx.selected_cells() {
        let Some(original) = ctx.signal_at(&cell.path) else {
            log::debug!("skipping cell at {}: not a signal", cell.path);
            continue;
        };
        let current = original.effective_value(cell.cycle);
        let Some(value) = edit(current) else {
            continue;
        };
        if current == Some(value) {
            continue;
        }

        let Some(SignalItem::Signal(target)) = item_at_path_mut(&mut doc.signal, &cell.path) else {
            continue;
        };
        let next = cell.cycle + 1;
        let target_next = target.wave_str().chars().nth(next);
        if target_next == Some(IMPLICIT_CYCLE) {
            if let Some(held) = original.effective_value(next) {
                target.set_cycle(next, held);
            }
        }
        target.set_cycle(cell.cycle, value);
        changed = true;
    }

    if changed {
        ctx.set_document(doc, Some(description));
    }
    Ok(())
}

/// Binary-ish complement used by invert: 0↔1, h↔l, H↔L, p↔n, P↔N.
pub fn inverted(value: char) -> Option<char> {
    match value {
        '0' => Some('1'),
        '1' => Some('0'),
        'h' => Some('l'),
        'l' => Some('h'),
        'H' => Some('L'),
        'L' => Some('H'),
        'p' => Some('n'),
        'n' => Some('p'),
        'P' => Some('N'),
        'N' => Some('P'),
        _ => None,
    }
}

/// `{prefix}N` for the smallest N ≥ 1 not in `taken`.
pub fn next_name(taken: &HashSet<String>, prefix: &str) -> String {
    (1..)
        .map(|n| format!("{prefix}{n}"))
        .find(|name| !taken.contains(name))
        .unwrap_or_else(|| prefix.to_string())
}

fn signal_names(doc: &WaveDocument) -> HashSet<String> {
    doc.signals()
        .filter_map(|(_, signal)| signal.name.clone())
        .collect()
}

fn group_names(doc: &WaveDocument) -> HashSet<String> {
    fn walk(items: &[SignalItem], out: &mut HashSet<String>) {
        for item in items {
            if let SignalItem::Group(group) = item {
                out.insert(group.name.clone());
                walk(&group.items, out);
            }
        }
    }

    let mut names = HashSet::new();
    walk(&doc.signal, &mut names);
    names
}
