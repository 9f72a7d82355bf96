//! Subcommand implementations. Each writes its result to `out`.

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use wavescaler_core::{try_move_item, CellSelection, DropPosition, SignalItem, TreePath, WaveDocument};
use wavescaler_editor::command::register_core;
use wavescaler_editor::{CommandContext, CommandRegistry, EditorConfig, EditorState, Theme};
use wavescaler_format::{decode_share_url, generate, parse, share_url, to_relaxed, ParsedDocument};

pub enum ThemeOp {
    Show,
    Set(Theme),
    Cycle,
}

/// Read `input`, where `-` means stdin.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read input file: {input}"))
}

fn parse_input(input: &str) -> Result<ParsedDocument> {
    let text = read_input(input)?;
    parse(&text).with_context(|| format!("Failed to parse {input}"))
}

fn write_document(doc: &WaveDocument, pretty: bool, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", generate(doc, pretty)?)?;
    Ok(())
}

pub fn fmt(
    config: &EditorConfig,
    input: &str,
    compact: bool,
    relaxed: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let parsed = parse_input(input)?;
    if relaxed {
        writeln!(out, "{}", to_relaxed(&parsed.document)?)?;
        return Ok(());
    }
    write_document(&parsed.document, config.pretty_output && !compact, out)
}

pub fn check(input: &str, out: &mut dyn Write) -> Result<()> {
    let parsed = parse_input(input)?;
    let signals = parsed.document.signal_paths().len();
    writeln!(
        out,
        "{input}: ok ({signals} signals, {} warnings)",
        parsed.warnings.len()
    )?;
    for warning in &parsed.warnings {
        writeln!(out, "  warning: {warning}")?;
    }
    Ok(())
}

pub fn share(
    config: &EditorConfig,
    input: &str,
    base_url: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let parsed = parse_input(input)?;
    let base = base_url.unwrap_or(&config.share_base_url);
    writeln!(out, "{}", share_url(base, &parsed.document)?)?;
    Ok(())
}

pub fn open_url(config: &EditorConfig, url: &str, out: &mut dyn Write) -> Result<()> {
    let Some(parsed) = decode_share_url(url).context("Failed to decode shared diagram")? else {
        bail!("URL has no 'waveform' parameter");
    };
    write_document(&parsed.document, config.pretty_output, out)
}

pub fn move_item(
    config: &EditorConfig,
    input: &str,
    from: &TreePath,
    to: &TreePath,
    position: DropPosition,
    compact: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let parsed = parse_input(input)?;
    let doc = parsed.document;
    let signal = try_move_item(&doc.signal, from, to, position)
        .with_context(|| format!("Cannot move {from} to {to}"))?;
    log::info!("moved {from} {position:?} {to}");
    write_document(&doc.with_signal(signal), config.pretty_output && !compact, out)
}

pub fn list_commands(query: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let mut registry = CommandRegistry::new();
    register_core(&mut registry);

    // Availability is judged against an editor with a selected cell and
    // history in both directions, so conditional commands are listed too.
    let mut ctx = EditorState::new(WaveDocument::new());
    ctx.select_cell(CellSelection::new(TreePath::from([0]), 0, ""));
    for spacers in 1..=2 {
        ctx.set_document(WaveDocument::with_signals(vec![SignalItem::Spacer; spacers]), None);
    }
    ctx.undo();

    let commands = registry.search(query.unwrap_or(""), &ctx);
    if commands.is_empty() {
        writeln!(out, "no matching commands")?;
        return Ok(());
    }
    for command in commands {
        let category = registry
            .category(&command.category)
            .map_or(command.category.as_str(), |c| c.title.as_str());
        write!(out, "{:<20} {:<22} {:<10}", command.id, command.title, category)?;
        match &command.shortcut {
            Some(shortcut) => writeln!(out, " {shortcut}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

/// Changes only outlive the process when `preferences_path` is configured;
/// otherwise a note goes to `notes`.
pub fn theme(
    config: &EditorConfig,
    op: ThemeOp,
    out: &mut dyn Write,
    notes: &mut dyn Write,
) -> Result<()> {
    let mut store = config.theme_store();
    let changed = match op {
        ThemeOp::Show => false,
        ThemeOp::Set(theme) => {
            store.set_theme(theme);
            true
        }
        ThemeOp::Cycle => {
            store.cycle();
            true
        }
    };
    writeln!(out, "{}", store.current())?;
    if changed && config.preferences_path.is_none() {
        writeln!(
            notes,
            "note: theme not saved; set `preferences_path` in the config file to keep it"
        )?;
    }
    Ok(())
}
