//! wavescaler — WaveJSON timing diagrams from the command line.
//!
//! Formats, checks, rearranges and shares WaveDrom diagrams using the same
//! editing core as the interactive editor.

mod commands;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use wavescaler_core::{DropPosition, TreePath};
use wavescaler_editor::{EditorConfig, Theme};

#[derive(Parser)]
#[command(name = "wavescaler")]
#[command(about = "Format, check, rearrange and share WaveJSON timing diagrams")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-emit a diagram as strict JSON
    Fmt {
        /// Input file, or `-` for stdin
        input: String,
        /// Single-line output
        #[arg(long)]
        compact: bool,
        /// Write the relaxed dialect instead of strict JSON
        #[arg(long, conflicts_with = "compact")]
        relaxed: bool,
    },
    /// Validate a diagram and report warnings
    Check {
        input: String,
    },
    /// Print a shareable link for a diagram
    Share {
        input: String,
        /// Override the configured base URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print the diagram carried by a shareable link
    OpenUrl {
        url: String,
    },
    /// Move one item of the signal tree
    Move {
        input: String,
        /// Path of the item to move, e.g. `1.0`
        #[arg(long)]
        from: TreePath,
        /// Path of the drop target, as addressed before the move
        #[arg(long)]
        to: TreePath,
        #[arg(long, value_enum, default_value_t = Position::After)]
        position: Position,
        #[arg(long)]
        compact: bool,
    },
    /// List editor commands, optionally filtered
    Commands {
        query: Option<String>,
    },
    /// Show or change the saved theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Set { theme: Theme },
    Cycle,
}

#[derive(Clone, Copy, ValueEnum)]
enum Position {
    Before,
    After,
    Inside,
}

impl From<Position> for DropPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Before => DropPosition::Before,
            Position::After => DropPosition::After,
            Position::Inside => DropPosition::Inside,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Fmt {
            input,
            compact,
            relaxed,
        } => commands::fmt(&config, &input, compact, relaxed, &mut out),
        Command::Check { input } => commands::check(&input, &mut out),
        Command::Share { input, base_url } => {
            commands::share(&config, &input, base_url.as_deref(), &mut out)
        }
        Command::OpenUrl { url } => commands::open_url(&config, &url, &mut out),
        Command::Move {
            input,
            from,
            to,
            position,
            compact,
        } => commands::move_item(&config, &input, &from, &to, position.into(), compact, &mut out),
        Command::Commands { query } => commands::list_commands(query.as_deref(), &mut out),
        Command::Theme { action } => {
            let action = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => commands::ThemeOp::Show,
                ThemeAction::Set { theme } => commands::ThemeOp::Set(theme),
                ThemeAction::Cycle => commands::ThemeOp::Cycle,
            };
            commands::theme(&config, action, &mut out, &mut io::stderr())
        }
    }
}
