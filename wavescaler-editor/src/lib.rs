//! # wavescaler-editor — editing session and command layer
//!
//! Wraps the document model and serializer into something a front end can
//! drive: a session that owns the live document and its history, named
//! commands behind a searchable palette, a persisted theme preference and
//! TOML configuration.
//!
//! ```text
//!  front end ──▸ EditorSession ──▸ CommandRegistry::execute
//!                    │                    │
//!                    │                    ▼
//!                    └──────────▸ EditorState (impl CommandContext)
//!                                   document · history · selections · theme
//! ```

pub mod command;
pub mod config;
pub mod context;
pub mod session;
pub mod theme;

pub use command::{
    CommandAction, CommandCategory, CommandError, CommandPalette, CommandRegistry,
};
pub use config::{ConfigError, EditorConfig};
pub use context::CommandContext;
pub use session::{EditorSession, EditorState};
pub use theme::{
    EffectiveTheme, FilePreferences, MemoryPreferences, PreferenceError, PreferenceStore, Theme,
    ThemeStore,
};
