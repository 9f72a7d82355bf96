//! Command layer: named editor actions, their registry and the palette.
//!
//! ```text
//!  CommandPalette ──query──▸ CommandRegistry::search ──▸ [CommandAction]
//!        │                                                    │
//!        └──execute_selected──▸ CommandAction::run(&mut dyn CommandContext)
//! ```

pub mod builtin;
pub mod palette;
pub mod registry;

use std::fmt;

use thiserror::Error;

use crate::context::CommandContext;

pub use builtin::{core_categories, core_commands, register_core};
pub use palette::CommandPalette;
pub use registry::CommandRegistry;

pub type CommandHandler =
    Box<dyn Fn(&mut dyn CommandContext) -> Result<(), CommandError> + Send + Sync>;
pub type AvailabilityCheck = Box<dyn Fn(&dyn CommandContext) -> bool + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command with id '{0}'")]
    NotFound(String),

    #[error("command '{0}' is not available right now")]
    Unavailable(String),

    #[error("command '{id}' failed: {reason}")]
    Failed { id: String, reason: String },
}

/// Palette section. Lower priority sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCategory {
    pub id: String,
    pub title: String,
    pub priority: u32,
}

impl CommandCategory {
    pub fn new(id: impl Into<String>, title: impl Into<String>, priority: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority,
        }
    }
}

pub struct CommandAction {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Id of a [`CommandCategory`].
    pub category: String,
    pub keywords: Vec<String>,
    pub shortcut: Option<String>,
    handler: CommandHandler,
    availability: Option<AvailabilityCheck>,
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("shortcut", &self.shortcut)
            .field("conditional", &self.availability.is_some())
            .finish()
    }
}

impl CommandAction {
    pub fn new<F>(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut dyn CommandContext) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            category: category.into(),
            keywords: Vec::new(),
            shortcut: None,
            handler: Box::new(handler),
            availability: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Restrict the command to contexts where `check` holds.
    pub fn available_when<F>(mut self, check: F) -> Self
    where
        F: Fn(&dyn CommandContext) -> bool + Send + Sync + 'static,
    {
        self.availability = Some(Box::new(check));
        self
    }

    pub fn is_available(&self, ctx: &dyn CommandContext) -> bool {
        self.availability.as_ref().map_or(true, |check| check(ctx))
    }

    /// Run the handler without checking availability.
    pub fn run(&self, ctx: &mut dyn CommandContext) -> Result<(), CommandError> {
        (self.handler)(ctx)
    }
}
