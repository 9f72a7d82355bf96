//! Command palette state machine.
//!
//! The palette holds ids, not references, so it can live next to the
//! registry it filters. Any method that needs the command list takes the
//! registry and context explicitly.

use crate::command::{CommandAction, CommandError, CommandRegistry};
use crate::context::CommandContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPalette {
    is_open: bool,
    query: String,
    selected_index: usize,
    filtered: Vec<String>,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Ids of the commands currently listed, in display order.
    pub fn filtered_ids(&self) -> &[String] {
        &self.filtered
    }

    pub fn open(&mut self, registry: &CommandRegistry, ctx: &dyn CommandContext) {
        self.is_open = true;
        self.query.clear();
        self.selected_index = 0;
        self.refresh(registry, ctx);
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.selected_index = 0;
        self.filtered.clear();
    }

    /// Opening clears the query and reloads the list; closing keeps both.
    pub fn toggle(&mut self, registry: &CommandRegistry, ctx: &dyn CommandContext) {
        if self.is_open {
            self.is_open = false;
            self.selected_index = 0;
        } else {
            self.open(registry, ctx);
        }
    }

    pub fn set_query(&mut self, query: &str, registry: &CommandRegistry, ctx: &dyn CommandContext) {
        self.query = query.to_string();
        self.selected_index = 0;
        self.refresh(registry, ctx);
    }

    pub fn select_next(&mut self) {
        self.selected_index = (self.selected_index + 1).min(self.last_index());
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn set_selected_index(&mut self, index: usize) {
        self.selected_index = index.min(self.last_index());
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.filtered.get(self.selected_index).map(String::as_str)
    }

    pub fn selected_command<'r>(&self, registry: &'r CommandRegistry) -> Option<&'r CommandAction> {
        self.selected_id().and_then(|id| registry.command(id))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run the highlighted command, then close. Returns the id that ran,
    /// or `None` when nothing is highlighted.
    pub fn execute_selected(
        &mut self,
        registry: &CommandRegistry,
        ctx: &mut dyn CommandContext,
    ) -> Result<Option<String>, CommandError> {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return Ok(None);
        };
        let result = registry.execute(&id, ctx);
        self.close();
        result.map(|()| Some(id))
    }

    fn refresh(&mut self, registry: &CommandRegistry, ctx: &dyn CommandContext) {
        self.filtered = registry
            .search(&self.query, ctx)
            .into_iter()
            .map(|command| command.id.clone())
            .collect();
    }

    fn last_index(&self) -> usize {
        self.filtered.len().saturating_sub(1)
    }
}
