use std::collections::HashMap;

use crate::command::{CommandAction, CommandCategory, CommandError};
use crate::context::CommandContext;

/// Commands in registration order, plus their categories.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandAction>,
    index: HashMap<String, usize>,
    categories: HashMap<String, CommandCategory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Re-registering an id replaces the command in place.
    pub fn register(&mut self, command: CommandAction) {
        match self.index.get(&command.id) {
            Some(&slot) => {
                log::debug!("replacing command '{}'", command.id);
                self.commands[slot] = command;
            }
            None => {
                self.index.insert(command.id.clone(), self.commands.len());
                self.commands.push(command);
            }
        }
    }

    pub fn register_many(&mut self, commands: impl IntoIterator<Item = CommandAction>) {
        for command in commands {
            self.register(command);
        }
    }

    pub fn register_category(&mut self, category: CommandCategory) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn command(&self, id: &str) -> Option<&CommandAction> {
        self.index.get(id).map(|&slot| &self.commands[slot])
    }

    pub fn category(&self, id: &str) -> Option<&CommandCategory> {
        self.categories.get(id)
    }

    /// All categories, by ascending priority.
    pub fn categories(&self) -> Vec<&CommandCategory> {
        let mut categories: Vec<_> = self.categories.values().collect();
        categories.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        categories
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn available_commands(&self, ctx: &dyn CommandContext) -> Vec<&CommandAction> {
        self.commands.iter().filter(|c| c.is_available(ctx)).collect()
    }

    /// Available commands matching `query`, best match first.
    ///
    /// A command matches when the lower-cased query occurs in its title,
    /// description, any keyword, or its category's title. Results are
    /// ordered exact title match, then title prefix, then by title. A blank
    /// query returns every available command in registration order.
    pub fn search(&self, query: &str, ctx: &dyn CommandContext) -> Vec<&CommandAction> {
        let available = self.available_commands(ctx);
        if query.trim().is_empty() {
            return available;
        }

        let term = query.to_lowercase();
        let mut matches: Vec<_> = available
            .into_iter()
            .filter(|command| self.matches(command, &term))
            .collect();

        matches.sort_by_cached_key(|command| {
            let title = command.title.to_lowercase();
            let rank = if title == term {
                0
            } else if title.starts_with(&term) {
                1
            } else {
                2
            };
            (rank, title)
        });
        matches
    }

    fn matches(&self, command: &CommandAction, term: &str) -> bool {
        command.title.to_lowercase().contains(term)
            || command
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(term))
            || command.keywords.iter().any(|k| k.to_lowercase().contains(term))
            || self
                .categories
                .get(&command.category)
                .is_some_and(|c| c.title.to_lowercase().contains(term))
    }

    /// Available commands grouped by category id. Registered categories come
    /// first by priority; commands naming an unknown category follow in
    /// order of first appearance.
    pub fn commands_by_category(&self, ctx: &dyn CommandContext) -> Vec<(String, Vec<&CommandAction>)> {
        let mut groups: Vec<(String, Vec<&CommandAction>)> = self
            .categories()
            .into_iter()
            .map(|category| (category.id.clone(), Vec::new()))
            .collect();

        for command in self.available_commands(ctx) {
            match groups.iter_mut().find(|(id, _)| *id == command.category) {
                Some((_, commands)) => commands.push(command),
                None => groups.push((command.category.clone(), vec![command])),
            }
        }

        groups.retain(|(_, commands)| !commands.is_empty());
        groups
    }

    /// Look up, check availability, and run.
    pub fn execute(&self, id: &str, ctx: &mut dyn CommandContext) -> Result<(), CommandError> {
        let command = self
            .command(id)
            .ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        if !command.is_available(ctx) {
            log::debug!("command '{id}' refused: not available");
            return Err(CommandError::Unavailable(id.to_string()));
        }
        log::debug!("executing command '{id}'");
        command.run(ctx)
    }
}
