//! User command registry.
//!
//! ## Module Structure
//!
//! - **parser.rs**: prefix stripping and tokenizing of input lines
//! - **suggest.rs**: "did you mean" matching for unknown commands

pub mod parser;
pub mod suggest;

pub use parser::{parse_line, Builtin, ParsedLine};
pub use suggest::suggest;

use crate::repl::Repl;
use std::rc::Rc;

pub type Executor = Rc<dyn Fn(&Repl, &str) -> anyhow::Result<()>>;
pub type UsageProducer = Rc<dyn Fn() -> String>;

/// A registered command.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub usage: UsageProducer,
    pub executor: Executor,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Commands keyed by name, kept in insertion order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command. Replaces any existing command with the same name,
    /// keeping its original position.
    pub fn add(&mut self, command: Command) {
        match self.position(&command.name) {
            Some(index) => self.commands[index] = command,
            None => self.commands.push(command),
        }
    }

    /// Remove a command; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.position(name).map(|index| self.commands.remove(index))
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Command names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|command| command.name == name)
    }
}
