//! Base types and traits for the command pattern

use crate::config::Settings;
use anyhow::Result;

/// Context passed to all commands
#[derive(Clone)]
pub struct CommandContext {
    /// The loaded settings
    pub settings: Settings,
}

/// Trait that all commands must implement
pub trait Command {
    /// Execute the command with the given context
    fn execute(&self, context: &CommandContext) -> Result<()>;
}
