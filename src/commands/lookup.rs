//! Plugin and dependency source lookup commands

use super::{Command, CommandContext};
use crate::resolve::PluginPrecedence;
use anyhow::Result;
use colored::*;

/// Report the repository expected to serve a plugin
pub struct PluginCommand {
    pub plugin_id: String,
    pub precedence: PluginPrecedence,
}

impl Command for PluginCommand {
    fn execute(&self, context: &CommandContext) -> Result<()> {
        let source = context
            .settings
            .resolve_plugin_source_with(&self.plugin_id, self.precedence)?;
        let version = context
            .settings
            .plugin_management()
            .find_plugin(&self.plugin_id)
            .and_then(|plugin| plugin.version.as_deref());

        match version {
            Some(version) => println!(
                "{} {} -> {}",
                self.plugin_id.bold(),
                version.cyan(),
                source.to_string().green()
            ),
            None => println!("{} -> {}", self.plugin_id.bold(), source.to_string().green()),
        }
        Ok(())
    }
}

/// Report the repository expected to serve a library coordinate
pub struct DependencyCommand {
    pub coordinate: String,
}

impl Command for DependencyCommand {
    fn execute(&self, context: &CommandContext) -> Result<()> {
        let source = context
            .settings
            .resolve_dependency_source(&self.coordinate)?;
        println!("{} -> {}", self.coordinate.bold(), source.to_string().green());
        Ok(())
    }
}
