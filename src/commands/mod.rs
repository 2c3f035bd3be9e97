//! Command implementations for the settings CLI

pub mod base;
pub mod check;
pub mod lookup;
pub mod show;
pub mod validators;

pub use base::{Command, CommandContext};
pub use check::CheckCommand;
pub use lookup::{DependencyCommand, PluginCommand};
pub use show::ShowCommand;
