//! Settings resolver - loads and validates build settings files
//!
//! A settings file declares where plugins and dependencies are fetched
//! from, whether modules may declare their own repositories, the root
//! project name and the included modules. [`Settings`] is the validated,
//! immutable result; it can be shared freely once loaded.

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod policy;
pub mod resolve;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::{ConfigSource, ModuleReference, RepositoriesMode, RepositorySource, Settings};
pub use error::{ConfigError, ResolveError};
pub use policy::{ModuleCheck, RepositoryOrigin};
pub use resolve::{Coordinate, PluginPrecedence};

/// Load the settings file of the build in the current directory
pub fn load_default_settings() -> error::Result<Settings> {
    Settings::discover(".")
}
