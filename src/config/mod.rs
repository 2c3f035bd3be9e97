//! Settings loading, schema and validation

pub mod builder;
pub mod lexer;
pub mod loader;
pub mod model;
pub mod parser;
pub mod validation;
mod yaml;

pub use builder::SettingsBuilder;
pub use loader::{ConfigSource, SettingsFormat, find_settings_file, load};
pub use model::{
    ContentFilter, DependencyResolutionManagement, GroupMatcher, GroupPattern, ModuleReference,
    PluginManagement, PluginRequest, RepositoriesMode, RepositoryKind, RepositoryList,
    RepositorySource, Settings,
};
