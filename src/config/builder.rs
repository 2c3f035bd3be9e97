//! Settings builder
//!
//! Both the script and YAML front ends feed a [`SettingsBuilder`]; `build`
//! applies defaults and runs every validation before a [`Settings`] exists.

use super::model::{
    DependencyResolutionManagement, ModuleReference, PluginManagement, PluginRequest,
    RepositoriesMode, RepositoryList, RepositorySource, Settings,
};
use super::validation;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

pub const PLUGIN_REPOSITORIES: &str = "pluginManagement.repositories";
pub const DEPENDENCY_REPOSITORIES: &str = "dependencyResolutionManagement.repositories";

/// Builder for creating settings
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    name: Option<String>,
    includes: Vec<String>,
    project_dirs: Vec<(String, PathBuf)>,
    plugin_repositories: Option<Vec<RepositorySource>>,
    plugins: Vec<PluginRequest>,
    dependency_resolution: bool,
    repositories_mode: Option<RepositoriesMode>,
    dependency_repositories: Option<Vec<RepositorySource>>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root project name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Include a module by path (`:app` or `app`)
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    /// Point a module at a directory other than the one derived from its path
    pub fn with_project_dir(mut self, path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.project_dirs.push((path.into(), dir.into()));
        self
    }

    /// Declare the plugin repositories block (repeated calls append)
    pub fn with_plugin_repositories(mut self, sources: Vec<RepositorySource>) -> Self {
        self.plugin_repositories
            .get_or_insert_with(Vec::new)
            .extend(sources);
        self
    }

    pub fn with_plugin(mut self, plugin: PluginRequest) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Mark the dependency resolution block as present, even if empty
    pub fn with_dependency_resolution(mut self) -> Self {
        self.dependency_resolution = true;
        self
    }

    pub fn with_repositories_mode(mut self, mode: RepositoriesMode) -> Self {
        self.dependency_resolution = true;
        self.repositories_mode = Some(mode);
        self
    }

    /// Declare the dependency repositories block (repeated calls append)
    pub fn with_dependency_repositories(mut self, sources: Vec<RepositorySource>) -> Self {
        self.dependency_resolution = true;
        self.dependency_repositories
            .get_or_insert_with(Vec::new)
            .extend(sources);
        self
    }

    /// Validate and freeze the settings.
    ///
    /// `root_dir` anchors module directories and supplies the project name
    /// when none was assigned.
    pub fn build(self, root_dir: &Path) -> Result<Settings> {
        let name = match self.name {
            Some(name) => name,
            None => root_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        validation::validate_project_name(&name)?;

        let plugin_management = match self.plugin_repositories {
            Some(sources) => {
                let repositories = RepositoryList::new(sources);
                validation::validate_repository_list(PLUGIN_REPOSITORIES, &repositories)?;
                PluginManagement {
                    repositories,
                    plugins: self.plugins,
                }
            }
            None => PluginManagement {
                plugins: self.plugins,
                ..PluginManagement::default()
            },
        };

        let mode = self.repositories_mode.unwrap_or_default();
        let repositories = match self.dependency_repositories {
            Some(sources) => {
                let repositories = RepositoryList::new(sources);
                validation::validate_repository_list(DEPENDENCY_REPOSITORIES, &repositories)?;
                repositories
            }
            // Without settings repositories nothing could serve a module that may not declare its own
            None if self.dependency_resolution && mode != RepositoriesMode::PreferProject => {
                return Err(ConfigError::MissingBlock(DEPENDENCY_REPOSITORIES.to_string()));
            }
            None => RepositoryList::default(),
        };

        let mut modules = Vec::with_capacity(self.includes.len());
        for path in &self.includes {
            validation::validate_module_path(path)?;
            modules.push(ModuleReference::from_include(path));
        }
        validation::validate_unique_modules(&modules)?;

        for (path, dir) in self.project_dirs {
            let wanted = ModuleReference::from_include(&path).path;
            let module = modules
                .iter_mut()
                .find(|module| module.path == wanted)
                .ok_or(ConfigError::UnknownModule(wanted))?;
            module.project_dir = dir;
        }
        validation::validate_module_dirs(&modules, root_dir)?;

        Ok(Settings {
            name,
            root_dir: root_dir.to_path_buf(),
            modules,
            plugin_management,
            dependency_resolution: DependencyResolutionManagement { mode, repositories },
        })
    }
}
