//! Show command implementation

use super::{Command, CommandContext};
use crate::config::{GroupMatcher, RepositoryList, Settings};
use anyhow::Result;
use colored::*;
use serde::Serialize;

/// Output format for a repository in JSON mode
#[derive(Serialize)]
struct RepositoryOutput {
    name: String,
    url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude: Vec<String>,
}

#[derive(Serialize)]
struct ModuleOutput {
    path: String,
    dir: String,
}

#[derive(Serialize)]
struct PluginOutput {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    apply: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsOutput {
    name: String,
    root_dir: String,
    repositories_mode: String,
    modules: Vec<ModuleOutput>,
    plugin_repositories: Vec<RepositoryOutput>,
    plugins: Vec<PluginOutput>,
    dependency_repositories: Vec<RepositoryOutput>,
}

fn describe_all(matchers: &[GroupMatcher]) -> Vec<String> {
    matchers.iter().map(GroupMatcher::describe).collect()
}

fn repository_outputs(repositories: &RepositoryList) -> Vec<RepositoryOutput> {
    repositories
        .iter()
        .map(|source| {
            let (include, exclude) = match &source.content {
                Some(content) => (
                    describe_all(&content.includes),
                    describe_all(&content.excludes),
                ),
                None => (Vec::new(), Vec::new()),
            };
            RepositoryOutput {
                name: source.name().to_string(),
                url: source.url().to_string(),
                include,
                exclude,
            }
        })
        .collect()
}

/// Show command for displaying loaded settings
pub struct ShowCommand {
    /// Output in JSON format
    pub json: bool,
}

impl ShowCommand {
    pub fn render(&self, settings: &Settings) -> Result<String> {
        if self.json {
            let output = SettingsOutput {
                name: settings.name().to_string(),
                root_dir: settings.root_dir().display().to_string(),
                repositories_mode: settings.repositories_mode().to_string(),
                modules: settings
                    .modules()
                    .iter()
                    .map(|module| ModuleOutput {
                        path: module.path.clone(),
                        dir: module.project_dir.display().to_string(),
                    })
                    .collect(),
                plugin_repositories: repository_outputs(settings.plugin_repositories()),
                plugins: settings
                    .plugin_management()
                    .plugins
                    .iter()
                    .map(|plugin| PluginOutput {
                        id: plugin.id.clone(),
                        version: plugin.version.clone(),
                        apply: plugin.apply,
                    })
                    .collect(),
                dependency_repositories: repository_outputs(settings.dependency_repositories()),
            };
            return Ok(serde_json::to_string_pretty(&output)?);
        }

        let mut lines = Vec::new();
        lines.push(format!("{} {}", "Project:".green(), settings.name().bold()));
        lines.push(format!(
            "Repositories mode: {}",
            settings.repositories_mode().to_string().cyan()
        ));
        lines.push(String::new());

        lines.push(format!("Modules ({}):", settings.modules().len()));
        for module in settings.modules() {
            lines.push(format!(
                "  {} {} ({})",
                "•".blue(),
                module.path.bold(),
                module.project_dir.display()
            ));
        }
        lines.push(String::new());

        for (title, repositories) in [
            ("Plugin repositories", settings.plugin_repositories()),
            ("Dependency repositories", settings.dependency_repositories()),
        ] {
            lines.push(format!("{}:", title));
            if repositories.is_empty() {
                lines.push(format!("  {}", "none declared".yellow()));
            }
            for (position, source) in repositories.iter().enumerate() {
                lines.push(format!("  {}. {} {}", position + 1, source.name().bold(), source.url()));
                if let Some(content) = &source.content {
                    if !content.includes.is_empty() {
                        lines.push(format!("     include: {}", describe_all(&content.includes).join(", ")));
                    }
                    if !content.excludes.is_empty() {
                        lines.push(format!("     exclude: {}", describe_all(&content.excludes).join(", ")));
                    }
                }
            }
            lines.push(String::new());
        }

        let plugins = &settings.plugin_management().plugins;
        if !plugins.is_empty() {
            lines.push("Pre-declared plugins:".to_string());
            for plugin in plugins {
                let mut line = format!("  {} {}", "•".blue(), plugin.id);
                if let Some(version) = &plugin.version {
                    line.push_str(&format!(" {}", version.cyan()));
                }
                if !plugin.apply {
                    line.push_str(" (apply false)");
                }
                lines.push(line);
            }
        }

        Ok(lines.join("\n").trim_end().to_string())
    }
}

impl Command for ShowCommand {
    fn execute(&self, context: &CommandContext) -> Result<()> {
        println!("{}", self.render(&context.settings)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PluginRequest, RepositoriesMode, RepositorySource, SettingsBuilder};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_settings(root: &TempDir) -> Settings {
        fs::create_dir(root.path().join("app")).unwrap();
        SettingsBuilder::new()
            .with_name("UI")
            .include(":app")
            .with_plugin_repositories(vec![
                RepositorySource::google(),
                RepositorySource::gradle_plugin_portal(),
            ])
            .with_plugin(PluginRequest::new(
                "com.android.application",
                Some("8.2.2".to_string()),
            ))
            .with_repositories_mode(RepositoriesMode::FailOnProjectRepos)
            .with_dependency_repositories(vec![
                RepositorySource::google(),
                RepositorySource::maven_central(),
            ])
            .build(root.path())
            .unwrap()
    }

    #[test]
    fn test_show_human_readable() {
        let root = TempDir::new().unwrap();
        let settings = create_test_settings(&root);

        let output = ShowCommand { json: false }.render(&settings).unwrap();
        assert!(output.contains("UI"));
        assert!(output.contains("FAIL_ON_PROJECT_REPOS"));
        assert!(output.contains(":app"));
        assert!(output.contains("gradlePluginPortal"));
        assert!(output.contains("com.android.application"));
    }

    #[test]
    fn test_show_json() {
        let root = TempDir::new().unwrap();
        let settings = create_test_settings(&root);

        let output = ShowCommand { json: true }.render(&settings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "UI");
        assert_eq!(value["repositoriesMode"], "FAIL_ON_PROJECT_REPOS");
        assert_eq!(value["modules"][0]["path"], ":app");
        assert_eq!(value["pluginRepositories"][1]["name"], "gradlePluginPortal");
        assert_eq!(value["dependencyRepositories"][1]["name"], "mavenCentral");
        assert_eq!(value["plugins"][0]["version"], "8.2.2");
    }

    #[test]
    fn test_show_command_execute() {
        let root = TempDir::new().unwrap();
        let context = CommandContext {
            settings: create_test_settings(&root),
        };
        assert!(ShowCommand { json: false }.execute(&context).is_ok());
    }
}
