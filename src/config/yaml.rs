//! YAML rendition of the settings file
//!
//! ```yaml
//! rootProject:
//!   name: UI
//! pluginManagement:
//!   repositories: [google, mavenCentral, gradlePluginPortal]
//!   plugins:
//!     - id: com.android.application
//!       version: 8.2.2
//! dependencyResolutionManagement:
//!   repositoriesMode: FAIL_ON_PROJECT_REPOS
//!   repositories:
//!     - google
//!     - maven:
//!         url: https://jitpack.io
//! include: [":app"]
//! ```

use super::builder::SettingsBuilder;
use super::model::{
    ContentFilter, GroupMatcher, GroupPattern, PluginRequest, RepositoriesMode, RepositoryKind,
    RepositorySource,
};
use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSettings {
    #[serde(default)]
    root_project: Option<RawRootProject>,
    #[serde(default)]
    plugin_management: Option<RawPluginManagement>,
    #[serde(default)]
    dependency_resolution_management: Option<RawDependencyResolution>,
    #[serde(default)]
    include: Vec<String>,
    /// Module path to project directory overrides
    #[serde(default)]
    project_dirs: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRootProject {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPluginManagement {
    #[serde(default)]
    repositories: Option<Vec<RawRepository>>,
    #[serde(default)]
    plugins: Vec<PluginRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawDependencyResolution {
    #[serde(default)]
    repositories_mode: Option<RepositoriesMode>,
    #[serde(default)]
    repositories: Option<Vec<RawRepository>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepository {
    /// `google`, `mavenCentral`, ...
    Named(String),
    /// `{ maven: { url: ... } }` or `{ google: { content: ... } }`
    Detailed(BTreeMap<String, RawRepositoryBody>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRepositoryBody {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content: Option<RawContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawContent {
    #[serde(default)]
    include_group: Vec<String>,
    #[serde(default)]
    include_group_and_subgroups: Vec<String>,
    #[serde(default)]
    include_group_by_regex: Vec<String>,
    #[serde(default)]
    exclude_group: Vec<String>,
    #[serde(default)]
    exclude_group_and_subgroups: Vec<String>,
    #[serde(default)]
    exclude_group_by_regex: Vec<String>,
}

/// Deserialize YAML settings into a builder
pub fn interpret(content: &str) -> Result<SettingsBuilder> {
    let raw: RawSettings = serde_yaml::from_str(content)?;
    let mut builder = SettingsBuilder::new();

    if let Some(root_project) = raw.root_project {
        builder = builder.with_name(root_project.name);
    }

    if let Some(plugin_management) = raw.plugin_management {
        if let Some(repositories) = plugin_management.repositories {
            builder = builder.with_plugin_repositories(convert_repositories(repositories)?);
        }
        for plugin in plugin_management.plugins {
            builder = builder.with_plugin(plugin);
        }
    }

    if let Some(dependency_resolution) = raw.dependency_resolution_management {
        builder = builder.with_dependency_resolution();
        if let Some(mode) = dependency_resolution.repositories_mode {
            builder = builder.with_repositories_mode(mode);
        }
        if let Some(repositories) = dependency_resolution.repositories {
            builder = builder.with_dependency_repositories(convert_repositories(repositories)?);
        }
    }

    for path in raw.include {
        builder = builder.include(path);
    }
    for (path, dir) in raw.project_dirs {
        builder = builder.with_project_dir(path, dir);
    }
    Ok(builder)
}

fn invalid(message: String) -> ConfigError {
    ConfigError::InvalidYaml(message)
}

fn convert_repositories(raw: Vec<RawRepository>) -> Result<Vec<RepositorySource>> {
    raw.into_iter().map(convert_repository).collect()
}

fn convert_repository(raw: RawRepository) -> Result<RepositorySource> {
    let (name, body) = match raw {
        RawRepository::Named(name) => (name, RawRepositoryBody::default()),
        RawRepository::Detailed(map) => {
            let mut entries = map.into_iter();
            match (entries.next(), entries.next()) {
                (Some(entry), None) => entry,
                _ => {
                    return Err(invalid(
                        "each repository entry must have exactly one key".to_string(),
                    ));
                }
            }
        }
    };

    let mut source = match RepositorySource::from_well_known(&name) {
        Some(source) => {
            if body.url.is_some() || body.name.is_some() {
                return Err(invalid(format!("{} does not accept url or name", name)));
            }
            source
        }
        None if name == "maven" => {
            let url = body
                .url
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| invalid("maven repository requires a url".to_string()))?;
            RepositorySource::new(RepositoryKind::Maven {
                url,
                name: body.name,
            })
        }
        None => return Err(invalid(format!("unsupported repository '{}'", name))),
    };

    if let Some(content) = body.content {
        source = source.with_content(convert_content(content)?);
    }
    Ok(source)
}

fn convert_content(raw: RawContent) -> Result<ContentFilter> {
    let patterns = |sources: Vec<String>| -> Result<Vec<GroupMatcher>> {
        sources
            .iter()
            .map(|source| {
                GroupPattern::new(source)
                    .map(GroupMatcher::Pattern)
                    .map_err(|e| invalid(format!("invalid group pattern '{}': {}", source, e)))
            })
            .collect()
    };

    let mut filter = ContentFilter::default();
    filter
        .includes
        .extend(raw.include_group.into_iter().map(GroupMatcher::Exact));
    filter.includes.extend(
        raw.include_group_and_subgroups
            .into_iter()
            .map(GroupMatcher::WithSubgroups),
    );
    filter.includes.extend(patterns(raw.include_group_by_regex)?);
    filter
        .excludes
        .extend(raw.exclude_group.into_iter().map(GroupMatcher::Exact));
    filter.excludes.extend(
        raw.exclude_group_and_subgroups
            .into_iter()
            .map(GroupMatcher::WithSubgroups),
    );
    filter.excludes.extend(patterns(raw.exclude_group_by_regex)?);
    Ok(filter)
}
