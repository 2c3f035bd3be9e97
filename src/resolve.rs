//! Advisory source lookups
//!
//! These answer "which declared repository is expected to serve this
//! artifact". Nothing is fetched; the build orchestrator does that.

use crate::config::{RepositoryKind, RepositoryList, RepositorySource, Settings};
use crate::error::{LookupKind, ResolveError};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static PLUGIN_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-]+)*$").expect("plugin id pattern is valid")
});

/// How a version pin in `pluginManagement.plugins` affects source lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginPrecedence {
    /// A pinned plugin is served by the plugin portal when the portal is declared;
    /// unpinned plugins follow declaration order
    #[default]
    PinnedPreferPortal,
    /// Pins only choose a version; the first accepting repository wins
    DeclarationOrder,
}

impl FromStr for PluginPrecedence {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pinned-prefer-portal" => Ok(PluginPrecedence::PinnedPreferPortal),
            "declaration-order" => Ok(PluginPrecedence::DeclarationOrder),
            other => Err(format!(
                "unknown plugin precedence '{}', expected pinned-prefer-portal or declaration-order",
                other
            )),
        }
    }
}

/// A library coordinate, `group:artifact[:version]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
}

impl FromStr for Coordinate {
    type Err = ResolveError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolveError::InvalidCoordinate(value.to_string());
        let parts: Vec<&str> = value.trim().split(':').collect();
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [group, artifact] => Ok(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: None,
            }),
            [group, artifact, version] => Ok(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: Some(version.to_string()),
            }),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.artifact, version),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

fn first_accepting<'a>(
    repositories: &'a RepositoryList,
    group: &str,
    kind: LookupKind,
    id: &str,
) -> Result<&'a RepositorySource, ResolveError> {
    if repositories.is_empty() {
        return Err(ResolveError::NoRepositories(kind));
    }
    repositories
        .first_accepting(group, kind)
        .ok_or_else(|| ResolveError::NotFound {
            kind,
            id: id.to_string(),
        })
}

impl Settings {
    /// First plugin repository expected to host `plugin_id`, under the default precedence
    pub fn resolve_plugin_source(&self, plugin_id: &str) -> Result<&RepositorySource, ResolveError> {
        self.resolve_plugin_source_with(plugin_id, PluginPrecedence::default())
    }

    pub fn resolve_plugin_source_with(
        &self,
        plugin_id: &str,
        precedence: PluginPrecedence,
    ) -> Result<&RepositorySource, ResolveError> {
        if !PLUGIN_ID.is_match(plugin_id) {
            return Err(ResolveError::InvalidPluginId(plugin_id.to_string()));
        }
        let repositories = self.plugin_repositories();

        let pinned = self
            .plugin_management()
            .find_plugin(plugin_id)
            .is_some_and(|plugin| plugin.version.is_some());
        if pinned && precedence == PluginPrecedence::PinnedPreferPortal {
            let portal = repositories.iter().find(|source| {
                source.kind == RepositoryKind::GradlePluginPortal
                    && source.accepts(plugin_id, LookupKind::Plugin)
            });
            if let Some(portal) = portal {
                tracing::debug!("Plugin {} is pinned, resolving from the plugin portal", plugin_id);
                return Ok(portal);
            }
        }

        // The marker artifact's group is the plugin id itself
        first_accepting(repositories, plugin_id, LookupKind::Plugin, plugin_id)
    }

    /// First dependency repository expected to host `coordinate` (`group:artifact[:version]`)
    pub fn resolve_dependency_source(
        &self,
        coordinate: &str,
    ) -> Result<&RepositorySource, ResolveError> {
        let parsed: Coordinate = coordinate.parse()?;
        first_accepting(
            self.dependency_repositories(),
            &parsed.group,
            LookupKind::Dependency,
            coordinate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PluginRequest, RepositorySource, SettingsBuilder};
    use tempfile::TempDir;

    fn example_settings(root: &TempDir) -> Settings {
        SettingsBuilder::new()
            .with_name("UI")
            .with_plugin_repositories(vec![
                RepositorySource::google(),
                RepositorySource::maven_central(),
                RepositorySource::gradle_plugin_portal(),
            ])
            .with_plugin(PluginRequest::new(
                "com.android.application",
                Some("8.2.2".to_string()),
            ))
            .with_dependency_repositories(vec![
                RepositorySource::google(),
                RepositorySource::maven_central(),
            ])
            .build(root.path())
            .unwrap()
    }

    #[test]
    fn test_pinned_plugin_resolves_to_portal() {
        let root = TempDir::new().unwrap();
        let settings = example_settings(&root);
        let source = settings
            .resolve_plugin_source("com.android.application")
            .unwrap();
        assert_eq!(source.kind, RepositoryKind::GradlePluginPortal);
    }

    #[test]
    fn test_declaration_order_ignores_pins() {
        let root = TempDir::new().unwrap();
        let settings = example_settings(&root);
        let source = settings
            .resolve_plugin_source_with("com.android.application", PluginPrecedence::DeclarationOrder)
            .unwrap();
        assert_eq!(source.kind, RepositoryKind::Google);
    }

    #[test]
    fn test_unpinned_plugin_follows_declaration_order() {
        let root = TempDir::new().unwrap();
        let settings = example_settings(&root);

        let android = settings.resolve_plugin_source("com.android.library").unwrap();
        assert_eq!(android.kind, RepositoryKind::Google);

        let kotlin = settings
            .resolve_plugin_source("org.jetbrains.kotlin.android")
            .unwrap();
        assert_eq!(kotlin.kind, RepositoryKind::MavenCentral);
    }

    #[test]
    fn test_dependency_resolution_order() {
        let root = TempDir::new().unwrap();
        let settings = example_settings(&root);

        let androidx = settings
            .resolve_dependency_source("androidx.appcompat:appcompat:1.6.1")
            .unwrap();
        assert_eq!(androidx.kind, RepositoryKind::Google);

        let junit = settings.resolve_dependency_source("junit:junit:4.13.2").unwrap();
        assert_eq!(junit.kind, RepositoryKind::MavenCentral);
    }

    #[test]
    fn test_dependency_not_found() {
        let root = TempDir::new().unwrap();
        let settings = SettingsBuilder::new()
            .with_dependency_repositories(vec![RepositorySource::google()])
            .build(root.path())
            .unwrap();

        let result = settings.resolve_dependency_source("org.slf4j:slf4j-api");
        assert_eq!(
            result,
            Err(ResolveError::NotFound {
                kind: LookupKind::Dependency,
                id: "org.slf4j:slf4j-api".to_string(),
            })
        );
    }

    #[test]
    fn test_dependency_without_repositories() {
        let root = TempDir::new().unwrap();
        let settings = SettingsBuilder::new().build(root.path()).unwrap();
        assert_eq!(
            settings.resolve_dependency_source("junit:junit"),
            Err(ResolveError::NoRepositories(LookupKind::Dependency))
        );
    }

    #[test]
    fn test_invalid_lookups() {
        let root = TempDir::new().unwrap();
        let settings = example_settings(&root);
        assert!(matches!(
            settings.resolve_dependency_source("junit"),
            Err(ResolveError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            settings.resolve_dependency_source("a::b"),
            Err(ResolveError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            settings.resolve_plugin_source("not a plugin"),
            Err(ResolveError::InvalidPluginId(_))
        ));
    }

    #[test]
    fn test_coordinate_parsing() {
        let coordinate: Coordinate = "androidx.core:core-ktx:1.12.0".parse().unwrap();
        assert_eq!(coordinate.group, "androidx.core");
        assert_eq!(coordinate.artifact, "core-ktx");
        assert_eq!(coordinate.version.as_deref(), Some("1.12.0"));
        assert_eq!(coordinate.to_string(), "androidx.core:core-ktx:1.12.0");

        assert!("a:b:c:d".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_plugin_precedence_from_str() {
        assert_eq!(
            "declaration-order".parse::<PluginPrecedence>(),
            Ok(PluginPrecedence::DeclarationOrder)
        );
        assert!("portal".parse::<PluginPrecedence>().is_err());
    }
}
