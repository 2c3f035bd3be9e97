//! Typed settings schema

use crate::constants::{plugins as plugin_consts, repositories as repo_consts};
use crate::error::LookupKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static GOOGLE_GROUPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(repo_consts::GOOGLE_GROUP_PATTERN).expect("google group pattern is valid")
});

/// Whether modules may declare their own repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoriesMode {
    /// Module repositories replace the settings repositories for that module
    #[default]
    PreferProject,
    /// Settings repositories win; module declarations are ignored
    PreferSettings,
    /// Any module declaring repositories is a configuration error
    FailOnProjectRepos,
}

impl RepositoriesMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PREFER_PROJECT" => Some(RepositoriesMode::PreferProject),
            "PREFER_SETTINGS" => Some(RepositoriesMode::PreferSettings),
            "FAIL_ON_PROJECT_REPOS" => Some(RepositoriesMode::FailOnProjectRepos),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepositoriesMode::PreferProject => "PREFER_PROJECT",
            RepositoriesMode::PreferSettings => "PREFER_SETTINGS",
            RepositoriesMode::FailOnProjectRepos => "FAIL_ON_PROJECT_REPOS",
        }
    }

    /// False only when a module-level repository block must fail the build
    pub fn allows_project_override(&self) -> bool {
        !matches!(self, RepositoriesMode::FailOnProjectRepos)
    }
}

impl std::fmt::Display for RepositoriesMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled group regex that compares by its source text
#[derive(Debug, Clone)]
pub struct GroupPattern {
    source: String,
    regex: Regex,
}

impl GroupPattern {
    pub fn new(source: &str) -> std::result::Result<Self, regex::Error> {
        // Content filters match the whole group, not a substring
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, group: &str) -> bool {
        self.regex.is_match(group)
    }
}

impl PartialEq for GroupPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GroupPattern {}

/// One include or exclude rule of a content filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMatcher {
    Exact(String),
    /// The group itself and every group below it (`com.example`, `com.example.*`)
    WithSubgroups(String),
    Pattern(GroupPattern),
}

impl GroupMatcher {
    pub fn matches(&self, group: &str) -> bool {
        match self {
            GroupMatcher::Exact(expected) => group == expected,
            GroupMatcher::WithSubgroups(prefix) => {
                group == prefix
                    || group
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            }
            GroupMatcher::Pattern(pattern) => pattern.is_match(group),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            GroupMatcher::Exact(group) => group.clone(),
            GroupMatcher::WithSubgroups(group) => format!("{}.**", group),
            GroupMatcher::Pattern(pattern) => format!("/{}/", pattern.as_str()),
        }
    }
}

/// Per-repository restriction on which groups it serves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub includes: Vec<GroupMatcher>,
    pub excludes: Vec<GroupMatcher>,
}

impl ContentFilter {
    /// Excludes always win; an empty include list admits everything else
    pub fn accepts(&self, group: &str) -> bool {
        if self.excludes.iter().any(|m| m.matches(group)) {
            return false;
        }
        self.includes.is_empty() || self.includes.iter().any(|m| m.matches(group))
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryKind {
    Google,
    MavenCentral,
    GradlePluginPortal,
    MavenLocal,
    Maven { url: String, name: Option<String> },
}

/// A location artifacts may be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySource {
    pub kind: RepositoryKind,
    pub content: Option<ContentFilter>,
}

impl RepositorySource {
    pub fn new(kind: RepositoryKind) -> Self {
        Self {
            kind,
            content: None,
        }
    }

    pub fn google() -> Self {
        Self::new(RepositoryKind::Google)
    }

    pub fn maven_central() -> Self {
        Self::new(RepositoryKind::MavenCentral)
    }

    pub fn gradle_plugin_portal() -> Self {
        Self::new(RepositoryKind::GradlePluginPortal)
    }

    pub fn maven_local() -> Self {
        Self::new(RepositoryKind::MavenLocal)
    }

    pub fn maven(url: impl Into<String>) -> Self {
        Self::new(RepositoryKind::Maven {
            url: url.into(),
            name: None,
        })
    }

    pub fn with_content(mut self, content: ContentFilter) -> Self {
        self.content = Some(content);
        self
    }

    /// Look up a well-known source by the name of its DSL function
    pub fn from_well_known(name: &str) -> Option<Self> {
        match name {
            "google" => Some(Self::google()),
            "mavenCentral" => Some(Self::maven_central()),
            "gradlePluginPortal" => Some(Self::gradle_plugin_portal()),
            "mavenLocal" => Some(Self::maven_local()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            RepositoryKind::Google => "google",
            RepositoryKind::MavenCentral => "mavenCentral",
            RepositoryKind::GradlePluginPortal => "gradlePluginPortal",
            RepositoryKind::MavenLocal => "mavenLocal",
            RepositoryKind::Maven {
                name: Some(name), ..
            } => name,
            RepositoryKind::Maven { .. } => "maven",
        }
    }

    pub fn url(&self) -> &str {
        match &self.kind {
            RepositoryKind::Google => repo_consts::GOOGLE_URL,
            RepositoryKind::MavenCentral => repo_consts::MAVEN_CENTRAL_URL,
            RepositoryKind::GradlePluginPortal => repo_consts::GRADLE_PLUGIN_PORTAL_URL,
            RepositoryKind::MavenLocal => repo_consts::MAVEN_LOCAL_PATH,
            RepositoryKind::Maven { url, .. } => url,
        }
    }

    /// Whether this source is expected to host artifacts of `group`.
    ///
    /// An explicit content filter replaces the source's default scope.
    pub fn accepts(&self, group: &str, kind: LookupKind) -> bool {
        if let Some(content) = &self.content {
            return content.accepts(group);
        }
        match self.kind {
            RepositoryKind::Google => GOOGLE_GROUPS.is_match(group),
            RepositoryKind::GradlePluginPortal => kind == LookupKind::Plugin,
            RepositoryKind::MavenCentral
            | RepositoryKind::MavenLocal
            | RepositoryKind::Maven { .. } => true,
        }
    }
}

impl std::fmt::Display for RepositorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.url())
    }
}

/// Ordered repositories; the first accepting source wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryList(Vec<RepositorySource>);

impl RepositoryList {
    pub fn new(sources: Vec<RepositorySource>) -> Self {
        Self(sources)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositorySource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|source| source.name()).collect()
    }

    pub fn first_accepting(&self, group: &str, kind: LookupKind) -> Option<&RepositorySource> {
        self.0.iter().find(|source| source.accepts(group, kind))
    }
}

impl From<Vec<RepositorySource>> for RepositoryList {
    fn from(sources: Vec<RepositorySource>) -> Self {
        Self(sources)
    }
}

impl<'a> IntoIterator for &'a RepositoryList {
    type Item = &'a RepositorySource;
    type IntoIter = std::slice::Iter<'a, RepositorySource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A plugin version pre-declared in `pluginManagement { plugins { } }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginRequest {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_apply")]
    pub apply: bool,
}

fn default_apply() -> bool {
    true
}

impl PluginRequest {
    pub fn new(id: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            version,
            apply: true,
        }
    }

    /// Coordinate of the marker artifact that maps the id to its implementation
    pub fn marker_coordinate(&self) -> String {
        format!("{}:{}{}", self.id, self.id, plugin_consts::MARKER_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManagement {
    pub repositories: RepositoryList,
    pub plugins: Vec<PluginRequest>,
}

impl PluginManagement {
    pub fn find_plugin(&self, id: &str) -> Option<&PluginRequest> {
        self.plugins.iter().find(|plugin| plugin.id == id)
    }
}

impl Default for PluginManagement {
    /// Without a `pluginManagement` block plugins come from the plugin portal
    fn default() -> Self {
        Self {
            repositories: RepositoryList::new(vec![RepositorySource::gradle_plugin_portal()]),
            plugins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyResolutionManagement {
    pub mode: RepositoriesMode,
    pub repositories: RepositoryList,
}

/// A module included from the settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    /// Build path with a leading colon, e.g. `:feature:login`
    pub path: String,
    /// Project directory relative to the settings directory
    pub project_dir: PathBuf,
}

impl ModuleReference {
    /// Build a reference from an include path, with or without the leading colon
    pub fn from_include(path: &str) -> Self {
        let trimmed = path.trim_start_matches(':');
        let project_dir = trimmed.split(':').collect::<PathBuf>();
        Self {
            path: format!(":{}", trimmed),
            project_dir,
        }
    }

    /// Last segment of the path
    pub fn name(&self) -> &str {
        self.path.rsplit(':').next().unwrap_or(&self.path)
    }

    pub fn absolute_dir(&self, root_dir: &Path) -> PathBuf {
        root_dir.join(&self.project_dir)
    }
}

/// The validated, immutable result of loading a settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub(crate) name: String,
    pub(crate) root_dir: PathBuf,
    pub(crate) modules: Vec<ModuleReference>,
    pub(crate) plugin_management: PluginManagement,
    pub(crate) dependency_resolution: DependencyResolutionManagement,
}

impl Settings {
    /// Root project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the settings were loaded from; module directories are relative to it
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Included modules, in declaration order
    pub fn modules(&self) -> &[ModuleReference] {
        &self.modules
    }

    /// Find a module by path (`:app`) or bare name (`app`)
    pub fn module(&self, path: &str) -> Option<&ModuleReference> {
        let wanted = format!(":{}", path.trim_start_matches(':'));
        self.modules.iter().find(|module| module.path == wanted)
    }

    pub fn plugin_management(&self) -> &PluginManagement {
        &self.plugin_management
    }

    pub fn plugin_repositories(&self) -> &RepositoryList {
        &self.plugin_management.repositories
    }

    pub fn dependency_repositories(&self) -> &RepositoryList {
        &self.dependency_resolution.repositories
    }

    /// The resolution policy modules are checked against
    pub fn repositories_mode(&self) -> RepositoriesMode {
        self.dependency_resolution.mode
    }
}
