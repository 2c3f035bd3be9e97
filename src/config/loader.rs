//! Settings file loading
//!
//! Reads a settings script (Kotlin or Groovy flavour) or its YAML
//! rendition, interprets it into a [`SettingsBuilder`] and validates the
//! result. Loading is all-or-nothing: the first problem aborts it.

use super::builder::SettingsBuilder;
use super::model::{
    ContentFilter, GroupMatcher, GroupPattern, PluginRequest, RepositoriesMode, RepositoryKind,
    RepositorySource, Settings,
};
use super::parser::{self, Argument, Expr, Invocation, Position, Segment, Statement, chain_name};
use super::yaml;
use crate::constants::files;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Syntax a settings source is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `settings.gradle.kts` or `settings.gradle`
    Script,
    Yaml,
}

impl SettingsFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => SettingsFormat::Yaml,
            _ => SettingsFormat::Script,
        }
    }
}

/// Where settings text comes from
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Text {
        content: String,
        /// Directory module paths are resolved against
        root_dir: PathBuf,
        format: SettingsFormat,
    },
}

/// Load and validate settings from `source`
pub fn load(source: ConfigSource) -> Result<Settings> {
    match source {
        ConfigSource::File(path) => {
            tracing::debug!("Reading settings from {}", path.display());
            let content =
                std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
            let root_dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            load_text(&content, &root_dir, SettingsFormat::from_path(&path))
        }
        ConfigSource::Text {
            content,
            root_dir,
            format,
        } => load_text(&content, &root_dir, format),
    }
}

/// Locate the settings file in `dir`, preferring the Kotlin script
pub fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    [files::KOTLIN_SETTINGS, files::GROOVY_SETTINGS]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn load_text(content: &str, root_dir: &Path, format: SettingsFormat) -> Result<Settings> {
    let builder = match format {
        SettingsFormat::Script => interpret(&parser::parse(content)?)?,
        SettingsFormat::Yaml => yaml::interpret(content)?,
    };
    let root_dir = absolute(root_dir);
    let settings = builder.build(&root_dir)?;
    tracing::info!(
        "Loaded settings for '{}': {} module(s), repositories mode {}",
        settings.name(),
        settings.modules().len(),
        settings.repositories_mode()
    );
    Ok(settings)
}

fn absolute(dir: &Path) -> PathBuf {
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Load settings script text whose modules live under `root_dir`
    pub fn from_script(content: &str, root_dir: impl AsRef<Path>) -> Result<Self> {
        load(ConfigSource::Text {
            content: content.to_string(),
            root_dir: root_dir.as_ref().to_path_buf(),
            format: SettingsFormat::Script,
        })
    }

    /// Find and load the settings file of the build rooted at `dir`
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let path = find_settings_file(dir).ok_or_else(|| ConfigError::Io {
            path: dir.join(files::KOTLIN_SETTINGS),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no settings.gradle.kts or settings.gradle found",
            ),
        })?;
        Self::load(path)
    }
}

fn unsupported(position: Position, what: &str, context: &str) -> ConfigError {
    ConfigError::syntax(
        position.line,
        position.column,
        format!("unsupported {} '{}'", context, what),
    )
}

fn invalid(position: Position, message: impl Into<String>) -> ConfigError {
    ConfigError::syntax(position.line, position.column, message)
}

/// A plain string, or a string wrapped in `uri(...)`
fn string_value(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Str(value) => Some(value.as_str()),
        Expr::Chain(chain) => match chain.as_slice() {
            [Segment { name, args: Some(args) }] if name == "uri" => match args.as_slice() {
                [Argument { value: Expr::Str(value), .. }] => Some(value.as_str()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

fn single_string<'a>(args: &'a [Argument], position: Position, what: &str) -> Result<&'a str> {
    match args {
        [arg] => string_value(&arg.value)
            .ok_or_else(|| invalid(position, format!("{} expects a string", what))),
        _ => Err(invalid(
            position,
            format!("{} expects exactly one argument", what),
        )),
    }
}

/// The only shape a block opener may take: `name { ... }` or `name() { ... }`
fn block_body<'a>(invocation: &'a Invocation, what: &str) -> Result<&'a [Statement]> {
    let no_args = match invocation.chain.as_slice() {
        [segment] => segment.args.as_ref().is_none_or(|args| args.is_empty()),
        _ => false,
    };
    match &invocation.body {
        Some(body) if no_args && invocation.infix.is_empty() => Ok(body),
        _ => Err(invalid(
            invocation.position,
            format!("'{}' must be a block", what),
        )),
    }
}

fn interpret(statements: &[Statement]) -> Result<SettingsBuilder> {
    let mut builder = SettingsBuilder::new();
    for statement in statements {
        builder = match statement {
            Statement::Invocation(invocation) => {
                let name = chain_name(&invocation.chain);
                match name.as_str() {
                    "pluginManagement" => {
                        plugin_management(builder, block_body(invocation, &name)?)?
                    }
                    "dependencyResolutionManagement" => {
                        dependency_resolution(builder, block_body(invocation, &name)?)?
                    }
                    "include" => include(builder, invocation)?,
                    _ => return Err(unsupported(invocation.position, &name, "statement")),
                }
            }
            Statement::Assign {
                target,
                value,
                position,
            } => assignment(builder, target, value, *position)?,
        };
    }
    Ok(builder)
}

fn include(mut builder: SettingsBuilder, invocation: &Invocation) -> Result<SettingsBuilder> {
    let args = match (&invocation.chain[0].args, &invocation.body) {
        (Some(args), None) if !args.is_empty() && invocation.infix.is_empty() => args,
        _ => {
            return Err(invalid(
                invocation.position,
                "include expects one or more module paths",
            ));
        }
    };
    for arg in args {
        match &arg.value {
            Expr::Str(path) => {
                tracing::debug!("Including module {}", path);
                builder = builder.include(path.clone());
            }
            other => {
                return Err(invalid(
                    invocation.position,
                    format!("module path must be a string, found {}", other.describe()),
                ));
            }
        }
    }
    Ok(builder)
}

fn assignment(
    builder: SettingsBuilder,
    target: &[Segment],
    value: &Expr,
    position: Position,
) -> Result<SettingsBuilder> {
    match target {
        [root, name] if root.name == "rootProject" && root.args.is_none() && name.name == "name" => {
            match value {
                Expr::Str(project_name) => Ok(builder.with_name(project_name.clone())),
                _ => Err(invalid(position, "rootProject.name expects a string")),
            }
        }
        [project, property] if project.name == "project" && property.name == "projectDir" => {
            let path = match &project.args {
                Some(args) => single_string(args, position, "project")?,
                None => return Err(invalid(position, "project expects a module path")),
            };
            Ok(builder.with_project_dir(path, project_dir_value(value, position)?))
        }
        _ => Err(unsupported(position, &chain_name(target), "assignment")),
    }
}

/// `file("dir")` or `File(settingsDir, "dir")`, relative to the settings directory
fn project_dir_value(value: &Expr, position: Position) -> Result<PathBuf> {
    if let Expr::Chain(chain) = value
        && let [segment] = chain.as_slice()
        && let Some(args) = &segment.args
    {
        match (segment.name.as_str(), args.as_slice()) {
            ("file", [Argument { value: Expr::Str(dir), .. }]) => return Ok(PathBuf::from(dir)),
            ("File", [base, Argument { value: Expr::Str(dir), .. }])
                if matches!(&base.value, Expr::Chain(c) if chain_name(c) == "settingsDir"
                    || chain_name(c) == "rootDir") =>
            {
                return Ok(PathBuf::from(dir));
            }
            _ => {}
        }
    }
    Err(invalid(
        position,
        "projectDir expects file(\"<dir>\") relative to the settings directory",
    ))
}

fn plugin_management(mut builder: SettingsBuilder, body: &[Statement]) -> Result<SettingsBuilder> {
    for statement in body {
        let Statement::Invocation(invocation) = statement else {
            return Err(unsupported(statement.position(), "assignment", "pluginManagement entry"));
        };
        let name = chain_name(&invocation.chain);
        match name.as_str() {
            "repositories" => {
                let sources = repositories(block_body(invocation, &name)?)?;
                builder = builder.with_plugin_repositories(sources);
            }
            "plugins" => {
                for plugin in plugin_requests(block_body(invocation, &name)?)? {
                    builder = builder.with_plugin(plugin);
                }
            }
            _ => return Err(unsupported(invocation.position, &name, "pluginManagement entry")),
        }
    }
    Ok(builder)
}

fn dependency_resolution(
    mut builder: SettingsBuilder,
    body: &[Statement],
) -> Result<SettingsBuilder> {
    builder = builder.with_dependency_resolution();
    for statement in body {
        builder = match statement {
            Statement::Invocation(invocation) => {
                let name = chain_name(&invocation.chain);
                match name.as_str() {
                    "repositories" => builder
                        .with_dependency_repositories(repositories(block_body(invocation, &name)?)?),
                    "repositoriesMode.set" => {
                        let args = invocation.chain[1].args.as_deref().unwrap_or_default();
                        match args {
                            [arg] => builder.with_repositories_mode(repositories_mode(
                                &arg.value,
                                invocation.position,
                            )?),
                            _ => {
                                return Err(invalid(
                                    invocation.position,
                                    "repositoriesMode.set expects one argument",
                                ));
                            }
                        }
                    }
                    _ => {
                        return Err(unsupported(
                            invocation.position,
                            &name,
                            "dependencyResolutionManagement entry",
                        ));
                    }
                }
            }
            Statement::Assign {
                target,
                value,
                position,
            } if chain_name(target) == "repositoriesMode" => {
                builder.with_repositories_mode(repositories_mode(value, *position)?)
            }
            Statement::Assign {
                target, position, ..
            } => {
                return Err(unsupported(
                    *position,
                    &chain_name(target),
                    "dependencyResolutionManagement entry",
                ));
            }
        };
    }
    Ok(builder)
}

fn repositories_mode(value: &Expr, position: Position) -> Result<RepositoriesMode> {
    let name = match value {
        Expr::Chain(chain) => chain.last().map(|segment| segment.name.as_str()),
        _ => None,
    };
    name.and_then(RepositoriesMode::from_name).ok_or_else(|| {
        invalid(
            position,
            format!(
                "unknown repositories mode {}, expected PREFER_PROJECT, PREFER_SETTINGS or FAIL_ON_PROJECT_REPOS",
                value.describe()
            ),
        )
    })
}

fn repositories(body: &[Statement]) -> Result<Vec<RepositorySource>> {
    let mut sources = Vec::new();
    for statement in body {
        let Statement::Invocation(invocation) = statement else {
            return Err(unsupported(statement.position(), "assignment", "repository"));
        };
        let [segment] = invocation.chain.as_slice() else {
            return Err(unsupported(
                invocation.position,
                &chain_name(&invocation.chain),
                "repository",
            ));
        };
        if !invocation.infix.is_empty() {
            return Err(invalid(invocation.position, "unexpected trailing expression"));
        }
        let source = match RepositorySource::from_well_known(&segment.name) {
            Some(source) => {
                if segment.args.as_ref().is_some_and(|args| !args.is_empty()) {
                    return Err(invalid(
                        invocation.position,
                        format!("{}() takes no arguments", segment.name),
                    ));
                }
                match &invocation.body {
                    Some(body) => apply_repository_body(source, body, false)?,
                    None => source,
                }
            }
            None if segment.name == "maven" => maven(segment, invocation)?,
            None => {
                return Err(unsupported(invocation.position, &segment.name, "repository"));
            }
        };
        tracing::debug!("Declared repository {}", source);
        sources.push(source);
    }
    Ok(sources)
}

fn maven(segment: &Segment, invocation: &Invocation) -> Result<RepositorySource> {
    let mut url = None;
    let mut name = None;
    for arg in segment.args.as_deref().unwrap_or_default() {
        let value = string_value(&arg.value)
            .ok_or_else(|| invalid(invocation.position, "maven arguments must be strings"))?;
        match arg.name.as_deref() {
            None | Some("url") => url = Some(value.to_string()),
            Some("name") => name = Some(value.to_string()),
            Some(other) => {
                return Err(unsupported(invocation.position, other, "maven argument"));
            }
        }
    }
    let mut source = RepositorySource::new(RepositoryKind::Maven {
        url: url.unwrap_or_default(),
        name,
    });
    if let Some(body) = &invocation.body {
        source = apply_repository_body(source, body, true)?;
    }
    if matches!(&source.kind, RepositoryKind::Maven { url, .. } if url.trim().is_empty()) {
        return Err(invalid(invocation.position, "maven repository requires a url"));
    }
    Ok(source)
}

/// Property assignments and nested blocks inside a repository declaration
fn apply_repository_body(
    mut source: RepositorySource,
    body: &[Statement],
    is_maven: bool,
) -> Result<RepositorySource> {
    for statement in body {
        let (key, value, position) = match statement {
            Statement::Assign {
                target,
                value,
                position,
            } => (chain_name(target), Some(value), *position),
            Statement::Invocation(invocation) => {
                let key = chain_name(&invocation.chain);
                match key.as_str() {
                    "content" | "mavenContent" => {
                        let filter = content_filter(block_body(invocation, &key)?)?;
                        let merged = source.content.take().unwrap_or_default();
                        source.content = Some(ContentFilter {
                            includes: [merged.includes, filter.includes].concat(),
                            excludes: [merged.excludes, filter.excludes].concat(),
                        });
                        continue;
                    }
                    "credentials" | "authentication" => {
                        // Credentials never change which repository is consulted
                        tracing::debug!("Ignoring {} block of {}", key, source.name());
                        continue;
                    }
                    // Groovy property call: `url 'https://...'`
                    _ => {
                        let value = match invocation.chain.last().and_then(|s| s.args.as_deref()) {
                            Some([arg]) if invocation.body.is_none() => Some(&arg.value),
                            _ => None,
                        };
                        (key, value, invocation.position)
                    }
                }
            }
        };
        let text = value.and_then(string_value);
        match (key.as_str(), &mut source.kind, text) {
            ("url", RepositoryKind::Maven { url, .. }, Some(value)) if is_maven => {
                *url = value.to_string();
            }
            ("name", RepositoryKind::Maven { name, .. }, Some(value)) if is_maven => {
                *name = Some(value.to_string());
            }
            _ => return Err(unsupported(position, &key, "repository property")),
        }
    }
    Ok(source)
}

fn content_filter(body: &[Statement]) -> Result<ContentFilter> {
    let mut filter = ContentFilter::default();
    for statement in body {
        let Statement::Invocation(invocation) = statement else {
            return Err(unsupported(statement.position(), "assignment", "content rule"));
        };
        let rule = chain_name(&invocation.chain);
        // mavenContent release/snapshot switches do not affect group matching
        if matches!(rule.as_str(), "releasesOnly" | "snapshotsOnly") {
            continue;
        }
        let args = invocation.chain[0].args.as_deref().unwrap_or_default();
        let group = single_string(args, invocation.position, &rule)?.to_string();
        let pattern = |group: &str| {
            GroupPattern::new(group).map(GroupMatcher::Pattern).map_err(|e| {
                invalid(
                    invocation.position,
                    format!("invalid group pattern '{}': {}", group, e),
                )
            })
        };
        match rule.as_str() {
            "includeGroup" => filter.includes.push(GroupMatcher::Exact(group)),
            "includeGroupAndSubgroups" => filter.includes.push(GroupMatcher::WithSubgroups(group)),
            "includeGroupByRegex" => filter.includes.push(pattern(&group)?),
            "excludeGroup" => filter.excludes.push(GroupMatcher::Exact(group)),
            "excludeGroupAndSubgroups" => filter.excludes.push(GroupMatcher::WithSubgroups(group)),
            "excludeGroupByRegex" => filter.excludes.push(pattern(&group)?),
            _ => return Err(unsupported(invocation.position, &rule, "content rule")),
        }
    }
    Ok(filter)
}

fn plugin_requests(body: &[Statement]) -> Result<Vec<PluginRequest>> {
    let mut plugins = Vec::new();
    for statement in body {
        let Statement::Invocation(invocation) = statement else {
            return Err(unsupported(statement.position(), "assignment", "plugin declaration"));
        };
        let segment = match invocation.chain.as_slice() {
            [segment] if invocation.body.is_none() => segment,
            _ => {
                return Err(unsupported(
                    invocation.position,
                    &chain_name(&invocation.chain),
                    "plugin declaration",
                ));
            }
        };
        let args = segment.args.as_deref().unwrap_or_default();
        let id = match segment.name.as_str() {
            "id" => single_string(args, invocation.position, "id")?.to_string(),
            "kotlin" => format!(
                "org.jetbrains.kotlin.{}",
                single_string(args, invocation.position, "kotlin")?
            ),
            other => return Err(unsupported(invocation.position, other, "plugin declaration")),
        };

        let mut plugin = PluginRequest::new(id, None);
        for (keyword, value) in &invocation.infix {
            match (keyword.as_str(), value) {
                ("version", Expr::Str(version)) => plugin.version = Some(version.clone()),
                ("apply", Expr::Bool(apply)) => plugin.apply = *apply,
                _ => {
                    return Err(invalid(
                        invocation.position,
                        format!("unexpected '{} {}' after plugin id", keyword, value.describe()),
                    ));
                }
            }
        }
        tracing::debug!(
            "Pre-declared plugin {} {}",
            plugin.id,
            plugin.version.as_deref().unwrap_or("(no version)")
        );
        plugins.push(plugin);
    }
    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
pluginManagement {
    repositories {
        google()
        mavenCentral()
        gradlePluginPortal()
    }
    plugins {
        // Optional: predeclare plugin versions
        id("com.android.application") version "8.2.2"
    }
}

dependencyResolutionManagement {
    repositoriesMode.set(RepositoriesMode.FAIL_ON_PROJECT_REPOS)
    repositories {
        google()
        mavenCentral()
    }
}

rootProject.name = "UI"
include(":app")
"#;

    fn root_with(dirs: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for dir in dirs {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_load_example_settings() {
        let root = root_with(&["app"]);
        let settings = Settings::from_script(EXAMPLE, root.path()).unwrap();

        assert_eq!(settings.name(), "UI");
        assert_eq!(settings.modules().len(), 1);
        assert_eq!(settings.modules()[0].path, ":app");
        assert_eq!(
            settings.repositories_mode(),
            RepositoriesMode::FailOnProjectRepos
        );
        assert_eq!(
            settings.plugin_repositories().names(),
            vec!["google", "mavenCentral", "gradlePluginPortal"]
        );
        assert_eq!(
            settings.dependency_repositories().names(),
            vec!["google", "mavenCentral"]
        );
        let plugin = settings
            .plugin_management()
            .find_plugin("com.android.application")
            .unwrap();
        assert_eq!(plugin.version.as_deref(), Some("8.2.2"));
        assert!(plugin.apply);
    }

    #[test]
    fn test_groovy_settings() {
        let root = root_with(&["app", "core"]);
        let source = r#"
pluginManagement {
    repositories {
        gradlePluginPortal()
    }
    plugins {
        id 'com.android.library' version '8.2.2' apply false
    }
}
dependencyResolutionManagement {
    repositoriesMode = RepositoriesMode.PREFER_SETTINGS
    repositories {
        mavenCentral()
    }
}
rootProject.name = 'Groovy'
include ':app', ':core'
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        assert_eq!(settings.name(), "Groovy");
        assert_eq!(settings.modules().len(), 2);
        assert_eq!(settings.repositories_mode(), RepositoriesMode::PreferSettings);
        let plugin = settings
            .plugin_management()
            .find_plugin("com.android.library")
            .unwrap();
        assert!(!plugin.apply);
    }

    #[test]
    fn test_maven_repository_forms() {
        let root = root_with(&[]);
        let source = r#"
dependencyResolutionManagement {
    repositories {
        maven("https://jitpack.io")
        maven(url = "https://repo.example.com/releases")
        maven {
            name = "internal"
            url = uri("https://maven.internal.example/")
        }
        maven {
            url 'https://groovy.example/'
        }
    }
}
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        let urls: Vec<&str> = settings
            .dependency_repositories()
            .iter()
            .map(|source| source.url())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://jitpack.io",
                "https://repo.example.com/releases",
                "https://maven.internal.example/",
                "https://groovy.example/",
            ]
        );
        assert_eq!(settings.dependency_repositories().names()[2], "internal");
    }

    #[test]
    fn test_content_filters() {
        let root = root_with(&[]);
        let source = r#"
pluginManagement {
    repositories {
        google {
            content {
                includeGroupByRegex("com\\.android.*")
                includeGroupAndSubgroups("androidx")
                excludeGroup("com.android.legacy")
            }
        }
        gradlePluginPortal()
    }
}
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        let google = settings.plugin_repositories().iter().next().unwrap();
        let content = google.content.as_ref().unwrap();
        assert_eq!(content.includes.len(), 2);
        assert_eq!(content.excludes.len(), 1);
        assert!(content.accepts("com.android.application"));
        assert!(!content.accepts("com.android.legacy"));
    }

    #[test]
    fn test_project_dir_override() {
        let root = root_with(&["modules/app"]);
        let source = r#"
include(":app")
project(":app").projectDir = file("modules/app")
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        assert_eq!(
            settings.modules()[0].project_dir,
            PathBuf::from("modules/app")
        );
    }

    #[test]
    fn test_kotlin_plugin_shorthand() {
        let root = root_with(&[]);
        let source = r#"
pluginManagement {
    plugins {
        kotlin("android") version "1.9.22"
    }
}
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        assert!(
            settings
                .plugin_management()
                .find_plugin("org.jetbrains.kotlin.android")
                .is_some()
        );
    }

    #[test]
    fn test_unknown_top_level_statement() {
        let root = root_with(&[]);
        let result = Settings::from_script("enableFeaturePreview(\"X\")", root.path());
        assert!(matches!(result, Err(ConfigError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_unknown_repository() {
        let root = root_with(&[]);
        let source = "pluginManagement {\n    repositories {\n        jcenter()\n    }\n}\n";
        let result = Settings::from_script(source, root.path());
        match result {
            Err(ConfigError::Syntax { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("jcenter"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_unknown_repositories_mode() {
        let root = root_with(&[]);
        let source = r#"
dependencyResolutionManagement {
    repositoriesMode.set(RepositoriesMode.SOMETIMES)
    repositories { mavenCentral() }
}
"#;
        let result = Settings::from_script(source, root.path());
        assert!(matches!(result, Err(ConfigError::Syntax { .. })));
    }

    #[test]
    fn test_maven_without_url() {
        let root = root_with(&[]);
        let source = "dependencyResolutionManagement {\n repositories {\n maven { name = \"x\" }\n }\n}\n";
        let result = Settings::from_script(source, root.path());
        assert!(matches!(result, Err(ConfigError::Syntax { .. })));
    }

    #[test]
    fn test_well_known_repository_rejects_url() {
        let root = root_with(&[]);
        let source = "pluginManagement {\n repositories {\n google { url = \"https://x\" }\n }\n}\n";
        let result = Settings::from_script(source, root.path());
        assert!(matches!(result, Err(ConfigError::Syntax { .. })));
    }

    #[test]
    fn test_empty_repositories_block() {
        let root = root_with(&[]);
        let source = "dependencyResolutionManagement {\n repositories {\n }\n}\n";
        let result = Settings::from_script(source, root.path());
        assert!(matches!(result, Err(ConfigError::EmptyRepositoryList(_))));
    }

    #[test]
    fn test_load_from_file_uses_parent_as_root() {
        let root = root_with(&["app"]);
        let path = root.path().join("settings.gradle.kts");
        fs::write(&path, EXAMPLE).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings.root_dir(),
            std::path::absolute(root.path()).unwrap().as_path()
        );
    }

    #[test]
    fn test_discover_prefers_kotlin_script() {
        let root = root_with(&[]);
        fs::write(root.path().join("settings.gradle"), "rootProject.name = 'groovy'").unwrap();
        fs::write(
            root.path().join("settings.gradle.kts"),
            "rootProject.name = \"kotlin\"",
        )
        .unwrap();

        let settings = Settings::discover(root.path()).unwrap();
        assert_eq!(settings.name(), "kotlin");
    }

    #[test]
    fn test_discover_without_settings_file() {
        let root = root_with(&[]);
        assert!(matches!(
            Settings::discover(root.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_settings_format_from_path() {
        assert_eq!(
            SettingsFormat::from_path(Path::new("settings.yaml")),
            SettingsFormat::Yaml
        );
        assert_eq!(
            SettingsFormat::from_path(Path::new("settings.gradle.kts")),
            SettingsFormat::Script
        );
    }

    #[test]
    fn test_annotated_android_studio_template() {
        let root = root_with(&["app"]);
        let source = r#"
pluginManagement {
    repositories {
        google()
        gradlePluginPortal()
    }
}
@Suppress("UnstableApiUsage")
dependencyResolutionManagement {
    repositoriesMode.set(RepositoriesMode.FAIL_ON_PROJECT_REPOS)
    repositories {
        google()
    }
}
rootProject.name = "UI"
include(":app")
"#;
        let settings = Settings::from_script(source, root.path()).unwrap();
        assert_eq!(
            settings.repositories_mode(),
            RepositoriesMode::FailOnProjectRepos
        );
        assert_eq!(settings.dependency_repositories().names(), vec!["google"]);
    }

    #[test]
    fn test_deeply_nested_script_is_syntax_error() {
        let root = root_with(&[]);
        let source = format!("pluginManagement {}", "a {".repeat(200_000));
        assert!(matches!(
            Settings::from_script(&source, root.path()),
            Err(ConfigError::Syntax { .. })
        ));
    }
}
