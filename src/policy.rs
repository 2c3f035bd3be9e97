//! Module-level enforcement of the repositories mode
//!
//! A module's build file is scanned for project repository declarations:
//! `repositories { }` or `repositories.mavenCentral()` (optionally through
//! `project.`) at top level or directly inside `allprojects { }` /
//! `subprojects { }`. Script-classpath repositories under `buildscript { }`
//! are not project repositories and never count.

use crate::config::lexer::{Token, TokenKind, tokenize};
use crate::config::{ModuleReference, RepositoriesMode, Settings};
use crate::constants::files;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Whose repositories a module ends up using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOrigin {
    Settings,
    Project,
}

/// Outcome of enforcing the repositories mode on one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCheck {
    pub module: String,
    pub build_file: Option<PathBuf>,
    pub declares_repositories: bool,
    pub effective: RepositoryOrigin,
}

/// Whether a build script declares project repositories
pub fn declares_project_repositories(source: &str) -> Result<bool> {
    let tokens = tokenize(source)?;
    let mut scopes: Vec<String> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        let project_level = scopes.is_empty()
            || (scopes.len() == 1 && matches!(scopes[0].as_str(), "allprojects" | "subprojects"));
        match &token.kind {
            TokenKind::LBrace => {
                let name = block_name(&tokens[..index]);
                if project_level && name == "repositories" {
                    return Ok(true);
                }
                scopes.push(name);
            }
            TokenKind::Ident(name)
                if project_level
                    && name == "repositories"
                    && tokens.get(index + 1).map(|t| &t.kind) == Some(&TokenKind::Dot)
                    && is_project_receiver(&tokens[..index]) =>
            {
                return Ok(true);
            }
            TokenKind::RBrace => {
                scopes.pop();
            }
            _ => {}
        }
    }
    Ok(false)
}

/// Name of the call a `{` belongs to: `repositories {` or `maven("x") {`
fn block_name(before: &[Token]) -> String {
    let mut index = before.len();
    // Skip a parenthesised argument list
    if index > 0 && before[index - 1].kind == TokenKind::RParen {
        let mut depth = 0usize;
        while index > 0 {
            index -= 1;
            match before[index].kind {
                TokenKind::RParen => depth += 1,
                TokenKind::LParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    match index.checked_sub(1).map(|i| &before[i].kind) {
        Some(TokenKind::Ident(name)) => name.clone(),
        _ => String::new(),
    }
}

/// `repositories` is called on the project: unqualified or as `project.repositories`
fn is_project_receiver(before: &[Token]) -> bool {
    match before {
        [.., receiver, dot] if dot.kind == TokenKind::Dot => {
            receiver.kind == TokenKind::Ident("project".to_string())
                && !matches!(before.iter().rev().nth(2).map(|t| &t.kind), Some(TokenKind::Dot))
        }
        _ => true,
    }
}

/// The module's build file, Kotlin script first
pub fn find_build_file(module_dir: &Path) -> Option<PathBuf> {
    files::MODULE_BUILD_FILES
        .iter()
        .map(|name| module_dir.join(name))
        .find(|path| path.is_file())
}

impl Settings {
    /// Enforce the repositories mode on the module at `path` (`:app` or `app`)
    pub fn check_module(&self, path: &str) -> Result<ModuleCheck> {
        let module = self
            .module(path)
            .ok_or_else(|| ConfigError::UnknownModule(path.to_string()))?;
        self.check_module_ref(module)
    }

    /// Enforce the repositories mode on every module, stopping at the first violation
    pub fn check_all_modules(&self) -> Result<Vec<ModuleCheck>> {
        self.modules()
            .iter()
            .map(|module| self.check_module_ref(module))
            .collect()
    }

    fn check_module_ref(&self, module: &ModuleReference) -> Result<ModuleCheck> {
        let build_file = find_build_file(&module.absolute_dir(self.root_dir()));
        let declares_repositories = match &build_file {
            Some(file) => {
                let source =
                    std::fs::read_to_string(file).map_err(|e| ConfigError::io(file, e))?;
                declares_project_repositories(&source)?
            }
            None => false,
        };

        let effective = match (declares_repositories, self.repositories_mode()) {
            (false, _) => RepositoryOrigin::Settings,
            (true, RepositoriesMode::FailOnProjectRepos) => {
                return Err(ConfigError::PolicyViolation {
                    module: module.path.clone(),
                    build_file: build_file.unwrap_or_default(),
                });
            }
            (true, RepositoriesMode::PreferSettings) => {
                tracing::warn!(
                    "Module '{}' declares repositories that are ignored because settings repositories are preferred",
                    module.path
                );
                RepositoryOrigin::Settings
            }
            (true, RepositoriesMode::PreferProject) => RepositoryOrigin::Project,
        };
        tracing::debug!("Module {} uses {:?} repositories", module.path, effective);

        Ok(ModuleCheck {
            module: module.path.clone(),
            build_file,
            declares_repositories,
            effective,
        })
    }
}
