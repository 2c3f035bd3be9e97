//! Error taxonomy for loading settings and resolving sources

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or enforcing settings.
///
/// Every variant is fatal: callers are expected to abort and surface the
/// message as-is.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Missing required block: {0}")]
    MissingBlock(String),

    #[error("Repository list '{0}' must contain at least one repository")]
    EmptyRepositoryList(String),

    #[error("Duplicate module: '{0}'")]
    DuplicateModule(String),

    #[error("Module '{path}' has no project directory at {}", dir.display())]
    UnresolvedModule { path: String, dir: PathBuf },

    #[error(
        "Build was configured to prefer settings repositories over project repositories but repository block was added by module '{module}' in {}",
        build_file.display()
    )]
    PolicyViolation { module: String, build_file: PathBuf },

    #[error("Root project name cannot be empty")]
    EmptyProjectName,

    #[error("Invalid module path: '{0}'")]
    InvalidModulePath(String),

    #[error("Unknown module: '{0}'")]
    UnknownModule(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML settings error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed YAML whose content makes no sense as settings
    #[error("Invalid YAML settings: {0}")]
    InvalidYaml(String),
}

impl ConfigError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        ConfigError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// What kind of artifact a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Plugin,
    Dependency,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Plugin => write!(f, "plugin"),
            LookupKind::Dependency => write!(f, "dependency"),
        }
    }
}

/// Errors raised by advisory source lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No declared repository is expected to host {kind} '{id}'")]
    NotFound { kind: LookupKind, id: String },

    #[error("No repositories are declared for {0} resolution")]
    NoRepositories(LookupKind),

    #[error("Invalid dependency coordinate '{0}', expected group:artifact[:version]")]
    InvalidCoordinate(String),

    #[error("Invalid plugin id '{0}'")]
    InvalidPluginId(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let error = ConfigError::syntax(3, 7, "expected '}'");
        assert_eq!(
            error.to_string(),
            "Syntax error at line 3, column 7: expected '}'"
        );
    }

    #[test]
    fn test_unresolved_module_display() {
        let error = ConfigError::UnresolvedModule {
            path: ":app".to_string(),
            dir: PathBuf::from("/work/app"),
        };
        assert_eq!(
            error.to_string(),
            "Module ':app' has no project directory at /work/app"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = ResolveError::NotFound {
            kind: LookupKind::Dependency,
            id: "org.example:lib".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No declared repository is expected to host dependency 'org.example:lib'"
        );
    }
}
