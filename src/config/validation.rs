//! Settings invariant checks
//!
//! Each check fails fast with the [`ConfigError`] naming the broken invariant.

use super::model::{ModuleReference, RepositoryList};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static MODULE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:?[A-Za-z0-9_.\-]+(:[A-Za-z0-9_.\-]+)*$").expect("module path pattern is valid")
});

/// The root project name must contain something other than whitespace
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(ConfigError::EmptyProjectName)
    } else {
        Ok(())
    }
}

/// A declared repository list must not be empty
pub fn validate_repository_list(label: &str, repositories: &RepositoryList) -> Result<()> {
    if repositories.is_empty() {
        Err(ConfigError::EmptyRepositoryList(label.to_string()))
    } else {
        Ok(())
    }
}

/// Check the syntax of an include path such as `:feature:login`.
///
/// `.` and `..` segments are rejected: a module lives below the build root.
pub fn validate_module_path(path: &str) -> Result<()> {
    let escapes_root = path
        .trim_start_matches(':')
        .split(':')
        .any(|segment| segment.chars().all(|c| c == '.'));
    if MODULE_PATH.is_match(path) && !escapes_root {
        Ok(())
    } else {
        Err(ConfigError::InvalidModulePath(path.to_string()))
    }
}

/// Module paths are unique within a project
pub fn validate_unique_modules(modules: &[ModuleReference]) -> Result<()> {
    let mut seen = HashSet::new();
    for module in modules {
        if !seen.insert(module.path.as_str()) {
            return Err(ConfigError::DuplicateModule(module.path.clone()));
        }
    }
    Ok(())
}

/// Every module must point at an existing directory under `root_dir`
pub fn validate_module_dirs(modules: &[ModuleReference], root_dir: &Path) -> Result<()> {
    for module in modules {
        let dir = module.absolute_dir(root_dir);
        if !dir.is_dir() {
            return Err(ConfigError::UnresolvedModule {
                path: module.path.clone(),
                dir,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RepositorySource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("UI").is_ok());
        assert!(matches!(
            validate_project_name(""),
            Err(ConfigError::EmptyProjectName)
        ));
        assert!(validate_project_name("  \t").is_err());
    }

    #[test]
    fn test_validate_repository_list() {
        let list = RepositoryList::new(vec![RepositorySource::google()]);
        assert!(validate_repository_list("repositories", &list).is_ok());

        let result = validate_repository_list("repositories", &RepositoryList::default());
        assert!(matches!(
            result,
            Err(ConfigError::EmptyRepositoryList(label)) if label == "repositories"
        ));
    }

    #[test]
    fn test_validate_module_path() {
        assert!(validate_module_path(":app").is_ok());
        assert!(validate_module_path("app").is_ok());
        assert!(validate_module_path(":feature:login-ui").is_ok());
        assert!(validate_module_path("").is_err());
        assert!(validate_module_path(":").is_err());
        assert!(validate_module_path(":feature::login").is_err());
        assert!(validate_module_path(":with space").is_err());
        assert!(validate_module_path("..").is_err());
        assert!(validate_module_path(":libs:..:secrets").is_err());
        assert!(validate_module_path(":.").is_err());
        assert!(validate_module_path(":lib.v2").is_ok());
    }

    #[test]
    fn test_validate_unique_modules() {
        let modules = vec![
            ModuleReference::from_include(":app"),
            ModuleReference::from_include(":core"),
        ];
        assert!(validate_unique_modules(&modules).is_ok());

        let duplicated = vec![
            ModuleReference::from_include(":app"),
            ModuleReference::from_include("app"),
        ];
        assert!(matches!(
            validate_unique_modules(&duplicated),
            Err(ConfigError::DuplicateModule(path)) if path == ":app"
        ));
    }

    #[test]
    fn test_validate_module_dirs() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("app")).unwrap();

        let present = vec![ModuleReference::from_include(":app")];
        assert!(validate_module_dirs(&present, temp_dir.path()).is_ok());

        let missing = vec![ModuleReference::from_include(":core")];
        let result = validate_module_dirs(&missing, temp_dir.path());
        assert!(matches!(
            result,
            Err(ConfigError::UnresolvedModule { ref path, .. }) if path == ":core"
        ));
    }

    #[test]
    fn test_module_dir_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app"), "not a directory").unwrap();

        let modules = vec![ModuleReference::from_include(":app")];
        assert!(validate_module_dirs(&modules, temp_dir.path()).is_err());
    }
}
