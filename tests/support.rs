//! Common test support utilities and fixtures
//!
//! Shared build-directory fixtures for the integration tests.

#![allow(dead_code)]

use std::{fs, path::PathBuf, process::Command};
use tempfile::TempDir;

/// The settings file of a typical single-module Android build
pub const EXAMPLE_SETTINGS: &str = r#"pluginManagement {
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

/// Build file of a module that relies on the settings repositories
pub const PLAIN_MODULE_BUILD: &str = r#"plugins {
    id("com.android.application")
}

android {
    namespace = "com.example.ui"
    compileSdk = 34
}

dependencies {
    implementation("androidx.appcompat:appcompat:1.6.1")
}
"#;

/// Build file of a module that declares its own repositories
pub const OVERRIDING_MODULE_BUILD: &str = r#"plugins {
    id("com.android.application")
}

repositories {
    maven("https://jitpack.io")
}
"#;

/// Result of running a CLI command
#[derive(Debug)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A temporary build directory with a settings file and module directories
pub struct Workspace {
    pub root: TempDir,
    pub settings_path: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a new temporary workspace using a Kotlin settings script
    pub fn new() -> Self {
        Self::with_settings_name("settings.gradle.kts")
    }

    /// Create a new temporary workspace whose settings file has the given name
    pub fn with_settings_name(name: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let settings_path = root.path().join(name);
        Self {
            root,
            settings_path,
        }
    }

    /// Write the settings file
    pub fn write_settings(&self, content: &str) {
        fs::write(&self.settings_path, content).expect("Failed to write settings");
    }

    /// Create a module directory, optionally with a build.gradle.kts
    pub fn add_module(&self, dir: &str, build_script: Option<&str>) {
        let module_dir = self.root.path().join(dir);
        fs::create_dir_all(&module_dir).expect("Failed to create module directory");
        if let Some(script) = build_script {
            fs::write(module_dir.join("build.gradle.kts"), script)
                .expect("Failed to write build script");
        }
    }

    /// Get the workspace root path
    pub fn path(&self) -> &std::path::Path {
        self.root.path()
    }

    /// Get the settings file path as string
    pub fn settings_str(&self) -> &str {
        self.settings_path.to_str().expect("Settings path not UTF-8")
    }
}

/// Run the settings CLI with given arguments
pub fn run_cli(args: &[&str], cwd: Option<&std::path::Path>) -> CliOutput {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_settings"));
    cmd.args(args);
    cmd.env("NO_COLOR", "1");

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().expect("Failed to execute settings binary");

    CliOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
