//! Central constants for the settings resolver

/// Settings file names, in lookup order
pub mod files {
    /// Kotlin DSL settings file
    pub const KOTLIN_SETTINGS: &str = "settings.gradle.kts";

    /// Groovy DSL settings file
    pub const GROOVY_SETTINGS: &str = "settings.gradle";

    /// Module build files, in lookup order
    pub const MODULE_BUILD_FILES: [&str; 2] = ["build.gradle.kts", "build.gradle"];
}

/// Canonical locations of the well-known repositories
pub mod repositories {
    /// Google's Maven repository (Android tooling and AndroidX)
    pub const GOOGLE_URL: &str = "https://dl.google.com/dl/android/maven2/";

    /// Maven Central
    pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2/";

    /// Gradle plugin portal
    pub const GRADLE_PLUGIN_PORTAL_URL: &str = "https://plugins.gradle.org/m2/";

    /// Local Maven cache, relative to the user's home directory
    pub const MAVEN_LOCAL_PATH: &str = "~/.m2/repository";

    /// Groups served by Google's repository when it carries no explicit content filter
    pub const GOOGLE_GROUP_PATTERN: &str = r"^(androidx|com\.android|com\.google)(\..*)?$";
}

/// Plugin marker conventions
pub mod plugins {
    /// Suffix of the marker artifact published for every plugin id
    pub const MARKER_SUFFIX: &str = ".gradle.plugin";
}
