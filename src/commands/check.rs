//! Check command implementation

use super::{Command, CommandContext};
use crate::policy::RepositoryOrigin;
use anyhow::Result;
use colored::*;

/// Enforce the repositories mode on every included module
pub struct CheckCommand;

impl Command for CheckCommand {
    fn execute(&self, context: &CommandContext) -> Result<()> {
        let settings = &context.settings;
        println!(
            "{}",
            format!(
                "Checking {} module(s) against {}",
                settings.modules().len(),
                settings.repositories_mode()
            )
            .green()
        );

        let checks = settings.check_all_modules()?;
        for check in &checks {
            let origin = match check.effective {
                RepositoryOrigin::Settings => "settings repositories",
                RepositoryOrigin::Project => "project repositories",
            };
            let note = if check.build_file.is_none() {
                " (no build file)".yellow().to_string()
            } else if check.declares_repositories && check.effective == RepositoryOrigin::Settings {
                " (module repositories ignored)".yellow().to_string()
            } else {
                String::new()
            };
            println!("{} {} uses {}{}", "•".blue(), check.module.bold(), origin, note);
        }

        println!("{}", "Settings are valid".green());
        Ok(())
    }
}
