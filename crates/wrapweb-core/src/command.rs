//! [`Updater`] that delegates regeneration to an external program.
//!
//! The program is invoked as `<program> [args...] <project> <clone_url> <branch>`
//! with `WRAPWEB_DATABASE` pointing at the wrap database. It is expected to
//! fetch, build and publish the new version itself; a non-zero exit status is
//! a generation failure.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::UpdaterConfig;
use crate::error::{Result, WrapError};
use crate::updater::{Updater, UpdaterProvider};

pub const DATABASE_ENV: &str = "WRAPWEB_DATABASE";

/// Maximum number of stderr characters kept in a failure message.
const STDERR_HINT_LEN: usize = 500;

pub struct CommandUpdater {
    program: String,
    args: Vec<String>,
    database: PathBuf,
}

impl CommandUpdater {
    pub fn new(config: &UpdaterConfig, database: impl Into<PathBuf>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            database: database.into(),
        }
    }
}

impl Updater for CommandUpdater {
    fn update(&self, project: &str, clone_url: &str, branch: &str) -> Result<()> {
        debug!(program = %self.program, project, branch, "spawning updater");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(project)
            .arg(clone_url)
            .arg(branch)
            .env(DATABASE_ENV, &self.database)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                WrapError::GenerationFailed(format!("failed to spawn {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let hint = String::from_utf8_lossy(&output.stderr)
                .chars()
                .take(STDERR_HINT_LEN)
                .collect::<String>();
            return Err(WrapError::GenerationFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                hint.trim()
            )));
        }

        info!(project, branch, "updater finished");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CommandUpdaterProvider {
    config: UpdaterConfig,
    database: PathBuf,
}

impl CommandUpdaterProvider {
    pub fn new(config: UpdaterConfig, database: impl Into<PathBuf>) -> Self {
        Self {
            config,
            database: database.into(),
        }
    }
}

impl UpdaterProvider for CommandUpdaterProvider {
    fn open(&self) -> Result<Box<dyn Updater>> {
        Ok(Box::new(CommandUpdater::new(&self.config, &self.database)))
    }
}
