//! Running work items through an external command
//!
//! The command is invoked once per item as
//! `<command> <args...> [--dry-run] <rule> <file>`, with the rule's
//! effective options as JSON in `REWORK_RULE_OPTIONS`. Exit status 0 means
//! the file was left unchanged, 2 means it was (or would be) changed.

use std::path::{Path, PathBuf};
use std::process::Command;

use rework_core::logging;
use rework_core::{Engine, EngineFailure, Outcome, RuleOptions, RunMode, Tool, WorkItem};

use crate::config::EngineConfig;

pub const OPTIONS_ENV: &str = "REWORK_RULE_OPTIONS";
pub const TOOL_ENV: &str = "REWORK_TOOL";

/// An engine backed by an external command
pub struct CommandEngine {
    command: String,
    args: Vec<String>,
    tool: Tool,
    working_dir: Option<PathBuf>,
}

impl CommandEngine {
    pub fn new(command: impl Into<String>, args: Vec<String>, tool: Tool) -> Self {
        Self {
            command: command.into(),
            args,
            tool,
            working_dir: None,
        }
    }

    /// Build an engine from the `[engine]` table. `None` when no command
    /// is configured.
    pub fn from_config(config: &EngineConfig, tool: Tool, working_dir: &Path) -> Option<Self> {
        let command = config.command.as_ref()?;
        Some(Self::new(command.clone(), config.args.clone(), tool).with_working_dir(working_dir))
    }

    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    fn command(
        &self,
        item: &WorkItem,
        options: &RuleOptions,
        mode: RunMode,
    ) -> Result<Command, EngineFailure> {
        let options = serde_json::to_string(options)
            .map_err(|e| EngineFailure::Other(format!("Failed to encode rule options: {}", e)))?;

        let mut command = Command::new(&self.command);
        command.args(&self.args);
        if mode == RunMode::DryRun {
            command.arg("--dry-run");
        }
        command
            .arg(item.rule.as_str())
            .arg(&item.file)
            .env(OPTIONS_ENV, options)
            .env(TOOL_ENV, self.tool.as_str());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        Ok(command)
    }
}

impl Engine for CommandEngine {
    fn apply(
        &self,
        item: &WorkItem,
        options: &RuleOptions,
        mode: RunMode,
    ) -> Result<Outcome, EngineFailure> {
        let output = self.command(item, options, mode)?.output()?;

        match output.status.code() {
            Some(0) => Ok(Outcome::Unchanged),
            Some(2) => Ok(Outcome::Changed),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                logging::log(&format!(
                    "{} exited with {:?} for {} {}",
                    self.command,
                    code,
                    item.rule,
                    item.file.display()
                ));
                Err(EngineFailure::Exit { code, stderr })
            }
        }
    }
}
