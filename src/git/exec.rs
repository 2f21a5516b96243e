use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::error::ActionError;

static FATAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(fatal|error):").expect("fatal prefix pattern"));

/// Line-oriented result of one `git` invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// The version-control binary as seen by the orchestrator: one call, one
/// argument vector, captured output. Kept behind a trait so the state
/// machine can be exercised against a scripted double.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, args: Vec<String>) -> Result<CommandOutput, ActionError>;
}

/// Runs the real `git` binary inside the configured workspace.
pub struct GitCli {
    workspace: PathBuf,
}

impl GitCli {
    pub fn new(workspace: PathBuf) -> Self {
        GitCli { workspace }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn run(&self, args: Vec<String>) -> Result<CommandOutput, ActionError> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.workspace)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            stdout_lines: split_lines(&output.stdout),
            stderr_lines: split_lines(&output.stderr),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Route captured stderr into the log channels: `fatal:`/`error:` prefixed
/// lines are hard errors, everything else is a soft warning.
pub fn surface_stderr(output: &CommandOutput) {
    for line in &output.stderr_lines {
        if FATAL_PREFIX.is_match(line) {
            error!("{line}");
        } else {
            warn!("{line}");
        }
    }
}
