use log::debug;

use super::exec::{surface_stderr, CommandOutput, GitRunner};
use crate::error::ActionError;

/// Create and check out the target branch. Failures are surfaced through
/// the log channels, not returned: whether the branch is usable is decided
/// by the remote-branch existence check that follows the push.
pub async fn switch_branch(git: &dyn GitRunner, branch: &str) -> Result<CommandOutput, ActionError> {
    let output = git
        .run(to_args(&["checkout", "-b", "--", branch]))
        .await?;
    surface_stderr(&output);
    Ok(output)
}

/// Push the current branch to origin, setting the upstream. Best-effort:
/// a rejected push is reported but does not abort the run on its own.
pub async fn push_current_branch(
    git: &dyn GitRunner,
    force: bool,
) -> Result<CommandOutput, ActionError> {
    let mut args = vec!["push", "--porcelain", "--set-upstream", "origin", "HEAD"];
    if force {
        args.insert(1, "--force");
    }

    let output = git.run(to_args(&args)).await?;
    surface_stderr(&output);
    if output.succeeded() {
        debug!("pushed current branch to origin");
    }
    Ok(output)
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
