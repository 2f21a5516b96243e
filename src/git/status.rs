use std::path::Path;

use super::exec::{surface_stderr, GitRunner};
use crate::error::ActionError;
use crate::github::types::FileChanges;

/// Stage the given paths, resolved against the workspace. A pathspec that
/// matches nothing is a warning, not a run failure; the exit code is
/// ignored.
pub async fn add_file_changes(
    git: &dyn GitRunner,
    workspace: &Path,
    patterns: &[String],
) -> Result<(), ActionError> {
    let mut args = vec!["add".to_string(), "--".to_string()];
    args.extend(
        patterns
            .iter()
            .map(|p| workspace.join(p).to_string_lossy().into_owned()),
    );

    let output = git.run(args).await?;
    surface_stderr(&output);
    Ok(())
}

/// Scan the working tree and index into a change set. A nonzero exit here
/// is a hard error: without a trustworthy status there is nothing safe to
/// submit.
pub async fn collect_file_changes(git: &dyn GitRunner) -> Result<FileChanges, ActionError> {
    let args = ["status", "-suall", "--porcelain"];
    let output = git.run(args.iter().map(|a| a.to_string()).collect()).await?;
    surface_stderr(&output);
    if !output.succeeded() {
        return Err(ActionError::Git {
            command: "status".to_string(),
            code: output.exit_code,
        });
    }

    Ok(parse_status_lines(&output.stdout_lines))
}

/// Turn porcelain status lines into a change set.
///
/// Each line is a two-character status code, a space, then the path; rename
/// lines carry `old -> new`. The first non-space status character decides
/// the classification, so both index and worktree columns count. Codes
/// outside the table are skipped. Lines are processed in order and nothing
/// is deduplicated across lines: a later line for the same path simply
/// appends after the earlier one.
pub fn parse_status_lines<S: AsRef<str>>(lines: &[S]) -> FileChanges {
    let mut changes = FileChanges::default();
    for line in lines {
        let line = line.as_ref();
        if line.len() < 4 {
            continue;
        }
        let (code, file_path) = line.split_at(3);
        match code.trim_start().chars().next() {
            Some('D') => changes.push_deletion(file_path.to_string()),
            Some('?') | Some('A') | Some('M') => changes.push_addition(file_path.to_string()),
            Some('R') => {
                if let Some((from, to)) = file_path.split_once("->") {
                    changes.push_deletion(from.trim().to_string());
                    changes.push_addition(to.trim().to_string());
                }
            }
            _ => {}
        }
    }
    changes
}
