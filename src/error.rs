use thiserror::Error;

use crate::github::client::ApiError;

/// Everything a run can fail with. The reporter in `main` matches on the
/// variant to decide between a notice, a run failure and raw propagation,
/// so new kinds must be added here rather than smuggled through `Io`.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0}")]
    Config(String),

    #[error("{}", branch_not_found_message(.branch, .explicit))]
    BranchNotFound { branch: String, explicit: bool },

    #[error("No commit history on branch '{0}'")]
    NoCommitHistory(String),

    #[error("No file changes found")]
    NoFileChanges,

    #[error("Read file failed, path: {path}, error: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} exited with status {code}")]
    Git { command: String, code: i32 },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn branch_not_found_message(branch: &str, explicit: &bool) -> String {
    if *explicit {
        format!("Requested branch '{}' not found in repository", branch)
    } else {
        format!("Current branch '{}' not found in repository", branch)
    }
}

impl ActionError {
    /// Soft failures are reported as a notice and end the run successfully.
    pub fn is_soft(&self) -> bool {
        matches!(self, ActionError::NoFileChanges)
    }

    /// Expected failure kinds are reported with their message and a failure
    /// exit code. Anything else is a programming error and propagates raw.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, ActionError::Io(_))
    }
}
