use std::env;

use crate::error::ActionError;

/// Owner, repository and branch of the CI event that triggered the run.
/// Resolved once from the environment; explicit inputs may override the
/// pieces later, this only records what the event itself says.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl EventContext {
    pub fn from_env() -> Result<Self, ActionError> {
        let repository = env::var("GITHUB_REPOSITORY")
            .map_err(|_| ActionError::Config("GITHUB_REPOSITORY is not set".to_string()))?;
        let (owner, repo) = repository.split_once('/').ok_or_else(|| {
            ActionError::Config(format!(
                "GITHUB_REPOSITORY is not in owner/name format: {repository}"
            ))
        })?;

        let git_ref = env::var("GITHUB_REF")
            .map_err(|_| ActionError::Config("GITHUB_REF is not set".to_string()))?;
        let head_ref = env::var("GITHUB_HEAD_REF").ok();
        let branch = resolve_current_branch(&git_ref, head_ref.as_deref())?;

        Ok(EventContext {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch,
        })
    }
}

/// The branch the event ref points at. Pull-request refs resolve through
/// the head ref the CI host exports; tag refs have no current branch.
pub fn resolve_current_branch(
    git_ref: &str,
    head_ref: Option<&str>,
) -> Result<String, ActionError> {
    if let Some(branch) = git_ref.strip_prefix("refs/heads/") {
        Ok(branch.to_string())
    } else if git_ref.starts_with("refs/pull/") {
        Ok(head_ref.unwrap_or_default().to_string())
    } else if git_ref.starts_with("refs/tags/") {
        Ok(String::new())
    } else {
        Err(ActionError::Config(format!("Unsupported ref: {git_ref}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_refs_strip_the_heads_prefix() {
        assert_eq!(
            resolve_current_branch("refs/heads/feature/login", None).unwrap(),
            "feature/login"
        );
    }

    #[test]
    fn pull_refs_resolve_through_the_head_ref() {
        assert_eq!(
            resolve_current_branch("refs/pull/42/merge", Some("pr-branch")).unwrap(),
            "pr-branch"
        );
        assert_eq!(resolve_current_branch("refs/pull/42/merge", None).unwrap(), "");
    }

    #[test]
    fn tag_refs_have_no_current_branch() {
        assert_eq!(resolve_current_branch("refs/tags/v1.0.0", None).unwrap(), "");
    }

    #[test]
    fn other_refs_are_a_configuration_error() {
        let err = resolve_current_branch("refs/notes/commits", None).unwrap_err();
        assert!(err.to_string().contains("Unsupported ref"));
    }
}
