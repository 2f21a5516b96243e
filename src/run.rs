//! The commit/tag orchestration state machine.
//!
//! One run walks a fixed sequence with no backtracking: resolve the target
//! from the event context and any overrides, optionally switch and publish
//! the branch, read the repository to pin the base commit, stage and scan
//! local changes, then issue the commit and tag mutations in that order.
//! The three remote effects (branch push, commit, tag) are independent and
//! there is no compensating rollback: a tag failure after a successful
//! commit leaves the commit in place.

use log::info;

use crate::blob;
use crate::config::{parse_repository, RunConfig};
use crate::context::EventContext;
use crate::error::ActionError;
use crate::git::{self, GitRunner};
use crate::github::types::{CommitRef, CommittableBranch, FileChanges};
use crate::github::{create_commit_on_branch, create_tag_on_commit, get_repository, GraphqlExecutor};

/// Where the mutations will land, resolved once per run. `explicit_branch`
/// records whether the branch came from an input rather than the event;
/// it only affects error wording.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub explicit_branch: bool,
}

/// What a completed run produced; the reporter turns this into process
/// outputs.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub commit: Option<CommitRef>,
    pub tag: Option<String>,
}

pub struct SignedCommitRun<'a> {
    config: &'a RunConfig,
    context: EventContext,
    github: &'a dyn GraphqlExecutor,
    git: &'a dyn GitRunner,
}

impl<'a> SignedCommitRun<'a> {
    pub fn new(
        config: &'a RunConfig,
        context: EventContext,
        github: &'a dyn GraphqlExecutor,
        git: &'a dyn GitRunner,
    ) -> Self {
        SignedCommitRun {
            config,
            context,
            github,
            git,
        }
    }

    fn resolve_target(&self) -> Result<BranchTarget, ActionError> {
        let (owner, repo) = match &self.config.repository {
            Some(value) => parse_repository(value)?,
            None => (self.context.owner.clone(), self.context.repo.clone()),
        };
        let (branch, explicit_branch) = match &self.config.branch_name {
            Some(branch) => (branch.clone(), true),
            None => (self.context.branch.clone(), false),
        };
        Ok(BranchTarget {
            owner,
            repo,
            branch,
            explicit_branch,
        })
    }

    pub async fn run(&self) -> Result<RunOutcome, ActionError> {
        let target = self.resolve_target()?;
        info!(
            "🎯 Target: {}/{} on branch '{}'",
            target.owner, target.repo, target.branch
        );

        // A branch differing from the event's means it may not exist on the
        // remote yet; create it locally and publish it best-effort. Whether
        // it is actually usable is decided by the repository read below.
        if target.branch != self.context.branch {
            info!("🔀 Switching to branch '{}'", target.branch);
            git::switch_branch(self.git, &target.branch).await?;
            git::push_current_branch(self.git, self.config.branch_push_force).await?;
        }

        let repository =
            get_repository(self.github, &target.owner, &target.repo, &target.branch).await?;
        let branch_ref = repository.branch.as_ref().ok_or_else(|| {
            ActionError::BranchNotFound {
                branch: target.branch.clone(),
                explicit: target.explicit_branch,
            }
        })?;
        let base_commit = branch_ref
            .latest_commit()
            .cloned()
            .ok_or_else(|| ActionError::NoCommitHistory(target.branch.clone()))?;
        info!("📌 Base commit on '{}': {}", target.branch, base_commit.oid);

        // Runs after context and branch resolution; a branch switch may
        // already have happened at this point.
        if self.config.files.is_empty() && self.config.tag.is_none() {
            return Err(ActionError::Config(
                "Neither 'files' nor 'tag' was supplied, nothing to do".to_string(),
            ));
        }

        let mut changes = FileChanges::default();
        if !self.config.files.is_empty() {
            git::add_file_changes(self.git, &self.config.workspace, &self.config.files).await?;
            changes = git::collect_file_changes(self.git).await?;
            info!(
                "📋 Change set: {} addition(s), {} deletion(s)",
                changes.additions.as_ref().map_or(0, Vec::len),
                changes.deletions.as_ref().map_or(0, Vec::len)
            );
            if changes.is_empty() {
                if self.config.tag.is_none() || self.config.tag_only_if_file_changes {
                    return Err(ActionError::NoFileChanges);
                }
                info!("No file changes found, continuing to tag creation");
            }
        }

        let mut outcome = RunOutcome::default();
        if !changes.is_empty() {
            let message = self.config.commit_message.clone().ok_or_else(|| {
                ActionError::Config("Input required and not supplied: commit-message".to_string())
            })?;
            blob::load_additions(&mut changes, &self.config.workspace, self.config.blob_concurrency)
                .await?;

            let branch = CommittableBranch {
                repository_name_with_owner: repository.name_with_owner.clone(),
                branch_name: target.branch.clone(),
            };
            let payload =
                create_commit_on_branch(self.github, &base_commit, &message, &branch, &changes)
                    .await?;
            info!("✅ Created commit {}", payload.commit.oid);
            outcome.commit = Some(payload.commit);
        }

        // Only reached when the commit step succeeded or was skipped; a
        // rejected commit mutation never falls through to the tag.
        if let Some(tag) = &self.config.tag {
            let tag_base = outcome.commit.as_ref().unwrap_or(&base_commit);
            let payload = create_tag_on_commit(self.github, tag_base, tag, &repository.id).await?;
            info!(
                "🏷️ Created tag '{}' ({}) on {}",
                tag, payload.reference.name, tag_base.oid
            );
            outcome.tag = Some(tag.clone());
        }

        Ok(outcome)
    }
}
