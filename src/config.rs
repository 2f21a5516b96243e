use std::env;
use std::path::PathBuf;

use structopt::StructOpt;

use crate::error::ActionError;
use crate::input;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_BLOB_CONCURRENCY: usize = 8;

/// CLI surface. Every option can also arrive as a CI action input through
/// the environment; command-line values win.
#[derive(Debug, StructOpt, Default)]
pub struct Opt {
    #[structopt(
        long,
        help = "Paths to stage and commit; repeatable, newline-separated values accepted"
    )]
    pub files: Vec<String>,

    #[structopt(long, help = "Headline for the created commit")]
    pub commit_message: Option<String>,

    #[structopt(long, help = "Target repository as owner/name (defaults to the event's)")]
    pub repository: Option<String>,

    #[structopt(long, help = "Branch to commit to (defaults to the event's branch)")]
    pub branch_name: Option<String>,

    #[structopt(long, help = "Tag to create on the resulting commit")]
    pub tag: Option<String>,

    #[structopt(long, help = "Force-push when publishing a switched branch")]
    pub branch_push_force: bool,

    #[structopt(
        long,
        help = "Skip tag creation when no file changes were found (true/false)"
    )]
    pub tag_only_if_file_changes: Option<bool>,

    #[structopt(long, parse(from_os_str), help = "Working directory of the checkout")]
    pub workspace: Option<PathBuf>,

    #[structopt(long, help = "Cap on concurrent file reads while loading blobs")]
    pub max_concurrent_reads: Option<usize>,
}

/// Everything a run needs, gathered exactly once. Later stages read this
/// struct instead of the process environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<String>,
    pub commit_message: Option<String>,
    pub repository: Option<String>,
    pub branch_name: Option<String>,
    pub tag: Option<String>,
    pub branch_push_force: bool,
    pub tag_only_if_file_changes: bool,
    pub workspace: PathBuf,
    pub token: String,
    pub graphql_url: String,
    pub blob_concurrency: usize,
}

impl RunConfig {
    pub fn gather(opt: Opt) -> Result<Self, ActionError> {
        let files = if opt.files.is_empty() {
            input::get_multiline_input("files")
        } else {
            // A single CLI value may still carry embedded newlines.
            opt.files
                .iter()
                .flat_map(|f| input::split_lines(f))
                .collect()
        };

        let token = input::get_input("GH_TOKEN")
            .or_else(|| env::var("GH_TOKEN").ok().filter(|v| !v.is_empty()))
            .or_else(|| env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty()))
            .ok_or_else(|| {
                ActionError::Config("Input required and not supplied: GH_TOKEN".to_string())
            })?;

        let workspace = match opt.workspace {
            Some(path) => path,
            None => match input::get_input("workspace").or_else(|| env::var("GITHUB_WORKSPACE").ok())
            {
                Some(path) if !path.is_empty() => PathBuf::from(path),
                _ => env::current_dir()?,
            },
        };

        let tag_only_if_file_changes = match opt.tag_only_if_file_changes {
            Some(value) => value,
            None => input::get_boolean_input("tag-only-if-file-changes")?.unwrap_or(true),
        };

        let blob_concurrency = match opt.max_concurrent_reads {
            Some(value) => value,
            None => match input::get_input("max-concurrent-reads") {
                Some(raw) => raw.parse().map_err(|_| {
                    ActionError::Config(format!(
                        "max-concurrent-reads is not a number: {raw}"
                    ))
                })?,
                None => DEFAULT_BLOB_CONCURRENCY,
            },
        };

        Ok(RunConfig {
            files,
            commit_message: opt
                .commit_message
                .or_else(|| input::get_input("commit-message")),
            repository: opt.repository.or_else(|| input::get_input("repository")),
            branch_name: opt.branch_name.or_else(|| input::get_input("branch-name")),
            tag: opt.tag.or_else(|| input::get_input("tag")),
            branch_push_force: opt.branch_push_force
                || input::get_boolean_input("branch-push-force")?.unwrap_or(false),
            tag_only_if_file_changes,
            workspace,
            token,
            graphql_url: env::var("GITHUB_GRAPHQL_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            blob_concurrency,
        })
    }
}

/// Parse an overriding repository input. Anything but exactly `owner/name`
/// is a configuration error.
pub fn parse_repository(value: &str) -> Result<(String, String), ActionError> {
    match value.split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ActionError::Config(format!(
            "repository must be in owner/name format: {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_override_must_be_owner_slash_name() {
        assert_eq!(
            parse_repository("my-user/my-repo").unwrap(),
            ("my-user".to_string(), "my-repo".to_string())
        );
        assert!(parse_repository("just-a-name").is_err());
        assert!(parse_repository("a/b/c").is_err());
        assert!(parse_repository("/repo").is_err());
        assert!(parse_repository("owner/").is_err());
    }
}
