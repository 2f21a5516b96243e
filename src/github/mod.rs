pub mod client;
pub mod graphql;
pub mod types;

pub use client::{ApiError, GithubClient, GraphqlExecutor, GraphqlRequest};
pub use graphql::{create_commit_on_branch, create_tag_on_commit, get_repository};
