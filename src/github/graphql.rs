use serde_json::json;

use super::client::{ApiError, GraphqlExecutor, GraphqlRequest};
use super::types::{
    CommitRef, CommittableBranch, CreateCommitPayload, CreateRefPayload, FileChanges,
    RepositoryInfo,
};
use crate::error::ActionError;

const GET_REPOSITORY: &str = r#"
    query($owner: String!, $repo: String!, $ref: String!) {
      repository(owner: $owner, name: $repo) {
        id
        nameWithOwner
        ref(qualifiedName: $ref) {
          name
          target {
            ... on Commit {
              history(first: 1) {
                nodes {
                  oid
                  message
                  committedDate
                }
              }
            }
          }
        }
        defaultBranchRef {
          name
          target {
            ... on Commit {
              history(first: 1) {
                nodes {
                  oid
                  message
                  committedDate
                }
              }
            }
          }
        }
      }
    }
"#;

const CREATE_COMMIT_ON_BRANCH: &str = r#"
    mutation($commitInput: CreateCommitOnBranchInput!) {
      createCommitOnBranch(input: $commitInput) {
        commit {
          oid
          message
          committedDate
        }
      }
    }
"#;

const CREATE_TAG_ON_COMMIT: &str = r#"
    mutation($tagInput: CreateRefInput!) {
      createRef(input: $tagInput) {
        ref {
          name
        }
      }
    }
"#;

/// Fetch the repository's identity plus the latest commit of `branch`.
/// An absent `ref` in the result signals that the branch does not exist.
pub async fn get_repository(
    api: &dyn GraphqlExecutor,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Result<RepositoryInfo, ActionError> {
    let data = api
        .execute(GraphqlRequest {
            operation: "GetRepository",
            query: GET_REPOSITORY,
            variables: json!({
                "owner": owner,
                "repo": repo,
                "ref": format!("refs/heads/{branch}"),
            }),
        })
        .await?;

    parse(data, "repository")
}

/// Create a commit on the branch with `expectedHeadOid` set to the base
/// commit fetched earlier; the API rejects the mutation if the branch moved
/// in between, which surfaces as an ordinary response error.
pub async fn create_commit_on_branch(
    api: &dyn GraphqlExecutor,
    base_commit: &CommitRef,
    message: &str,
    branch: &CommittableBranch,
    file_changes: &FileChanges,
) -> Result<CreateCommitPayload, ActionError> {
    let data = api
        .execute(GraphqlRequest {
            operation: "CreateCommitOnBranch",
            query: CREATE_COMMIT_ON_BRANCH,
            variables: json!({
                "commitInput": {
                    "branch": branch,
                    "expectedHeadOid": base_commit.oid,
                    "message": { "headline": message },
                    "fileChanges": file_changes,
                }
            }),
        })
        .await?;

    parse(data, "createCommitOnBranch")
}

/// Create a lightweight tag ref pointing at the given commit.
pub async fn create_tag_on_commit(
    api: &dyn GraphqlExecutor,
    commit: &CommitRef,
    tag: &str,
    repository_id: &str,
) -> Result<CreateRefPayload, ActionError> {
    let data = api
        .execute(GraphqlRequest {
            operation: "CreateTagOnCommit",
            query: CREATE_TAG_ON_COMMIT,
            variables: json!({
                "tagInput": {
                    "repositoryId": repository_id,
                    "name": format!("refs/tags/{tag}"),
                    "oid": commit.oid,
                }
            }),
        })
        .await?;

    parse(data, "createRef")
}

fn parse<T: serde::de::DeserializeOwned>(
    data: serde_json::Value,
    field: &str,
) -> Result<T, ActionError> {
    let value = data
        .get(field)
        .cloned()
        .ok_or_else(|| ApiError::Response(format!(" - missing '{field}' in response data")))?;
    serde_json::from_value(value)
        .map_err(|e| ActionError::Api(ApiError::Response(format!(" - malformed '{field}': {e}"))))
}
