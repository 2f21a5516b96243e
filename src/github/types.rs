use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The head of a branch as reported by the API at query time. Immutable once
/// fetched; the oid doubles as the optimistic-concurrency precondition for
/// the commit mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRef {
    pub oid: String,
    pub message: String,
    pub committed_date: DateTime<Utc>,
}

/// Addressing tuple for the commit mutation. Resolved once per run and kept
/// identical across the commit and tag calls of the same run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittableBranch {
    pub repository_name_with_owner: String,
    pub branch_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAddition {
    pub path: String,
    /// Base64 text of the file at commit time. The empty string is a valid
    /// placeholder meaning "not yet loaded".
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDeletion {
    pub path: String,
}

/// The additions/deletions payload of the commit mutation. Both lists are
/// omitted from the serialized form, not sent as empty arrays, when they
/// hold no entries; the API distinguishes the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additions: Option<Vec<FileAddition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<Vec<FileDeletion>>,
}

impl FileChanges {
    pub fn push_addition(&mut self, path: String) {
        self.additions.get_or_insert_with(Vec::new).push(FileAddition {
            path,
            contents: String::new(),
        });
    }

    pub fn push_deletion(&mut self, path: String) {
        self.deletions
            .get_or_insert_with(Vec::new)
            .push(FileDeletion { path });
    }

    pub fn total(&self) -> usize {
        self.additions.as_ref().map_or(0, Vec::len) + self.deletions.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHistory {
    pub nodes: Vec<CommitRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTarget {
    pub history: CommitHistory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRef {
    pub name: String,
    pub target: CommitTarget,
}

impl BranchRef {
    /// Latest commit on the branch, if the branch has any history at all.
    pub fn latest_commit(&self) -> Option<&CommitRef> {
        self.target.history.nodes.first()
    }
}

/// Result of the `GetRepository` read: the repository's identity plus the
/// requested branch ref (absent when the branch does not exist) and the
/// default branch ref with the same one-commit history shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub id: String,
    pub name_with_owner: String,
    #[serde(rename = "ref")]
    pub branch: Option<BranchRef>,
    pub default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommitPayload {
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefPayload {
    #[serde(rename = "ref")]
    pub reference: CreatedRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_change_set_serializes_without_either_field() {
        let changes = FileChanges::default();
        assert_eq!(serde_json::to_value(&changes).unwrap(), json!({}));
    }

    #[test]
    fn populated_change_set_keeps_only_populated_fields() {
        let mut changes = FileChanges::default();
        changes.push_deletion("gone.txt".into());
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value, json!({ "deletions": [{ "path": "gone.txt" }] }));
    }

    #[test]
    fn repository_info_reads_the_graphql_shape() {
        let info: RepositoryInfo = serde_json::from_value(json!({
            "id": "repo-id",
            "nameWithOwner": "my-user/my-repo",
            "ref": {
                "name": "custom-branch",
                "target": {
                    "history": {
                        "nodes": [{
                            "oid": "another-oid",
                            "message": "another message",
                            "committedDate": "2024-08-19T04:53:47Z"
                        }]
                    }
                }
            },
            "defaultBranchRef": null
        }))
        .unwrap();

        let branch = info.branch.expect("branch ref");
        assert_eq!(branch.name, "custom-branch");
        assert_eq!(branch.latest_commit().unwrap().oid, "another-oid");
        assert!(info.default_branch_ref.is_none());
    }
}
