pub mod base64;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::ActionError;
use crate::github::types::{FileAddition, FileChanges};
use self::base64::Base64Encoder;

const READ_CHUNK_SIZE: usize = 8192;

/// One working-tree file destined for the commit mutation. Keeps the
/// repository-relative path for the API payload next to the absolute path
/// used for reading. Single-read contract: `load` consumes the file once;
/// instances are created per addition per run and then discarded.
#[derive(Debug, Clone)]
pub struct Blob {
    path: String,
    absolute_path: PathBuf,
}

impl Blob {
    pub fn new(path: &str, workspace: &Path) -> Self {
        let workspace_str = workspace.to_string_lossy();
        let (relative, absolute) = if path.starts_with(workspace_str.as_ref()) {
            let relative = path
                .strip_prefix(workspace_str.as_ref())
                .unwrap_or(path)
                .trim_start_matches('/')
                .to_string();
            (relative, PathBuf::from(path))
        } else {
            (path.to_string(), workspace.join(path))
        };
        Blob {
            path: relative,
            absolute_path: absolute,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Stream the file through the base64 transcoder in fixed-size chunks
    /// and return the populated addition. Memory stays proportional to the
    /// chunk size; a read failure carries the offending path.
    pub async fn load(&self) -> Result<FileAddition, ActionError> {
        let mut file = tokio::fs::File::open(&self.absolute_path)
            .await
            .map_err(|source| self.read_error(source))?;

        let mut encoder = Base64Encoder::new();
        let mut contents = String::new();
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            let n = file
                .read(&mut buf)
                .await
                .map_err(|source| self.read_error(source))?;
            if n == 0 {
                break;
            }
            contents.push_str(&encoder.update(&buf[..n]));
        }
        contents.push_str(&encoder.finish());
        debug!("loaded blob: {} ({} base64 chars)", self.path, contents.len());

        Ok(FileAddition {
            path: self.path.clone(),
            contents,
        })
    }

    fn read_error(&self, source: std::io::Error) -> ActionError {
        ActionError::Read {
            path: self.absolute_path.to_string_lossy().into_owned(),
            source,
        }
    }
}

/// Populate every addition of the change set with base64 contents. Loads
/// fan out concurrently, never more than `limit` at a time. Addition order
/// is preserved.
pub async fn load_additions(
    changes: &mut FileChanges,
    workspace: &Path,
    limit: usize,
) -> Result<(), ActionError> {
    let Some(additions) = changes.additions.take() else {
        return Ok(());
    };

    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut set = JoinSet::new();
    let count = additions.len();
    for (index, addition) in additions.into_iter().enumerate() {
        let blob = Blob::new(&addition.path, workspace);
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("blob semaphore closed");
            (index, blob.load().await)
        });
    }

    let mut loaded: Vec<Option<FileAddition>> = vec![None; count];
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined.expect("blob load task panicked");
        loaded[index] = Some(result?);
    }

    changes.additions = Some(loaded.into_iter().flatten().collect());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::base64::engine::general_purpose::STANDARD;
    use ::base64::Engine;
    use tempfile::tempdir;

    #[tokio::test]
    async fn load_returns_the_whole_buffer_encoding() {
        let dir = tempdir().unwrap();
        let content = b"Hello World".repeat(3000); // spans several read chunks
        std::fs::write(dir.path().join("blob.txt"), &content).unwrap();

        let blob = Blob::new("blob.txt", dir.path());
        let addition = blob.load().await.unwrap();
        assert_eq!(addition.path, "blob.txt");
        assert_eq!(addition.contents, STANDARD.encode(&content));
    }

    #[tokio::test]
    async fn load_tags_read_failures_with_the_path() {
        let dir = tempdir().unwrap();
        let blob = Blob::new("missing.txt", dir.path());
        let err = blob.load().await.unwrap_err();
        match err {
            ActionError::Read { path, .. } => assert!(path.ends_with("missing.txt")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn workspace_prefixed_paths_are_made_relative_again() {
        let blob = Blob::new("/workspace/src/lib.rs", Path::new("/workspace"));
        assert_eq!(blob.path(), "src/lib.rs");
        assert_eq!(blob.absolute_path, PathBuf::from("/workspace/src/lib.rs"));

        let relative = Blob::new("src/lib.rs", Path::new("/workspace"));
        assert_eq!(relative.path(), "src/lib.rs");
        assert_eq!(relative.absolute_path, PathBuf::from("/workspace/src/lib.rs"));
    }

    #[tokio::test]
    async fn load_additions_populates_in_order_and_bounded() {
        let dir = tempdir().unwrap();
        let mut changes = FileChanges::default();
        for name in ["a.txt", "b.txt", "c.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
            changes.push_addition(name.to_string());
        }

        load_additions(&mut changes, dir.path(), 2).await.unwrap();
        let additions = changes.additions.unwrap();
        assert_eq!(
            additions.iter().map(|a| a.path.as_str()).collect::<Vec<_>>(),
            vec!["a.txt", "b.txt", "c.txt"]
        );
        assert_eq!(additions[0].contents, STANDARD.encode(b"a.txt"));
    }

    #[tokio::test]
    async fn load_additions_propagates_the_first_read_failure() {
        let dir = tempdir().unwrap();
        let mut changes = FileChanges::default();
        changes.push_addition("nope.txt".to_string());
        let err = load_additions(&mut changes, dir.path(), 4).await.unwrap_err();
        assert!(matches!(err, ActionError::Read { .. }));
    }
}
