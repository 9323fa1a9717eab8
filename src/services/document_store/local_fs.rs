//! Local filesystem document store.
//!
//! Used outside clustered deployments, where the workspace (or its docker
//! mount) is shared between the processes that read and write state.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::traits::{normalize_id, DocumentStoreClient};

/// Document store rooted at a local directory.
///
/// Constructing the client never touches the filesystem; directories are
/// created on first write.
#[derive(Debug, Clone)]
pub struct LocalFsDocumentStoreClient {
    root: PathBuf,
}

impl LocalFsDocumentStoreClient {
    /// Create a client rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory documents are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the full file path for a document id.
    ///
    /// Ids may not climb out of the root with `..`.
    fn get_path(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(normalize_id(id));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            bail!("Invalid document id {:?}: must stay under {}", id, self.root.display());
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentStoreClient for LocalFsDocumentStoreClient {
    async fn write(&self, id: &str, document: &str) -> Result<()> {
        let path = self.get_path(id)?;

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        async_fs::write(&path, document)
            .await
            .with_context(|| format!("Failed to write document {}", path.display()))?;
        tracing::debug!("Wrote document {}", path.display());
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<String>> {
        let path = self.get_path(id)?;

        match async_fs::read_to_string(&path).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read document {}", path.display())),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.get_path(id)?;

        match async_fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted document {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to delete document {}", path.display()))
            }
        }
    }

    fn location(&self, id: &str) -> String {
        format!("file://{}", self.root.join(normalize_id(id)).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_does_not_touch_filesystem() {
        let client = LocalFsDocumentStoreClient::new("/nonexistent/workspace/root");
        assert_eq!(client.root(), Path::new("/nonexistent/workspace/root"));
    }

    #[test]
    fn test_location() {
        let client = LocalFsDocumentStoreClient::new("/data");
        assert_eq!(client.location("/job-1/state"), "file:///data/job-1/state");
    }

    #[test]
    fn test_write_read_delete() {
        let dir = TempDir::new().unwrap();
        let client = LocalFsDocumentStoreClient::new(dir.path());

        smol::block_on(async {
            assert_eq!(client.read("job-1/attempt-0").await.unwrap(), None);

            client.write("job-1/attempt-0", "{\"cursor\":7}").await.unwrap();
            assert_eq!(
                client.read("job-1/attempt-0").await.unwrap().as_deref(),
                Some("{\"cursor\":7}")
            );

            client.write("job-1/attempt-0", "{\"cursor\":8}").await.unwrap();
            assert_eq!(
                client.read("job-1/attempt-0").await.unwrap().as_deref(),
                Some("{\"cursor\":8}")
            );

            assert!(client.delete("job-1/attempt-0").await.unwrap());
            assert!(!client.delete("job-1/attempt-0").await.unwrap());
            assert_eq!(client.read("job-1/attempt-0").await.unwrap(), None);
        });
    }

    #[test]
    fn test_rejects_ids_outside_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("workspace");
        let client = LocalFsDocumentStoreClient::new(&root);

        smol::block_on(async {
            assert!(client.write("../escaped", "state").await.is_err());
            assert!(client.write("job-1/../../escaped", "state").await.is_err());
            assert!(client.read("../escaped").await.is_err());
            assert!(client.delete("../escaped").await.is_err());
        });

        assert!(!dir.path().join("escaped").exists());
        assert!(!root.exists());
    }

    #[test]
    fn test_documents_land_under_root_without_prefix() {
        let dir = TempDir::new().unwrap();
        let client = LocalFsDocumentStoreClient::new(dir.path());

        smol::block_on(async {
            client.write("job-9", "done").await.unwrap();
        });

        let on_disk = std::fs::read_to_string(dir.path().join("job-9")).unwrap();
        assert_eq!(on_disk, "done");
    }
}
