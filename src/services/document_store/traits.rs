//! Document store client trait.
//!
//! A document store persists small text documents (workflow state) under
//! string ids, either in object storage or on the local filesystem.

use anyhow::Result;
use async_trait::async_trait;

/// Core trait for document store clients.
///
/// # Example
///
/// ```ignore
/// use storage_selector::services::document_store::select_document_store;
///
/// let client = select_document_store(false, None, "/data", "")?.into_client();
///
/// client.write("job-1/attempt-0", r#"{"cursor": 42}"#).await?;
/// let state = client.read("job-1/attempt-0").await?;
/// ```
#[async_trait]
pub trait DocumentStoreClient: Send + Sync {
    /// Write a document, replacing any previous content under `id`.
    async fn write(&self, id: &str, document: &str) -> Result<()>;

    /// Read a document.
    ///
    /// # Returns
    ///
    /// `None` if no document is stored under `id`.
    async fn read(&self, id: &str) -> Result<Option<String>>;

    /// Delete a document.
    ///
    /// # Returns
    ///
    /// `true` if a document was removed, `false` if none existed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Get the full URI where `id` is (or would be) stored.
    fn location(&self, id: &str) -> String;
}

/// A shared document store client for dynamic dispatch.
pub type SharedDocumentStoreClient = std::sync::Arc<dyn DocumentStoreClient>;

/// Normalize a document id into a relative object key (no leading slash).
pub(crate) fn normalize_id(id: &str) -> &str {
    id.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("/job-1/state"), "job-1/state");
        assert_eq!(normalize_id("job-1/state"), "job-1/state");
        assert_eq!(normalize_id("/"), "");
    }
}
