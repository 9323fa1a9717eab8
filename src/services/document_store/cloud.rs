//! Cloud-backed document store using OpenDAL.
//!
//! Documents live in the bucket of the configured state storage under a
//! fixed key prefix, so several kinds of data can share one bucket.

use anyhow::{Context, Result};
use async_trait::async_trait;
use opendal::{ErrorKind, Operator};

use super::traits::{normalize_id, DocumentStoreClient};
use crate::services::storage::StorageVariant;

/// Key prefix for workflow state documents.
pub const STATE_STORAGE_PREFIX: &str = "state";

/// Document store backed by GCS, MinIO or S3.
///
/// When constructed without a storage configuration the client is inert:
/// writes are dropped, reads find nothing and deletes remove nothing.
pub struct CloudDocumentStoreClient {
    config: Option<StorageVariant>,
    prefix: String,
    operator: Option<Operator>,
}

impl CloudDocumentStoreClient {
    /// Create a client for the given state storage, namespaced by `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the configuration.
    pub fn new(config: Option<StorageVariant>, prefix: impl Into<String>) -> Result<Self> {
        let operator = config.as_ref().map(|c| c.build_operator()).transpose()?;

        Ok(Self {
            config,
            prefix: prefix.into(),
            operator,
        })
    }

    /// Create a client over an existing operator.
    pub fn with_operator(
        config: Option<StorageVariant>,
        prefix: impl Into<String>,
        operator: Operator,
    ) -> Self {
        Self {
            config,
            prefix: prefix.into(),
            operator: Some(operator),
        }
    }

    /// The state storage configuration, if any.
    pub fn config(&self) -> Option<&StorageVariant> {
        self.config.as_ref()
    }

    /// The key prefix applied to every document id.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a storage backend is attached.
    pub fn is_configured(&self) -> bool {
        self.operator.is_some()
    }

    /// Resolve a document id to its object key.
    fn key(&self, id: &str) -> String {
        let id = normalize_id(id);
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            id.to_string()
        } else {
            format!("{}/{}", prefix, id)
        }
    }
}

#[async_trait]
impl DocumentStoreClient for CloudDocumentStoreClient {
    async fn write(&self, id: &str, document: &str) -> Result<()> {
        let key = self.key(id);
        let Some(op) = &self.operator else {
            tracing::warn!("No state storage configured, dropping document {}", key);
            return Ok(());
        };

        op.write(&key, document.as_bytes().to_vec())
            .await
            .with_context(|| format!("Failed to write document {}", self.location(id)))?;
        tracing::debug!("Wrote document {}", key);
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<String>> {
        let Some(op) = &self.operator else {
            return Ok(None);
        };
        let key = self.key(id);

        match op.read(&key).await {
            Ok(buffer) => {
                let document = String::from_utf8(buffer.to_vec())
                    .with_context(|| format!("Document {} is not valid UTF-8", key))?;
                Ok(Some(document))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read document {}", self.location(id)))
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(op) = &self.operator else {
            return Ok(false);
        };
        let key = self.key(id);

        // OpenDAL deletes are idempotent, so check first to report whether
        // anything was removed.
        if !op.exists(&key).await? {
            return Ok(false);
        }

        op.delete(&key)
            .await
            .with_context(|| format!("Failed to delete document {}", self.location(id)))?;
        tracing::debug!("Deleted document {}", key);
        Ok(true)
    }

    fn location(&self, id: &str) -> String {
        let key = self.key(id);
        match &self.config {
            Some(config) => config.object_uri(&key),
            None => format!("unconfigured:///{}", key),
        }
    }
}
