//! Document store selection.
//!
//! Picks the document store implementation from the deployment mode:
//! clustered deployments share state through object storage, single-host
//! deployments through the local workspace.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use super::cloud::{CloudDocumentStoreClient, STATE_STORAGE_PREFIX};
use super::local_fs::LocalFsDocumentStoreClient;
use super::traits::{DocumentStoreClient, SharedDocumentStoreClient};
use crate::services::storage::StorageVariant;

/// The document store chosen at startup.
pub enum DocumentStoreSelection {
    /// Object storage backed client, possibly without a configuration.
    Cloud(CloudDocumentStoreClient),
    /// Local filesystem client.
    Local(LocalFsDocumentStoreClient),
}

impl DocumentStoreSelection {
    /// Short name of the selected implementation.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentStoreSelection::Cloud(_) => "cloud",
            DocumentStoreSelection::Local(_) => "local",
        }
    }

    /// The cloud client, if that is what was selected.
    pub fn as_cloud(&self) -> Option<&CloudDocumentStoreClient> {
        match self {
            DocumentStoreSelection::Cloud(client) => Some(client),
            DocumentStoreSelection::Local(_) => None,
        }
    }

    /// The local client, if that is what was selected.
    pub fn as_local(&self) -> Option<&LocalFsDocumentStoreClient> {
        match self {
            DocumentStoreSelection::Local(client) => Some(client),
            DocumentStoreSelection::Cloud(_) => None,
        }
    }

    /// Convert into a shared trait object.
    pub fn into_client(self) -> SharedDocumentStoreClient {
        match self {
            DocumentStoreSelection::Cloud(client) => Arc::new(client),
            DocumentStoreSelection::Local(client) => Arc::new(client),
        }
    }

    /// Borrow as a trait object.
    pub fn as_client(&self) -> &dyn DocumentStoreClient {
        match self {
            DocumentStoreSelection::Cloud(client) => client,
            DocumentStoreSelection::Local(client) => client,
        }
    }
}

/// Select the document store for this process.
///
/// # Arguments
///
/// * `is_clustered` - Whether the process runs under an orchestrator
/// * `state_storage` - State storage configuration, used when clustered
/// * `workspace_root` - Local root, used when not clustered
/// * `docker_mount` - Overrides `workspace_root` when non-empty
///
/// # Errors
///
/// Returns an error if the cloud storage backend rejects the configuration.
pub fn select_document_store(
    is_clustered: bool,
    state_storage: Option<StorageVariant>,
    workspace_root: &str,
    docker_mount: &str,
) -> Result<DocumentStoreSelection> {
    if is_clustered {
        if state_storage.is_none() {
            tracing::warn!(
                "No state storage configured, documents will not be persisted"
            );
        }
        let client = CloudDocumentStoreClient::new(state_storage, STATE_STORAGE_PREFIX)?;
        return Ok(DocumentStoreSelection::Cloud(client));
    }

    let root = if docker_mount.is_empty() {
        workspace_root
    } else {
        docker_mount
    };

    Ok(DocumentStoreSelection::Local(LocalFsDocumentStoreClient::new(
        Path::new(root),
    )))
}
