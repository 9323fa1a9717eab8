//! Startup assembly of the storage singletons.
//!
//! Runs once before any request is served. The result is immutable and can
//! be cloned cheaply and shared across tasks.

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::config::{DeploymentEnvironment, StorageProperties, StorageSettings};
use crate::services::document_store::{
    select_document_store, DocumentStoreClient, SharedDocumentStoreClient,
};
use crate::services::storage::StorageVariant;

/// The storage singletons for the lifetime of the process.
#[derive(Clone)]
pub struct StorageBootstrap {
    settings: Arc<StorageSettings>,
    document_store_kind: &'static str,
    document_store: SharedDocumentStoreClient,
}

impl StorageBootstrap {
    /// Build the singletons from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the document store backend cannot be configured,
    /// or if the workspace is missing outside a clustered deployment.
    pub fn init(settings: StorageSettings) -> Result<Self> {
        let (root, docker_mount) = match &settings.workspace {
            Some(workspace) => (workspace.root.as_str(), workspace.docker_mount.as_str()),
            None if settings.environment.is_clustered() => ("", ""),
            None => bail!(
                "Workspace settings are required in a {} deployment",
                settings.environment
            ),
        };

        let selection = select_document_store(
            settings.environment.is_clustered(),
            settings.state_storage.clone(),
            root,
            docker_mount,
        )
        .context("Failed to create document store client")?;

        let document_store_kind = selection.kind();
        let document_store = selection.into_client();

        tracing::info!(
            "Storage initialized: environment={}, logs={}, state={}, document_store={} ({})",
            settings.environment,
            settings.log_storage.storage_type(),
            settings
                .state_storage
                .as_ref()
                .map(|s| s.storage_type().as_str())
                .unwrap_or("none"),
            document_store_kind,
            document_store.location(""),
        );

        Ok(Self {
            settings: Arc::new(settings),
            document_store_kind,
            document_store,
        })
    }

    /// Resolve settings from `props` and build the singletons.
    pub fn from_properties(props: &StorageProperties) -> Result<Self> {
        let settings = StorageSettings::load(props).context("Invalid storage configuration")?;
        Self::init(settings)
    }

    /// Storage configuration for job logs.
    pub fn log_storage(&self) -> &StorageVariant {
        &self.settings.log_storage
    }

    /// Storage configuration for workflow state, if any.
    pub fn state_storage(&self) -> Option<&StorageVariant> {
        self.settings.state_storage.as_ref()
    }

    /// Deployment environment the document store was selected for.
    pub fn environment(&self) -> DeploymentEnvironment {
        self.settings.environment
    }

    /// The resolved settings.
    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    /// `"cloud"` or `"local"`.
    pub fn document_store_kind(&self) -> &'static str {
        self.document_store_kind
    }

    /// The shared document store client.
    pub fn document_store(&self) -> SharedDocumentStoreClient {
        Arc::clone(&self.document_store)
    }

    /// Borrow the document store client.
    pub fn document_store_ref(&self) -> &dyn DocumentStoreClient {
        self.document_store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::ConfigurationError;
    use tempfile::TempDir;

    fn props(workspace: &str) -> StorageProperties {
        StorageProperties::new()
            .with("storage.logs.type", "gcs")
            .with("storage.logs.gcs.bucket", "logs")
            .with("storage.logs.gcs.application-credentials", "/secrets/gcs.json")
            .with("workspace.root", workspace)
    }

    #[test]
    fn test_local_bootstrap_round_trip() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().to_str().unwrap();

        let bootstrap = StorageBootstrap::from_properties(&props(workspace)).unwrap();
        assert_eq!(bootstrap.document_store_kind(), "local");
        assert_eq!(bootstrap.environment(), DeploymentEnvironment::Docker);
        assert_eq!(
            bootstrap.log_storage(),
            &StorageVariant::gcs("logs", "/secrets/gcs.json")
        );
        assert!(bootstrap.state_storage().is_none());

        let client = bootstrap.document_store();
        smol::block_on(async {
            client.write("job-1", "state").await.unwrap();
            assert_eq!(client.read("job-1").await.unwrap().as_deref(), Some("state"));
        });
        assert!(dir.path().join("job-1").exists());
    }

    #[test]
    fn test_clustered_bootstrap_uses_state_storage() {
        let props = props("/data")
            .with("deployment.environment", "kubernetes")
            .with("storage.state.type", "S3")
            .with("storage.state.s3.bucket", "state")
            .with("storage.state.s3.access-key", "ak")
            .with("storage.state.s3.secret-access-key", "sk")
            .with("storage.state.s3.region", "us-west-2");

        let bootstrap = StorageBootstrap::from_properties(&props).unwrap();
        assert_eq!(bootstrap.document_store_kind(), "cloud");
        assert_eq!(
            bootstrap.document_store_ref().location("job-1"),
            "s3://state/state/job-1"
        );
    }

    #[test]
    fn test_clustered_bootstrap_without_state_storage() {
        let props = props("/data").with("deployment.environment", "kubernetes");

        let bootstrap = StorageBootstrap::from_properties(&props).unwrap();
        assert_eq!(bootstrap.document_store_kind(), "cloud");
        assert!(bootstrap.state_storage().is_none());

        let client = bootstrap.document_store();
        smol::block_on(async {
            client.write("job-1", "dropped").await.unwrap();
            assert_eq!(client.read("job-1").await.unwrap(), None);
        });
    }

    #[test]
    fn test_clustered_bootstrap_without_workspace() {
        let props = StorageProperties::new()
            .with("storage.logs.type", "gcs")
            .with("storage.logs.gcs.bucket", "logs")
            .with("storage.logs.gcs.application-credentials", "/secrets/gcs.json")
            .with("deployment.environment", "kubernetes")
            .with("storage.state.type", "gcs")
            .with("storage.state.gcs.bucket", "state")
            .with("storage.state.gcs.application-credentials", "/secrets/gcs.json");

        let bootstrap = StorageBootstrap::from_properties(&props).unwrap();
        assert_eq!(bootstrap.document_store_kind(), "cloud");
        assert!(bootstrap.settings().workspace.is_none());
        assert_eq!(
            bootstrap.document_store_ref().location("job-1"),
            "gs://state/state/job-1"
        );
    }

    #[test]
    fn test_local_bootstrap_requires_workspace() {
        let settings = StorageSettings {
            log_storage: StorageVariant::gcs("logs", "/secrets/gcs.json"),
            state_storage: None,
            workspace: None,
            environment: DeploymentEnvironment::Docker,
        };
        assert!(StorageBootstrap::init(settings).is_err());
    }

    #[test]
    fn test_configuration_error_aborts_bootstrap() {
        let props = props("/data").with("storage.logs.type", "azure");

        let err = StorageBootstrap::from_properties(&props).err().unwrap();
        let config_err = err.downcast_ref::<ConfigurationError>().unwrap();
        assert_eq!(
            config_err,
            &ConfigurationError::UnknownStorageType {
                discriminator: "azure".to_string()
            }
        );
    }
}
