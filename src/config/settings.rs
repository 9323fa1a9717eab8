//! Storage settings resolved from a property source.
//!
//! # Properties
//!
//! - `storage.logs.type`: `gcs`, `minio` or `s3` (required)
//! - `storage.logs.<type>.<field>`: fields of the selected type
//! - `storage.state.type`: `gcs`, `minio` or `s3` (optional)
//! - `storage.state.<type>.<field>`: fields of the selected type
//! - `workspace.root`: local workspace directory (required unless clustered)
//! - `workspace.docker-mount`: overrides the root for local documents (optional)
//! - `deployment.environment`: `kubernetes` or `docker` (optional)
//!
//! Fields per type:
//!
//! - gcs: `bucket`, `application-credentials`
//! - minio: `bucket`, `access-key`, `secret-access-key`, `endpoint`
//! - s3: `bucket`, `access-key`, `secret-access-key`, `region`

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::properties::StorageProperties;
use crate::services::storage::{build_variant, ConfigurationError, StorageType, StorageVariant};

/// Namespace of the log storage properties.
pub const LOG_STORAGE_NAMESPACE: &str = "storage.logs";
/// Namespace of the state storage properties.
pub const STATE_STORAGE_NAMESPACE: &str = "storage.state";
/// Workspace root property.
pub const WORKSPACE_ROOT: &str = "workspace.root";
/// Workspace docker mount property.
pub const WORKSPACE_DOCKER_MOUNT: &str = "workspace.docker-mount";
/// Explicit deployment environment property.
pub const DEPLOYMENT_ENVIRONMENT: &str = "deployment.environment";
/// Variable injected into every pod by Kubernetes.
pub const KUBERNETES_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";

/// Where the process is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    /// Orchestrated by Kubernetes.
    Kubernetes,
    /// Single host (docker compose or bare process).
    Docker,
}

impl DeploymentEnvironment {
    /// Determine the deployment environment.
    ///
    /// An explicit `deployment.environment` wins; otherwise the presence of
    /// `KUBERNETES_SERVICE_HOST` means Kubernetes.
    pub fn detect(props: &StorageProperties) -> Result<Self, ConfigurationError> {
        if let Some(value) = props.get_non_empty(DEPLOYMENT_ENVIRONMENT) {
            return value.parse();
        }

        if props.var(KUBERNETES_SERVICE_HOST).is_some() {
            Ok(DeploymentEnvironment::Kubernetes)
        } else {
            Ok(DeploymentEnvironment::Docker)
        }
    }

    /// Whether documents must be shared through object storage.
    pub fn is_clustered(&self) -> bool {
        matches!(self, DeploymentEnvironment::Kubernetes)
    }

    /// Lowercase name, as accepted by `deployment.environment`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentEnvironment::Kubernetes => "kubernetes",
            DeploymentEnvironment::Docker => "docker",
        }
    }
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentEnvironment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("kubernetes") {
            Ok(DeploymentEnvironment::Kubernetes)
        } else if s.eq_ignore_ascii_case("docker") {
            Ok(DeploymentEnvironment::Docker)
        } else {
            Err(ConfigurationError::InvalidValue {
                key: DEPLOYMENT_ENVIRONMENT.to_string(),
                value: s.to_string(),
            })
        }
    }
}

/// Local workspace locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    /// Workspace root directory.
    pub root: String,
    /// Docker mount of the workspace; empty when not mounted.
    pub docker_mount: String,
}

impl WorkspaceSettings {
    /// Read `workspace.root` and `workspace.docker-mount`.
    pub fn load(props: &StorageProperties) -> Result<Self, ConfigurationError> {
        let root = props
            .get_non_empty(WORKSPACE_ROOT)
            .ok_or_else(|| ConfigurationError::MissingProperty {
                key: WORKSPACE_ROOT.to_string(),
            })?;
        let docker_mount = props.get(WORKSPACE_DOCKER_MOUNT).unwrap_or_default();

        Ok(Self { root, docker_mount })
    }
}

/// Everything needed to build the storage singletons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Storage for job logs, handed to the logging subsystem.
    pub log_storage: StorageVariant,
    /// Storage for workflow state; `None` when not configured.
    pub state_storage: Option<StorageVariant>,
    /// Local workspace; only read outside clustered deployments.
    pub workspace: Option<WorkspaceSettings>,
    pub environment: DeploymentEnvironment,
}

impl StorageSettings {
    /// Resolve settings from a property source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when a required property is missing,
    /// a storage type is unknown, or a selected type lacks a field. The
    /// workspace root is only required when not clustered.
    pub fn load(props: &StorageProperties) -> Result<Self, ConfigurationError> {
        let log_storage = load_storage_variant(props, LOG_STORAGE_NAMESPACE)?.ok_or_else(|| {
            ConfigurationError::MissingProperty {
                key: format!("{}.type", LOG_STORAGE_NAMESPACE),
            }
        })?;
        let state_storage = load_storage_variant(props, STATE_STORAGE_NAMESPACE)?;

        let environment = DeploymentEnvironment::detect(props)?;
        let workspace = if environment.is_clustered() {
            None
        } else {
            Some(WorkspaceSettings::load(props)?)
        };

        Ok(Self {
            log_storage,
            state_storage,
            workspace,
            environment,
        })
    }
}

/// Load the storage variant configured under `namespace`.
///
/// Returns `Ok(None)` when `<namespace>.type` is unset or empty.
pub fn load_storage_variant(
    props: &StorageProperties,
    namespace: &str,
) -> Result<Option<StorageVariant>, ConfigurationError> {
    let Some(discriminator) = props.get_non_empty(&format!("{}.type", namespace)) else {
        return Ok(None);
    };

    let storage_type: StorageType = discriminator.parse()?;
    let fields: HashMap<String, String> = storage_type
        .required_fields()
        .iter()
        .filter_map(|field| {
            let key = format!("{}.{}.{}", namespace, storage_type.as_str(), field);
            props.get(&key).map(|value| (field.to_string(), value))
        })
        .collect();

    let variant = build_variant(storage_type, &fields)?;
    tracing::debug!(
        "Selected {} storage for {} (bucket {})",
        storage_type,
        namespace,
        variant.bucket()
    );

    Ok(Some(variant))
}
