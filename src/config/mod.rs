//! Startup configuration.
//!
//! - **Properties** (`properties`): explicit values, JSON files and the
//!   process environment
//! - **Settings** (`settings`): log/state storage, workspace and deployment
//!   environment resolved from properties

pub mod properties;
pub mod settings;

pub use properties::{env_var_name, StorageProperties};
pub use settings::{
    load_storage_variant, DeploymentEnvironment, StorageSettings, WorkspaceSettings,
    DEPLOYMENT_ENVIRONMENT, KUBERNETES_SERVICE_HOST, LOG_STORAGE_NAMESPACE,
    STATE_STORAGE_NAMESPACE, WORKSPACE_DOCKER_MOUNT, WORKSPACE_ROOT,
};
