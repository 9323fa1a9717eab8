//! Startup selection of cloud storage configuration and document store
//! clients.
//!
//! Log and state storage are each configured by a discriminator (`gcs`,
//! `minio` or `s3`) plus the fields of that storage type. The document store
//! is chosen by deployment environment: object storage when clustered, the
//! local workspace otherwise.

pub mod bootstrap;
pub mod config;
pub mod services;

pub use bootstrap::StorageBootstrap;
pub use crate::config::{DeploymentEnvironment, StorageProperties, StorageSettings};
pub use services::document_store::{
    select_document_store, DocumentStoreClient, DocumentStoreSelection, STATE_STORAGE_PREFIX,
};
pub use services::storage::{select_storage_variant, ConfigurationError, StorageType, StorageVariant};
