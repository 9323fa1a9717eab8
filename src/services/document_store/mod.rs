//! Document store clients.
//!
//! Workflow state is persisted as small text documents keyed by id:
//!
//! - **Cloud** — in the state storage bucket (GCS, MinIO or S3) under the
//!   `state/` prefix, for clustered deployments
//! - **Local** — under the workspace root or its docker mount, for
//!   single-host deployments

mod cloud;
mod factory;
mod local_fs;
mod traits;

pub use cloud::{CloudDocumentStoreClient, STATE_STORAGE_PREFIX};
pub use factory::{select_document_store, DocumentStoreSelection};
pub use local_fs::LocalFsDocumentStoreClient;
pub use traits::{DocumentStoreClient, SharedDocumentStoreClient};
