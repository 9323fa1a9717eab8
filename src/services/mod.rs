pub mod document_store;
pub mod storage;

pub use document_store::{select_document_store, DocumentStoreClient, DocumentStoreSelection};
pub use storage::{select_storage_variant, ConfigurationError, StorageType, StorageVariant};
