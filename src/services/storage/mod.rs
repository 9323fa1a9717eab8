//! Cloud storage configuration selection.
//!
//! Supported storage backends:
//!
//! - **Google Cloud Storage (GCS)**
//! - **MinIO** (S3-compatible, addressed through a custom endpoint)
//! - **Amazon S3**
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              discriminator + named fields                   │
//! │  - "gcs" | "minio" | "s3" (any letter casing)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 select_storage_variant                      │
//! │  - Parses the discriminator, checks required fields         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//! ┌──────────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │   Gcs(GcsConfig) │ │ Minio(...)   │ │   S3(S3Config)   │
//! └──────────────────┘ └──────────────┘ └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use storage_selector::services::storage::select_storage_variant;
//!
//! let fields = [
//!     ("bucket", "b1"),
//!     ("access-key", "ak"),
//!     ("secret-access-key", "sk"),
//!     ("region", "us-east-1"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let variant = select_storage_variant("S3", &fields)?;
//! let operator = variant.build_operator()?;
//! ```

mod backend;
mod error;
mod selector;
mod types;

pub use backend::MINIO_REGION;
pub use error::ConfigurationError;
pub use selector::{build_variant, select_storage_variant};
pub use types::{
    GcsConfig, MinioConfig, S3Config, StorageType, StorageVariant, ACCESS_KEY,
    APPLICATION_CREDENTIALS, BUCKET, ENDPOINT, REGION, SECRET_ACCESS_KEY,
};
