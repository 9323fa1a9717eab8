//! Storage types and configuration records.
//!
//! This module defines the storage discriminator and the tagged union of
//! cloud storage configurations it selects between.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigurationError;

/// Field key for the bucket name, shared by every variant.
pub const BUCKET: &str = "bucket";
/// Field key for the GCS service account credentials path.
pub const APPLICATION_CREDENTIALS: &str = "application-credentials";
/// Field key for the S3/MinIO access key id.
pub const ACCESS_KEY: &str = "access-key";
/// Field key for the S3/MinIO secret access key.
pub const SECRET_ACCESS_KEY: &str = "secret-access-key";
/// Field key for the MinIO endpoint URL.
pub const ENDPOINT: &str = "endpoint";
/// Field key for the S3 region.
pub const REGION: &str = "region";

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Google Cloud Storage
    Gcs,
    /// MinIO (S3-compatible, self-hosted)
    Minio,
    /// Amazon S3
    S3,
}

impl StorageType {
    /// The discriminator literal for this storage type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Gcs => "gcs",
            StorageType::Minio => "minio",
            StorageType::S3 => "s3",
        }
    }

    /// Get the display name for this storage type.
    pub fn display_name(&self) -> &'static str {
        match self {
            StorageType::Gcs => "Google Cloud Storage",
            StorageType::Minio => "MinIO",
            StorageType::S3 => "Amazon S3",
        }
    }

    /// Get all available storage types.
    pub fn all() -> Vec<StorageType> {
        vec![StorageType::Gcs, StorageType::Minio, StorageType::S3]
    }

    /// Field keys that must be present to build this variant.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            StorageType::Gcs => &[BUCKET, APPLICATION_CREDENTIALS],
            StorageType::Minio => &[BUCKET, ACCESS_KEY, SECRET_ACCESS_KEY, ENDPOINT],
            StorageType::S3 => &[BUCKET, ACCESS_KEY, SECRET_ACCESS_KEY, REGION],
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = ConfigurationError;

    /// Case-insensitive match against the exact literals. Whitespace is not
    /// trimmed, so `" s3"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageType::all()
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigurationError::UnknownStorageType {
                discriminator: s.to_string(),
            })
    }
}

/// Google Cloud Storage configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcsConfig {
    /// GCS bucket name
    pub bucket: String,
    /// Path to the service account credentials JSON
    pub application_credentials: String,
}

/// MinIO configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinioConfig {
    /// Bucket name
    pub bucket: String,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_access_key: String,
    /// MinIO endpoint URL (e.g. "http://minio:9000")
    pub endpoint: String,
}

/// Amazon S3 configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket name
    pub bucket: String,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (e.g. "us-east-1")
    pub region: String,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for GcsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsConfig")
            .field("bucket", &self.bucket)
            .field("application_credentials", &self.application_credentials)
            .finish()
    }
}

impl fmt::Debug for MinioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinioConfig")
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_access_key", &REDACTED)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_access_key", &REDACTED)
            .field("region", &self.region)
            .finish()
    }
}

/// A fully populated storage configuration, one shape per storage type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageVariant {
    Gcs(GcsConfig),
    Minio(MinioConfig),
    S3(S3Config),
}

impl StorageVariant {
    /// Create a GCS variant.
    pub fn gcs(bucket: impl Into<String>, application_credentials: impl Into<String>) -> Self {
        StorageVariant::Gcs(GcsConfig {
            bucket: bucket.into(),
            application_credentials: application_credentials.into(),
        })
    }

    /// Create a MinIO variant.
    pub fn minio(
        bucket: impl Into<String>,
        access_key: impl Into<String>,
        secret_access_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        StorageVariant::Minio(MinioConfig {
            bucket: bucket.into(),
            access_key: access_key.into(),
            secret_access_key: secret_access_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Create an S3 variant.
    pub fn s3(
        bucket: impl Into<String>,
        access_key: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        StorageVariant::S3(S3Config {
            bucket: bucket.into(),
            access_key: access_key.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        })
    }

    /// The storage type of this variant.
    pub fn storage_type(&self) -> StorageType {
        match self {
            StorageVariant::Gcs(_) => StorageType::Gcs,
            StorageVariant::Minio(_) => StorageType::Minio,
            StorageVariant::S3(_) => StorageType::S3,
        }
    }

    /// The bucket name, present in every variant.
    pub fn bucket(&self) -> &str {
        match self {
            StorageVariant::Gcs(c) => &c.bucket,
            StorageVariant::Minio(c) => &c.bucket,
            StorageVariant::S3(c) => &c.bucket,
        }
    }

    /// URI scheme used when rendering object locations.
    pub fn scheme(&self) -> &'static str {
        match self {
            StorageVariant::Gcs(_) => "gs",
            StorageVariant::Minio(_) | StorageVariant::S3(_) => "s3",
        }
    }

    /// Get the full URI for an object key in this storage.
    pub fn object_uri(&self, key: &str) -> String {
        format!(
            "{}://{}/{}",
            self.scheme(),
            self.bucket(),
            key.trim_start_matches('/')
        )
    }
}
