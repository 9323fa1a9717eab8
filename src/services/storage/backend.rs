//! OpenDAL operators for configured storage variants.
//!
//! Building an operator is lazy: no request is sent until the first
//! operation, so a bad bucket or unreachable endpoint surfaces on first use
//! rather than at startup.

use anyhow::{Context, Result};
use opendal::layers::LoggingLayer;
use opendal::services::{Gcs, S3};
use opendal::Operator;

use super::types::{GcsConfig, MinioConfig, S3Config, StorageVariant};

/// Region reported to MinIO, which ignores it but requires one for signing.
pub const MINIO_REGION: &str = "us-east-1";

impl StorageVariant {
    /// Build the OpenDAL operator for this storage.
    pub fn build_operator(&self) -> Result<Operator> {
        let op = match self {
            StorageVariant::Gcs(config) => gcs_operator(config)?,
            StorageVariant::Minio(config) => minio_operator(config)?,
            StorageVariant::S3(config) => s3_operator(config)?,
        };

        tracing::debug!(
            "Built {} operator for bucket {}",
            self.storage_type(),
            self.bucket()
        );

        Ok(op)
    }
}

fn gcs_operator(config: &GcsConfig) -> Result<Operator> {
    let builder = Gcs::default()
        .bucket(&config.bucket)
        .credential_path(&config.application_credentials);

    let op = Operator::new(builder)
        .with_context(|| format!("Failed to configure GCS bucket {}", config.bucket))?
        .layer(LoggingLayer::default())
        .finish();

    Ok(op)
}

fn minio_operator(config: &MinioConfig) -> Result<Operator> {
    // MinIO speaks S3 with path-style addressing, which is OpenDAL's default.
    let builder = S3::default()
        .bucket(&config.bucket)
        .endpoint(&config.endpoint)
        .region(MINIO_REGION)
        .access_key_id(&config.access_key)
        .secret_access_key(&config.secret_access_key)
        .disable_config_load();

    let op = Operator::new(builder)
        .with_context(|| format!("Failed to configure MinIO bucket {}", config.bucket))?
        .layer(LoggingLayer::default())
        .finish();

    Ok(op)
}

fn s3_operator(config: &S3Config) -> Result<Operator> {
    let builder = S3::default()
        .bucket(&config.bucket)
        .region(&config.region)
        .access_key_id(&config.access_key)
        .secret_access_key(&config.secret_access_key)
        .disable_config_load();

    let op = Operator::new(builder)
        .with_context(|| format!("Failed to configure S3 bucket {}", config.bucket))?
        .layer(LoggingLayer::default())
        .finish();

    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::Scheme;

    #[test]
    fn test_build_s3_operator() {
        let variant = StorageVariant::s3("b1", "ak", "sk", "us-east-1");
        let op = variant.build_operator().unwrap();
        assert_eq!(op.info().scheme(), Scheme::S3);
        assert_eq!(op.info().name(), "b1");
    }

    #[test]
    fn test_build_gcs_operator() {
        let variant = StorageVariant::gcs("job-logs", "/nonexistent/gcs.json");
        let op = variant.build_operator().unwrap();
        assert_eq!(op.info().scheme(), Scheme::Gcs);
        assert_eq!(op.info().name(), "job-logs");
    }

    #[test]
    fn test_build_minio_operator_uses_s3_service() {
        let variant = StorageVariant::minio("state", "ak", "sk", "http://localhost:9000");
        let op = variant.build_operator().unwrap();
        assert_eq!(op.info().scheme(), Scheme::S3);
        assert_eq!(op.info().name(), "state");
    }
}
