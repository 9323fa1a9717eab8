//! Storage variant selection.
//!
//! Turns a discriminator string plus a set of named fields into a fully
//! populated [`StorageVariant`].

use std::collections::HashMap;

use super::error::ConfigurationError;
use super::types::{
    StorageType, StorageVariant, ACCESS_KEY, APPLICATION_CREDENTIALS, BUCKET, ENDPOINT, REGION,
    SECRET_ACCESS_KEY,
};

/// Select and build a storage variant.
///
/// `discriminator` is matched case-insensitively against `gcs`, `minio` and
/// `s3`. `fields` is keyed by the leaf names in [`StorageType::required_fields`].
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownStorageType`] when the discriminator
/// matches nothing, and [`ConfigurationError::MissingField`] when a required
/// field is absent or empty.
pub fn select_storage_variant(
    discriminator: &str,
    fields: &HashMap<String, String>,
) -> Result<StorageVariant, ConfigurationError> {
    let storage_type: StorageType = discriminator.parse()?;
    build_variant(storage_type, fields)
}

/// Build the variant for an already parsed storage type.
pub fn build_variant(
    storage_type: StorageType,
    fields: &HashMap<String, String>,
) -> Result<StorageVariant, ConfigurationError> {
    let field = |name: &'static str| -> Result<String, ConfigurationError> {
        match fields.get(name) {
            Some(value) if !value.is_empty() => Ok(value.clone()),
            _ => Err(ConfigurationError::MissingField {
                storage_type,
                field: name,
            }),
        }
    };

    let variant = match storage_type {
        StorageType::Gcs => StorageVariant::gcs(field(BUCKET)?, field(APPLICATION_CREDENTIALS)?),
        StorageType::Minio => StorageVariant::minio(
            field(BUCKET)?,
            field(ACCESS_KEY)?,
            field(SECRET_ACCESS_KEY)?,
            field(ENDPOINT)?,
        ),
        StorageType::S3 => StorageVariant::s3(
            field(BUCKET)?,
            field(ACCESS_KEY)?,
            field(SECRET_ACCESS_KEY)?,
            field(REGION)?,
        ),
    };

    Ok(variant)
}
