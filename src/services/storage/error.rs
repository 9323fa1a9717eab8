//! Configuration errors raised while selecting storage.
//!
//! Every variant is fatal at startup: the process should refuse to run
//! rather than continue with a partial or ambiguous storage configuration.

use thiserror::Error;

use super::types::StorageType;

/// Errors produced while resolving storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The discriminator matched none of `gcs`, `minio`, `s3`.
    #[error("unknown storage type '{discriminator}' (expected one of: gcs, minio, s3)")]
    UnknownStorageType { discriminator: String },

    /// A field required by the selected variant is absent or empty.
    #[error("missing required field '{field}' for {storage_type} storage")]
    MissingField {
        storage_type: StorageType,
        field: &'static str,
    },

    /// A required property was not supplied by any property source.
    #[error("missing required property '{key}'")]
    MissingProperty { key: String },

    /// A property was supplied but its value is not accepted.
    #[error("invalid value '{value}' for property '{key}'")]
    InvalidValue { key: String, value: String },

    /// The property source itself could not be read or parsed.
    #[error("failed to load properties: {0}")]
    PropertySource(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::UnknownStorageType {
            discriminator: "azure".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown storage type 'azure' (expected one of: gcs, minio, s3)"
        );

        let err = ConfigurationError::MissingField {
            storage_type: StorageType::Minio,
            field: "endpoint",
        };
        assert_eq!(
            err.to_string(),
            "missing required field 'endpoint' for minio storage"
        );
    }
}
