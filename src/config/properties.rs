//! Property sources.
//!
//! Properties are dotted, lowercase keys such as `storage.logs.s3.bucket`.
//! A key resolves from explicitly supplied values first (a JSON file or
//! [`StorageProperties::with`]), then, when enabled, from a snapshot of the
//! process environment using relaxed binding:
//! `storage.logs.s3.secret-access-key` reads `STORAGE_LOGS_S3_SECRET_ACCESS_KEY`.
//!
//! Files and the environment are collected through the `config` crate.
//! JSON files may spell keys dotted (`{"storage.logs.type": "s3"}`) or nested
//! (`{"storage": {"logs": {"type": "s3"}}}`); both flatten to the same key.

use std::collections::HashMap;
use std::path::Path;

use ::config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde_json::Value;

use crate::services::storage::ConfigurationError;

/// A flat key/value property source.
#[derive(Debug, Clone, Default)]
pub struct StorageProperties {
    values: HashMap<String, String>,
    env: Option<HashMap<String, String>>,
}

impl StorageProperties {
    /// Create an empty property source that ignores the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property source from explicit values.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values, env: None }
    }

    /// Create a property source backed by the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PropertySource`] if the environment
    /// cannot be collected.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::new().with_env()
    }

    /// Load explicit values from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PropertySource`] if the file cannot be
    /// read or holds something other than objects and scalar values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let builder = Config::builder().add_source(File::from(path).format(FileFormat::Json));
        let values = collect(builder).map_err(|e| match e {
            ConfigurationError::PropertySource(message) => {
                ConfigurationError::PropertySource(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        Ok(Self::from_map(values))
    }

    /// Parse explicit values from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let builder = Config::builder().add_source(File::from_str(json, FileFormat::Json));
        Ok(Self::from_map(collect(builder)?))
    }

    /// Add or replace an explicit value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Fall back to the process environment for keys without explicit values.
    ///
    /// The environment is read once, when this is called.
    pub fn with_env(mut self) -> Result<Self, ConfigurationError> {
        let builder = Config::builder().add_source(Environment::default().try_parsing(false));
        let env = collect(builder)?
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        self.env = Some(env);
        Ok(self)
    }

    /// Whether the process environment is consulted.
    pub fn uses_env(&self) -> bool {
        self.env.is_some()
    }

    /// Resolve a property.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.values.get(key) {
            return Some(value.clone());
        }
        self.env
            .as_ref()?
            .get(&env_var_name(key).to_lowercase())
            .cloned()
    }

    /// Resolve a property, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Look up a raw variable by its exact name, explicit values first.
    pub fn var(&self, name: &str) -> Option<String> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.env.as_ref()?.get(&name.to_lowercase()).cloned()
    }
}

/// Environment variable name for a dotted property key.
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Build `builder` and flatten the result into dotted keys.
fn collect(
    builder: ConfigBuilder<DefaultState>,
) -> Result<HashMap<String, String>, ConfigurationError> {
    let tree: Value = builder
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|e| ConfigurationError::PropertySource(e.to_string()))?;

    let mut values = HashMap::new();
    flatten("", tree, &mut values)?;
    Ok(values)
}

fn flatten(
    prefix: &str,
    value: Value,
    out: &mut HashMap<String, String>,
) -> Result<(), ConfigurationError> {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let key = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&key, value, out)?;
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s);
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Null | Value::Array(_) => {
            return Err(ConfigurationError::PropertySource(format!(
                "{}: expected a string value",
                prefix
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("storage.logs.type"), "STORAGE_LOGS_TYPE");
        assert_eq!(
            env_var_name("storage.state.minio.secret-access-key"),
            "STORAGE_STATE_MINIO_SECRET_ACCESS_KEY"
        );
        assert_eq!(env_var_name("workspace.docker-mount"), "WORKSPACE_DOCKER_MOUNT");
    }

    #[test]
    fn test_explicit_values() {
        let props = StorageProperties::new()
            .with("workspace.root", "/data")
            .with("workspace.docker-mount", "");

        assert_eq!(props.get("workspace.root").as_deref(), Some("/data"));
        assert_eq!(props.get("workspace.docker-mount").as_deref(), Some(""));
        assert_eq!(props.get_non_empty("workspace.docker-mount"), None);
        assert_eq!(props.get("storage.logs.type"), None);
        assert!(!props.uses_env());
    }

    #[test]
    fn test_env_fallback_reads_relaxed_name() {
        // "path" binds to PATH.
        let props = StorageProperties::from_env().unwrap();
        assert!(props.uses_env());
        assert_eq!(props.get("path"), env::var("PATH").ok());
        assert_eq!(props.var("PATH"), env::var("PATH").ok());

        let props = StorageProperties::new();
        assert_eq!(props.get("path"), None);
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let props = StorageProperties::from_env().unwrap().with("path", "explicit");
        assert_eq!(props.get("path").as_deref(), Some("explicit"));
    }

    #[test]
    fn test_from_json_str() {
        let props = StorageProperties::from_json_str(
            r#"{"storage.logs.type": "minio", "storage.logs.minio.bucket": "logs"}"#,
        )
        .unwrap();
        assert_eq!(props.get("storage.logs.type").as_deref(), Some("minio"));
        assert_eq!(props.get("storage.logs.minio.bucket").as_deref(), Some("logs"));
    }

    #[test]
    fn test_nested_json_flattens_to_dotted_keys() {
        let props = StorageProperties::from_json_str(
            r#"{"storage": {"state": {"type": "s3", "s3": {"secret-access-key": "sk"}}}}"#,
        )
        .unwrap();
        assert_eq!(props.get("storage.state.type").as_deref(), Some("s3"));
        assert_eq!(
            props.get("storage.state.s3.secret-access-key").as_deref(),
            Some("sk")
        );
    }

    #[test]
    fn test_from_json_rejects_arrays() {
        let result = StorageProperties::from_json_str(r#"{"storage.logs.type": ["s3"]}"#);
        assert!(matches!(result, Err(ConfigurationError::PropertySource(_))));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"workspace.root": "/data"}"#).unwrap();

        let props = StorageProperties::from_json_file(&path).unwrap();
        assert_eq!(props.get("workspace.root").as_deref(), Some("/data"));

        let missing = StorageProperties::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigurationError::PropertySource(_))));
    }
}
