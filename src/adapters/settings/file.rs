//! File-based Settings Store Adapter
//!
//! Stores every option in a single YAML document mapping option keys to
//! values. The file is read on every load so edits made by hand are picked
//! up without a restart.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::SettingsStore;

type Document = BTreeMap<String, Value>;

/// File-based storage for settings blobs
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileSettingsStore {
    /// Create a new file store backed by the YAML file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSettingsStore::new("./data/options.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, DomainError> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let yaml = fs::read_to_string(&self.path)
            .await
            .map_err(|e| settings_error(format!("Failed to read settings file: {}", e)))?;

        if yaml.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_yaml::from_str(&yaml)
            .map_err(|e| settings_error(format!("Failed to parse settings file: {}", e)))
    }

    async fn write_document(&self, document: &Document) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| settings_error(format!("Failed to create directory: {}", e)))?;
            }
        }

        let yaml = serde_yaml::to_string(document)
            .map_err(|e| settings_error(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.path, yaml)
            .await
            .map_err(|e| settings_error(format!("Failed to write settings file: {}", e)))
    }
}

fn settings_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::SettingsError, message)
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn save(&self, key: &str, value: Value) -> Result<Option<Value>, DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let previous = document.insert(key.to_string(), value);
        self.write_document(&document).await?;

        tracing::debug!(key, path = %self.path.display(), "Saved settings");
        Ok(previous)
    }
}
