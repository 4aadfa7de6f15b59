//! Settings store configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Settings store configuration
///
/// With a `path`, settings are kept in a YAML file; without one they live
/// in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SettingsConfig {
    pub fn is_file_backed(&self) -> bool {
        self.path.is_some()
    }
}
