use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one file per card. Must be absolute.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Checks that the store path is an absolute path to an existing directory.
    pub fn validated_path(&self) -> Result<&Path, ConfigError> {
        let path = self.path.as_path();

        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStorePath {
                path: self.path.clone(),
                reason: "no store path configured",
            });
        }

        if !path.is_absolute() {
            return Err(ConfigError::InvalidStorePath {
                path: self.path.clone(),
                reason: "path must be absolute",
            });
        }

        if !path.is_dir() {
            return Err(ConfigError::InvalidStorePath {
                path: self.path.clone(),
                reason: "path must be an existing directory",
            });
        }

        Ok(path)
    }
}
