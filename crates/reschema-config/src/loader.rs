//! Type loader configuration.

use std::path::PathBuf;

use reschema_core::DirectoryLoader;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_extension() -> String {
    "json".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Directory holding one descriptor file per type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Descriptor file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: None,
            extension: default_extension(),
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.root.is_some()
    }

    /// Build a file-backed loader from this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] without a `root`, or
    /// [`ConfigError::InvalidValue`] for an empty or path-like `extension`.
    pub fn directory_loader(&self) -> Result<DirectoryLoader, ConfigError> {
        let root = self.root.as_ref().ok_or_else(|| ConfigError::NotConfigured {
            section: "loader".to_string(),
            reason: "missing 'root'".to_string(),
        })?;

        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "loader.extension".to_string(),
                reason: format!("'{}' is not a file extension", self.extension),
            });
        }

        Ok(DirectoryLoader::new(root).with_extension(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_unconfigured() {
        let config = LoaderConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.extension, "json");
        assert!(matches!(
            config.directory_loader(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn leading_dot_is_tolerated() {
        let config = LoaderConfig {
            root: Some(PathBuf::from("/types")),
            extension: ".schema".to_string(),
        };
        let loader = config.directory_loader().unwrap();
        assert_eq!(
            loader.path_for("a/b").unwrap(),
            PathBuf::from("/types/a/b.schema")
        );
    }

    #[test]
    fn path_like_extension_is_rejected() {
        let config = LoaderConfig {
            root: Some(PathBuf::from("/types")),
            extension: "json/x".to_string(),
        };
        assert!(matches!(
            config.directory_loader(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "loader.extension"
        ));
    }
}
