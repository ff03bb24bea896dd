//! File-backed loader.
//!
//! Type `billing/invoice` is read from `<root>/billing/invoice.json`. Each
//! file holds one [`TypeDescriptor`]; a missing `name` field defaults to the
//! requested name.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::{TypeDescriptor, TypeLoader};

const DEFAULT_EXTENSION: &str = "json";

/// Loader reading one JSON descriptor file per type from a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    extension: String,
}

impl DirectoryLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension (without the leading dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a type name maps to.
    ///
    /// # Errors
    ///
    /// Fails for names with empty, `.` or `..` segments, or with backslashes,
    /// so that a name can never escape the root directory.
    pub fn path_for(&self, name: &str) -> anyhow::Result<PathBuf> {
        let segments: Vec<&str> = name.split('/').collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
        {
            anyhow::bail!("invalid type name '{name}'");
        }

        let mut path = self.root.clone();
        if let Some((file, dirs)) = segments.split_last() {
            path.extend(dirs);
            path.push(format!("{file}.{}", self.extension));
        }
        Ok(path)
    }

    async fn read(&self, name: &str) -> anyhow::Result<TypeDescriptor> {
        let path = self.path_for(name)?;
        tracing::debug!(name, path = %path.display(), "reading type descriptor");

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut descriptor: TypeDescriptor = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if descriptor.name.is_empty() {
            descriptor.name = name.to_string();
        }
        Ok(descriptor)
    }
}

impl TypeLoader for DirectoryLoader {
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>> {
        self.read(name).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_names_map_to_directories() {
        let loader = DirectoryLoader::new("/types");
        assert_eq!(
            loader.path_for("billing/v1.2/invoice").unwrap(),
            PathBuf::from("/types/billing/v1.2/invoice.json")
        );
    }

    #[test]
    fn names_cannot_escape_root() {
        let loader = DirectoryLoader::new("/types");
        for name in ["../secret", "a//b", "./a", "a\\b", ""] {
            assert!(loader.path_for(name).is_err(), "accepted {name:?}");
        }
    }

    #[tokio::test]
    async fn reads_descriptor_and_fills_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("common")).unwrap();
        std::fs::write(
            dir.path().join("common/id.json"),
            r#"{"meta": {"description": "identifier"}, "schema": {"validation": {"type": "string"}}}"#,
        )
        .unwrap();

        let loader = DirectoryLoader::new(dir.path());
        let descriptor = loader.load("common/id").await.unwrap();
        assert_eq!(descriptor.name, "common/id");
        assert_eq!(descriptor.schema, json!({"validation": {"type": "string"}}));
    }

    #[tokio::test]
    async fn custom_extension_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("flag.type"),
            r#"{"name": "flag", "schema": {"validation": {"type": "boolean"}}}"#,
        )
        .unwrap();

        let loader = DirectoryLoader::new(dir.path()).with_extension("type");
        assert_eq!(loader.load("flag").await.unwrap().name, "flag");
    }

    #[tokio::test]
    async fn missing_and_malformed_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let loader = DirectoryLoader::new(dir.path());

        let missing = loader.load("absent").await.unwrap_err();
        assert!(missing.to_string().starts_with("failed to read"));

        let broken = loader.load("broken").await.unwrap_err();
        assert!(broken.to_string().starts_with("failed to parse"));
    }
}
