//! Package path resolution from a schema root.
//!
//! Pure functions mapping a module's absolute schema path to the identifiers
//! generated code is organized by: a root-relative package path, a
//! root-relative schema file path, and a prefix-joined import path.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File extension of schema files, without the dot.
pub const SCHEMA_EXTENSION: &str = "thrift";

/// Derives package and import identifiers for schema files under one root.
///
/// For a schema root `/r`, a prefix `pfx`, and a module at `/r/foo/bar.thrift`:
///
/// - [`relative_package`](Self::relative_package) → `foo/bar`
/// - [`relative_schema_path`](Self::relative_schema_path) → `foo/bar.thrift`
/// - [`package`](Self::package) → `pfx/foo/bar`
///
/// A module outside the schema root is always rejected the same way, with a
/// resolution error naming the path and the root.
#[derive(Debug, Clone)]
pub struct SchemaImporter {
    package_prefix: String,
    schema_root: PathBuf,
}

impl SchemaImporter {
    pub fn new(package_prefix: impl Into<String>, schema_root: impl Into<PathBuf>) -> Self {
        Self {
            package_prefix: package_prefix.into(),
            schema_root: schema_root.into(),
        }
    }

    /// The module's package path relative to the schema root, with the schema
    /// file suffix stripped.
    pub fn relative_package(&self, file: &Path) -> Result<PathBuf> {
        let relative = self.relative_schema_path(file)?;
        if relative.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION) {
            Ok(relative.with_extension(""))
        } else {
            Ok(relative)
        }
    }

    /// The module's untouched path relative to the schema root.
    pub fn relative_schema_path(&self, file: &Path) -> Result<PathBuf> {
        file.strip_prefix(&self.schema_root)
            .map(Path::to_path_buf)
            .map_err(|_| Error::Resolution {
                path: file.to_path_buf(),
                root: self.schema_root.clone(),
            })
    }

    /// The fully qualified import path: the package prefix joined with
    /// [`relative_package`](Self::relative_package), `/`-separated.
    pub fn package(&self, file: &Path) -> Result<String> {
        let package = path_to_slash(&self.relative_package(file)?);
        if self.package_prefix.is_empty() {
            Ok(package)
        } else {
            Ok(format!("{}/{}", self.package_prefix, package))
        }
    }
}

/// Renders a relative path with `/` separators for use in import paths and
/// output file sets.
pub(crate) fn path_to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
