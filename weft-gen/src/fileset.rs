//! The unique-keyed mapping from output path to file content.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Output files produced by one generation run, keyed by path relative to the
/// output directory.
///
/// Every path appears at most once; a second writer to the same path is an
/// error, never a silent overwrite.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    files: IndexMap<String, Vec<u8>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file. Fails with a generation conflict naming the path if the
    /// path is already present; the set is unchanged on failure.
    pub fn insert(&mut self, path: impl Into<String>, contents: Vec<u8>) -> Result<()> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(Error::Conflict { paths: vec![path] });
        }
        self.files.insert(path, contents);
        Ok(())
    }

    /// Merge another set into this one.
    ///
    /// Non-colliding entries are all inserted. If any path collides, the
    /// error reports the complete sorted list of colliding paths, not just
    /// the first one found.
    pub fn merge(&mut self, other: FileSet) -> Result<()> {
        let mut conflicts = Vec::new();
        for (path, contents) in other.files {
            if self.files.contains_key(&path) {
                conflicts.push(path);
            } else {
                self.files.insert(path, contents);
            }
        }
        if conflicts.is_empty() {
            Ok(())
        } else {
            conflicts.sort();
            Err(Error::Conflict { paths: conflicts })
        }
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(path, contents)| (path.as_str(), contents.as_slice()))
    }

    /// Paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Materialize every file under `output_dir`, creating parent directories
    /// as needed.
    ///
    /// Best-effort, not transactional: the first I/O failure aborts remaining
    /// writes but files already written stay on disk.
    pub fn write_to(&self, output_dir: &Path) -> Result<()> {
        for (path, contents) in self.iter() {
            let full_path = output_dir.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&full_path, contents).map_err(|source| Error::Io {
                path: full_path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = (&'a str, &'a [u8]);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a [u8])> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
