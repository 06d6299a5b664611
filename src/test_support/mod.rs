//! Test utilities for bundle-manifest unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use bundle_manifest::test_support::MemoryFileSystem;
//!
//! #[test]
//! fn test_example() {
//!     let fs = MemoryFileSystem::new();
//!     fs.add_file("/app/node_modules/acme/package.json", r#"{"name":"acme","version":"1.0.0"}"#);
//!
//!     // Resolve against `fs`, then check how often the descriptor was read
//!     assert_eq!(fs.read_count("/app/node_modules/acme/package.json"), 1);
//! }
//! ```

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::util::fs::FileSystem;

/// In-memory filesystem for testing without real I/O.
///
/// Paths are stored exactly as given, so backslash and mixed-separator
/// paths behave the same on every platform. Reads are counted per path.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    files: HashMap<String, Vec<u8>>,
    dirs: HashSet<String>,
    reads: HashMap<String, usize>,
    failing_prefixes: Vec<String>,
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl MemoryFileSystem {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        MemoryFileSystem::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file with the given content.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.state().files.insert(key(path.as_ref()), content.into());
    }

    /// Number of times `path` has been read.
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        self.state()
            .reads
            .get(&key(path.as_ref()))
            .copied()
            .unwrap_or(0)
    }

    /// Make every write below `prefix` fail with a permission error.
    pub fn fail_writes_under(&self, prefix: impl AsRef<Path>) {
        self.state().failing_prefixes.push(key(prefix.as_ref()));
    }

    /// Contents of a file, without counting it as a read.
    pub fn read_string(&self, path: impl AsRef<Path>) -> io::Result<String> {
        let state = self.state();
        let bytes = state
            .files
            .get(&key(path.as_ref()))
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Whether a directory was created.
    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state().dirs.contains(&key(path.as_ref()))
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.state().files.contains_key(&key(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = key(path);
        let mut state = self.state();
        *state.reads.entry(path.clone()).or_insert(0) += 1;

        let bytes = state
            .files
            .get(&path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path)))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(key(ancestor));
            }
        }
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let path = key(path);
        let mut state = self.state();
        if state.failing_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path),
            ));
        }
        state.files.insert(path, contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_read_write() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a/package.json", "{}");

        assert!(fs.is_file(Path::new("/a/package.json")));
        assert!(!fs.is_file(Path::new("/a")));
        assert_eq!(fs.read_to_string(Path::new("/a/package.json")).unwrap(), "{}");
        assert_eq!(fs.read_count("/a/package.json"), 1);

        fs.create_dir_all(Path::new("/out/nested")).unwrap();
        fs.write(Path::new("/out/nested/m.json"), b"[]").unwrap();
        assert!(fs.has_dir("/out"));
        assert_eq!(fs.read_string("/out/nested/m.json").unwrap(), "[]");
        assert_eq!(fs.read_count("/out/nested/m.json"), 0);
    }

    #[test]
    fn test_memory_fs_write_failure() {
        let fs = MemoryFileSystem::new();
        fs.fail_writes_under("/readonly");

        let err = fs.write(Path::new("/readonly/x.json"), b"{}").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.write(Path::new("/ok/x.json"), b"{}").is_ok());
    }
}
