//! Package descriptor resolution.
//!
//! Maps a module's source path back to the package that owns it by walking
//! up its ancestor directories until one contains a descriptor file.
//!
//! Parsed descriptors are kept in a [`DescriptorCache`] that lives for one
//! emission and is shared by every chunk task of that emission.

pub mod errors;
pub mod strategy;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::{PackageDescriptor, DESCRIPTOR_NAMES};
use crate::util::fs::FileSystem;

pub use errors::DescriptorError;
pub use strategy::{AncestorDescriptor, ModulesDirectory, PackageIdentity, PackageIdentityStrategy};

/// Both separators are accepted regardless of platform.
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Find the descriptor file nearest to `module_path`.
///
/// Starting at the full path and dropping one trailing segment per step, each
/// prefix is probed for the names in [`DESCRIPTOR_NAMES`], in order. The first
/// hit is returned, built from the original bytes of the prefix plus the
/// separator that followed it, so nothing is normalized. A path without any
/// separator has no ancestors and yields `None`.
pub fn find_descriptor(fs: &dyn FileSystem, module_path: &str) -> Option<String> {
    let mut joiner = module_path.chars().rev().find(|&c| is_separator(c))?;
    let mut dir = module_path;

    loop {
        // "a//b" has an empty segment; the shorter prefix covers it
        if !dir.ends_with(is_separator) {
            for name in DESCRIPTOR_NAMES {
                let candidate = format!("{dir}{joiner}{name}");
                if fs.is_file(Path::new(&candidate)) {
                    return Some(candidate);
                }
            }
        }

        let (idx, sep) = dir.char_indices().rfind(|&(_, c)| is_separator(c))?;
        dir = &dir[..idx];
        joiner = sep;
    }
}

/// Length of the package root prefix of a descriptor path (up to, not
/// including, the separator before the file name).
pub fn package_root_len(descriptor_path: &str) -> usize {
    descriptor_path
        .char_indices()
        .rfind(|&(_, c)| is_separator(c))
        .map_or(0, |(idx, _)| idx)
}

/// Per-emission cache of parsed descriptors, keyed by descriptor path.
///
/// Entries are only ever added. Two tasks racing on the same new path may
/// both read and parse it; the results are identical and the last insert wins.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<String, Arc<PackageDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        DescriptorCache::default()
    }

    /// Return the cached descriptor for `path`, reading and parsing it on first use.
    pub fn load(
        &self,
        fs: &dyn FileSystem,
        path: &str,
    ) -> Result<Arc<PackageDescriptor>, DescriptorError> {
        if let Some(descriptor) = self.get(path) {
            return Ok(descriptor);
        }

        let contents =
            fs.read_to_string(Path::new(path))
                .map_err(|source| DescriptorError::Read {
                    path: path.to_string(),
                    source,
                })?;
        let descriptor = Arc::new(PackageDescriptor::parse(path, &contents)?);

        tracing::debug!("Loaded descriptor {} for {}", path, descriptor.key());

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), Arc::clone(&descriptor));

        Ok(descriptor)
    }

    /// Look up an already parsed descriptor.
    pub fn get(&self, path: &str) -> Option<Arc<PackageDescriptor>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryFileSystem;
    use crate::util::fs::NativeFileSystem;
    use tempfile::TempDir;

    fn pkg(name: &str, version: &str) -> String {
        format!(r#"{{"name": "{name}", "version": "{version}"}}"#)
    }

    #[test]
    fn test_nearest_descriptor_wins() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/app/package.json", pkg("app", "1.0.0"));
        fs.add_file("/app/node_modules/acme/package.json", pkg("acme", "1.2.3"));

        assert_eq!(
            find_descriptor(&fs, "/app/node_modules/acme/lib/foo.js").as_deref(),
            Some("/app/node_modules/acme/package.json")
        );
        assert_eq!(
            find_descriptor(&fs, "/app/src/main.js").as_deref(),
            Some("/app/package.json")
        );
    }

    #[test]
    fn test_package_json_before_bower() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/lib/both/.bower.json", pkg("both", "0.0.1"));
        fs.add_file("/lib/both/package.json", pkg("both", "0.0.2"));
        fs.add_file("/lib/legacy/.bower.json", pkg("legacy", "0.1.0"));

        assert_eq!(
            find_descriptor(&fs, "/lib/both/index.js").as_deref(),
            Some("/lib/both/package.json")
        );
        assert_eq!(
            find_descriptor(&fs, "/lib/legacy/dist/legacy.js").as_deref(),
            Some("/lib/legacy/.bower.json")
        );
    }

    #[test]
    fn test_no_match() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/other/package.json", pkg("other", "1.0.0"));

        assert_eq!(find_descriptor(&fs, "/app/src/main.js"), None);
    }

    #[test]
    fn test_no_separator() {
        let fs = MemoryFileSystem::new();
        fs.add_file("package.json", pkg("cwd", "1.0.0"));

        assert_eq!(find_descriptor(&fs, "index.js"), None);
        assert_eq!(find_descriptor(&fs, ""), None);
    }

    #[test]
    fn test_root_descriptor() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/package.json", pkg("root", "1.0.0"));

        assert_eq!(
            find_descriptor(&fs, "/src/index.js").as_deref(),
            Some("/package.json")
        );
    }

    #[test]
    fn test_backslash_paths_are_not_normalized() {
        let fs = MemoryFileSystem::new();
        fs.add_file(r"C:\app\node_modules\acme\package.json", pkg("acme", "1.2.3"));

        assert_eq!(
            find_descriptor(&fs, r"C:\app\node_modules\acme\lib\foo.js").as_deref(),
            Some(r"C:\app\node_modules\acme\package.json")
        );
    }

    #[test]
    fn test_mixed_separators() {
        let fs = MemoryFileSystem::new();
        fs.add_file(r"C:\app/node_modules\acme/package.json", pkg("acme", "1.2.3"));

        assert_eq!(
            find_descriptor(&fs, r"C:\app/node_modules\acme/lib\foo.js").as_deref(),
            Some(r"C:\app/node_modules\acme/package.json")
        );
    }

    #[test]
    fn test_package_root_len() {
        assert_eq!(package_root_len("/app/acme/package.json"), "/app/acme".len());
        assert_eq!(package_root_len("/package.json"), 0);
        assert_eq!(package_root_len(r"C:\acme\.bower.json"), r"C:\acme".len());
    }

    #[test]
    fn test_on_disk_walk() {
        let tmp = TempDir::new().unwrap();
        let pkg_dir = tmp.path().join("node_modules").join("acme");
        std::fs::create_dir_all(pkg_dir.join("lib")).unwrap();
        std::fs::write(pkg_dir.join("package.json"), pkg("acme", "1.2.3")).unwrap();

        let module = pkg_dir.join("lib").join("foo.js");
        let found = find_descriptor(&NativeFileSystem, module.to_str().unwrap()).unwrap();
        assert_eq!(Path::new(&found), pkg_dir.join("package.json"));
    }

    #[test]
    fn test_cache_reads_once() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/app/node_modules/acme/package.json", pkg("acme", "1.2.3"));
        let cache = DescriptorCache::new();

        let first = cache.load(&fs, "/app/node_modules/acme/package.json").unwrap();
        let second = cache.load(&fs, "/app/node_modules/acme/package.json").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fs.read_count("/app/node_modules/acme/package.json"), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_propagates_parse_errors() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/app/node_modules/broken/package.json", "{ not json");
        let cache = DescriptorCache::new();

        let err = cache
            .load(&fs, "/app/node_modules/broken/package.json")
            .unwrap_err();
        assert!(matches!(err, DescriptorError::Parse(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_read_error() {
        let fs = MemoryFileSystem::new();
        let cache = DescriptorCache::new();

        let err = cache.load(&fs, "/gone/package.json").unwrap_err();
        assert!(matches!(err, DescriptorError::Read { .. }));
    }
}
