//! Qualified module identifiers - WHICH package a module came from.
//!
//! A qualified id has the shape `name@version/subpath`, where `name` may be a
//! scoped name (`@scope/name`). It is what the runtime registry knows the
//! module by, and what the manifest lists in its `content`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::PackageDescriptor;

/// A version-qualified module identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedId {
    value: String,
    /// Length of the `name@version` prefix
    key_len: usize,
}

impl QualifiedId {
    /// Build the id for `subpath` inside the package described by `descriptor`.
    pub fn new(descriptor: &PackageDescriptor, subpath: &str) -> Self {
        Self::from_parts(descriptor.name(), descriptor.version(), subpath)
    }

    pub fn from_parts(name: &str, version: &str, subpath: &str) -> Self {
        let value = format!("{}@{}/{}", name, version, subpath);
        QualifiedId {
            key_len: name.len() + 1 + version.len(),
            value,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The `name@version` key this id files under in `packagesInfo`.
    pub fn package_key(&self) -> &str {
        &self.value[..self.key_len]
    }
}

impl fmt::Debug for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QualifiedId").field(&self.value).finish()
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for QualifiedId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for QualifiedId {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for QualifiedId {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl Serialize for QualifiedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let id = QualifiedId::from_parts("acme", "1.2.3", "lib/foo.js");
        assert_eq!(id, "acme@1.2.3/lib/foo.js");
        assert_eq!(id.package_key(), "acme@1.2.3");
    }

    #[test]
    fn test_scoped_parts() {
        let id = QualifiedId::from_parts("@org/util", "2.0.0", "lib/a.js");
        assert_eq!(id.as_str(), "@org/util@2.0.0/lib/a.js");
        assert_eq!(id.package_key(), "@org/util@2.0.0");
    }

    #[test]
    fn test_from_descriptor() {
        let descriptor =
            PackageDescriptor::parse("package.json", r#"{"name": "lodash", "version": "4.17.0"}"#)
                .unwrap();
        let id = QualifiedId::new(&descriptor, "index.js");
        assert_eq!(id.to_string(), "lodash@4.17.0/index.js");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"lodash@4.17.0/index.js\"");
    }
}
