//! Bundle manifest schema.
//!
//! The manifest is the JSON side artifact written next to a bundle:
//!
//! ```json
//! {
//!   "name": "vendors_0f3a...",
//!   "content": ["lodash@4.17.0/index.js"],
//!   "packagesInfo": { "lodash@4.17.0": { "name": "lodash", "version": "4.17.0" } }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{ModuleId, PackageDescriptor, QualifiedId};

/// The runtime key a registration shim indexes the chunk's registry entry with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RegistrationKey {
    /// Raw request; the chunk exports an object keyed by request.
    Request(String),
    /// Bundler module id; the chunk exports its require function.
    Id(ModuleId),
}

/// Registration payload for one qualified id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRegistration {
    pub id: RegistrationKey,
    pub meta: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,
}

/// The manifest written for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Registry name of the bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form tag from configuration
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Qualified ids in chunk order
    pub content: Vec<QualifiedId>,

    /// Contributing packages, keyed by `name@version`
    pub packages_info: IndexMap<String, PackageDescriptor>,
}

impl Manifest {
    /// Serialize to the compact JSON written to disk.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A manifest together with the registrations behind its content.
#[derive(Debug, Clone)]
pub struct ChunkManifest {
    pub manifest: Manifest,
    pub registrations: IndexMap<QualifiedId, ModuleRegistration>,
}

impl ChunkManifest {
    /// Check that every content id has a registration and a package entry.
    pub fn is_consistent(&self) -> bool {
        self.manifest.content.iter().all(|id| {
            self.registrations.contains_key(id)
                && self.manifest.packages_info.contains_key(id.package_key())
        }) && self.registrations.len() <= self.manifest.content.len()
    }
}
