//! The host compilation: chunks, their modules and the emitted assets.
//!
//! A compilation is normally produced by the host bundler. The CLI reads it
//! from a JSON file of the form:
//!
//! ```json
//! {
//!   "hash": "9f0c...",
//!   "chunks": [
//!     { "name": "vendors", "files": ["vendors.bundle.js"], "modules": [ ... ] }
//!   ],
//!   "assets": { "vendors.bundle.js": "define(...)" }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Module, ModuleId};
use crate::util::fs::{read_to_string, write_string};
use crate::util::hash::Fingerprint;
use crate::util::template::PathData;

/// The module an entry dependency resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryModule {
    pub raw_request: String,
    pub id: ModuleId,
}

/// One request listed in a chunk's entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDependency {
    pub request: String,
    /// `None` when the bundler could not resolve the request
    #[serde(default)]
    pub module: Option<EntryModule>,
}

/// One output bundle and the modules compiled into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub name: String,

    #[serde(default)]
    pub id: Option<String>,

    /// Content hash supplied by the host
    #[serde(default)]
    pub hash: Option<String>,

    /// Output files; the first one is the primary bundle
    #[serde(default)]
    pub files: Vec<String>,

    /// Included modules, in the host's iteration order
    #[serde(default)]
    pub modules: Vec<Module>,

    #[serde(default)]
    pub entry_dependencies: Vec<EntryDependency>,
}

impl Chunk {
    pub fn new(name: impl Into<String>) -> Self {
        Chunk {
            name: name.into(),
            id: None,
            hash: None,
            files: Vec::new(),
            modules: Vec::new(),
            entry_dependencies: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.files.push(file.into());
        self
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// The chunk's primary output file.
    pub fn primary_file(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }
}

/// A full compilation handed over by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    pub hash: Option<String>,

    #[serde(default)]
    pub chunks: Vec<Chunk>,

    /// Emitted bundle text by output file name
    #[serde(default)]
    pub assets: IndexMap<String, String>,
}

impl Compilation {
    /// Load a serialized compilation.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse compilation: {}", path.display()))
    }

    /// Find a chunk by name.
    pub fn chunk(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.name == name)
    }

    /// Current source of an asset.
    pub fn asset(&self, file: &str) -> Option<&str> {
        self.assets.get(file).map(String::as_str)
    }

    /// Replace an asset's source. This is the single commit point for rewrites.
    pub fn replace_asset(&mut self, file: &str, source: String) {
        self.assets.insert(file.to_string(), source);
    }

    /// The compilation hash, computed from the assets when the host gave none.
    pub fn hash(&self) -> String {
        if let Some(hash) = &self.hash {
            return hash.clone();
        }

        let mut fp = Fingerprint::new();
        for chunk in &self.chunks {
            fp.update_str(&self.chunk_hash(chunk));
        }
        fp.finish_short()
    }

    /// A chunk's content hash, computed from its files when the host gave none.
    pub fn chunk_hash(&self, chunk: &Chunk) -> String {
        if let Some(hash) = &chunk.hash {
            return hash.clone();
        }

        let mut fp = Fingerprint::new();
        fp.update_str(&chunk.name);
        for file in &chunk.files {
            fp.update_str(file);
            fp.update_str(self.asset(file).unwrap_or_default());
        }
        fp.finish_short()
    }

    /// Template values for `chunk`.
    pub fn path_data<'a>(
        &'a self,
        chunk: &'a Chunk,
        hash: &'a str,
        chunk_hash: &'a str,
    ) -> PathData<'a> {
        PathData {
            name: &chunk.name,
            id: chunk.id.as_deref(),
            hash,
            chunk_hash: Some(chunk_hash),
        }
    }

    /// Write every asset below `out_dir`.
    pub fn write_assets(&self, out_dir: &Path) -> Result<()> {
        for (file, source) in &self.assets {
            write_string(&out_dir.join(file), source)?;
        }
        Ok(())
    }
}
