//! Manifest emission.
//!
//! Runs in two parallel passes over the chunks, sharing one descriptor cache.
//! The first pass synthesizes every manifest and rewritten bundle in memory.
//! A broken package descriptor anywhere stops the build there, before any
//! file is written. The second pass writes the manifests; a missing asset or
//! a failed write only costs its own chunk, and the first such failure in
//! chunk order is reported once every chunk has finished.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use crate::core::{Chunk, ChunkManifest, Compilation};
use crate::ops::rewrite::{rewrite, RewriteOptions, ShimStyle};
use crate::ops::synthesize::{synthesize, SynthesisContext};
use crate::resolver::{
    AncestorDescriptor, DescriptorCache, DescriptorError, ModulesDirectory,
    PackageIdentityStrategy,
};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::FileSystem;
use crate::util::template::{has_placeholders, render_path};

/// Which identity strategy a deployment uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Nearest ancestor descriptor of the module path
    #[default]
    Ancestor,
    /// Library ident relative to a dependency container directory
    ModulesDirectory(PathBuf),
}

impl Strategy {
    pub fn build(&self) -> Box<dyn PackageIdentityStrategy> {
        match self {
            Strategy::Ancestor => Box::new(AncestorDescriptor),
            Strategy::ModulesDirectory(dir) => Box::new(ModulesDirectory::new(dir.clone())),
        }
    }
}

/// Options for an emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Manifest output path template (required)
    pub path: String,
    /// Registry name template; defaults to the chunk name
    pub name: Option<String>,
    /// Free-form manifest `type` tag
    pub kind: Option<String>,
    pub strategy: Strategy,
    pub shim: ShimStyle,
    pub rewrite: RewriteOptions,
    /// Worker threads (None = rayon default)
    pub jobs: Option<usize>,
}

impl EmitOptions {
    pub fn new(path: impl Into<String>) -> Self {
        EmitOptions {
            path: path.into(),
            name: None,
            kind: None,
            strategy: Strategy::default(),
            shim: ShimStyle::default(),
            rewrite: RewriteOptions::default(),
            jobs: None,
        }
    }
}

/// Error while emitting one chunk.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("chunk `{chunk}` has no output file")]
    NoOutputFile { chunk: String },

    #[error("chunk `{chunk}` has no source for its output file `{file}`")]
    MissingAsset { chunk: String, file: String },

    #[error("invalid package descriptor in chunk `{chunk}`")]
    Descriptor {
        chunk: String,
        #[source]
        source: DescriptorError,
    },

    #[error("failed to serialize manifest for chunk `{chunk}`")]
    Serialize {
        chunk: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create directory `{}`", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write manifest `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            EmitError::NoOutputFile { .. } | EmitError::MissingAsset { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::MISSING_ASSET)
            }
            EmitError::Descriptor { source, .. } => {
                let inner = source.to_diagnostic();
                let mut diag = Diagnostic::error(self.to_string()).with_context(inner.message);
                if let Some(location) = inner.location {
                    diag = diag.with_location(location);
                }
                for suggestion in inner.suggestions {
                    diag = diag.with_suggestion(suggestion);
                }
                diag
            }
            EmitError::Serialize { source, .. } => {
                Diagnostic::error(self.to_string()).with_context(source.to_string())
            }
            EmitError::CreateDir { path, source } | EmitError::Write { path, source } => {
                Diagnostic::error(self.to_string())
                    .with_location(path.clone())
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::WRITE_FAILED)
            }
        }
    }
}

/// Everything computed for one chunk before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedChunk {
    pub chunk: String,
    /// Primary asset the rewritten text replaces
    pub asset_file: String,
    pub manifest_path: PathBuf,
    pub result: ChunkManifest,
    pub source: String,
}

/// Summary of one emitted chunk.
#[derive(Debug, Clone)]
pub struct EmittedChunk {
    pub chunk: String,
    pub asset_file: String,
    pub manifest_path: PathBuf,
    pub result: ChunkManifest,
}

/// Compute a chunk's manifest and rewritten bundle text in memory.
///
/// `hash` is the compilation hash, computed once by the caller.
pub fn prepare_chunk(
    compilation: &Compilation,
    chunk: &Chunk,
    hash: &str,
    ctx: &SynthesisContext<'_>,
    options: &EmitOptions,
) -> Result<PreparedChunk, EmitError> {
    let chunk_hash = compilation.chunk_hash(chunk);
    let data = compilation.path_data(chunk, hash, &chunk_hash);

    let name = options.name.as_deref().map(|t| render_path(t, &data));
    let manifest_path = PathBuf::from(render_path(&options.path, &data));

    let asset_file = chunk
        .primary_file()
        .ok_or_else(|| EmitError::NoOutputFile {
            chunk: chunk.name.clone(),
        })?
        .to_string();
    let original = compilation
        .asset(&asset_file)
        .ok_or_else(|| EmitError::MissingAsset {
            chunk: chunk.name.clone(),
            file: asset_file.clone(),
        })?;

    let result = synthesize(&chunk.modules, name, options.kind.clone(), ctx).map_err(|source| {
        EmitError::Descriptor {
            chunk: chunk.name.clone(),
            source,
        }
    })?;

    let registry_name = result.manifest.name.as_deref().unwrap_or(&chunk.name);
    let source = rewrite(original, registry_name, &result.registrations, &options.rewrite);

    Ok(PreparedChunk {
        chunk: chunk.name.clone(),
        asset_file,
        manifest_path,
        result,
        source,
    })
}

/// Serialize a manifest and write it, creating the parent directory first.
pub fn write_manifest(
    fs: &dyn FileSystem,
    prepared: &PreparedChunk,
) -> Result<(), EmitError> {
    let bytes = prepared
        .result
        .manifest
        .to_json_bytes()
        .map_err(|source| EmitError::Serialize {
            chunk: prepared.chunk.clone(),
            source,
        })?;

    if let Some(parent) = prepared.manifest_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs.create_dir_all(parent)
                .map_err(|source| EmitError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    fs.write(&prepared.manifest_path, &bytes)
        .map_err(|source| EmitError::Write {
            path: prepared.manifest_path.clone(),
            source,
        })?;

    tracing::info!(
        "Wrote manifest for `{}` ({} modules) to {}",
        prepared.chunk,
        prepared.result.manifest.content.len(),
        prepared.manifest_path.display()
    );

    Ok(())
}

/// Emit manifests for every chunk and commit the rewritten bundles.
///
/// A descriptor error aborts the whole emission with nothing written or
/// committed. Other failures are per chunk: the remaining chunks still have
/// their manifest written and primary asset replaced, and the first failure
/// is then returned.
pub fn emit(
    compilation: &mut Compilation,
    fs: &dyn FileSystem,
    options: &EmitOptions,
) -> Result<Vec<EmittedChunk>, EmitError> {
    if let Some(j) = options.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(j)
            .build_global()
            .ok(); // Ignore if already set
    }

    let cache = DescriptorCache::new();
    let strategy = options.strategy.build();
    let ctx = SynthesisContext {
        fs,
        cache: &cache,
        strategy: strategy.as_ref(),
        shim: options.shim,
    };

    tracing::debug!("Emitting manifests for {} chunk(s)", compilation.chunks.len());
    if compilation.chunks.len() > 1 && !has_placeholders(&options.path) {
        tracing::warn!(
            "Manifest path `{}` has no placeholders; chunks will overwrite each other",
            options.path
        );
    }

    let shared: &Compilation = compilation;
    let hash = shared.hash();
    let prepared: Vec<Result<PreparedChunk, EmitError>> = shared
        .chunks
        .par_iter()
        .map(|chunk| prepare_chunk(shared, chunk, &hash, &ctx, options))
        .collect();

    // Descriptor errors are fatal for the whole build
    let mut checked = Vec::with_capacity(prepared.len());
    for result in prepared {
        match result {
            Err(err @ EmitError::Descriptor { .. }) => return Err(err),
            other => checked.push(other),
        }
    }

    let results: Vec<Result<PreparedChunk, EmitError>> = checked
        .into_par_iter()
        .map(|result| {
            let prepared = result?;
            write_manifest(fs, &prepared)?;
            Ok(prepared)
        })
        .collect();

    let mut emitted = Vec::with_capacity(results.len());
    let mut first_error = None;

    for result in results {
        match result {
            Ok(prepared) => {
                compilation.replace_asset(&prepared.asset_file, prepared.source);
                emitted.push(EmittedChunk {
                    chunk: prepared.chunk,
                    asset_file: prepared.asset_file,
                    manifest_path: prepared.manifest_path,
                    result: prepared.result,
                });
            }
            Err(err) => {
                tracing::debug!("Chunk failed: {}", err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(emitted),
    }
}

/// Compute every chunk's manifest without writing anything.
pub fn plan(
    compilation: &Compilation,
    fs: &dyn FileSystem,
    options: &EmitOptions,
) -> Result<Vec<PreparedChunk>, EmitError> {
    let cache = DescriptorCache::new();
    let strategy = options.strategy.build();
    let ctx = SynthesisContext {
        fs,
        cache: &cache,
        strategy: strategy.as_ref(),
        shim: options.shim,
    };

    let hash = compilation.hash();
    compilation
        .chunks
        .iter()
        .map(|chunk| prepare_chunk(compilation, chunk, &hash, &ctx, options))
        .collect()
}

/// Whether `path` would be written for more than one chunk.
pub fn manifest_paths_collide(prepared: &[PreparedChunk]) -> Option<&Path> {
    let mut seen = std::collections::HashSet::new();
    prepared
        .iter()
        .map(|p| p.manifest_path.as_path())
        .find(|path| !seen.insert(*path))
}
