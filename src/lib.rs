//! bundle-manifest - version-qualified module registration for JavaScript bundles
//!
//! Given a bundler's compilation, this crate assigns every bundled module a
//! `name@version/subpath` identity from its package descriptor, appends
//! runtime registry shims to each chunk's bundle text, and writes a JSON
//! manifest describing the chunk and the packages it contains.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities: an in-memory filesystem and a shared package scenario.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    Chunk, ChunkManifest, Compilation, Manifest, Module, ModuleId, PackageDescriptor, QualifiedId,
};
pub use ops::{emit, EmitError, EmitOptions};
pub use resolver::{DescriptorCache, DescriptorError, PackageIdentityStrategy};
pub use util::config::Config;
