//! Core data structures.
//!
//! This module contains the types shared by every phase:
//! - Host-side inputs (Compilation, Chunk, Module)
//! - Package descriptors and qualified module ids
//! - The manifest schema

pub mod compilation;
pub mod descriptor;
pub mod manifest;
pub mod module;
pub mod qualified_id;

pub use compilation::{Chunk, Compilation, EntryDependency, EntryModule};
pub use descriptor::{PackageDescriptor, DESCRIPTOR_NAMES};
pub use manifest::{ChunkManifest, Manifest, ModuleRegistration, RegistrationKey};
pub use module::{Module, ModuleId, ProvidedExports};
pub use qualified_id::QualifiedId;
