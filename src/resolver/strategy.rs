//! Package identity strategies.
//!
//! Both strategies answer the same question (which package does this module
//! belong to, and where inside it) and produce the same `name@version/subpath`
//! shape. A deployment picks one in configuration.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{Module, PackageDescriptor, QualifiedId, DESCRIPTOR_NAMES};
use crate::resolver::{find_descriptor, is_separator, package_root_len, DescriptorCache};
use crate::resolver::errors::DescriptorError;
use crate::util::fs::FileSystem;

/// Where a module sits inside its package.
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    pub descriptor: Arc<PackageDescriptor>,
    /// Path of the descriptor file the package was identified by
    pub descriptor_path: String,
    /// Module path relative to the package root
    pub subpath: String,
}

impl PackageIdentity {
    pub fn qualified_id(&self) -> QualifiedId {
        QualifiedId::new(&self.descriptor, &self.subpath)
    }
}

/// Derives a module's package identity.
///
/// `Ok(None)` means the module is not package code; it is left out of the
/// manifest without complaint.
pub trait PackageIdentityStrategy: fmt::Debug + Send + Sync {
    fn resolve_identity(
        &self,
        module: &Module,
        fs: &dyn FileSystem,
        cache: &DescriptorCache,
    ) -> Result<Option<PackageIdentity>, DescriptorError>;
}

/// Walks up from the module's path to the nearest descriptor file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncestorDescriptor;

impl PackageIdentityStrategy for AncestorDescriptor {
    fn resolve_identity(
        &self,
        module: &Module,
        fs: &dyn FileSystem,
        cache: &DescriptorCache,
    ) -> Result<Option<PackageIdentity>, DescriptorError> {
        let path = module.identifying_path();
        let Some(descriptor_path) = find_descriptor(fs, path) else {
            tracing::debug!("No package descriptor above {}", path);
            return Ok(None);
        };

        let descriptor = cache.load(fs, &descriptor_path)?;

        // The descriptor was found by trimming `path`, so its root is a prefix of it
        let root_len = package_root_len(&descriptor_path);
        let subpath = path.get(root_len + 1..).unwrap_or_default().to_string();

        Ok(Some(PackageIdentity {
            descriptor,
            descriptor_path,
            subpath,
        }))
    }
}

/// Reads identity from the module's library ident, relative to a known
/// dependency container (e.g. `node_modules`).
#[derive(Debug, Clone)]
pub struct ModulesDirectory {
    modules_dir: PathBuf,
}

impl ModulesDirectory {
    pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
        ModulesDirectory {
            modules_dir: modules_dir.into(),
        }
    }

    /// Split a library ident into package name and subpath.
    ///
    /// A leading `./` and a leading container segment (`node_modules/` when the
    /// container is named `node_modules`) are dropped first. Scoped packages
    /// take two segments.
    pub fn split_ident<'a>(&self, ident: &'a str) -> Option<(&'a str, &'a str)> {
        let mut rest = ident.strip_prefix("./").unwrap_or(ident);

        if let Some(container) = self.modules_dir.file_name().and_then(|n| n.to_str()) {
            if let Some(stripped) = rest
                .strip_prefix(container)
                .and_then(|r| r.strip_prefix(is_separator))
            {
                rest = stripped;
            }
        }

        let segments = if rest.starts_with('@') { 2 } else { 1 };
        let mut name_end = 0;
        for segment in 0..segments {
            let from = if segment == 0 { 0 } else { name_end + 1 };
            let tail = rest.get(from..)?;
            name_end = match tail.find(is_separator) {
                Some(offset) => from + offset,
                None => rest.len(),
            };
        }

        let name = &rest[..name_end];
        if name.is_empty() || name == "@" || name.ends_with(is_separator) {
            return None;
        }
        let subpath = rest.get(name_end + 1..).unwrap_or_default();
        Some((name, subpath))
    }
}

impl PackageIdentityStrategy for ModulesDirectory {
    fn resolve_identity(
        &self,
        module: &Module,
        fs: &dyn FileSystem,
        cache: &DescriptorCache,
    ) -> Result<Option<PackageIdentity>, DescriptorError> {
        let Some(ident) = module.lib_ident.as_deref() else {
            tracing::debug!("Module {} has no library ident", module.identifier);
            return Ok(None);
        };
        let Some((name, subpath)) = self.split_ident(ident) else {
            tracing::debug!("Library ident {} names no package", ident);
            return Ok(None);
        };

        let package_dir = self.modules_dir.join(name);
        let found = DESCRIPTOR_NAMES
            .iter()
            .map(|file| package_dir.join(file))
            .find(|candidate| fs.is_file(candidate));

        let Some(descriptor_path) = found else {
            tracing::debug!("No descriptor for {} in {}", name, self.modules_dir.display());
            return Ok(None);
        };

        let descriptor_path = descriptor_path.to_string_lossy().into_owned();
        let descriptor = cache.load(fs, &descriptor_path)?;

        Ok(Some(PackageIdentity {
            descriptor,
            descriptor_path,
            subpath: subpath.to_string(),
        }))
    }
}
