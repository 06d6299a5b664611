//! Manifest synthesis for one chunk.

use indexmap::IndexMap;

use crate::core::{ChunkManifest, Manifest, Module, ModuleRegistration, PackageDescriptor};
use crate::ops::rewrite::ShimStyle;
use crate::resolver::{DescriptorCache, DescriptorError, PackageIdentityStrategy};
use crate::util::fs::FileSystem;

/// What synthesis reads from: the filesystem, the shared cache and the
/// chosen identity strategy.
#[derive(Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub cache: &'a DescriptorCache,
    pub strategy: &'a dyn PackageIdentityStrategy,
    pub shim: ShimStyle,
}

/// Build the manifest and registrations for a chunk's modules.
///
/// Modules are visited in the given order. Those without a package are
/// skipped. A descriptor that cannot be read or parsed aborts synthesis.
pub fn synthesize(
    modules: &[Module],
    name: Option<String>,
    kind: Option<String>,
    ctx: &SynthesisContext<'_>,
) -> Result<ChunkManifest, DescriptorError> {
    let mut content = Vec::new();
    let mut registrations = IndexMap::new();
    let mut descriptors: IndexMap<String, std::sync::Arc<PackageDescriptor>> = IndexMap::new();

    for module in modules {
        let Some(identity) = ctx.strategy.resolve_identity(module, ctx.fs, ctx.cache)? else {
            continue;
        };

        let qualified_id = identity.qualified_id();
        tracing::debug!("{} -> {}", module.identifier, qualified_id);

        registrations.insert(
            qualified_id.clone(),
            ModuleRegistration {
                id: ctx.shim.key_for(module),
                meta: module.build_meta.clone(),
                exports: module.provided_exports.as_known().map(<[String]>::to_vec),
            },
        );
        content.push(qualified_id);
        descriptors.insert(identity.descriptor_path, identity.descriptor);
    }

    // Distinct descriptor files for the same name@version collapse into one entry
    let mut packages_info = IndexMap::new();
    for descriptor in descriptors.values() {
        packages_info.insert(descriptor.key(), PackageDescriptor::clone(descriptor));
    }

    Ok(ChunkManifest {
        manifest: Manifest {
            name,
            kind,
            content,
            packages_info,
        },
        registrations,
    })
}
