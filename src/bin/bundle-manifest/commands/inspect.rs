//! `bundle-manifest inspect` command

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;

use crate::cli::InspectArgs;
use crate::commands::{load_compilation, resolve_config};
use bundle_manifest::core::Manifest;
use bundle_manifest::ops::{emit::manifest_paths_collide, plan};
use bundle_manifest::util::NativeFileSystem;

pub fn execute(args: InspectArgs) -> Result<()> {
    let mut config = resolve_config(&args.manifest, None)?;
    // Nothing is written, so a path is only needed to show where it would go
    if config.manifest.path.is_none() {
        config.manifest.path = Some("[name].bundle.config.json".to_string());
    }
    let options = config.emit_options()?;

    let mut compilation = load_compilation(&args.graph)?;
    if let Some(name) = &args.chunk {
        compilation.chunks.retain(|c| &c.name == name);
        if compilation.chunks.is_empty() {
            bail!("no chunk named `{}` in {}", name, args.graph.display());
        }
    }

    let prepared = plan(&compilation, &NativeFileSystem, &options)?;
    if let Some(path) = manifest_paths_collide(&prepared) {
        tracing::warn!("More than one chunk writes {}", path.display());
    }

    let manifests: IndexMap<String, &Manifest> = prepared
        .iter()
        .map(|p| (p.manifest_path.display().to_string(), &p.result.manifest))
        .collect();

    let json = serde_json::to_string_pretty(&manifests).context("failed to serialize manifests")?;
    println!("{}", json);
    Ok(())
}
