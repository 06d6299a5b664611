//! Command implementations

pub mod emit;
pub mod entry;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ManifestArgs;
use bundle_manifest::core::Compilation;
use bundle_manifest::util::config::{
    global_config_path, load_config, project_config_path, Config,
};

/// Load global and project config from the working directory.
pub fn load_workspace_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let global = global_config_path().unwrap_or_default();
    Ok(load_config(&global, &project_config_path(&cwd)))
}

/// Apply command-line overrides on top of loaded config.
pub fn apply_overrides(config: &mut Config, args: &ManifestArgs) {
    let mut overrides = Config::default();
    overrides.manifest.path = args.path.clone();
    overrides.manifest.name = args.name.clone();
    overrides.manifest.kind = args.kind.clone();
    overrides.registry.strategy = args.strategy;
    overrides.registry.modules_dir = args.modules_dir.clone();
    overrides.registry.shim = args.shim;
    overrides.registry.global = args.global.clone();
    config.merge(overrides);
}

/// Loaded config with command-line flags applied.
pub fn resolve_config(args: &ManifestArgs, jobs: Option<usize>) -> Result<Config> {
    let mut config = load_workspace_config()?;
    apply_overrides(&mut config, args);
    if jobs.is_some() {
        config.build.jobs = jobs;
    }
    Ok(config)
}

pub fn load_compilation(path: &Path) -> Result<Compilation> {
    let compilation = Compilation::load(path)?;
    tracing::debug!(
        "Loaded {} chunk(s) and {} asset(s) from {}",
        compilation.chunks.len(),
        compilation.assets.len(),
        path.display()
    );
    Ok(compilation)
}
