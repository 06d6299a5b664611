//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.bundle-manifest/config.toml` - user-wide defaults
//! - Project: `bundle-manifest.toml` in the working directory
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::emit::{EmitOptions, Strategy};
use crate::ops::rewrite::{RewriteOptions, ShimStyle};
use crate::util::diagnostic::suggestions;

/// Project config file name.
pub const CONFIG_FILE: &str = "bundle-manifest.toml";

/// Default dependency container for the modules-directory strategy.
pub const DEFAULT_MODULES_DIR: &str = "node_modules";

/// bundle-manifest configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest output settings
    pub manifest: ManifestConfig,

    /// Registry and identity settings
    pub registry: RegistryConfig,

    /// Build settings
    pub build: BuildConfig,
}

/// `[manifest]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Output path template, e.g. `dist/[name].bundle.config.json`
    pub path: Option<String>,

    /// Registry name template, e.g. `[name]_[hash]`
    pub name: Option<String>,

    /// Free-form `type` tag copied into every manifest
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Which identity strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Ancestor,
    ModulesDirectory,
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ancestor" => Ok(StrategyKind::Ancestor),
            "modules-directory" => Ok(StrategyKind::ModulesDirectory),
            other => Err(format!(
                "unknown strategy `{}` (expected `ancestor` or `modules-directory`)",
                other
            )),
        }
    }
}

/// `[registry]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub strategy: Option<StrategyKind>,

    /// Container directory for the modules-directory strategy
    pub modules_dir: Option<PathBuf>,

    pub shim: Option<ShimStyle>,

    /// Global object exposing `registerDynamic`
    pub global: Option<String>,

    /// Prepend `"bundle";` (default true)
    pub bundle_marker: Option<bool>,

    /// Bind `define` to the registry's AMD define (default true)
    pub amd_define: Option<bool>,
}

/// `[build]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of parallel jobs (None = auto-detect)
    pub jobs: Option<usize>,

    /// Where rewritten bundles are written
    pub out_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.manifest.path, other.manifest.path);
        take(&mut self.manifest.name, other.manifest.name);
        take(&mut self.manifest.kind, other.manifest.kind);

        take(&mut self.registry.strategy, other.registry.strategy);
        take(&mut self.registry.modules_dir, other.registry.modules_dir);
        take(&mut self.registry.shim, other.registry.shim);
        take(&mut self.registry.global, other.registry.global);
        take(&mut self.registry.bundle_marker, other.registry.bundle_marker);
        take(&mut self.registry.amd_define, other.registry.amd_define);

        take(&mut self.build.jobs, other.build.jobs);
        take(&mut self.build.out_dir, other.build.out_dir);
    }

    /// The configured identity strategy.
    pub fn strategy(&self) -> Strategy {
        match self.registry.strategy.unwrap_or(StrategyKind::Ancestor) {
            StrategyKind::Ancestor => Strategy::Ancestor,
            StrategyKind::ModulesDirectory => Strategy::ModulesDirectory(
                self.registry
                    .modules_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULES_DIR)),
            ),
        }
    }

    /// Build emission options. Fails when no manifest path is configured.
    pub fn emit_options(&self) -> Result<EmitOptions> {
        let Some(path) = self.manifest.path.clone() else {
            bail!("no manifest output path configured\n  help: {}", suggestions::NO_OUTPUT_PATH);
        };

        let defaults = RewriteOptions::default();
        Ok(EmitOptions {
            path,
            name: self.manifest.name.clone(),
            kind: self.manifest.kind.clone(),
            strategy: self.strategy(),
            shim: self.registry.shim.unwrap_or_default(),
            rewrite: RewriteOptions {
                registry_global: self
                    .registry
                    .global
                    .clone()
                    .unwrap_or(defaults.registry_global),
                bundle_marker: self.registry.bundle_marker.unwrap_or(defaults.bundle_marker),
                amd_define: self.registry.amd_define.unwrap_or(defaults.amd_define),
            },
            jobs: self.build.jobs,
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (bundle-manifest.toml)
/// 2. Global config (~/.bundle-manifest/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.bundle-manifest).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".bundle-manifest"))
}

/// Get the global config path (~/.bundle-manifest/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.manifest.path.is_none());
        assert_eq!(config.strategy(), Strategy::Ancestor);
        assert!(config.emit_options().is_err());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);

        std::fs::write(
            &config_path,
            r#"
[manifest]
path = "dist/[name].bundle.config.json"
name = "[name]_[hash]"
type = "dll"

[registry]
strategy = "modules-directory"
shim = "call"
amd_define = false

[build]
jobs = 8
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.manifest.kind.as_deref(), Some("dll"));
        assert_eq!(config.registry.shim, Some(ShimStyle::Call));
        assert_eq!(config.build.jobs, Some(8));
        assert_eq!(
            config.strategy(),
            Strategy::ModulesDirectory(PathBuf::from("node_modules"))
        );

        let options = config.emit_options().unwrap();
        assert_eq!(options.path, "dist/[name].bundle.config.json");
        assert_eq!(options.shim, ShimStyle::Call);
        assert!(options.rewrite.bundle_marker);
        assert!(!options.rewrite.amd_define);
        assert_eq!(options.rewrite.registry_global, "System");
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.manifest.path = Some("a.json".to_string());
        base.build.jobs = Some(4);
        base.registry.bundle_marker = Some(false);

        let mut override_cfg = Config::default();
        override_cfg.manifest.path = Some("b.json".to_string());

        base.merge(override_cfg);

        assert_eq!(base.manifest.path.as_deref(), Some("b.json"));
        assert_eq!(base.build.jobs, Some(4));
        assert_eq!(base.registry.bundle_marker, Some(false));
    }

    #[test]
    fn test_broken_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "[manifest\npath = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[manifest]
path = "global/[name].json"

[registry]
global = "SystemJS"
"#,
        )
        .unwrap();
        std::fs::write(
            &project_path,
            r#"
[manifest]
path = "project/[name].json"
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.manifest.path.as_deref(), Some("project/[name].json"));
        assert_eq!(config.registry.global.as_deref(), Some("SystemJS"));
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!(
            "modules-directory".parse::<StrategyKind>().unwrap(),
            StrategyKind::ModulesDirectory
        );
        assert!("nearest".parse::<StrategyKind>().is_err());
    }
}
