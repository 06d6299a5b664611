//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bundle_manifest::ops::ShimStyle;
use bundle_manifest::util::config::StrategyKind;

/// bundle-manifest - register bundled modules under version-qualified names
#[derive(Parser)]
#[command(name = "bundle-manifest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write manifests and rewrite every chunk's bundle
    Emit(EmitArgs),

    /// Print the synthesized entry module of a chunk
    Entry(EntryArgs),

    /// Print the manifests emission would write, without writing anything
    Inspect(InspectArgs),
}

/// Options shared by commands that synthesize manifests.
#[derive(Args, Clone, Default)]
pub struct ManifestArgs {
    /// Manifest output path template ([name], [id], [hash], [chunkhash])
    #[arg(long)]
    pub path: Option<String>,

    /// Registry name template (defaults to the chunk name)
    #[arg(long)]
    pub name: Option<String>,

    /// Value of the manifest `type` field
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Package identity strategy (ancestor, modules-directory)
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Dependency container for the modules-directory strategy
    #[arg(long, value_name = "DIR")]
    pub modules_dir: Option<PathBuf>,

    /// Registration shim style (property, call)
    #[arg(long)]
    pub shim: Option<ShimStyle>,

    /// Global object exposing the module registry
    #[arg(long, value_name = "NAME")]
    pub global: Option<String>,
}

#[derive(Args)]
pub struct EmitArgs {
    /// Serialized compilation (JSON)
    #[arg(long, value_name = "FILE", env = "BUNDLE_MANIFEST_GRAPH")]
    pub graph: PathBuf,

    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Directory the rewritten bundles are written to
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct EntryArgs {
    /// Serialized compilation (JSON)
    #[arg(long, value_name = "FILE", env = "BUNDLE_MANIFEST_GRAPH")]
    pub graph: PathBuf,

    /// Chunk to render
    #[arg(long)]
    pub chunk: String,

    /// Annotate each require with its request
    #[arg(long)]
    pub pathinfo: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Serialized compilation (JSON)
    #[arg(long, value_name = "FILE", env = "BUNDLE_MANIFEST_GRAPH")]
    pub graph: PathBuf,

    /// Only show this chunk
    #[arg(long)]
    pub chunk: Option<String>,

    #[command(flatten)]
    pub manifest: ManifestArgs,
}
