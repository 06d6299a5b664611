//! `bundle-manifest entry` command

use anyhow::{anyhow, Result};

use crate::cli::EntryArgs;
use crate::commands::load_compilation;
use bundle_manifest::ops::render_entry_module;

pub fn execute(args: EntryArgs) -> Result<()> {
    let compilation = load_compilation(&args.graph)?;

    let chunk = compilation.chunk(&args.chunk).ok_or_else(|| {
        anyhow!(
            "no chunk named `{}` in {}\n  help: available chunks: {}",
            args.chunk,
            args.graph.display(),
            compilation
                .chunks
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    print!("{}", render_entry_module(&chunk.entry_dependencies, args.pathinfo));
    Ok(())
}
