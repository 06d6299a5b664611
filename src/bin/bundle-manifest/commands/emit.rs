//! `bundle-manifest emit` command

use anyhow::Result;

use crate::cli::EmitArgs;
use crate::commands::{load_compilation, resolve_config};
use bundle_manifest::ops::emit;
use bundle_manifest::util::diagnostic::{self, Diagnostic};
use bundle_manifest::util::NativeFileSystem;

pub fn execute(args: EmitArgs, color: bool) -> Result<()> {
    let config = resolve_config(&args.manifest, args.jobs)?;
    let options = config.emit_options()?;
    let out_dir = args.out_dir.or(config.build.out_dir);

    let mut compilation = load_compilation(&args.graph)?;
    let emitted = emit(&mut compilation, &NativeFileSystem, &options)?;

    for chunk in &emitted {
        eprintln!(
            "     Emitted {} ({} modules) -> {}",
            chunk.chunk,
            chunk.result.manifest.content.len(),
            chunk.manifest_path.display()
        );
    }

    match out_dir {
        Some(dir) => {
            compilation.write_assets(&dir)?;
            eprintln!("     Wrote {} bundle(s) to {}", compilation.assets.len(), dir.display());
        }
        None => diagnostic::emit(
            &Diagnostic::warning("rewritten bundles were not written")
                .with_suggestion("Pass `--out-dir <dir>` or set `out_dir` under `[build]`"),
            color,
        ),
    }

    Ok(())
}
