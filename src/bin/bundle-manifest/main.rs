//! bundle-manifest CLI

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use miette::{GraphicalReportHandler, GraphicalTheme};
use tracing_subscriber::EnvFilter;

use bundle_manifest::util::diagnostic;
use bundle_manifest::{DescriptorError, EmitError};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bundle_manifest=debug")
    } else {
        EnvFilter::new("bundle_manifest=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Emit(args) => commands::emit::execute(args, color),
        Commands::Entry(args) => commands::entry::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    }
}

/// Print an error, with a source snippet when a descriptor failed to parse.
fn report(err: &anyhow::Error, color: bool) {
    let Some(emit_err) = err.downcast_ref::<EmitError>() else {
        eprintln!("error: {:#}", err);
        return;
    };

    diagnostic::emit(&emit_err.to_diagnostic(), color);

    if let EmitError::Descriptor {
        source: DescriptorError::Parse(parse),
        ..
    } = emit_err
    {
        let theme = if color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut out = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .render_report(&mut out, &**parse)
            .is_ok()
        {
            eprint!("\n{}", out);
        }
    }
}
