mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // apiscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("apiscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Extract {
            input,
            output,
            search_dirs,
            options,
        } => commands::extract::run(input, output.as_deref(), search_dirs, options, &cli.global),
        Command::Diff {
            reference,
            target,
            output,
        } => commands::diff::run(reference, target, output.as_deref(), &cli.global),
        Command::Report {
            reference,
            target,
            format,
            filters,
        } => commands::report::run(reference, target, *format, filters),
        Command::Stats { reference, target } => commands::stats::run(reference, target, &cli.global),
    }
}
