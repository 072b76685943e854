//! Sprig CLI - build and serve SproutCore-style JavaScript applications

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use sprig::resolver::CyclicDependencyError;
use sprig::util::diagnostic::emit;
use sprig::util::GlobalContext;

fn main() {
    // Parse CLI
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

/// Print a fatal error. Cycles get the full diagnostic.
fn report(err: &anyhow::Error, color: bool) {
    match err.downcast_ref::<CyclicDependencyError>() {
        Some(cycle) => emit(&cycle.to_diagnostic(), color),
        None => eprintln!("error: {:#}", err),
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("sprig=debug")
    } else {
        EnvFilter::new("sprig=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?.with_roots(cli.roots);
    ctx.set_color(!cli.no_color);

    // Configuration: project > global > defaults, CLI flags on top
    let mut settings = ctx.config().build_settings();
    if cli.no_combine {
        settings.combine = false;
    }

    // Execute command
    match cli.command {
        Commands::Requirements(args) => commands::requirements::execute(args, &ctx, settings),
        Commands::Order(args) => commands::order::execute(args, &ctx, settings),
        Commands::Build(args) => commands::build::execute(args, &ctx, settings),
        Commands::Serve(args) => commands::serve::execute(args, &ctx, settings),
    }
}
