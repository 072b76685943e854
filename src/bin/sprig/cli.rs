//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sprig - build and serve SproutCore-style JavaScript applications
#[derive(Parser)]
#[command(name = "sprig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Package root (repeatable, defaults to the current directory)
    #[arg(long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Serve every file separately instead of one bundle per target
    #[arg(long, global = true)]
    pub no_combine: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the targets a target requires, in load order
    Requirements(RequirementsArgs),

    /// Print the load order of a target's files
    Order(OrderArgs),

    /// Write an app's page, bundles and images to a directory
    Build(BuildArgs),

    /// Serve apps over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct RequirementsArgs {
    /// Target or app to resolve (defaults to the shared `all` bucket)
    pub target: Option<String>,

    /// Buildfile mode
    #[arg(long, env = "SPRIG_MODE")]
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct OrderArgs {
    /// Target whose files to order
    pub target: String,

    /// App the target is loaded by
    #[arg(long, default_value = "all")]
    pub app: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// App to build
    #[arg(long, default_value = "all")]
    pub app: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Output the build report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    /// App to build before the first request
    #[arg(long)]
    pub app: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,
}
