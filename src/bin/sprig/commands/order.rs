//! `sprig order` command

use anyhow::Result;

use crate::cli::OrderArgs;
use sprig::ops::inspect::order;
use sprig::util::diagnostic::emit_warnings;
use sprig::util::{BuildSettings, GlobalContext};

pub fn execute(args: OrderArgs, ctx: &GlobalContext, settings: BuildSettings) -> Result<()> {
    let registry = ctx.registry(settings)?;
    let report = order(&registry, &args.app, &args.target)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.target);
    println!("scripts:");
    for name in &report.scripts {
        println!("  {}", name);
    }
    println!("stylesheets:");
    for name in &report.stylesheets {
        println!("  {}", name);
    }

    emit_warnings(&report.warnings, ctx.color());
    Ok(())
}
