//! `sprig build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use sprig::ops::export::{export, ExportOptions};
use sprig::util::diagnostic::emit_warnings;
use sprig::util::{BuildSettings, GlobalContext};

pub fn execute(args: BuildArgs, ctx: &GlobalContext, settings: BuildSettings) -> Result<()> {
    let registry = ctx.registry(settings)?;

    let opts = ExportOptions {
        app: args.app,
        out_dir: ctx.cwd().join(&args.out),
    };

    let report = export(&registry, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    emit_warnings(&report.warnings, ctx.color());

    for path in report.artifacts.iter().chain(&report.statics) {
        println!("{}", path);
    }
    eprintln!(
        "    Finished {} artifacts, {} statics -> {}",
        report.artifacts.len(),
        report.statics.len(),
        opts.out_dir.display()
    );

    Ok(())
}
