//! `sprig requirements` command

use anyhow::Result;

use crate::cli::RequirementsArgs;
use sprig::ops::inspect::requirements;
use sprig::util::{BuildSettings, GlobalContext};

pub fn execute(args: RequirementsArgs, ctx: &GlobalContext, mut settings: BuildSettings) -> Result<()> {
    // CLI overrides config
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }

    let registry = ctx.registry(settings)?;
    let order = requirements(
        &registry,
        args.target.as_deref(),
        &registry.settings().mode,
    )?;

    for name in order {
        println!("{}", name);
    }

    Ok(())
}
