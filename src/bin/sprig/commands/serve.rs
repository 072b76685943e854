//! `sprig serve` command

use anyhow::Result;

use crate::cli::ServeArgs;
use sprig::ops::serve::serve;
use sprig::util::{BuildSettings, GlobalContext};

pub fn execute(args: ServeArgs, ctx: &GlobalContext, settings: BuildSettings) -> Result<()> {
    let mut config = ctx.config();

    // CLI overrides config
    if args.host.is_some() {
        config.serve.host = args.host;
    }
    if args.port.is_some() {
        config.serve.port = args.port;
    }

    let registry = ctx.registry(settings)?;

    if let Some(app) = &args.app {
        let app = registry.app_for(app)?;
        eprintln!("     Serving {} at http://{}/{}", app.name(), config.serve_addr(), app.name());
    }

    serve(&registry, &config.serve_addr())
}
