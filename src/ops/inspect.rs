//! Implementation of `sprig requirements` and `sprig order`.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::app::AppRegistry;
use crate::core::entry::EntryKind;
use crate::resolver::requirements::{RequirementGraph, ALL};
use crate::util::diagnostic::{suggestions, Warning};

/// Resolved target order for `target` in `mode`.
///
/// Without a target, resolves the shared `all` requirements.
pub fn requirements(registry: &AppRegistry, target: Option<&str>, mode: &str) -> Result<Vec<String>> {
    let graph = RequirementGraph::new(registry.config(), mode);
    let order = match target {
        Some(name) if registry.is_app(name) => graph.resolve_for_app(name)?,
        Some(name) => graph.resolve(name)?,
        None => graph.resolve(ALL)?,
    };
    Ok(order)
}

/// File order of one target.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReport {
    pub target: String,
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Order the files of `target` as loaded by `app`.
pub fn order(registry: &AppRegistry, app: &str, target: &str) -> Result<OrderReport> {
    let app = registry.app_for(app)?;
    let Some(found) = app.find_target(target) else {
        bail!(
            "target `{}` is not part of app `{}`\n{}",
            target,
            app.name(),
            suggestions::TARGET_NOT_FOUND
        );
    };

    let names = |kind: EntryKind| -> Vec<String> {
        found
            .entries(kind)
            .map(|set| set.names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    };

    let mut warnings = Vec::new();
    for kind in [EntryKind::Script, EntryKind::Stylesheet] {
        if let Some(set) = found.entries(kind) {
            warnings.extend_from_slice(set.warnings());
        }
    }
    warnings.extend_from_slice(app.bundle(found, EntryKind::Stylesheet)?.warnings());

    Ok(OrderReport {
        target: found.id().to_string(),
        scripts: names(EntryKind::Script),
        stylesheets: names(EntryKind::Stylesheet),
        warnings,
    })
}
