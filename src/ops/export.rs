//! Implementation of `sprig build`.
//!
//! Writes the page, every artifact and every static asset of one app into
//! an output directory, mirroring the public paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::app::AppRegistry;
use crate::core::entry::EntryKind;
use crate::ops::html::HtmlContext;
use crate::util::diagnostic::Warning;
use crate::util::fs;

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// App to export; unknown names export the shared `all` app
    pub app: String,

    /// Output directory
    pub out_dir: PathBuf,
}

/// What an export wrote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Public paths of written artifacts
    pub artifacts: Vec<String>,
    /// Public paths of copied static assets
    pub statics: Vec<String>,
    /// Warnings raised while ordering and bundling
    pub warnings: Vec<Warning>,
}

/// Export an app.
pub fn export(registry: &AppRegistry, opts: &ExportOptions) -> Result<ExportReport> {
    let app = registry.app_for(&opts.app)?;
    let mut report = ExportReport::default();

    fs::ensure_dir(&opts.out_dir)?;
    fs::write_string(
        &opts.out_dir.join("index.html"),
        &HtmlContext::new(&app).render()?,
    )?;

    for kind in [EntryKind::Script, EntryKind::Stylesheet] {
        for target in app.targets() {
            if let Some(set) = target.entries(kind) {
                report.warnings.extend_from_slice(set.warnings());
            }
        }

        for bundle in app.bundles(kind)? {
            report.warnings.extend_from_slice(bundle.warnings());
            for artifact in bundle.artifacts() {
                fs::write_string(&output_path(&opts.out_dir, &artifact.path), &artifact.content)?;
                report.artifacts.push(artifact.path.clone());
            }
        }
    }

    let mut copied = HashSet::new();
    for target in app.targets() {
        let Some(statics) = target.statics() else {
            continue;
        };
        for record in statics.records() {
            if copied.insert(record.destination.clone()) {
                fs::copy_file(&record.source, &output_path(&opts.out_dir, &record.destination))?;
                report.statics.push(record.destination.clone());
            }
        }
    }

    tracing::info!(
        "exported {} ({} artifacts, {} statics) to {}",
        app.name(),
        report.artifacts.len(),
        report.statics.len(),
        opts.out_dir.display()
    );

    Ok(report)
}

/// Location of a public path under `out_dir`.
fn output_path(out_dir: &Path, public: &str) -> PathBuf {
    public
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(out_dir.to_path_buf(), |path, part| path.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::PackageFixture;
    use crate::util::config::BuildSettings;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_public_tree() {
        let package = PackageFixture::new("pkg")
            .file("apps/todos/main.js", "require('missing');")
            .file("apps/todos/main.css", "a { background: sc_static('logo'); }")
            .file("apps/todos/images/logo.png", "png")
            .write();
        let mut registry = AppRegistry::new(BuildSettings::default());
        registry.add_root(package.root(), true).unwrap();

        let out = TempDir::new().unwrap();
        let report = export(
            &registry,
            &ExportOptions {
                app: "todos".to_string(),
                out_dir: out.path().to_path_buf(),
            },
        )
        .unwrap();

        assert_eq!(
            report.artifacts,
            vec![
                "/static/en/todos/javascript.js",
                "/static/en/todos/stylesheet.css"
            ]
        );
        assert_eq!(report.statics, vec!["/static/en/todos/logo.png"]);
        assert_eq!(report.warnings.len(), 1);

        assert!(out.path().join("index.html").is_file());
        assert!(out.path().join("static/en/todos/logo.png").is_file());
        let css = std::fs::read_to_string(out.path().join("static/en/todos/stylesheet.css")).unwrap();
        assert!(css.contains("url('/static/en/todos/logo.png')"));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/out"), "/static/en/app/a.js"),
            PathBuf::from("/out/static/en/app/a.js")
        );
    }
}
