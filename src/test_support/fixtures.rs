//! Package fixtures for tests.
//!
//! A fixture describes a package root (frameworks, themes, apps and an
//! optional Buildfile) and writes it to a temporary directory named after
//! the package, so [`TargetId::package`](crate::core::target::TargetId::package)
//! sees the expected name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::buildfile::BUILDFILE_NAME;

/// Fixture for a package root.
#[derive(Debug, Clone)]
pub struct PackageFixture {
    /// Package name, used as the root directory name.
    pub name: String,
    /// Buildfile contents, if any.
    pub buildfile: Option<String>,
    /// Files (path relative to the package root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl PackageFixture {
    /// Create an empty package fixture.
    pub fn new(name: impl Into<String>) -> Self {
        PackageFixture {
            name: name.into(),
            buildfile: None,
            files: BTreeMap::new(),
        }
    }

    /// Add a file.
    pub fn file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Set the Buildfile.
    pub fn buildfile(mut self, content: impl Into<String>) -> Self {
        self.buildfile = Some(content.into());
        self
    }

    /// Write this fixture below `base_path`, returning the package root.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let root = base_path.join(&self.name);
        std::fs::create_dir_all(&root)?;

        if let Some(buildfile) = &self.buildfile {
            std::fs::write(root.join(BUILDFILE_NAME), buildfile)?;
        }

        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(root)
    }

    /// Write this fixture to a fresh temporary directory.
    pub fn write(&self) -> WrittenPackage {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = self
            .write_to(tmp.path())
            .expect("failed to write package fixture");
        WrittenPackage { _tmp: tmp, root }
    }
}

/// A fixture on disk. The directory is removed on drop.
#[derive(Debug)]
pub struct WrittenPackage {
    _tmp: TempDir,
    root: PathBuf,
}

impl WrittenPackage {
    /// The package root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Common Buildfile templates.
pub mod buildfiles {
    /// The framework layout of a typical SproutCore checkout.
    pub fn sproutcore() -> &'static str {
        r#"
[config.all]
required = ["sproutcore"]

[config.sproutcore]
required = ["desktop", "datastore"]

[config.desktop]
required = ["foundation"]

[config.datastore]
required = ["runtime"]

[config.foundation]
required = ["runtime", "jquery"]
"#
    }
}
