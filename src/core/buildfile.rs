//! Buildfile loading.
//!
//! Every package root may carry a `Buildfile.toml` declaring configuration
//! buckets, most importantly which targets each target requires:
//!
//! ```toml
//! [config.foundation]
//! required = ["runtime", "jquery"]
//!
//! [mode.debug.config.foundation]
//! required = ["testing"]
//! ```
//!
//! Top-level `config` tables go to the `global` mode; `mode.<name>` selects
//! another mode for the tables beneath it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::config_store::{ConfigStore, Mode};

/// Buildfile name looked up in every root.
pub const BUILDFILE_NAME: &str = "Buildfile.toml";

/// Error loading a Buildfile.
#[derive(Debug, Error)]
pub enum BuildfileError {
    #[error("failed to read Buildfile {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse Buildfile {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

type Buckets = BTreeMap<String, BTreeMap<String, toml::Value>>;

/// A parsed Buildfile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Buildfile {
    /// Buckets declared in the global mode
    #[serde(default)]
    config: Buckets,

    /// Buckets declared per named mode
    #[serde(default)]
    mode: BTreeMap<String, ModeSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ModeSection {
    #[serde(default)]
    config: Buckets,
}

impl Buildfile {
    /// Parse a Buildfile from a string.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load and parse a Buildfile.
    pub fn load(path: &Path) -> Result<Self, BuildfileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BuildfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| BuildfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `<root>/Buildfile.toml` if it exists.
    pub fn load_from_root(root: &Path) -> Result<Option<Self>, BuildfileError> {
        let path = root.join(BUILDFILE_NAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Apply every declaration to the store.
    pub fn evaluate(&self, store: &mut ConfigStore) {
        let global = Mode::global();
        store.declare_mode(global.as_str());
        Self::merge_buckets(store, &global, &self.config);

        for (name, section) in &self.mode {
            let mode = store.declare_mode(name);
            Self::merge_buckets(store, &mode, &section.config);
        }
    }

    fn merge_buckets(store: &mut ConfigStore, mode: &Mode, buckets: &Buckets) {
        for (key, attributes) in buckets {
            tracing::debug!("config {}:{}", mode, key);
            store.merge(
                mode,
                key,
                attributes.iter().map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUILDFILE: &str = r#"
[config.foundation]
required = ["runtime", "jquery"]

[config.desktop]
required = ["foundation"]
title = "Desktop"

[mode.debug.config.desktop]
required = ["testing"]
"#;

    #[test]
    fn test_evaluate_global_and_modes() {
        let mut store = ConfigStore::new();
        Buildfile::parse(BUILDFILE).unwrap().evaluate(&mut store);

        assert_eq!(
            store.required("global", "foundation"),
            vec!["runtime", "jquery"]
        );
        assert_eq!(store.required("global", "desktop"), vec!["foundation"]);
        assert_eq!(store.required("debug", "desktop"), vec!["testing"]);
        assert_eq!(
            store
                .get("global", "desktop", "title")
                .and_then(|v| v.as_str()),
            Some("Desktop")
        );
    }

    #[test]
    fn test_two_buildfiles_accumulate() {
        let mut store = ConfigStore::new();
        Buildfile::parse(BUILDFILE).unwrap().evaluate(&mut store);
        Buildfile::parse("[config.desktop]\nrequired = [\"datastore\"]\n")
            .unwrap()
            .evaluate(&mut store);

        assert_eq!(
            store.required("global", "desktop"),
            vec!["foundation", "datastore"]
        );
    }

    #[test]
    fn test_missing_buildfile_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(Buildfile::load_from_root(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_malformed_buildfile_reports_path() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(BUILDFILE_NAME), "[config.x\nrequired =").unwrap();

        let err = Buildfile::load_from_root(tmp.path()).unwrap_err();
        assert!(matches!(err, BuildfileError::Parse { .. }));
        assert!(err.to_string().contains(BUILDFILE_NAME));
    }
}
