//! Static asset indexing.
//!
//! Images under a target are indexed under several keys so stylesheets and
//! templates can name them at different levels of specificity. For
//! `english.lproj/images/logo.png` the keys are:
//!
//! - `english.lproj/images/logo.png` (full relative path)
//! - `images/logo.png` (locale folder stripped)
//! - `english.lproj/logo.png` (`images/` stripped)
//! - `logo.png` (both stripped)
//!
//! When two assets share a key the one indexed last wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::bundle::destination_root;
use crate::core::target::TargetId;
use crate::util::fs;

/// Extensions treated as static assets.
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "png"];

/// Folder prefixes stripped before `images/`, besides `<locale>.lproj/`.
const SHARED_PREFIXES: &[&str] = &["english.lproj/", "resources/"];

const IMAGES_DIR: &str = "images/";

/// One indexed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAssetRecord {
    /// Absolute path of the file on disk
    pub source: PathBuf,
    /// Public path the asset is served from
    pub destination: String,
}

/// Something that can resolve a static asset name.
pub trait StaticResolver {
    /// Find the asset registered under `name`.
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord>;
}

/// A resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatics;

impl StaticResolver for NoStatics {
    fn find_static(&self, _name: &str) -> Option<&StaticAssetRecord> {
        None
    }
}

/// Try `primary`, then `fallback`.
pub struct ChainResolver<'a> {
    primary: Option<&'a dyn StaticResolver>,
    fallback: &'a dyn StaticResolver,
}

impl<'a> ChainResolver<'a> {
    pub fn new(primary: Option<&'a dyn StaticResolver>, fallback: &'a dyn StaticResolver) -> Self {
        ChainResolver { primary, fallback }
    }
}

impl StaticResolver for ChainResolver<'_> {
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        self.primary
            .and_then(|p| p.find_static(name))
            .or_else(|| self.fallback.find_static(name))
    }
}

/// Static assets of one target.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetIndex {
    root: String,
    locale_prefix: String,
    records: Vec<StaticAssetRecord>,
    keys: HashMap<String, usize>,
}

impl StaticAssetIndex {
    /// Create an empty index whose destinations live under
    /// `/static/<locale>/<target>`.
    pub fn new(target: &str, locale: &str) -> Self {
        StaticAssetIndex {
            root: destination_root(locale, target),
            locale_prefix: format!("{}.lproj/", locale),
            records: Vec::new(),
            keys: HashMap::new(),
        }
    }

    /// Index every image under the target directory.
    pub fn index(target: &TargetId, locale: &str) -> Result<Self> {
        let mut index = StaticAssetIndex::new(&target.name, locale);
        let dir = target.directory();

        for path in fs::find_files(&dir, IMAGE_EXTENSIONS)? {
            let relative = fs::relative_name(&dir, &path);
            index.add(fs::normalize_path(&path), &relative);
        }

        tracing::debug!("indexed {} statics for {}", index.len(), target);
        Ok(index)
    }

    /// Register an asset at `relative` (to the target directory).
    pub fn add(&mut self, source: impl Into<PathBuf>, relative: &str) {
        let (locale, rest) = self.split_locale(relative);
        let (images, bare) = match rest.strip_prefix(IMAGES_DIR) {
            Some(bare) => (IMAGES_DIR, bare),
            None => ("", rest),
        };

        let record = StaticAssetRecord {
            source: source.into(),
            destination: format!("{}/{}", self.root, bare),
        };
        let slot = self.records.len();
        self.records.push(record);

        for key in [
            relative.to_string(),
            format!("{}{}", images, bare),
            format!("{}{}", locale, bare),
            bare.to_string(),
        ] {
            if let Some(previous) = self.keys.insert(key.clone(), slot) {
                if previous != slot {
                    tracing::debug!("static key {} now points at {}", key, relative);
                }
            }
        }
    }

    fn split_locale<'r>(&self, relative: &'r str) -> (&'r str, &'r str) {
        std::iter::once(self.locale_prefix.as_str())
            .chain(SHARED_PREFIXES.iter().copied())
            .find_map(|prefix| {
                relative
                    .strip_prefix(prefix)
                    .map(|rest| (&relative[..prefix.len()], rest))
            })
            .unwrap_or(("", relative))
    }

    /// Find an asset by any of its keys.
    ///
    /// A name without an image extension also matches `name.<ext>` for each
    /// known extension.
    pub fn lookup(&self, name: &str) -> Option<&StaticAssetRecord> {
        if let Some(&slot) = self.keys.get(name) {
            return Some(&self.records[slot]);
        }

        if has_image_extension(name) {
            return None;
        }

        IMAGE_EXTENSIONS
            .iter()
            .find_map(|ext| self.keys.get(&format!("{}.{}", name, ext)))
            .map(|&slot| &self.records[slot])
    }

    /// Find an asset by its public destination.
    pub fn by_destination(&self, destination: &str) -> Option<&StaticAssetRecord> {
        self.records
            .iter()
            .rev()
            .find(|r| r.destination == destination)
    }

    /// Every indexed asset, in index order.
    pub fn records(&self) -> &[StaticAssetRecord] {
        &self.records
    }

    /// Number of indexed assets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StaticResolver for StaticAssetIndex {
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        self.lookup(name)
    }
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}
